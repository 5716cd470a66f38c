use crate::geometry::Coord;
use crate::grid::Grid;
use std::collections::VecDeque;

/// Shortest orthogonal path over passable cells, endpoints included.
/// Returns None if either endpoint is closed, out of bounds, or unreachable.
pub fn shortest_path(grid: &Grid, from: Coord, to: Coord) -> Option<Vec<Coord>> {
    if !grid.within(from) || !grid.within(to) {
        return None;
    }
    if !grid.at(from).passable || !grid.at(to).passable {
        return None;
    }

    let mut came_from: Vec<Option<usize>> = vec![None; grid.len()];
    let mut visited = vec![false; grid.len()];
    let mut queue = VecDeque::new();

    let origin = grid.idx(from);
    visited[origin] = true;
    queue.push_back(from);

    while let Some(c) = queue.pop_front() {
        if c == to {
            let mut path = vec![c];
            let mut i = grid.idx(c);
            while let Some(prev) = came_from[i] {
                path.push(grid.coord_of(prev));
                i = prev;
            }
            path.reverse();
            return Some(path);
        }
        let (orth, _) = grid.neighbors(c);
        for n in orth {
            let ni = grid.idx(n);
            if !visited[ni] && grid.at_index(ni).passable {
                visited[ni] = true;
                came_from[ni] = Some(grid.idx(c));
                queue.push_back(n);
            }
        }
    }
    None
}

/// Number of passable cells reachable from `from`
pub fn reachable_count(grid: &Grid, from: Coord) -> usize {
    if !grid.within(from) || !grid.at(from).passable {
        return 0;
    }
    let mut visited = vec![false; grid.len()];
    let mut queue = VecDeque::new();
    visited[grid.idx(from)] = true;
    queue.push_back(from);
    let mut count = 0;
    while let Some(c) = queue.pop_front() {
        count += 1;
        for n in grid.neighbors(c).0 {
            let ni = grid.idx(n);
            if !visited[ni] && grid.at_index(ni).passable {
                visited[ni] = true;
                queue.push_back(n);
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Dims;
    use crate::grid::make_passable;

    fn open(grid: &mut Grid, cells: &[(i32, i32)]) {
        let coords: Vec<Coord> = cells.iter().map(|&c| c.into()).collect();
        grid.update(make_passable, &coords);
    }

    #[test]
    fn test_path_through_corridor() {
        let mut g = Grid::new(Dims::new(3, 3));
        open(&mut g, &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]);
        let path = shortest_path(&g, Coord::new(0, 0), Coord::new(2, 2)).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], Coord::new(0, 0));
        assert_eq!(path[4], Coord::new(2, 2));
        for w in path.windows(2) {
            assert!(w[0].rel(w[1]).is_some_and(|t| t.is_orthogonal()));
        }
    }

    #[test]
    fn test_diagonal_gap_is_not_a_path() {
        let mut g = Grid::new(Dims::new(2, 2));
        open(&mut g, &[(0, 0), (1, 1)]);
        assert!(shortest_path(&g, Coord::new(0, 0), Coord::new(1, 1)).is_none());
    }

    #[test]
    fn test_closed_or_outside_endpoint() {
        let mut g = Grid::new(Dims::new(2, 2));
        open(&mut g, &[(0, 0)]);
        assert!(shortest_path(&g, Coord::new(0, 0), Coord::new(1, 0)).is_none());
        assert!(shortest_path(&g, Coord::new(0, 0), Coord::new(5, 0)).is_none());
        assert_eq!(shortest_path(&g, Coord::new(0, 0), Coord::new(0, 0)).unwrap().len(), 1);
    }

    #[test]
    fn test_reachable_count() {
        let mut g = Grid::new(Dims::new(3, 3));
        open(&mut g, &[(0, 0), (1, 0), (2, 2)]);
        assert_eq!(reachable_count(&g, Coord::new(0, 0)), 2);
        assert_eq!(reachable_count(&g, Coord::new(2, 2)), 1);
        assert_eq!(reachable_count(&g, Coord::new(1, 1)), 0);
    }
}
