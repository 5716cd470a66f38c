use crate::carver::{CarveError, FillStats, WalkingCarver};
use crate::geometry::{Coord, Dims};
use crate::grid::{Grid, Loc};
use crate::settings::CarveSettings;
use log::warn;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

/// A grid shared between the carver and readers. The whole fill call runs
/// under the write lock, so readers only ever see an empty or a finished
/// maze.
#[derive(Debug)]
pub struct Maze {
    grid: RwLock<Grid>,
    dims: Dims,
}

impl Maze {
    pub fn new(width: i32, height: i32) -> Self {
        let dims = Dims::new(width, height);
        Self {
            grid: RwLock::new(Grid::new(dims)),
            dims,
        }
    }

    /// Carve a fresh maze from the top-left to the bottom-right corner.
    /// The maze is returned even when carving fails so it can still be
    /// inspected; the error says it is not usable.
    pub fn generate(width: i32, height: i32, seed: u64, settings: CarveSettings) -> (Self, Result<FillStats, CarveError>) {
        let maze = Self::new(width, height);
        let carver = WalkingCarver::with_settings(seed, settings);
        let outcome = maze.fill(&carver, maze.start(), maze.finish());
        if let Err(e) = &outcome {
            warn!("Maze {} with seed {} is unusable: {}", maze.dims, seed, e);
        }
        (maze, outcome)
    }

    pub fn fill(&self, carver: &WalkingCarver, start: Coord, finish: Coord) -> Result<FillStats, CarveError> {
        let mut grid = self.grid.write().unwrap_or_else(PoisonError::into_inner);
        carver.fill(&mut grid, start, finish)
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn start(&self) -> Coord {
        Coord::new(0, 0)
    }

    pub fn finish(&self) -> Coord {
        self.dims.last()
    }

    /// Read access to the whole grid
    pub fn read(&self) -> RwLockReadGuard<'_, Grid> {
        self.grid.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the cell at (x, y).
    ///
    /// # Panics
    /// If (x, y) lies outside the maze.
    pub fn at(&self, x: i32, y: i32) -> Loc {
        self.read().at(Coord::new(x, y))
    }

    /// Owned copy of the grid, for renderers that outlive the lock
    pub fn snapshot(&self) -> Grid {
        self.read().clone()
    }

    /// Cells in row-major order. Each cell is read under its own short lock.
    pub fn iter(&self) -> impl Iterator<Item = Loc> + '_ {
        let w = self.dims.width;
        (0..self.dims.area()).map(move |i| self.at(i as i32 % w, i as i32 / w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::shortest_path;
    use rand::Rng;

    #[test]
    fn test_new_maze_coordinates() {
        let m = Maze::new(100, 100);
        let mut rng = rand::thread_rng();
        let (x, y) = (rng.gen_range(0..100), rng.gen_range(0..100));
        let l = m.at(x, y);
        assert_eq!((l.x(), l.y()), (x, y));
    }

    #[test]
    fn test_iter_is_row_major() {
        let m = Maze::new(3, 2);
        let coords: Vec<Coord> = m.iter().map(|l| l.coord).collect();
        assert_eq!(coords.len(), 6);
        assert_eq!(coords[1], Coord::new(1, 0));
        assert_eq!(coords[3], Coord::new(0, 1));
    }

    #[test]
    fn test_generate_connects_corners() {
        let (m, outcome) = Maze::generate(12, 9, 42, CarveSettings::default());
        let stats = outcome.unwrap();
        assert!(stats.passable >= 2);
        let g = m.snapshot();
        assert!(shortest_path(&g, m.start(), m.finish()).is_some());
        assert_eq!(m.finish(), Coord::new(11, 8));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let (a, _) = Maze::generate(15, 15, 1234, CarveSettings::default());
        let (b, _) = Maze::generate(15, 15, 1234, CarveSettings::default());
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
