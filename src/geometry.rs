use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer grid position. x grows to the right, y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset that takes `self` to `other`
    pub fn diff(&self, other: Coord) -> Trans {
        Trans::new(other.x - self.x, other.y - self.y)
    }

    /// Direction of `other` as seen from `self`, if the two are adjacent
    /// (orthogonally or diagonally).
    pub fn rel(&self, other: Coord) -> Option<Trans> {
        let d = self.diff(other);
        Trans::ALL.contains(&d).then_some(d)
    }

    /// Orthogonal neighbours in left, up, right, down order.
    /// No bounds checking; see `Grid::neighbors`.
    pub fn orthogonals(&self) -> [Coord; 4] {
        Trans::ORTHOGONAL.map(|t| t.translate(*self))
    }

    /// Diagonal neighbours, unchecked.
    pub fn diagonals(&self) -> [Coord; 4] {
        Trans::DIAGONAL.map(|t| t.translate(*self))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Extent of a grid. Linear addressing is row-major: `index = y * width + x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dims {
    pub width: i32,
    pub height: i32,
}

impl Dims {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height
    }

    /// Linear index of `c`. Only meaningful when `contains(c)` holds.
    pub fn idx(&self, c: Coord) -> usize {
        (c.y as usize) * (self.width as usize) + c.x as usize
    }

    /// Inverse of `idx`
    pub fn coord_of(&self, i: usize) -> Coord {
        let w = self.width as usize;
        Coord::new((i % w) as i32, (i / w) as i32)
    }

    /// Bottom-right cell
    pub fn last(&self) -> Coord {
        Coord::new(self.width - 1, self.height - 1)
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Unit translation along x and y. Only the eight named constants are
/// considered "related" offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Trans {
    pub x: i32,
    pub y: i32,
}

impl Trans {
    pub const UPPER: Trans = Trans::new(0, -1);
    pub const UPPER_RIGHT: Trans = Trans::new(1, -1);
    pub const RIGHT: Trans = Trans::new(1, 0);
    pub const LOWER_RIGHT: Trans = Trans::new(1, 1);
    pub const LOWER: Trans = Trans::new(0, 1);
    pub const LOWER_LEFT: Trans = Trans::new(-1, 1);
    pub const LEFT: Trans = Trans::new(-1, 0);
    pub const UPPER_LEFT: Trans = Trans::new(-1, -1);

    /// Enumeration order of orthogonal neighbours
    pub const ORTHOGONAL: [Trans; 4] = [Trans::LEFT, Trans::UPPER, Trans::RIGHT, Trans::LOWER];

    /// Enumeration order of diagonal neighbours
    pub const DIAGONAL: [Trans; 4] = [
        Trans::UPPER_LEFT,
        Trans::LOWER_LEFT,
        Trans::LOWER_RIGHT,
        Trans::UPPER_RIGHT,
    ];

    pub const ALL: [Trans; 8] = [
        Trans::UPPER,
        Trans::UPPER_RIGHT,
        Trans::RIGHT,
        Trans::LOWER_RIGHT,
        Trans::LOWER,
        Trans::LOWER_LEFT,
        Trans::LEFT,
        Trans::UPPER_LEFT,
    ];

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn translate(&self, c: Coord) -> Coord {
        Coord::new(c.x + self.x, c.y + self.y)
    }

    pub fn is_orthogonal(&self) -> bool {
        Trans::ORTHOGONAL.contains(self)
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Trans::UPPER => "Upper",
            Trans::UPPER_RIGHT => "UpperRight",
            Trans::RIGHT => "Right",
            Trans::LOWER_RIGHT => "LowerRight",
            Trans::LOWER => "Lower",
            Trans::LOWER_LEFT => "LowerLeft",
            Trans::LEFT => "Left",
            Trans::UPPER_LEFT => "UpperLeft",
            _ => "Unrelated",
        }
    }
}

impl fmt::Display for Trans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_display() {
        assert_eq!(Coord::new(3, 3).to_string(), "(3,3)");
        assert_eq!(Coord::new(-1, 0).to_string(), "(-1,0)");
        assert_eq!(Dims::new(10, 12).to_string(), "10x12");
    }

    #[test]
    fn test_coord_of() {
        let dims = Dims::new(3, 3);
        assert_eq!(dims.coord_of(12), Coord::new(0, 4));
        assert_eq!(dims.coord_of(4), Coord::new(1, 1));
    }

    #[test]
    fn test_index_round_trip() {
        let dims = Dims::new(7, 5);
        for i in 0..dims.area() {
            assert_eq!(dims.idx(dims.coord_of(i)), i);
        }
        for y in 0..dims.height {
            for x in 0..dims.width {
                let c = Coord::new(x, y);
                assert_eq!(dims.coord_of(dims.idx(c)), c);
            }
        }
    }

    #[test]
    fn test_known_indices() {
        let dims = Dims::new(10, 10);
        assert_eq!(dims.idx(Coord::new(0, 0)), 0);
        assert_eq!(dims.idx(Coord::new(9, 0)), 9);
        assert_eq!(dims.idx(Coord::new(9, 9)), 99);
    }

    #[test]
    fn test_rel() {
        let c = Coord::new(5, 5);
        assert_eq!(c.rel(Coord::new(5, 4)), Some(Trans::UPPER));
        assert_eq!(c.rel(Coord::new(4, 6)), Some(Trans::LOWER_LEFT));
        assert_eq!(c.rel(Coord::new(5, 5)), None);
        assert_eq!(c.rel(Coord::new(7, 5)), None);
    }

    #[test]
    fn test_translate_and_names() {
        let c = Coord::new(2, 2);
        assert_eq!(Trans::RIGHT.translate(c), Coord::new(3, 2));
        assert_eq!(Trans::UPPER_LEFT.translate(c), Coord::new(1, 1));
        assert_eq!(Trans::LOWER.name(), "Lower");
        assert_eq!(Trans::new(2, 0).name(), "Unrelated");
        assert!(Trans::LEFT.is_orthogonal());
        assert!(!Trans::LOWER_RIGHT.is_orthogonal());
    }

    #[test]
    fn test_contains() {
        let dims = Dims::new(4, 2);
        assert!(dims.contains(Coord::new(3, 1)));
        assert!(!dims.contains(Coord::new(4, 1)));
        assert!(!dims.contains(Coord::new(0, -1)));
        assert_eq!(dims.last(), Coord::new(3, 1));
    }
}
