use crate::candidates::Candidates;
use crate::geometry::{Coord, Dims, Trans};
use std::collections::HashMap;
use thiserror::Error;

bitflags::bitflags! {
    /// Why and how a cell was carved. Tags only ever accumulate.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Special: u8 {
        const START = 1 << 0;
        const FINISH = 1 << 1;
        /// Carved by the reverse-completion walk
        const REVERSE = 1 << 2;
        /// Where the forward budget ran out
        const MAX_PASSES = 1 << 3;
        /// Recorded as a dead end by the forward walk
        const CREATE_END = 1 << 4;
    }
}

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Loc {
    pub coord: Coord,
    pub passable: bool,
    pub special: Special,
}

impl Loc {
    pub fn x(&self) -> i32 {
        self.coord.x
    }

    pub fn y(&self) -> i32 {
        self.coord.y
    }

    pub fn is(&self, tag: Special) -> bool {
        self.special.contains(tag)
    }
}

/// Cell transform that opens a cell
pub fn make_passable(mut l: Loc) -> Loc {
    l.passable = true;
    l
}

/// Cell transform that adds `tag` to a cell
pub fn with_special(tag: Special) -> impl Fn(Loc) -> Loc {
    move |mut l: Loc| {
        l.special |= tag;
        l
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{loc} is out of bounds of {dims} ({len}) grid")]
pub struct OutOfBoundsError {
    pub loc: Coord,
    pub dims: Dims,
    pub len: usize,
}

/// Fixed-size, row-major grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    dims: Dims,
    cells: Vec<Loc>,
}

impl Grid {
    /// Allocate a wall-only grid, stamping every cell with its own coordinate
    pub fn new(dims: Dims) -> Self {
        let cells = (0..dims.area())
            .map(|i| Loc {
                coord: dims.coord_of(i),
                ..Default::default()
            })
            .collect();
        Self { dims, cells }
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn idx(&self, c: Coord) -> usize {
        self.dims.idx(c)
    }

    pub fn coord_of(&self, i: usize) -> Coord {
        self.dims.coord_of(i)
    }

    pub fn within(&self, c: Coord) -> bool {
        self.dims.contains(c) && self.within_index(self.idx(c))
    }

    pub fn within_index(&self, i: usize) -> bool {
        i < self.cells.len()
    }

    fn oob(&self, loc: Coord) -> OutOfBoundsError {
        OutOfBoundsError {
            loc,
            dims: self.dims,
            len: self.cells.len(),
        }
    }

    fn checked_idx(&self, c: Coord) -> Result<usize, OutOfBoundsError> {
        if self.within(c) {
            Ok(self.idx(c))
        } else {
            Err(self.oob(c))
        }
    }

    /// Copy of the cell at `c`, or the bounds error
    pub fn get(&self, c: Coord) -> Result<Loc, OutOfBoundsError> {
        self.checked_idx(c).map(|i| self.cells[i])
    }

    /// Copy of the cell at `c`.
    ///
    /// # Panics
    /// If `c` lies outside the grid.
    pub fn at(&self, c: Coord) -> Loc {
        match self.get(c) {
            Ok(l) => l,
            Err(e) => panic!("{e}"),
        }
    }

    /// # Panics
    /// If `i` lies outside the grid.
    pub fn at_index(&self, i: usize) -> Loc {
        if !self.within_index(i) {
            panic!("{}", self.oob(self.coord_of(i)));
        }
        self.cells[i]
    }

    /// Apply `f` in place to every cell named in `coords`.
    ///
    /// # Panics
    /// If any coordinate lies outside the grid. Cells before the offending
    /// coordinate have already been updated.
    pub fn update<F: Fn(Loc) -> Loc>(&mut self, f: F, coords: &[Coord]) {
        for &c in coords {
            let i = match self.checked_idx(c) {
                Ok(i) => i,
                Err(e) => panic!("{e}"),
            };
            self.cells[i] = f(self.cells[i]);
        }
    }

    /// In-bounds orthogonal and diagonal neighbours, returned separately.
    /// Orthogonals come in left, up, right, down order.
    pub fn neighbors(&self, c: Coord) -> (Vec<Coord>, Vec<Coord>) {
        let mut orth = Candidates::new(c.orthogonals());
        let mut diag = Candidates::new(c.diagonals());
        orth.filter(|n| self.within(n));
        diag.filter(|n| self.within(n));
        (orth.into_accepted(), diag.into_accepted())
    }

    /// In-bounds neighbours keyed by their direction from `c`.
    ///
    /// # Panics
    /// If a neighbour is not adjacent to `c`, which would mean `neighbors`
    /// is broken.
    pub fn rels(&self, c: Coord) -> HashMap<Trans, Coord> {
        let (orth, diag) = self.neighbors(c);
        orth.into_iter()
            .chain(diag)
            .map(|n| match c.rel(n) {
                Some(t) => (t, n),
                None => panic!("{c}.rels got neighbour {n} that is not related"),
            })
            .collect()
    }

    /// Passable neighbours of `c` with their direction from it. Orthogonals
    /// come first, in the same order as `neighbors`, then diagonals.
    pub fn rels_passable(&self, c: Coord) -> Vec<(Trans, Coord)> {
        Trans::ORTHOGONAL
            .into_iter()
            .chain(Trans::DIAGONAL)
            .map(|t| (t, t.translate(c)))
            .filter(|&(_, n)| self.within(n) && self.at(n).passable)
            .collect()
    }

    /// Row-major iteration over all cells
    pub fn iter(&self) -> impl Iterator<Item = &Loc> {
        self.cells.iter()
    }

    /// Rows of cells, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Loc]> {
        self.cells.chunks(self.dims.width.max(1) as usize)
    }

    pub fn passable_count(&self) -> usize {
        self.cells.iter().filter(|l| l.passable).count()
    }

    /// Cells carrying `tag`
    pub fn tagged(&self, tag: Special) -> impl Iterator<Item = &Loc> {
        self.cells.iter().filter(move |l| l.is(tag))
    }
}
