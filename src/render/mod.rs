//! Read-only renderers for a finished grid.

pub mod png;
pub mod svg;
pub mod text;

use crate::grid::{Grid, Loc, Special};
use std::io::{self, Write};

pub use png::PngRenderer;
pub use svg::SvgRenderer;
pub use text::TextRenderer;

/// Something that can draw a grid to a byte sink
pub trait Renderer {
    fn draw(&self, grid: &Grid, dest: &mut dyn Write) -> io::Result<()>;

    /// Render into memory
    fn draw_to_vec(&self, grid: &Grid) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.draw(grid, &mut buf)?;
        Ok(buf)
    }
}

/// Label drawn on a passable cell, by tag precedence
pub fn tag_label(loc: &Loc) -> Option<char> {
    let s = loc.special;
    if s.contains(Special::START) {
        Some('S')
    } else if s.contains(Special::FINISH) {
        Some('F')
    } else if s.contains(Special::MAX_PASSES) {
        Some('*')
    } else if s.contains(Special::REVERSE) {
        Some('r')
    } else if s.contains(Special::CREATE_END) {
        Some('e')
    } else {
        None
    }
}
