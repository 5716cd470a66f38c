use super::{tag_label, Renderer};
use crate::grid::{Grid, Loc};
use crate::settings::{Palette, Rgb};
use crossterm::style::{Color, Stylize};
use std::io::{self, Write};

const WALL: &str = "\u{2588}";

fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb { r, g, b }
}

/// Console renderer: one character per cell inside a wall border, with a
/// `WxH` header line.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    pub color: bool,
    pub show_tags: bool,
    pub palette: Palette,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            color: true,
            show_tags: true,
            palette: Palette::default(),
        }
    }
}

impl TextRenderer {
    /// Plain text, no escape sequences
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Default::default()
        }
    }

    fn wall(&self, dest: &mut dyn Write, n: usize) -> io::Result<()> {
        let run = WALL.repeat(n);
        if self.color {
            write!(dest, "{}", run.with(rgb(self.palette.wall())))
        } else {
            write!(dest, "{run}")
        }
    }

    fn cell(&self, dest: &mut dyn Write, loc: &Loc) -> io::Result<()> {
        if !loc.passable {
            return self.wall(dest, 1);
        }
        let label = if self.show_tags { tag_label(loc) } else { None };
        match (label, self.color) {
            (Some(ch), true) => write!(
                dest,
                "{}",
                ch.with(rgb(self.palette.tag(loc.special)))
                    .on(rgb(self.palette.open()))
            ),
            (Some(ch), false) => write!(dest, "{ch}"),
            (None, true) => write!(dest, "{}", ' '.on(rgb(self.palette.open()))),
            (None, false) => write!(dest, " "),
        }
    }
}

impl Renderer for TextRenderer {
    fn draw(&self, grid: &Grid, dest: &mut dyn Write) -> io::Result<()> {
        let width = grid.dims().width.max(0) as usize;
        writeln!(dest, "{}", grid.dims())?;
        self.wall(dest, width + 2)?;
        writeln!(dest)?;
        for row in grid.rows() {
            self.wall(dest, 1)?;
            for loc in row {
                self.cell(dest, loc)?;
            }
            self.wall(dest, 1)?;
            writeln!(dest)?;
        }
        self.wall(dest, width + 2)?;
        writeln!(dest)
    }
}
