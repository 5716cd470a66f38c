use super::{tag_label, Renderer};
use crate::grid::Grid;
use crate::settings::{Palette, Rgb};
use std::io::{self, Write};
use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;

fn hex((r, g, b): Rgb) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// SVG renderer. Passages are drawn as thick round-capped strokes between
/// the centres of adjacent passable cells, inside a one-cell border.
#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    /// Size of each cell in user units
    pub scale: u32,
    pub show_tags: bool,
    pub palette: Palette,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            scale: 25,
            show_tags: true,
            palette: Palette::default(),
        }
    }
}

impl SvgRenderer {
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
            ..Default::default()
        }
    }

    /// Centre of cell (x, y), accounting for the border
    fn centre(&self, x: i32, y: i32) -> (i64, i64) {
        let s = self.scale as i64;
        ((x as i64 + 1) * s + s / 2, (y as i64 + 1) * s + s / 2)
    }

    fn passages(&self, grid: &Grid) -> Group {
        let open = hex(self.palette.open());
        let stroke = self.scale as i64 * 4 / 5;
        let mut group = Group::new().set("id", "passages");
        for loc in grid.iter().filter(|l| l.passable) {
            let (x1, y1) = self.centre(loc.x(), loc.y());
            let (orth, _) = grid.neighbors(loc.coord);
            // each passage once, from its upper-left end
            for n in orth.into_iter().filter(|n| n.x >= loc.x() && n.y >= loc.y()) {
                if !grid.at(n).passable {
                    continue;
                }
                let (x2, y2) = self.centre(n.x, n.y);
                group = group.add(
                    Line::new()
                        .set("x1", x1)
                        .set("y1", y1)
                        .set("x2", x2)
                        .set("y2", y2)
                        .set("stroke", open.clone())
                        .set("stroke-width", stroke)
                        .set("stroke-linecap", "round"),
                );
            }
        }
        group
    }

    fn labels(&self, grid: &Grid) -> Group {
        let font_size = (self.scale as i64 / 2 - 1).max(1);
        let mut group = Group::new().set("id", "labels");
        for loc in grid.iter().filter(|l| l.passable) {
            let Some(ch) = tag_label(loc) else { continue };
            let ch = if ch == '*' { 'E' } else { ch };
            let (x, y) = self.centre(loc.x(), loc.y());
            group = group.add(
                Text::new(ch.to_string())
                    .set("x", x)
                    .set("y", y)
                    .set("font-size", font_size)
                    .set("fill", hex(self.palette.tag(loc.special)))
                    .set("dominant-baseline", "middle")
                    .set("text-anchor", "middle"),
            );
        }
        group
    }

    pub fn document(&self, grid: &Grid) -> Document {
        let s = self.scale as i64;
        let dims = grid.dims();
        let (width, height) = ((dims.width as i64 + 2) * s, (dims.height as i64 + 2) * s);
        let wall = hex(self.palette.wall());

        let mut doc = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .add(
                Rectangle::new()
                    .set("x", s / 2)
                    .set("y", s / 2)
                    .set("width", (dims.width as i64 + 1) * s)
                    .set("height", (dims.height as i64 + 1) * s)
                    .set("fill", wall.clone())
                    .set("stroke", wall)
                    .set("stroke-width", s),
            )
            .add(self.passages(grid));
        if self.show_tags {
            doc = doc.add(self.labels(grid));
        }
        doc
    }
}

impl Renderer for SvgRenderer {
    fn draw(&self, grid: &Grid, dest: &mut dyn Write) -> io::Result<()> {
        svg::write(&mut *dest, &self.document(grid))?;
        writeln!(dest)
    }
}
