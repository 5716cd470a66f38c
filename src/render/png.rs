use super::Renderer;
use crate::grid::Grid;
use crate::settings::Palette;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::io::{self, Write};

/// Raster renderer: each cell becomes a `scale`-pixel square, with a
/// one-cell wall border around the maze.
#[derive(Debug, Clone, Copy)]
pub struct PngRenderer {
    pub scale: u32,
    pub show_tags: bool,
    pub palette: Palette,
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self {
            scale: 25,
            show_tags: true,
            palette: Palette::default(),
        }
    }
}

impl PngRenderer {
    pub fn new(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
            ..Default::default()
        }
    }

    /// Image size in pixels for a grid. Fails when the image would not fit
    /// in `u32` pixel coordinates.
    pub fn size(&self, grid: &Grid) -> io::Result<(u32, u32)> {
        let dims = grid.dims();
        let side = |cells: i32| {
            (cells.max(0) as u32)
                .checked_add(2)
                .and_then(|n| n.checked_mul(self.scale))
                .ok_or_else(|| too_large(grid, self.scale))
        };
        Ok((side(dims.width)?, side(dims.height)?))
    }

    /// Packed RGB8 pixel buffer
    pub fn pixels(&self, grid: &Grid) -> io::Result<Vec<u8>> {
        let (w, h) = self.size(grid)?;
        let len = (w as usize)
            .checked_mul(h as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| too_large(grid, self.scale))?;
        let wall = self.palette.wall();
        let mut buf = Vec::with_capacity(len);
        for py in 0..h {
            for px in 0..w {
                let (cx, cy) = ((px / self.scale) as i32 - 1, (py / self.scale) as i32 - 1);
                let (r, g, b) = match grid.get((cx, cy).into()) {
                    Ok(loc) => self.palette.cell(&loc, self.show_tags),
                    Err(_) => wall,
                };
                buf.extend_from_slice(&[r, g, b]);
            }
        }
        Ok(buf)
    }
}

fn too_large(grid: &Grid, scale: u32) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{} grid at scale {scale} is too large for a PNG", grid.dims()),
    )
}

impl Renderer for PngRenderer {
    fn draw(&self, grid: &Grid, dest: &mut dyn Write) -> io::Result<()> {
        let (w, h) = self.size(grid)?;
        let buf = self.pixels(grid)?;
        PngEncoder::new(dest)
            .write_image(&buf, w, h, ExtendedColorType::Rgb8)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Coord, Dims};
    use crate::grid::{make_passable, with_special, Special};

    fn sample() -> Grid {
        let mut g = Grid::new(Dims::new(3, 2));
        g.update(make_passable, &[Coord::new(0, 0), Coord::new(1, 0)]);
        g.update(with_special(Special::START), &[Coord::new(0, 0)]);
        g
    }

    #[test]
    fn test_png_decodes_with_expected_size() {
        let r = PngRenderer::new(4);
        let bytes = r.draw_to_vec(&sample()).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (20, 16));
    }

    #[test]
    fn test_pixel_colors() {
        let r = PngRenderer::new(4);
        let bytes = r.draw_to_vec(&sample()).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
        let p = Palette::Classic;
        let px = |x: u32, y: u32| {
            let c = img.get_pixel(x, y).0;
            (c[0], c[1], c[2])
        };
        // border
        assert_eq!(px(0, 0), p.wall());
        // start cell (0,0) sits at pixel (4..8, 4..8)
        assert_eq!(px(5, 5), p.tag(Special::START));
        // plain passage
        assert_eq!(px(9, 5), p.open());
        // closed cell (2,1)
        assert_eq!(px(13, 9), p.wall());
    }

    #[test]
    fn test_hidden_tags_paint_open() {
        let r = PngRenderer {
            show_tags: false,
            ..PngRenderer::new(2)
        };
        let buf = r.pixels(&sample()).unwrap();
        // pixel (2, 2) is the start cell
        let i = (2 * 10 + 2) * 3;
        let open = Palette::Classic.open();
        assert_eq!((buf[i], buf[i + 1], buf[i + 2]), open);
    }

    #[test]
    fn test_overflowing_scale_is_an_error() {
        let g = Grid::new(Dims::new(256, 256));
        let r = PngRenderer::new(20_000_000);
        let err = r.size(&g).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("256x256"));
        let mut out = Vec::new();
        assert!(r.draw(&g, &mut out).is_err());
        assert!(out.is_empty());
        assert_eq!(PngRenderer::new(200).size(&g).unwrap(), (258 * 200, 258 * 200));
    }
}
