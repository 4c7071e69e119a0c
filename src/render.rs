//! Rasterization of module grids.

use image::{Rgb, RgbImage};
use tracing::warn;

use crate::matrix::ModuleMatrix;

/// Placement of the symbol on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Canvas side, in pixels.
    pub canvas: u32,
    /// Pixels per module.
    pub scale: u32,
    /// Offset of the first module from the top-left corner, in pixels.
    pub offset: u32,
}

impl Layout {
    /// Fits a `side`-module symbol plus `margin` quiet modules on each edge into
    /// a `size`-pixel square.
    ///
    /// Leftover pixels are split evenly between the quiet zones. When even one
    /// pixel per module does not fit, the canvas grows to the minimum size that
    /// keeps the code legible.
    pub fn compute(side: u32, size: u32, margin: u32) -> Self {
        let total = side.saturating_add(margin.saturating_mul(2));
        let scale = (size / total.max(1)).max(1);
        let canvas = size.max(total.saturating_mul(scale));
        let offset = (canvas - side * scale) / 2;
        Self { canvas, scale, offset }
    }
}

/// Renders `matrix` onto a square canvas of `size` pixels.
///
/// Dark modules are painted as hard-edged `scale x scale` blocks of
/// `foreground`; everything else, including the quiet zone of `margin`
/// modules, is `background`.
///
/// # Example
///
/// ```rust
/// use image::Rgb;
/// use qrforge::qrcode::{encode, ErrorCorrection};
/// use qrforge::render::render;
///
/// let matrix = encode("Hello, World!", ErrorCorrection::Low).unwrap();
/// let img = render(&matrix, 250, Rgb([0, 0, 0]), Rgb([255, 255, 255]), 1);
/// assert_eq!(img.dimensions(), (250, 250));
/// ```
pub fn render(matrix: &ModuleMatrix, size: u32, foreground: Rgb<u8>, background: Rgb<u8>, margin: u32) -> RgbImage {
    let side = matrix.side() as u32;
    let layout = Layout::compute(side, size, margin);
    if layout.canvas > size {
        warn!(
            requested = size,
            rendered = layout.canvas,
            modules = side,
            margin,
            "symbol does not fit the requested size, enlarging canvas"
        );
    }

    let mut img = RgbImage::from_pixel(layout.canvas, layout.canvas, background);
    for (y, row) in matrix.rows().enumerate() {
        for (x, &dark) in row.iter().enumerate() {
            if !dark {
                continue;
            }
            let left = layout.offset + x as u32 * layout.scale;
            let top = layout.offset + y as u32 * layout.scale;
            for py in top..top + layout.scale {
                for px in left..left + layout.scale {
                    img.put_pixel(px, py, foreground);
                }
            }
        }
    }
    img
}

/// Renders a plain canvas of `size` pixels in `background`.
pub fn render_blank(size: u32, background: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(size, size, background)
}

/// Returns a text picture of `matrix` using full-block characters, two per
/// module so the result looks square in a terminal.
pub fn to_text(matrix: &ModuleMatrix, margin: u32) -> String {
    let margin = margin as i64;
    let side = matrix.side() as i64;
    let mut result = String::new();
    for y in -margin..side + margin {
        for x in -margin..side + margin {
            let dark = x >= 0 && y >= 0 && matrix.get(x as usize, y as usize);
            result.push_str(if dark { "██" } else { "  " });
        }
        result.push('\n');
    }
    result
}
