//! Headless mock rasterizer implementation.
//!
//! Renders every non-whitespace character as a solid block inside a fixed
//! cell, so bitmap sizes are predictable in tests: `chars × cell_width` wide
//! and `cell_height` tall.

use crate::error::Result;
use crate::rasterizer::{Bitmap, TextRasterizer, INK};

pub const DEFAULT_CELL_WIDTH: u32 = 6;
pub const DEFAULT_CELL_HEIGHT: u32 = 8;

#[derive(Debug, Clone, Copy)]
pub struct HeadlessRasterizer {
    cell_width: u32,
    cell_height: u32,
}

impl HeadlessRasterizer {
    pub fn new(cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
        }
    }
}

impl Default for HeadlessRasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_WIDTH, DEFAULT_CELL_HEIGHT)
    }
}

impl TextRasterizer for HeadlessRasterizer {
    fn render_text(&self, text: &str) -> Result<Bitmap> {
        let chars = text.chars().count() as u32;
        if chars == 0 {
            return Ok(Bitmap::blank(0, 0));
        }
        let mut bitmap = Bitmap::blank(chars * self.cell_width, self.cell_height);
        // One column and one row of spacing per cell.
        let glyph_w = self.cell_width.saturating_sub(1).max(1);
        let glyph_h = self.cell_height.saturating_sub(1).max(1);
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let left = i as u32 * self.cell_width;
            for y in 0..glyph_h {
                for x in 0..glyph_w {
                    bitmap.set_intensity(left + x, y, INK);
                }
            }
        }
        Ok(bitmap)
    }
}
