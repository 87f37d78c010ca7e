// src/rasterizer/mod.rs
//! Text rasterization: turns a string into an intensity `Bitmap`.
//!
//! A `Bitmap` stores one `f32` ink coverage value per pixel, row-major, where
//! `0.0` is background and `1.0` is full ink. Layout and widgets only ever see `Bitmap`s, so the
//! font backend can be swapped without touching them:
//!
//! ```text
//! &str  →  [TextRasterizer]  →  Bitmap  →  [layout + Text widget]  →  grey pixels
//! ```

pub mod fontdue_rasterizer;
pub mod headless_rasterizer;

pub use fontdue_rasterizer::FontdueRasterizer;
pub use headless_rasterizer::HeadlessRasterizer;

use crate::error::Result;

/// Background intensity.
pub const PAPER: f32 = 0.0;
/// Full ink intensity.
pub const INK: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<f32>,
}

impl Bitmap {
    /// A bitmap of the given size with every pixel set to background.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![PAPER; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intensity at `(x, y)`. Outside the bitmap reads as background.
    pub fn intensity(&self, x: u32, y: u32) -> f32 {
        self.index(x, y).map_or(PAPER, |i| self.pixels[i])
    }

    pub fn set_intensity(&mut self, x: u32, y: u32, value: f32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = value.clamp(PAPER, INK);
        }
    }

    /// Raises the ink at `(x, y)` to `value` unless it is already darker.
    /// Overlapping glyphs blend this way.
    pub fn darken(&mut self, x: u32, y: u32, value: f32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = self.pixels[i].max(value.clamp(PAPER, INK));
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }
}

/// Capability: render a single line of text into a bitmap.
pub trait TextRasterizer {
    fn render_text(&self, text: &str) -> Result<Bitmap>;
}

impl<T: TextRasterizer + ?Sized> TextRasterizer for Box<T> {
    fn render_text(&self, text: &str) -> Result<Bitmap> {
        (**self).render_text(text)
    }
}
