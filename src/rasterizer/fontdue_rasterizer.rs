//! TrueType / OpenType rasterizer backed by `fontdue`.

use crate::error::{DisplayError, Result};
use crate::rasterizer::{Bitmap, TextRasterizer};
use fontdue::{Font, FontSettings, Metrics};
use log::{debug, info};
use std::path::Path;

pub struct FontdueRasterizer {
    font: Font,
    size_px: f32,
}

struct PlacedGlyph {
    left: i32,
    top: i32,
    metrics: Metrics,
    coverage: Vec<u8>,
}

impl FontdueRasterizer {
    /// Loads a font file and fixes the pixel size used for every render.
    pub fn from_file(path: impl AsRef<Path>, size_px: f32) -> Result<Self> {
        let path = path.as_ref();
        info!("FontdueRasterizer: Loading {} at {}px", path.display(), size_px);
        let data = std::fs::read(path).map_err(|e| DisplayError::FontLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(&data, size_px).map_err(|e| match e {
            DisplayError::FontLoad { reason, .. } => DisplayError::FontLoad {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn from_bytes(data: &[u8], size_px: f32) -> Result<Self> {
        if !(size_px.is_finite() && size_px > 0.0) {
            return Err(DisplayError::FontLoad {
                path: "<memory>".to_string(),
                reason: format!("font size must be positive, got {}", size_px),
            });
        }
        let settings = FontSettings {
            scale: size_px,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(data, settings).map_err(|e| DisplayError::FontLoad {
            path: "<memory>".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { font, size_px })
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }
}

impl TextRasterizer for FontdueRasterizer {
    fn render_text(&self, text: &str) -> Result<Bitmap> {
        if text.is_empty() {
            return Ok(Bitmap::blank(0, 0));
        }
        let (ascent, descent) = self
            .font
            .horizontal_line_metrics(self.size_px)
            .map_or((self.size_px, 0.0), |m| (m.ascent, m.descent));
        let height = (ascent - descent).ceil().max(1.0) as u32;

        // Pen walk along the baseline, which sits `ascent` below the top edge.
        let mut pen = 0.0f32;
        let mut right = 0i32;
        let mut glyphs = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let (metrics, coverage) = self.font.rasterize(ch, self.size_px);
            let left = (pen + metrics.xmin as f32).round() as i32;
            let top = (ascent - metrics.ymin as f32 - metrics.height as f32).round() as i32;
            right = right.max(left + metrics.width as i32);
            pen += metrics.advance_width;
            glyphs.push(PlacedGlyph {
                left,
                top,
                metrics,
                coverage,
            });
        }
        let width = (pen.ceil() as i32).max(right).max(0) as u32;
        debug!(
            "FontdueRasterizer: {:?} -> {}x{} bitmap",
            text, width, height
        );

        let mut bitmap = Bitmap::blank(width, height);
        for glyph in &glyphs {
            for gy in 0..glyph.metrics.height {
                for gx in 0..glyph.metrics.width {
                    let coverage = glyph.coverage[gy * glyph.metrics.width + gx];
                    if coverage == 0 {
                        continue;
                    }
                    let x = glyph.left + gx as i32;
                    let y = glyph.top + gy as i32;
                    if x < 0 || y < 0 {
                        continue;
                    }
                    bitmap.darken(x as u32, y as u32, coverage as f32 / 255.0);
                }
            }
        }
        Ok(bitmap)
    }
}
