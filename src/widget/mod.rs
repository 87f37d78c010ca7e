// src/widget/mod.rs
//! Retained-mode widgets.
//!
//! A widget owns its geometry and style, never the device. Each frame it
//! redraws itself into whatever `Canvas` it is given: a `Session` for direct
//! (unbuffered) output, or a `FrameCompositor` that diffs against the last
//! frame.

pub mod pixmap;
pub mod progressbar;
pub mod text;

pub use pixmap::{Pixmap, PixmapConfig};
pub use progressbar::{Progressbar, ProgressbarConfig};
pub use text::{Text, TextConfig};

use crate::canvas::Canvas;
use crate::color::Argb;
use crate::config::WidgetConfig;
use crate::decoder::ImageDecoder;
use crate::error::Result;
use crate::geometry::Rect;
use crate::rasterizer::{FontdueRasterizer, HeadlessRasterizer, TextRasterizer};
use std::time::Instant;

pub trait Widget {
    /// Draws the widget. `now` drives anything animated, such as text slicing.
    fn draw(&mut self, canvas: &mut dyn Canvas, now: Instant) -> Result<()>;

    /// Screen area the widget last drew into, if it draws at all.
    fn bounds(&self) -> Option<Rect>;

    /// Paints the widget's area white.
    fn erase(&self, canvas: &mut dyn Canvas) -> Result<()> {
        match self.bounds() {
            Some(rect) => canvas.fill_rect(rect, Argb::WHITE),
            None => Ok(()),
        }
    }
}

/// Builds a widget from its configuration entry.
///
/// Text widgets without a font file fall back to the block-glyph rasterizer.
pub fn from_config(config: &WidgetConfig, decoder: &dyn ImageDecoder) -> Result<Box<dyn Widget>> {
    Ok(match config {
        WidgetConfig::Pixmap {
            path,
            position,
            options,
        } => Box::new(Pixmap::load(path, *position, options, decoder)),
        WidgetConfig::Text {
            text,
            font,
            font_size,
            position,
            options,
        } => {
            let rasterizer: Box<dyn TextRasterizer> = match font {
                Some(font) => Box::new(FontdueRasterizer::from_file(font, *font_size)?),
                None => Box::new(HeadlessRasterizer::default()),
            };
            Box::new(Text::new(rasterizer, *position, text, options.clone())?)
        }
        WidgetConfig::Progressbar {
            position,
            size,
            options,
        } => Box::new(Progressbar::new(*position, *size, options.clone())?),
    })
}
