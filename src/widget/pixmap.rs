//! Pixmap widget: a decoded image replayed pixel by pixel.

use crate::canvas::Canvas;
use crate::decoder::{GreyImage, ImageDecoder};
use crate::error::Result;
use crate::geometry::{Point, Rect, Size};
use crate::widget::Widget;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixmapConfig {
    /// Grey levels at or above this become white, the rest black. `None`
    /// keeps the image's grey levels.
    pub threshold: Option<u8>,
}

impl Default for PixmapConfig {
    fn default() -> Self {
        PixmapConfig {
            threshold: Some(128),
        }
    }
}

pub struct Pixmap {
    position: Point,
    /// `None` when decoding failed; the widget then draws nothing.
    image: Option<GreyImage>,
}

impl Pixmap {
    /// Decodes `path` once. A decode failure is logged and leaves an inert
    /// widget rather than failing the whole screen.
    pub fn load(
        path: &Path,
        position: Point,
        config: &PixmapConfig,
        decoder: &dyn ImageDecoder,
    ) -> Self {
        if position.x < 0 || position.y < 0 {
            warn!(
                "Pixmap: Position of {} is negative: {:?}",
                path.display(),
                position
            );
        }
        match decoder.decode(path) {
            Ok(image) => {
                info!(
                    "Pixmap: Loaded {} ({}x{})",
                    path.display(),
                    image.width(),
                    image.height()
                );
                Self::from_image(image, position, config)
            }
            Err(e) => {
                warn!("Pixmap: {}", e);
                Self {
                    position,
                    image: None,
                }
            }
        }
    }

    pub fn from_image(image: GreyImage, position: Point, config: &PixmapConfig) -> Self {
        let image = match config.threshold {
            Some(threshold) => image.map(|level| if level >= threshold { 255 } else { 0 }),
            None => image,
        };
        Self {
            position,
            image: Some(image),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub fn size(&self) -> Option<Size> {
        self.image
            .as_ref()
            .map(|image| Size::new(image.width(), image.height()))
    }
}

impl Widget for Pixmap {
    fn draw(&mut self, canvas: &mut dyn Canvas, _now: Instant) -> Result<()> {
        let Some(image) = &self.image else {
            return Ok(());
        };
        for y in 0..image.height() {
            for x in 0..image.width() {
                if let Some(level) = image.get(x, y) {
                    canvas.set_grey(self.position.offset(x as i32, y as i32), level as i32)?;
                }
            }
        }
        Ok(())
    }

    fn bounds(&self) -> Option<Rect> {
        self.size().map(|size| Rect::new(self.position, size))
    }
}
