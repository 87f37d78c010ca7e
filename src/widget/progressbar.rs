//! Progressbar widget: optional one-pixel border plus a fill proportional to
//! `state`.

use crate::canvas::Canvas;
use crate::color::Argb;
use crate::error::{DisplayError, Result};
use crate::geometry::{Point, Rect, Size};
use crate::widget::Widget;
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Smallest width and height that leave room for a border.
const MIN_BORDER_EXTENT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressbarConfig {
    /// Initial fill, clamped to `[0, 1]`.
    pub state: f64,
    pub border: bool,
    pub colour: Argb,
}

impl Default for ProgressbarConfig {
    fn default() -> Self {
        ProgressbarConfig {
            state: 0.0,
            border: true,
            colour: Argb::RED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Progressbar {
    position: Point,
    size: Size,
    state: f64,
    border: bool,
    colour: Argb,
}

impl Progressbar {
    pub fn new(position: Point, size: Size, config: ProgressbarConfig) -> Result<Self> {
        if position.x < 0 || position.y < 0 {
            return Err(DisplayError::InvalidGeometry(format!(
                "progressbar position must not be negative, got {:?}",
                position
            )));
        }
        if size.width < 1 || size.height < 1 {
            return Err(DisplayError::InvalidGeometry(format!(
                "progressbar must be at least 1x1, got {}x{}",
                size.width, size.height
            )));
        }
        let mut border = config.border;
        if border && (size.width < MIN_BORDER_EXTENT || size.height < MIN_BORDER_EXTENT) {
            warn!(
                "Progressbar: Cannot draw a border on a {}x{} bar, disabling it",
                size.width, size.height
            );
            border = false;
        }
        let mut bar = Self {
            position,
            size,
            state: 0.0,
            border,
            colour: config.colour,
        };
        bar.set_state(config.state);
        Ok(bar)
    }

    pub fn state(&self) -> f64 {
        self.state
    }

    /// Sets the fill level. Values outside `[0, 1]` are clamped, NaN reads as empty.
    pub fn set_state(&mut self, state: f64) {
        self.state = if state.is_nan() {
            0.0
        } else {
            state.clamp(0.0, 1.0)
        };
    }

    pub fn has_border(&self) -> bool {
        self.border
    }

    /// Columns covered by the fill.
    pub fn fill_width(&self) -> u32 {
        (self.state * self.size.width as f64).round_ties_even() as u32
    }
}

impl Widget for Progressbar {
    fn draw(&mut self, canvas: &mut dyn Canvas, _now: Instant) -> Result<()> {
        let (w, h) = (self.size.width as i32, self.size.height as i32);
        if self.border {
            for x in 0..w {
                canvas.set_colour(self.position.offset(x, 0), self.colour)?;
                canvas.set_colour(self.position.offset(x, h - 1), self.colour)?;
            }
            for y in 1..h - 1 {
                canvas.set_colour(self.position.offset(0, y), self.colour)?;
                canvas.set_colour(self.position.offset(w - 1, y), self.colour)?;
            }
        }
        let fill = Rect::new(self.position, Size::new(self.fill_width(), self.size.height));
        canvas.fill_rect(fill, self.colour)
    }

    fn bounds(&self) -> Option<Rect> {
        Some(Rect::new(self.position, self.size))
    }
}
