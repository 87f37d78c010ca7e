// src/canvas.rs
//! The draw target shared by widgets.
//!
//! Both a live `Session` (unbuffered, every call goes to the device) and a
//! `FrameCompositor` (buffered, diffed on `flip`) implement `Canvas`, so a
//! widget never needs to know which one it is drawing into.

use crate::color::{validate_grey, Argb};
use crate::error::Result;
use crate::geometry::{Point, Rect, Size};

pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Sets one pixel. Positions outside the canvas are ignored.
    fn set_colour(&mut self, pos: Point, colour: Argb) -> Result<()>;

    /// Sets one pixel to a grey level, which must lie in `[0, 255]`.
    fn set_grey(&mut self, pos: Point, grey: i32) -> Result<()> {
        let level = validate_grey(grey)?;
        self.set_colour(pos, Argb::grey(level))
    }

    /// Pushes whatever the canvas has buffered to the hardware.
    fn present(&mut self) -> Result<()> {
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, colour: Argb) -> Result<()> {
        for pos in rect.points() {
            self.set_colour(pos, colour)?;
        }
        Ok(())
    }
}
