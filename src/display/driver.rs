// src/display/driver.rs
//! DisplayDevice trait - the primitives a physical or virtual panel driver provides.
//!
//! The trait mirrors what a dot-matrix driver library exposes: pixel access,
//! geometry, buffer push, option table and diagnostics. All validation and the
//! session lifetime rules live in `Session`; implementations stay thin.
//!
//! ## Lifecycle
//! 1. `open()` - connect to the transport and initialise the model
//! 2. pixel / geometry / option calls, many frames long
//! 3. exactly one of `close()` or `quit()`, issued by the owning `Session`

use crate::color::PackedColor;
use crate::display::types::{BlinkTarget, DebugLevel, LogMedium};
use crate::error::Result;

pub trait DisplayDevice {
    /// Connects to `connection` and initialises `model` with the driver option
    /// string `options`.
    ///
    /// Fails with `DeviceOpen` when the transport is unavailable and with
    /// `DisplayInit` when the model cannot be initialised on it. Display
    /// contents after a successful open are undefined.
    fn open(connection: &str, model: &str, options: &str) -> Result<Self>
    where
        Self: Sized;

    /// Releases the device, leaving the panel showing what it shows.
    fn close(&mut self);

    /// Releases the device and powers the panel down where supported.
    fn quit(&mut self);

    fn reset(&mut self);

    /// Re-runs the full initialisation sequence, including the transport.
    fn full_reset(&mut self);

    /// Raw device value, in whatever encoding the panel uses natively.
    fn set_pixel(&mut self, x: i32, y: i32, value: u32);
    fn get_pixel(&self, x: i32, y: i32) -> u32;

    fn set_colour(&mut self, x: i32, y: i32, colour: PackedColor);
    fn get_colour(&self, x: i32, y: i32) -> PackedColor;

    fn set_grey(&mut self, x: i32, y: i32, grey: u8);
    fn get_grey(&self, x: i32, y: i32) -> u8;

    /// Blanks the display, buffer and hardware.
    fn clear(&mut self);

    /// Blanks the internal buffer without touching the hardware.
    fn clear_buffer(&mut self);

    /// Sends the pixels the driver considers changed.
    fn update(&mut self);

    /// Retransmits the whole buffer regardless of dirty state.
    fn rewrite(&mut self);

    fn blink(&mut self, target: BlinkTarget, count: u32, delta_ms: u32);

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn colours(&self) -> u64;
    fn depth(&self) -> u32;

    /// Pixel aspect ratio in percent (100 = square pixels).
    fn pixel_aspect(&self) -> u32;

    /// Whether the driver supports a display model of this name.
    fn is_display(&self, model: &str) -> bool;

    /// Current value of a named option, `None` if the device has no such option.
    fn option(&self, name: &str) -> Option<i64>;
    fn set_option(&mut self, name: &str, value: i64);
    fn is_option(&self, name: &str) -> bool;

    /// Nearest colour the hardware can show, in device encoding.
    fn trans_colour(&self, colour: PackedColor) -> u32;
    fn trans_grey(&self, grey: u8) -> u32;

    /// Inverse of `trans_colour` / `trans_grey`.
    fn lookup_colour(&self, value: u32) -> PackedColor;
    fn lookup_grey(&self, value: u32) -> u8;

    fn runtime_error(&self) -> bool;
    fn error_message(&self) -> Option<String>;
    fn set_debug_level(&mut self, level: DebugLevel);
    fn set_log_medium(&mut self, medium: LogMedium);
}
