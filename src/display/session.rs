// src/display/session.rs
//! Session - owns one open display and guarantees it is released exactly once.
//!
//! A `Session` is acquired by `open` and released by `close`, `quit` or
//! `release` (all consuming). Any other exit path, an early `?` return or a
//! panic unwinding through the owner, releases it from `Drop` using the
//! `turn_off_on_quit` flag to pick the path.

use crate::canvas::Canvas;
use crate::color::{pack, validate_grey, Argb};
use crate::config::DeviceConfig;
use crate::display::driver::DisplayDevice;
use crate::display::types::{BlinkTarget, DebugLevel, DisplayGeometry, LogMedium, OptionValue};
use crate::error::{DisplayError, Result};
use crate::geometry::Point;
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Release {
    Close,
    Quit,
}

pub struct Session<D: DisplayDevice> {
    device: D,
    model: String,
    turn_off_on_quit: bool,
    debug_level: DebugLevel,
    log_medium: Option<LogMedium>,
    released: bool,
}

impl<D: DisplayDevice> Session<D> {
    /// Opens the display described by `config` and clears it.
    pub fn open(config: &DeviceConfig) -> Result<Self> {
        info!(
            "Session: Opening device '{}' (model '{}')",
            config.connection, config.model
        );
        let device = D::open(&config.connection, &config.model, &config.options)?;
        let mut session = Self::attach(device, config);
        // Fresh panels can be full of noise.
        session.clear();
        Ok(session)
    }

    /// Opens with default session settings.
    pub fn open_with(connection: &str, model: &str, options: &str) -> Result<Self> {
        Self::open(&DeviceConfig {
            connection: connection.to_string(),
            model: model.to_string(),
            options: options.to_string(),
            ..DeviceConfig::default()
        })
    }

    /// Takes ownership of an already opened device. From here on the session
    /// is responsible for releasing it.
    pub fn attach(mut device: D, config: &DeviceConfig) -> Self {
        device.set_debug_level(config.debug_level);
        if let Some(medium) = config.log_medium {
            device.set_log_medium(medium);
        }
        Self {
            device,
            model: config.model.clone(),
            turn_off_on_quit: config.turn_off_on_quit,
            debug_level: config.debug_level,
            log_medium: config.log_medium,
            released: false,
        }
    }

    /// Releases the device without powering the panel down.
    pub fn close(mut self) {
        self.release_with(Release::Close);
    }

    /// Blanks the panel, then releases the device and powers it down.
    pub fn quit(mut self) {
        self.release_with(Release::Quit);
    }

    /// Releases through whichever path `turn_off_on_quit` selects.
    pub fn release(mut self) {
        let how = self.release_path();
        self.release_with(how);
    }

    fn release_path(&self) -> Release {
        if self.turn_off_on_quit {
            Release::Quit
        } else {
            Release::Close
        }
    }

    fn release_with(&mut self, how: Release) {
        if self.released {
            return;
        }
        self.released = true;
        match how {
            Release::Quit => {
                info!("Session: Quitting '{}' (clear + power down)", self.model);
                self.device.clear();
                self.device.quit();
            }
            Release::Close => {
                info!("Session: Closing '{}'", self.model);
                self.device.close();
            }
        }
    }

    pub fn turn_off_on_quit(&self) -> bool {
        self.turn_off_on_quit
    }

    pub fn set_turn_off_on_quit(&mut self, turn_off_on_quit: bool) {
        self.turn_off_on_quit = turn_off_on_quit;
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    // --- Control ---

    pub fn reset(&mut self) {
        debug!("Session: reset");
        self.device.reset();
    }

    pub fn full_reset(&mut self) {
        debug!("Session: full reset");
        self.device.full_reset();
    }

    pub fn clear(&mut self) {
        self.device.clear();
    }

    pub fn clear_buffer(&mut self) {
        self.device.clear_buffer();
    }

    pub fn update(&mut self) {
        self.device.update();
    }

    pub fn rewrite(&mut self) {
        self.device.rewrite();
    }

    /// Flashes the backlight or pixels `count` times, `delta_ms` apart.
    pub fn blink(&mut self, target: BlinkTarget, count: i64, delta_ms: i64) -> Result<()> {
        let count = u32::try_from(count).map_err(|_| DisplayError::NegativeCount {
            what: "blink count",
            value: count,
        })?;
        let delta_ms = u32::try_from(delta_ms).map_err(|_| DisplayError::NegativeCount {
            what: "blink delta",
            value: delta_ms,
        })?;
        self.device.blink(target, count, delta_ms);
        Ok(())
    }

    // --- Pixels ---

    pub fn set_pixel(&mut self, pos: Point, value: u32) {
        self.device.set_pixel(pos.x, pos.y, value);
    }

    pub fn get_pixel(&self, pos: Point) -> u32 {
        self.device.get_pixel(pos.x, pos.y)
    }

    pub fn set_colour(&mut self, pos: Point, colour: Argb) {
        self.device.set_colour(pos.x, pos.y, colour.pack());
    }

    /// Sets a pixel from a 1 (grey), 3 (RGB) or 4 (ARGB) channel tuple.
    pub fn set_colour_channels(&mut self, pos: Point, channels: &[u8]) -> Result<()> {
        let packed = pack(channels)?;
        self.device.set_colour(pos.x, pos.y, packed);
        Ok(())
    }

    pub fn get_colour(&self, pos: Point) -> Argb {
        Argb::from(self.device.get_colour(pos.x, pos.y))
    }

    pub fn set_grey(&mut self, pos: Point, grey: i32) -> Result<()> {
        let level = validate_grey(grey)?;
        self.device.set_grey(pos.x, pos.y, level);
        Ok(())
    }

    pub fn get_grey(&self, pos: Point) -> u8 {
        self.device.get_grey(pos.x, pos.y)
    }

    pub fn trans_colour(&self, colour: Argb) -> u32 {
        self.device.trans_colour(colour.pack())
    }

    pub fn trans_grey(&self, grey: u8) -> u32 {
        self.device.trans_grey(grey)
    }

    pub fn lookup_colour(&self, value: u32) -> Argb {
        Argb::from(self.device.lookup_colour(value))
    }

    pub fn lookup_grey(&self, value: u32) -> u8 {
        self.device.lookup_grey(value)
    }

    // --- Geometry ---

    pub fn width(&self) -> u32 {
        self.device.width()
    }

    pub fn height(&self) -> u32 {
        self.device.height()
    }

    pub fn colours(&self) -> u64 {
        self.device.colours()
    }

    pub fn depth(&self) -> u32 {
        self.device.depth()
    }

    pub fn pixel_aspect(&self) -> u32 {
        self.device.pixel_aspect()
    }

    pub fn geometry(&self) -> DisplayGeometry {
        DisplayGeometry {
            width: self.device.width(),
            height: self.device.height(),
            depth: self.device.depth(),
            colours: self.device.colours(),
            pixel_aspect: self.device.pixel_aspect(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.model
    }

    pub fn is_display(&self, model: &str) -> bool {
        self.device.is_display(model)
    }

    // --- Options ---

    pub fn is_option(&self, name: &str) -> bool {
        self.device.is_option(name)
    }

    pub fn option(&self, name: &str) -> Result<i64> {
        self.device
            .option(name)
            .ok_or_else(|| DisplayError::UnknownOption(name.to_string()))
    }

    pub fn set_option(&mut self, name: &str, value: OptionValue) -> Result<()> {
        if !self.device.is_option(name) {
            return Err(DisplayError::UnknownOption(name.to_string()));
        }
        debug!("Session: option {} <- {:?}", name, value);
        self.device.set_option(name, value.as_raw());
        Ok(())
    }

    /// Like `set_option`, for values that arrive as plain integers.
    pub fn set_option_raw(&mut self, name: &str, value: i64) -> Result<()> {
        let value = OptionValue::try_from(value)?;
        self.set_option(name, value)
    }

    // --- Diagnostics ---

    pub fn runtime_error(&self) -> bool {
        self.device.runtime_error()
    }

    pub fn error_message(&self) -> Option<String> {
        self.device.error_message()
    }

    pub fn debug_level(&self) -> DebugLevel {
        self.debug_level
    }

    pub fn set_debug_level(&mut self, level: DebugLevel) {
        self.debug_level = level;
        self.device.set_debug_level(level);
    }

    pub fn log_medium(&self) -> Option<LogMedium> {
        self.log_medium
    }

    pub fn set_log_medium(&mut self, medium: LogMedium) {
        if medium == LogMedium::Syslog {
            warn!("Session: driver support for syslog output varies, messages may be lost");
        }
        self.log_medium = Some(medium);
        self.device.set_log_medium(medium);
    }
}

impl<D: DisplayDevice> Drop for Session<D> {
    fn drop(&mut self) {
        let how = self.release_path();
        self.release_with(how);
    }
}

impl<D: DisplayDevice> Canvas for Session<D> {
    fn width(&self) -> u32 {
        self.device.width()
    }

    fn height(&self) -> u32 {
        self.device.height()
    }

    fn set_colour(&mut self, pos: Point, colour: Argb) -> Result<()> {
        Session::set_colour(self, pos, colour);
        Ok(())
    }

    fn set_grey(&mut self, pos: Point, grey: i32) -> Result<()> {
        Session::set_grey(self, pos, grey)
    }

    fn present(&mut self) -> Result<()> {
        self.device.update();
        Ok(())
    }
}

