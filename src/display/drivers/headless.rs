//! Headless mock display driver implementation.
//!
//! Keeps two pixel planes: the driver buffer that `set_*` writes into and the
//! "panel" that `update` / `rewrite` copy dirty pixels onto. Every primitive
//! bumps a counter in a shared `DeviceStats`, which stays readable after the
//! device itself has been dropped.

use crate::color::{unpack, Argb, PackedColor};
use crate::display::driver::DisplayDevice;
use crate::display::types::{BlinkTarget, DebugLevel, LogMedium, OptionValue};
use crate::error::{DisplayError, Result};
use log::{debug, info, trace};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub const HEADLESS_MODEL: &str = "HEADLESS";

const DEFAULT_WIDTH: u32 = 128;
const DEFAULT_HEIGHT: u32 = 64;
const DEFAULT_DEPTH: u32 = 8;

/// Call counters for one headless device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceStats {
    pub set_pixel_calls: usize,
    pub set_colour_calls: usize,
    pub set_grey_calls: usize,
    pub clear_calls: usize,
    pub clear_buffer_calls: usize,
    pub update_calls: usize,
    pub rewrite_calls: usize,
    pub reset_calls: usize,
    pub full_reset_calls: usize,
    pub blink_calls: usize,
    pub close_calls: usize,
    pub quit_calls: usize,
    /// Pixels copied onto the panel by `update` / `rewrite`.
    pub pixels_sent: usize,
}

impl DeviceStats {
    /// Number of `close` + `quit` calls. A well-behaved owner produces exactly one.
    pub fn releases(&self) -> usize {
        self.close_calls + self.quit_calls
    }
}

pub struct HeadlessDevice {
    width: u32,
    height: u32,
    depth: u32,
    buffer: Vec<PackedColor>,
    panel: Vec<PackedColor>,
    dirty: Vec<bool>,
    options: BTreeMap<String, i64>,
    debug_level: DebugLevel,
    log_medium: Option<LogMedium>,
    last_error: Option<String>,
    stats: Rc<RefCell<DeviceStats>>,
}

impl HeadlessDevice {
    /// Builds a device directly, bypassing connection string parsing.
    pub fn with_geometry(width: u32, height: u32, depth: u32) -> Self {
        let len = width as usize * height as usize;
        let blank = Argb::WHITE.pack();
        let mut options = BTreeMap::new();
        options.insert("INVERT".to_string(), 0);
        options.insert("BACKLIGHT".to_string(), 1);
        options.insert("CONTRAST".to_string(), 5);
        Self {
            width,
            height,
            depth: depth.clamp(1, 32),
            buffer: vec![blank; len],
            panel: vec![blank; len],
            dirty: vec![false; len],
            options,
            debug_level: DebugLevel::default(),
            log_medium: None,
            last_error: None,
            stats: Rc::new(RefCell::new(DeviceStats::default())),
        }
    }

    /// Shared handle onto this device's call counters.
    pub fn stats(&self) -> Rc<RefCell<DeviceStats>> {
        Rc::clone(&self.stats)
    }

    /// What the panel currently shows at `(x, y)`, i.e. the last value pushed
    /// by `update` or `rewrite`.
    pub fn panel_colour(&self, x: i32, y: i32) -> Option<Argb> {
        self.index(x, y).map(|i| unpack(self.panel[i]))
    }

    pub fn debug_level(&self) -> DebugLevel {
        self.debug_level
    }

    pub fn log_medium(&self) -> Option<LogMedium> {
        self.log_medium
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn write(&mut self, x: i32, y: i32, colour: PackedColor) {
        match self.index(x, y) {
            Some(i) => {
                self.buffer[i] = colour;
                self.dirty[i] = true;
            }
            None => trace!("HeadlessDevice: Ignoring write outside panel at ({}, {})", x, y),
        }
    }

    fn read(&self, x: i32, y: i32) -> PackedColor {
        self.index(x, y)
            .map(|i| self.buffer[i])
            .unwrap_or(Argb::WHITE.pack())
    }

    fn blank(&mut self) {
        let blank = Argb::WHITE.pack();
        self.buffer.fill(blank);
        self.dirty.fill(true);
    }

    fn push(&mut self, all: bool) -> usize {
        let mut sent = 0;
        for (i, dirty) in self.dirty.iter_mut().enumerate() {
            if all || *dirty {
                self.panel[i] = self.buffer[i];
                *dirty = false;
                sent += 1;
            }
        }
        sent
    }

    fn grey_bits(&self) -> u32 {
        self.depth.min(8)
    }
}

/// ITU-R 601 luma, the weighting greyscale panels use.
fn luminance(colour: Argb) -> u8 {
    ((colour.r as u32 * 299 + colour.g as u32 * 587 + colour.b as u32 * 114) / 1000) as u8
}

fn dimension(key: &str, value: i64) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("{} out of range: {}", key, value))
}

fn parse_options(options: &str) -> Result<(u32, u32, u32, Vec<(String, i64)>), String> {
    let mut width = DEFAULT_WIDTH;
    let mut height = DEFAULT_HEIGHT;
    let mut depth = DEFAULT_DEPTH;
    let mut extra = Vec::new();
    for entry in options.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| format!("option {:?} is not KEY=VALUE", entry))?;
        let key = key.trim().to_ascii_uppercase();
        let value: i64 = value
            .trim()
            .parse()
            .map_err(|_| format!("option {} has non-numeric value {:?}", key, value))?;
        match key.as_str() {
            "WIDTH" => width = dimension(&key, value)?,
            "HEIGHT" => height = dimension(&key, value)?,
            "DEPTH" => depth = dimension(&key, value)?,
            _ => extra.push((key, value)),
        }
    }
    if width == 0 || height == 0 {
        return Err(format!("display must not be empty ({}x{})", width, height));
    }
    Ok((width, height, depth, extra))
}

impl DisplayDevice for HeadlessDevice {
    fn open(connection: &str, model: &str, options: &str) -> Result<Self> {
        info!(
            "HeadlessDevice::open() connection '{}' model '{}'",
            connection, model
        );
        if connection != "headless" && !connection.starts_with("headless:") {
            return Err(DisplayError::DeviceOpen {
                connection: connection.to_string(),
                model: model.to_string(),
                reason: "headless driver only accepts 'headless' connections".to_string(),
            });
        }
        if !model.eq_ignore_ascii_case(HEADLESS_MODEL) {
            return Err(DisplayError::DisplayInit {
                model: model.to_string(),
                reason: format!("unsupported model, expected {}", HEADLESS_MODEL),
            });
        }
        let (width, height, depth, extra) =
            parse_options(options).map_err(|reason| DisplayError::DisplayInit {
                model: model.to_string(),
                reason,
            })?;

        let mut device = Self::with_geometry(width, height, depth);
        for (name, value) in extra {
            if !device.options.contains_key(&name) {
                return Err(DisplayError::DisplayInit {
                    model: model.to_string(),
                    reason: format!("unknown option {}", name),
                });
            }
            device.options.insert(name, value);
        }
        info!(
            "HeadlessDevice: Initialized {}x{} at depth {}",
            device.width, device.height, device.depth
        );
        Ok(device)
    }

    fn close(&mut self) {
        info!("HeadlessDevice: close");
        self.stats.borrow_mut().close_calls += 1;
    }

    fn quit(&mut self) {
        info!("HeadlessDevice: quit");
        self.options.insert("BACKLIGHT".to_string(), 0);
        self.stats.borrow_mut().quit_calls += 1;
    }

    fn reset(&mut self) {
        debug!("HeadlessDevice: reset");
        self.stats.borrow_mut().reset_calls += 1;
    }

    fn full_reset(&mut self) {
        debug!("HeadlessDevice: full reset");
        self.blank();
        self.push(true);
        self.stats.borrow_mut().full_reset_calls += 1;
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: u32) {
        self.stats.borrow_mut().set_pixel_calls += 1;
        let colour = self.lookup_colour(value);
        self.write(x, y, colour);
    }

    fn get_pixel(&self, x: i32, y: i32) -> u32 {
        self.trans_colour(self.read(x, y))
    }

    fn set_colour(&mut self, x: i32, y: i32, colour: PackedColor) {
        self.stats.borrow_mut().set_colour_calls += 1;
        self.write(x, y, colour);
    }

    fn get_colour(&self, x: i32, y: i32) -> PackedColor {
        self.read(x, y)
    }

    fn set_grey(&mut self, x: i32, y: i32, grey: u8) {
        self.stats.borrow_mut().set_grey_calls += 1;
        self.write(x, y, Argb::grey(grey).pack());
    }

    fn get_grey(&self, x: i32, y: i32) -> u8 {
        luminance(unpack(self.read(x, y)))
    }

    fn clear(&mut self) {
        trace!("HeadlessDevice: clear");
        self.stats.borrow_mut().clear_calls += 1;
        self.blank();
        self.push(true);
    }

    fn clear_buffer(&mut self) {
        self.stats.borrow_mut().clear_buffer_calls += 1;
        self.blank();
    }

    fn update(&mut self) {
        let sent = self.push(false);
        trace!("HeadlessDevice: update sent {} pixels", sent);
        let mut stats = self.stats.borrow_mut();
        stats.update_calls += 1;
        stats.pixels_sent += sent;
    }

    fn rewrite(&mut self) {
        let sent = self.push(true);
        let mut stats = self.stats.borrow_mut();
        stats.rewrite_calls += 1;
        stats.pixels_sent += sent;
    }

    fn blink(&mut self, target: BlinkTarget, count: u32, delta_ms: u32) {
        debug!(
            "HeadlessDevice: blink {:?} {} times every {}ms",
            target, count, delta_ms
        );
        self.stats.borrow_mut().blink_calls += 1;
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn colours(&self) -> u64 {
        1u64 << self.depth
    }

    fn depth(&self) -> u32 {
        self.depth
    }

    fn pixel_aspect(&self) -> u32 {
        100
    }

    fn is_display(&self, model: &str) -> bool {
        model.eq_ignore_ascii_case(HEADLESS_MODEL)
    }

    fn option(&self, name: &str) -> Option<i64> {
        self.options.get(&name.to_ascii_uppercase()).copied()
    }

    fn set_option(&mut self, name: &str, value: i64) {
        let key = name.to_ascii_uppercase();
        match self.options.get_mut(&key) {
            Some(current) => {
                *current = if value == OptionValue::Toggle.as_raw() {
                    i64::from(*current == 0)
                } else {
                    value
                };
                debug!("HeadlessDevice: option {} = {}", key, current);
            }
            None => self.last_error = Some(format!("unknown option {}", name)),
        }
    }

    fn is_option(&self, name: &str) -> bool {
        self.options.contains_key(&name.to_ascii_uppercase())
    }

    fn trans_colour(&self, colour: PackedColor) -> u32 {
        if self.depth >= 24 {
            return colour.0;
        }
        self.trans_grey(luminance(unpack(colour)))
    }

    fn trans_grey(&self, grey: u8) -> u32 {
        u32::from(grey) >> (8 - self.grey_bits())
    }

    fn lookup_colour(&self, value: u32) -> PackedColor {
        if self.depth >= 24 {
            return PackedColor(value);
        }
        Argb::grey(self.lookup_grey(value)).pack()
    }

    fn lookup_grey(&self, value: u32) -> u8 {
        let bits = self.grey_bits();
        let max = (1u32 << bits) - 1;
        let value = value.min(max);
        ((value * 255) / max) as u8
    }

    fn runtime_error(&self) -> bool {
        false
    }

    fn error_message(&self) -> Option<String> {
        self.last_error.clone()
    }

    fn set_debug_level(&mut self, level: DebugLevel) {
        self.debug_level = level;
    }

    fn set_log_medium(&mut self, medium: LogMedium) {
        self.log_medium = Some(medium);
    }
}
