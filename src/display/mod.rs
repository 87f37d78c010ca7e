// src/display/mod.rs
//! Display access layer.
//!
//! - DisplayDevice: driver primitives (serdisplib, headless)
//! - Session: owns an open device, validates input, releases exactly once
//! - types: option, debug and geometry values shared by both

pub mod driver;
pub mod drivers;
pub mod session;
pub mod types;

pub use driver::DisplayDevice;
pub use drivers::{DeviceStats, HeadlessDevice};
pub use session::Session;
pub use types::{BlinkTarget, DebugLevel, DisplayGeometry, LogMedium, OptionValue};

#[cfg(feature = "serdisp")]
pub use drivers::SerdispDevice;
