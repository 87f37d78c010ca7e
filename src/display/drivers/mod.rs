// src/display/drivers/mod.rs
//! Display driver implementations.

pub mod headless;

#[cfg(feature = "serdisp")]
pub mod serdisp;

pub use headless::{DeviceStats, HeadlessDevice};

#[cfg(feature = "serdisp")]
pub use serdisp::SerdispDevice;
