// src/error.rs
//! Error taxonomy for the display stack.
//!
//! Device construction failures (`DeviceOpen`, `DisplayInit`) are fatal for the
//! caller. Everything else is a caller error that is rejected before any state
//! is touched, except `ImageDecode`, which `Pixmap` recovers from locally.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    #[error("couldn't open display device \"{connection}\" (model \"{model}\"): {reason}")]
    DeviceOpen {
        connection: String,
        model: String,
        reason: String,
    },
    #[error("couldn't initialize display model \"{model}\": {reason}")]
    DisplayInit { model: String, reason: String },
    #[error("colour must have 1 (grey), 3 (RGB) or 4 (ARGB) channels, got {channels}")]
    InvalidColorFormat { channels: usize },
    #[error("grey value must be within [0, 255], got {0}")]
    InvalidGreyValue(i32),
    #[error("invalid debug level: {0:?} (expected warn, info or verbose)")]
    InvalidDebugLevel(String),
    #[error("invalid log medium: {0:?} (expected syslog, stderr or stdout)")]
    InvalidLogMedium(String),
    #[error("invalid value {value} for device option (expected 0 = no, 1 = yes, 2 = toggle)")]
    InvalidOptionValue { value: i64 },
    #[error("device has no option named {0:?}")]
    UnknownOption(String),
    #[error("couldn't decode image {path}: {reason}")]
    ImageDecode { path: String, reason: String },
    #[error("{what} must not be negative, got {value}")]
    NegativeCount { what: &'static str, value: i64 },
    #[error("couldn't load font {path}: {reason}")]
    FontLoad { path: String, reason: String },
    #[error("invalid widget geometry: {0}")]
    InvalidGeometry(String),
    #[error("invalid widget configuration: {0}")]
    InvalidWidgetConfig(String),
}

pub type Result<T, E = DisplayError> = std::result::Result<T, E>;
