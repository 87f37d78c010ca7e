// src/display/types.rs
//! Value types exchanged between `Session` and drivers.

use crate::error::DisplayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Driver verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugLevel {
    #[default]
    Warn,
    Info,
    Verbose,
}

impl DebugLevel {
    pub const fn as_raw(self) -> i32 {
        match self {
            DebugLevel::Warn => 0,
            DebugLevel::Info => 1,
            DebugLevel::Verbose => 2,
        }
    }
}

impl FromStr for DebugLevel {
    type Err = DisplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warn" => Ok(DebugLevel::Warn),
            "info" => Ok(DebugLevel::Info),
            "verbose" => Ok(DebugLevel::Verbose),
            other => Err(DisplayError::InvalidDebugLevel(other.to_string())),
        }
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DebugLevel::Warn => "warn",
            DebugLevel::Info => "info",
            DebugLevel::Verbose => "verbose",
        })
    }
}

/// Where the driver writes its own diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMedium {
    Syslog,
    Stderr,
    Stdout,
}

impl LogMedium {
    pub const fn as_raw(self) -> i32 {
        match self {
            LogMedium::Syslog => 0,
            LogMedium::Stderr => 1,
            LogMedium::Stdout => 2,
        }
    }
}

impl FromStr for LogMedium {
    type Err = DisplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "syslog" => Ok(LogMedium::Syslog),
            "stderr" => Ok(LogMedium::Stderr),
            "stdout" => Ok(LogMedium::Stdout),
            other => Err(DisplayError::InvalidLogMedium(other.to_string())),
        }
    }
}

/// Tri-state value of a device option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionValue {
    No,
    Yes,
    Toggle,
}

impl OptionValue {
    pub const fn as_raw(self) -> i64 {
        match self {
            OptionValue::No => 0,
            OptionValue::Yes => 1,
            OptionValue::Toggle => 2,
        }
    }
}

impl TryFrom<i64> for OptionValue {
    type Error = DisplayError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OptionValue::No),
            1 => Ok(OptionValue::Yes),
            2 => Ok(OptionValue::Toggle),
            value => Err(DisplayError::InvalidOptionValue { value }),
        }
    }
}

/// What `blink` flashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlinkTarget {
    Backlight,
    Pixels,
}

impl BlinkTarget {
    pub const fn as_raw(self) -> i32 {
        match self {
            BlinkTarget::Backlight => 0,
            BlinkTarget::Pixels => 1,
        }
    }
}

/// Geometry of an open display, read live from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub colours: u64,
    /// Percent, 100 = square pixels.
    pub pixel_aspect: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_level_parses_known_names_only() {
        assert_eq!("verbose".parse::<DebugLevel>(), Ok(DebugLevel::Verbose));
        assert_eq!(
            "loud".parse::<DebugLevel>(),
            Err(DisplayError::InvalidDebugLevel("loud".to_string()))
        );
        assert_eq!(DebugLevel::Info.to_string(), "info");
    }

    #[test]
    fn log_medium_parses_known_names_only() {
        assert_eq!("stderr".parse::<LogMedium>(), Ok(LogMedium::Stderr));
        assert!(matches!(
            "file".parse::<LogMedium>(),
            Err(DisplayError::InvalidLogMedium(_))
        ));
    }

    #[test]
    fn option_value_accepts_tri_state_only() {
        assert_eq!(OptionValue::try_from(2), Ok(OptionValue::Toggle));
        assert_eq!(
            OptionValue::try_from(3),
            Err(DisplayError::InvalidOptionValue { value: 3 })
        );
        assert!(OptionValue::try_from(-1).is_err());
    }
}
