// src/config.rs

//! Defines the configuration structures for the `serdisp-ui` demo.
//!
//! The configuration is a JSON document describing which display to open,
//! how frames are composited and which widgets make up the screen. Every
//! section has defaults, so an empty object `{}` is a valid configuration
//! that opens a 128x64 headless display with no widgets.

use crate::compositor::OverdrawPolicy;
use crate::display::{DebugLevel, LogMedium};
use crate::geometry::{Point, Size};
use crate::widget::{PixmapConfig, ProgressbarConfig, TextConfig};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub compositor: CompositorConfig,
    pub render: RenderConfig,
    /// Drawn in order, so later widgets paint over earlier ones unless the
    /// compositor uses `first_writer_wins`.
    pub widgets: Vec<WidgetConfig>,
}

impl Config {
    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("Invalid configuration JSON")
    }
}

// --- Device Configuration ---

/// Which display to open and how the session behaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Transport, e.g. `/dev/parport0`, `USB:7c0/1501` or `headless`.
    pub connection: String,
    /// Display model name as known to the driver.
    pub model: String,
    /// Driver option string, e.g. `INVERT=1;WIDTH=128`.
    pub options: String,
    /// On release, blank and power down the panel (`quit`) rather than just
    /// disconnecting (`close`).
    pub turn_off_on_quit: bool,
    pub debug_level: DebugLevel,
    /// Leave unset to keep the driver's own default.
    pub log_medium: Option<LogMedium>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            connection: "headless".to_string(),
            model: "HEADLESS".to_string(),
            options: String::new(),
            turn_off_on_quit: true,
            debug_level: DebugLevel::Warn,
            log_medium: None,
        }
    }
}

// --- Compositor and Render Loop ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Draw through a diffing double buffer. When off, widgets write straight
    /// to the device and every frame is a full `update`.
    pub enabled: bool,
    pub overdraw: OverdrawPolicy,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        CompositorConfig {
            enabled: true,
            overdraw: OverdrawPolicy::Overwrite,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub frame_interval_ms: u64,
    /// Frames to render before exiting. `None` renders until killed.
    pub frames: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            frame_interval_ms: 500,
            frames: Some(10),
        }
    }
}

// --- Widgets ---

fn default_font_size() -> f32 {
    12.0
}

/// One widget on screen, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WidgetConfig {
    Pixmap {
        path: PathBuf,
        #[serde(default)]
        position: Point,
        #[serde(default)]
        options: PixmapConfig,
    },
    Text {
        text: String,
        /// TrueType/OpenType font file. Without one, text is drawn with
        /// built-in block glyphs.
        #[serde(default)]
        font: Option<PathBuf>,
        #[serde(default = "default_font_size")]
        font_size: f32,
        #[serde(default)]
        position: Point,
        #[serde(default)]
        options: TextConfig,
    },
    Progressbar {
        position: Point,
        size: Size,
        #[serde(default)]
        options: ProgressbarConfig,
    },
}
