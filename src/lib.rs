// src/lib.rs
//! serdisp-ui: widgets and a diffing frame compositor for dot-matrix displays.
//!
//! This exposes the modules for the demo binary and the integration tests.

pub mod canvas;
pub mod color;
pub mod compositor;
pub mod config;
pub mod decoder;
pub mod display;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod rasterizer;
pub mod widget;

pub use canvas::Canvas;
pub use color::{Argb, PackedColor};
pub use compositor::{FlipStats, FrameCompositor, OverdrawPolicy};
pub use error::{DisplayError, Result};
pub use geometry::{Point, Rect, Size};
