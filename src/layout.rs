// src/layout.rs
//! Text layout: where a rendered bitmap goes on the display, how much of it
//! fits, and which horizontal slice to show right now.
//!
//! Everything here is pure apart from `SliceCursor`, which is a small state
//! machine driven by the `Instant` handed to it. A one-pixel margin is kept
//! on every side of the display, so a viewport is at most `display - 2`.

use crate::geometry::{Point, Size};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const DEFAULT_SLICE_DURATION: Duration = Duration::from_secs(5);

/// Smallest offset `center` alignment will produce.
const CENTER_MIN_OFFSET: i32 = 2;
const MARGIN: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    /// User x is used as-is.
    #[default]
    Left,
    Center,
    /// User x is the distance from the right edge.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    /// User y is used as-is.
    #[default]
    Top,
    Center,
    /// User y is the distance from the bottom edge.
    Bottom,
}

fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Horizontal centring truncates towards zero.
pub fn resolve_x(align: HAlign, display_width: u32, bitmap_width: u32, user_x: i32) -> i32 {
    match align {
        HAlign::Left => user_x,
        HAlign::Center => {
            let x = (display_width as f64 / 2.0 - bitmap_width as f64 / 2.0).trunc();
            (x as i32).max(CENTER_MIN_OFFSET)
        }
        HAlign::Right => saturate(display_width as i64 - bitmap_width as i64 - user_x as i64),
    }
}

/// Vertical centring rounds to nearest, ties to even.
pub fn resolve_y(align: VAlign, display_height: u32, bitmap_height: u32, user_y: i32) -> i32 {
    match align {
        VAlign::Top => user_y,
        VAlign::Center => {
            let y = (display_height as f64 / 2.0 - bitmap_height as f64 / 2.0).round_ties_even();
            (y as i32).max(CENTER_MIN_OFFSET)
        }
        VAlign::Bottom => saturate(display_height as i64 - bitmap_height as i64 - user_y as i64),
    }
}

/// The visible part of a bitmap: its own size, capped at the display minus margins.
pub fn viewport(bitmap: Size, display: Size) -> Size {
    Size::new(
        bitmap.width.min(display.width.saturating_sub(MARGIN)),
        bitmap.height.min(display.height.saturating_sub(MARGIN)),
    )
}

/// How many viewport-wide slices it takes to show the whole bitmap. Never 0.
pub fn slice_count(bitmap_width: u32, viewport_width: u32) -> usize {
    if bitmap_width == 0 || viewport_width == 0 {
        return 1;
    }
    bitmap_width.div_ceil(viewport_width) as usize
}

/// Half-open column range `[start, end)` of the bitmap shown by one slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceBounds {
    pub start: u32,
    pub end: u32,
}

impl SliceBounds {
    pub fn width(&self) -> u32 {
        self.end - self.start
    }
}

/// Slice 0 hugs the left edge, the last slice hugs the right edge, interior
/// slices are centred on their share of the bitmap.
pub fn slice_bounds(
    index: usize,
    count: usize,
    bitmap_width: u32,
    viewport_width: u32,
) -> SliceBounds {
    let vw = viewport_width.min(bitmap_width);
    if count <= 1 || index == 0 {
        return SliceBounds { start: 0, end: vw };
    }
    if index >= count - 1 {
        return SliceBounds {
            start: bitmap_width - vw,
            end: bitmap_width,
        };
    }
    let share = bitmap_width as f64 / count as f64;
    let centre = index as f64 * share + share / 2.0;
    let half = vw as f64 / 2.0;
    let start = ((centre - half).round_ties_even().max(0.0) as u32).min(bitmap_width - vw);
    SliceBounds {
        start,
        end: start + vw,
    }
}

/// Maps bitmap ink coverage to a display grey level: ink is black (0),
/// background is white (255).
pub fn intensity_to_grey(intensity: f32) -> i32 {
    ((1.0 - intensity) * 255.0).round().clamp(0.0, 255.0) as i32
}

/// Resolved placement of one text bitmap on one display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    pub position: Point,
    pub viewport: Size,
    pub slice_count: usize,
}

impl TextLayout {
    pub fn compute(
        bitmap: Size,
        display: Size,
        user: Point,
        halign: HAlign,
        valign: VAlign,
    ) -> Self {
        let viewport = viewport(bitmap, display);
        Self {
            position: Point::new(
                resolve_x(halign, display.width, bitmap.width, user.x),
                resolve_y(valign, display.height, bitmap.height, user.y),
            ),
            viewport,
            slice_count: slice_count(bitmap.width, viewport.width),
        }
    }

    pub fn slice(&self, index: usize, bitmap_width: u32) -> SliceBounds {
        slice_bounds(index, self.slice_count, bitmap_width, self.viewport.width)
    }
}

/// Time-driven slice selection for one text widget.
#[derive(Debug, Clone)]
pub struct SliceCursor {
    current: usize,
    last_advance: Option<Instant>,
    duration: Duration,
}

impl SliceCursor {
    pub fn new(duration: Duration) -> Self {
        Self {
            current: 0,
            last_advance: None,
            duration,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Slice to show at `now`. The first call returns 0 and starts the timer;
    /// afterwards the index moves on by one, wrapping, once `duration` has
    /// passed since the last move.
    pub fn select(&mut self, now: Instant, count: usize) -> usize {
        let count = count.max(1);
        match self.last_advance {
            None => {
                self.last_advance = Some(now);
                self.current = 0;
            }
            Some(last) if now.saturating_duration_since(last) >= self.duration => {
                self.last_advance = Some(now);
                self.current = (self.current + 1) % count;
            }
            // The count may have shrunk after a text change.
            Some(_) => self.current %= count,
        }
        self.current
    }
}

impl Default for SliceCursor {
    fn default() -> Self {
        Self::new(DEFAULT_SLICE_DURATION)
    }
}
