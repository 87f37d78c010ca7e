// src/compositor.rs
//! Double-buffered frame compositor.
//!
//! Draws land in `next`. `flip` compares `next` against `previous` (what the
//! display is known to show), sends only the pixels that differ, pushes them
//! with a single `present`, then swaps the buffers and starts a fresh white
//! `next`. A flip with no draws since the previous one leaves the display as
//! it is. Both buffers are allocated once; a geometry change needs a new
//! compositor.

use crate::canvas::Canvas;
use crate::color::Argb;
use crate::error::Result;
use crate::geometry::Point;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::mem;

/// What happens when a frame draws the same pixel twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverdrawPolicy {
    /// The last draw wins.
    #[default]
    Overwrite,
    /// The first draw in a frame wins; later draws to the same pixel are dropped.
    FirstWriterWins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlipStats {
    /// Pixels sent to the target.
    pub changed: usize,
}

pub struct FrameCompositor {
    width: u32,
    height: u32,
    policy: OverdrawPolicy,
    next: Vec<Argb>,
    previous: Vec<Argb>,
    /// Pixels drawn since the last flip. Only consulted for `FirstWriterWins`.
    written: Vec<bool>,
    /// Anything drawn, or `invalidate` called, since the last flip.
    dirty: bool,
}

impl FrameCompositor {
    pub fn new(width: u32, height: u32, policy: OverdrawPolicy) -> Self {
        let len = width as usize * height as usize;
        debug!(
            "FrameCompositor: Allocating {}x{} buffers ({:?})",
            width, height, policy
        );
        Self {
            width,
            height,
            policy,
            next: vec![Argb::WHITE; len],
            // A freshly opened session has just been cleared.
            previous: vec![Argb::WHITE; len],
            written: vec![false; len],
            dirty: false,
        }
    }

    /// A compositor sized to `canvas`.
    pub fn for_canvas<C: Canvas + ?Sized>(canvas: &C, policy: OverdrawPolicy) -> Self {
        Self::new(canvas.width(), canvas.height(), policy)
    }

    pub fn policy(&self) -> OverdrawPolicy {
        self.policy
    }

    fn index(&self, pos: Point) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x as u32 >= self.width || pos.y as u32 >= self.height {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Records a draw into the next frame. Out-of-bounds positions are dropped.
    pub fn draw_pixel(&mut self, pos: Point, colour: Argb) {
        let Some(i) = self.index(pos) else {
            trace!("FrameCompositor: Dropping draw outside frame at {:?}", pos);
            return;
        };
        if self.policy == OverdrawPolicy::FirstWriterWins && self.written[i] {
            return;
        }
        self.next[i] = colour;
        self.written[i] = true;
        self.dirty = true;
    }

    /// The pixel as it will be sent on the next flip.
    pub fn pending(&self, pos: Point) -> Option<Argb> {
        self.index(pos).map(|i| self.next[i])
    }

    /// The pixel as last sent to the target.
    pub fn shown(&self, pos: Point) -> Option<Argb> {
        self.index(pos).map(|i| self.previous[i])
    }

    /// Sends every pixel that changed since the last flip to `target`, then
    /// calls `present` on it exactly once.
    ///
    /// If nothing was drawn since the last flip only `present` is called.
    /// On error the buffers are left untouched, so the next flip resends
    /// whatever did not make it.
    pub fn flip(&mut self, target: &mut dyn Canvas) -> Result<FlipStats> {
        let mut stats = FlipStats::default();
        if !self.dirty {
            target.present()?;
            return Ok(stats);
        }
        let width = self.width as usize;
        for (i, (next, previous)) in self.next.iter().zip(&self.previous).enumerate() {
            if next != previous {
                let pos = Point::new((i % width) as i32, (i / width) as i32);
                target.set_colour(pos, *next)?;
                stats.changed += 1;
            }
        }
        target.present()?;

        mem::swap(&mut self.next, &mut self.previous);
        self.next.fill(Argb::WHITE);
        self.written.fill(false);
        self.dirty = false;
        trace!("FrameCompositor: Flipped, {} pixels changed", stats.changed);
        Ok(stats)
    }

    /// Forgets what the target shows, so the next flip resends every pixel.
    /// Needed after anything clears or rewrites the display behind our back.
    pub fn invalidate(&mut self) {
        debug!("FrameCompositor: Invalidated");
        self.previous.fill(Argb::TRANSPARENT);
        self.dirty = true;
    }
}

impl Canvas for FrameCompositor {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_colour(&mut self, pos: Point, colour: Argb) -> Result<()> {
        self.draw_pixel(pos, colour);
        Ok(())
    }
}
