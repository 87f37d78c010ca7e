//! Text widget: a rendered line of text, aligned on the display and scrolled
//! slice by slice when it is wider than the display.

use crate::canvas::Canvas;
use crate::error::{DisplayError, Result};
use crate::geometry::{Point, Rect, Size};
use crate::layout::{intensity_to_grey, HAlign, SliceCursor, TextLayout, VAlign};
use crate::rasterizer::{Bitmap, TextRasterizer};
use crate::widget::Widget;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub halign: HAlign,
    pub valign: VAlign,
    /// Seconds each slice of an oversized text stays on screen.
    pub slice_duration_secs: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        TextConfig {
            halign: HAlign::default(),
            valign: VAlign::default(),
            slice_duration_secs: 5.0,
        }
    }
}

pub struct Text<R: TextRasterizer> {
    rasterizer: R,
    text: String,
    /// Position as configured. Alignment may move the drawn position, this
    /// one is never overwritten.
    user_position: Point,
    halign: HAlign,
    valign: VAlign,
    bitmap: Bitmap,
    cursor: SliceCursor,
    last_layout: Option<TextLayout>,
}

impl<R: TextRasterizer> Text<R> {
    pub fn new(rasterizer: R, position: Point, text: &str, config: TextConfig) -> Result<Self> {
        let secs = config.slice_duration_secs;
        if !secs.is_finite() || secs < 0.0 {
            return Err(DisplayError::InvalidWidgetConfig(format!(
                "slice duration must be a non-negative number of seconds, got {}",
                secs
            )));
        }
        let bitmap = rasterizer.render_text(text)?;
        Ok(Self {
            rasterizer,
            text: text.to_string(),
            user_position: position,
            halign: config.halign,
            valign: config.valign,
            bitmap,
            cursor: SliceCursor::new(Duration::from_secs_f64(secs)),
            last_layout: None,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text and re-renders its bitmap. Placement follows on the
    /// next draw.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        if text == self.text {
            return Ok(());
        }
        self.bitmap = self.rasterizer.render_text(text)?;
        self.text = text.to_string();
        self.last_layout = None;
        debug!(
            "Text: Now {:?} ({}x{})",
            self.text,
            self.bitmap.width(),
            self.bitmap.height()
        );
        Ok(())
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Where and how large the text is drawn on a display of `display` size.
    pub fn layout(&self, display: Size) -> TextLayout {
        TextLayout::compute(
            Size::new(self.bitmap.width(), self.bitmap.height()),
            display,
            self.user_position,
            self.halign,
            self.valign,
        )
    }

    pub fn current_slice(&self) -> usize {
        self.cursor.current()
    }
}

impl<R: TextRasterizer> Widget for Text<R> {
    fn draw(&mut self, canvas: &mut dyn Canvas, now: Instant) -> Result<()> {
        let layout = self.layout(canvas.size());
        let index = self.cursor.select(now, layout.slice_count);
        let slice = layout.slice(index, self.bitmap.width());
        trace!(
            "Text: Drawing {:?} slice {} of {} ({:?})",
            self.text,
            index + 1,
            layout.slice_count,
            slice
        );
        for y in 0..layout.viewport.height {
            for x in 0..slice.width() {
                let grey = intensity_to_grey(self.bitmap.intensity(slice.start + x, y));
                canvas.set_grey(layout.position.offset(x as i32, y as i32), grey)?;
            }
        }
        self.last_layout = Some(layout);
        Ok(())
    }

    fn bounds(&self) -> Option<Rect> {
        self.last_layout
            .map(|layout| Rect::new(layout.position, layout.viewport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Argb;
    use crate::compositor::{FrameCompositor, OverdrawPolicy};
    use crate::rasterizer::HeadlessRasterizer;
    use test_log::test;

    fn text(s: &str, config: TextConfig) -> Text<HeadlessRasterizer> {
        Text::new(HeadlessRasterizer::default(), Point::new(1, 1), s, config).unwrap()
    }

    #[test]
    fn draws_ink_black_and_background_white() {
        let mut widget = text("a", TextConfig::default());
        let mut canvas = FrameCompositor::new(20, 12, OverdrawPolicy::Overwrite);
        canvas.draw_pixel(Point::new(6, 1), Argb::RED);
        widget.draw(&mut canvas, Instant::now()).unwrap();
        assert_eq!(canvas.pending(Point::new(1, 1)), Some(Argb::BLACK));
        // Spacing column of the glyph cell.
        assert_eq!(canvas.pending(Point::new(6, 1)), Some(Argb::WHITE));
        assert_eq!(widget.bounds(), Some(Rect::new(Point::new(1, 1), Size::new(6, 8))));
    }

    #[test]
    fn center_alignment_uses_canvas_size() {
        let config = TextConfig {
            halign: HAlign::Center,
            valign: VAlign::Center,
            ..TextConfig::default()
        };
        let widget = text("ab", config);
        let layout = widget.layout(Size::new(128, 64));
        assert_eq!(layout.position, Point::new(58, 28));
    }

    #[test]
    fn long_text_scrolls_through_slices() {
        // 10 chars = 60px on a 32px display: viewport 30, 2 slices.
        let config = TextConfig {
            slice_duration_secs: 1.0,
            ..TextConfig::default()
        };
        let mut widget = text("abcdefghij", config);
        let mut canvas = FrameCompositor::new(32, 12, OverdrawPolicy::Overwrite);
        let t0 = Instant::now();
        widget.draw(&mut canvas, t0).unwrap();
        assert_eq!(widget.current_slice(), 0);
        widget.draw(&mut canvas, t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(widget.current_slice(), 0);
        widget.draw(&mut canvas, t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(widget.current_slice(), 1);
        widget.draw(&mut canvas, t0 + Duration::from_secs(2)).unwrap();
        assert_eq!(widget.current_slice(), 0);
    }

    #[test]
    fn set_text_rerenders_bitmap() {
        let mut widget = text("a", TextConfig::default());
        widget.set_text("abc").unwrap();
        assert_eq!(widget.bitmap().width(), 18);
        assert_eq!(widget.text(), "abc");
    }

    #[test]
    fn negative_slice_duration_is_rejected() {
        let config = TextConfig {
            slice_duration_secs: -1.0,
            ..TextConfig::default()
        };
        let result = Text::new(HeadlessRasterizer::default(), Point::new(0, 0), "x", config);
        assert!(matches!(result, Err(DisplayError::InvalidWidgetConfig(_))));
    }
}
