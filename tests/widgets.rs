//! Widgets drawn through a compositor onto a headless session.

use serdisp_ui::config::{Config, WidgetConfig};
use serdisp_ui::decoder::{ImageCrateDecoder, ImageDecoder};
use serdisp_ui::display::{HeadlessDevice, Session};
use serdisp_ui::geometry::Size;
use serdisp_ui::layout::HAlign;
use serdisp_ui::rasterizer::HeadlessRasterizer;
use serdisp_ui::widget::{
    self, Pixmap, PixmapConfig, Progressbar, ProgressbarConfig, Text, TextConfig, Widget,
};
use serdisp_ui::{Argb, Canvas, FrameCompositor, OverdrawPolicy, Point};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use test_log::test;

fn session(width: u32, height: u32) -> Session<HeadlessDevice> {
    Session::open_with(
        "headless",
        "HEADLESS",
        &format!("WIDTH={};HEIGHT={}", width, height),
    )
    .unwrap()
}

fn temp_png(name: &str, image: &::image::GrayImage) -> PathBuf {
    let path = std::env::temp_dir().join(format!("serdisp-ui-{}-{}.png", name, std::process::id()));
    image.save(&path).unwrap();
    path
}

// =============================================================================
// Progressbar
// =============================================================================

#[test]
fn progressbar_state_is_clamped() {
    let mut bar = Progressbar::new(Point::new(0, 0), Size::new(10, 5), ProgressbarConfig::default())
        .unwrap();
    bar.set_state(1.5);
    assert_eq!(bar.state(), 1.0);
    bar.set_state(-0.2);
    assert_eq!(bar.state(), 0.0);
}

#[test]
fn progressbar_draws_default_red_fill() {
    let mut session = session(20, 10);
    let config = ProgressbarConfig {
        state: 0.5,
        ..ProgressbarConfig::default()
    };
    let mut bar = Progressbar::new(Point::new(2, 2), Size::new(10, 4), config).unwrap();
    let mut compositor = FrameCompositor::for_canvas(&session, OverdrawPolicy::Overwrite);
    bar.draw(&mut compositor, Instant::now()).unwrap();
    compositor.flip(&mut session).unwrap();

    assert_eq!(session.get_colour(Point::new(6, 3)), Argb::RED);
    // Right border, past the fill.
    assert_eq!(session.get_colour(Point::new(11, 3)), Argb::RED);
    assert_eq!(session.get_colour(Point::new(8, 3)), Argb::WHITE);
}

// =============================================================================
// Pixmap
// =============================================================================

#[test]
fn pixmap_from_png_is_drawn_at_its_position() {
    let image =
        ::image::GrayImage::from_fn(4, 2, |x, _| ::image::Luma([if x % 2 == 0 { 0 } else { 250 }]));
    let path = temp_png("pixmap", &image);

    let mut pixmap = Pixmap::load(
        &path,
        Point::new(3, 1),
        &PixmapConfig::default(),
        &ImageCrateDecoder,
    );
    std::fs::remove_file(&path).ok();
    assert_eq!(pixmap.size(), Some(Size::new(4, 2)));

    let mut session = session(16, 8);
    pixmap.draw(&mut session, Instant::now()).unwrap();
    session.update();
    assert_eq!(session.device().panel_colour(3, 1), Some(Argb::BLACK));
    assert_eq!(session.device().panel_colour(4, 2), Some(Argb::WHITE));
    assert_eq!(session.device().panel_colour(5, 2), Some(Argb::BLACK));

    pixmap.erase(&mut session).unwrap();
    session.update();
    assert_eq!(session.device().panel_colour(3, 1), Some(Argb::WHITE));
}

#[test]
fn pixmap_with_missing_file_draws_nothing() {
    let missing = PathBuf::from("/nonexistent/serdisp-ui/logo.png");
    assert!(ImageCrateDecoder.decode(&missing).is_err());
    let mut pixmap = Pixmap::load(
        &missing,
        Point::new(0, 0),
        &PixmapConfig::default(),
        &ImageCrateDecoder,
    );
    assert!(!pixmap.is_loaded());

    let mut session = session(8, 8);
    let stats = session.device().stats();
    pixmap.draw(&mut session, Instant::now()).unwrap();
    assert_eq!(stats.borrow().set_grey_calls, 0);
}

// =============================================================================
// Text
// =============================================================================

#[test]
fn oversized_text_scrolls_one_slice_per_duration() {
    // 20 chars x 6px = 120px on a 42px display: viewport 40, 3 slices.
    let config = TextConfig {
        slice_duration_secs: 2.0,
        ..TextConfig::default()
    };
    let mut text = Text::new(
        HeadlessRasterizer::default(),
        Point::new(1, 1),
        "abcdefghijklmnopqrst",
        config,
    )
    .unwrap();
    let mut session = session(42, 12);
    let layout = text.layout(session.size());
    assert_eq!(layout.viewport, Size::new(40, 8));
    assert_eq!(layout.slice_count, 3);

    let mut compositor = FrameCompositor::for_canvas(&session, OverdrawPolicy::Overwrite);
    let t0 = Instant::now();
    let mut seen = Vec::new();
    for step in 0..4 {
        text.draw(&mut compositor, t0 + Duration::from_secs(2 * step)).unwrap();
        compositor.flip(&mut session).unwrap();
        seen.push(text.current_slice());
    }
    assert_eq!(seen, vec![0, 1, 2, 0]);
}

#[test]
fn centred_text_lands_in_the_middle() {
    let config = TextConfig {
        halign: HAlign::Center,
        ..TextConfig::default()
    };
    let text = Text::new(HeadlessRasterizer::default(), Point::new(0, 0), "abcd", config).unwrap();
    // 24px wide bitmap on a 128px display.
    assert_eq!(text.layout(Size::new(128, 64)).position.x, 52);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn widgets_build_from_config() {
    let config = Config::from_json(
        r#"{
            "widgets": [
                { "kind": "text", "text": "hi", "position": { "x": 2, "y": 2 } },
                { "kind": "progressbar", "position": { "x": 0, "y": 20 },
                  "size": { "width": 50, "height": 5 }, "options": { "state": 1.0 } },
                { "kind": "pixmap", "path": "/nonexistent/logo.png" }
            ]
        }"#,
    )
    .unwrap();
    let mut widgets = config
        .widgets
        .iter()
        .map(|w| widget::from_config(w, &ImageCrateDecoder))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(widgets.len(), 3);

    let mut session = session(64, 32);
    let mut compositor = FrameCompositor::for_canvas(&session, OverdrawPolicy::Overwrite);
    let now = Instant::now();
    for w in widgets.iter_mut() {
        w.draw(&mut compositor, now).unwrap();
    }
    compositor.flip(&mut session).unwrap();
    assert_eq!(session.get_colour(Point::new(2, 2)), Argb::BLACK);
    assert_eq!(session.get_colour(Point::new(49, 22)), Argb::RED);
}

#[test]
fn invalid_progressbar_config_is_rejected() {
    let config = WidgetConfig::Progressbar {
        position: Point::new(-3, 0),
        size: Size::new(5, 5),
        options: ProgressbarConfig::default(),
    };
    assert!(widget::from_config(&config, &ImageCrateDecoder).is_err());
}
