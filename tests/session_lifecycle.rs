//! Session lifecycle tests: open, validation and release-exactly-once.
//!
//! All of these run against the headless driver, whose `DeviceStats` outlive
//! the session so we can inspect what happened after it is gone.

use serdisp_ui::config::DeviceConfig;
use serdisp_ui::display::{
    BlinkTarget, DebugLevel, DeviceStats, DisplayDevice, HeadlessDevice, LogMedium, OptionValue,
    Session,
};
use serdisp_ui::{Argb, DisplayError, Point, Result};
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use test_log::test;

fn open(options: &str) -> Session<HeadlessDevice> {
    Session::open_with("headless", "HEADLESS", options).unwrap()
}

// =============================================================================
// Open
// =============================================================================

#[test]
fn open_clears_and_reports_geometry() {
    let session = open("WIDTH=32;HEIGHT=16;DEPTH=1");
    let geometry = session.geometry();
    assert_eq!((geometry.width, geometry.height), (32, 16));
    assert_eq!(geometry.depth, 1);
    assert_eq!(geometry.colours, 2);
    assert_eq!(geometry.pixel_aspect, 100);
    assert_eq!(session.display_name(), "HEADLESS");
    assert!(session.is_display("headless"));
    assert_eq!(session.device().stats().borrow().clear_calls, 1);
}

#[test]
fn open_failures_are_typed() {
    assert!(matches!(
        Session::<HeadlessDevice>::open_with("/dev/parport0", "HEADLESS", ""),
        Err(DisplayError::DeviceOpen { .. })
    ));
    assert!(matches!(
        Session::<HeadlessDevice>::open_with("headless", "GLCD", ""),
        Err(DisplayError::DisplayInit { .. })
    ));
}

#[test]
fn session_settings_reach_the_driver() {
    let config = DeviceConfig {
        debug_level: DebugLevel::Verbose,
        log_medium: Some(LogMedium::Stdout),
        ..DeviceConfig::default()
    };
    let mut session = Session::<HeadlessDevice>::open(&config).unwrap();
    assert_eq!(session.device().debug_level(), DebugLevel::Verbose);
    assert_eq!(session.device().log_medium(), Some(LogMedium::Stdout));

    session.set_debug_level(DebugLevel::Info);
    assert_eq!(session.debug_level(), DebugLevel::Info);
    assert_eq!(session.device().debug_level(), DebugLevel::Info);
}

// =============================================================================
// Release exactly once
// =============================================================================

fn draw_then_fail(stats: &mut Option<Rc<RefCell<DeviceStats>>>) -> Result<()> {
    let mut session = Session::<HeadlessDevice>::open_with("headless", "HEADLESS", "")?;
    *stats = Some(session.device().stats());
    session.set_grey(Point::new(0, 0), 0)?;
    session.set_grey(Point::new(1, 0), 256)?;
    session.close();
    Ok(())
}

#[test]
fn early_return_releases_once() {
    let mut stats = None;
    let result = draw_then_fail(&mut stats);
    assert_eq!(result, Err(DisplayError::InvalidGreyValue(256)));

    let stats = stats.unwrap();
    let stats = stats.borrow();
    assert_eq!(stats.releases(), 1);
    // Default path: blank, then power down.
    assert_eq!(stats.quit_calls, 1);
    assert_eq!(stats.clear_calls, 2);
}

#[test]
fn explicit_close_is_not_repeated_on_drop() {
    let session = open("");
    let stats = session.device().stats();
    session.close();
    assert_eq!(stats.borrow().close_calls, 1);
    assert_eq!(stats.borrow().releases(), 1);
}

#[test]
fn explicit_quit_blanks_the_panel() {
    let mut session = open("WIDTH=4;HEIGHT=4");
    let stats = session.device().stats();
    session.set_colour(Point::new(1, 1), Argb::BLACK);
    session.update();
    session.quit();
    let stats = stats.borrow();
    assert_eq!(stats.quit_calls, 1);
    assert_eq!(stats.close_calls, 0);
    assert_eq!(stats.clear_calls, 2);
}

#[test]
fn drop_closes_when_turn_off_on_quit_is_unset() {
    let mut session = open("");
    let stats = session.device().stats();
    session.set_turn_off_on_quit(false);
    drop(session);
    assert_eq!(stats.borrow().close_calls, 1);
    assert_eq!(stats.borrow().quit_calls, 0);
}

#[test]
fn panic_releases_once() {
    let session = open("");
    let stats = session.device().stats();
    let result = panic::catch_unwind(AssertUnwindSafe(move || {
        let _session = session;
        panic!("render loop blew up");
    }));
    assert!(result.is_err());
    assert_eq!(stats.borrow().releases(), 1);
}

#[test]
fn attached_device_is_released_by_session() {
    let device = HeadlessDevice::open("headless:attached", "HEADLESS", "").unwrap();
    let stats = device.stats();
    let session = Session::attach(device, &DeviceConfig::default());
    session.release();
    assert_eq!(stats.borrow().quit_calls, 1);
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn grey_values_are_validated_before_reaching_the_device() {
    let mut session = open("WIDTH=4;HEIGHT=4");
    let stats = session.device().stats();
    assert_eq!(
        session.set_grey(Point::new(0, 0), -1),
        Err(DisplayError::InvalidGreyValue(-1))
    );
    assert_eq!(
        session.set_grey(Point::new(0, 0), 256),
        Err(DisplayError::InvalidGreyValue(256))
    );
    assert_eq!(stats.borrow().set_grey_calls, 0);

    session.set_grey(Point::new(0, 0), 0).unwrap();
    session.set_grey(Point::new(1, 0), 255).unwrap();
    assert_eq!(session.get_grey(Point::new(0, 0)), 0);
    assert_eq!(session.get_grey(Point::new(1, 0)), 255);
    assert_eq!(stats.borrow().set_grey_calls, 2);
}

#[test]
fn colours_round_trip_through_the_device() {
    let mut session = open("WIDTH=4;HEIGHT=4;DEPTH=24");
    session.set_colour(Point::new(2, 3), Argb::new(10, 20, 30, 40));
    assert_eq!(session.get_colour(Point::new(2, 3)), Argb::new(10, 20, 30, 40));

    session.set_colour_channels(Point::new(0, 0), &[1, 2, 3]).unwrap();
    assert_eq!(session.get_colour(Point::new(0, 0)), Argb::opaque(1, 2, 3));
    assert_eq!(
        session.set_colour_channels(Point::new(0, 0), &[1, 2]),
        Err(DisplayError::InvalidColorFormat { channels: 2 })
    );
    assert_eq!(session.lookup_colour(session.trans_colour(Argb::RED)), Argb::RED);
}

#[test]
fn blink_rejects_negative_arguments() {
    let mut session = open("");
    let stats = session.device().stats();
    assert!(matches!(
        session.blink(BlinkTarget::Backlight, -1, 100),
        Err(DisplayError::NegativeCount { .. })
    ));
    assert!(matches!(
        session.blink(BlinkTarget::Pixels, 3, -5),
        Err(DisplayError::NegativeCount { .. })
    ));
    assert_eq!(stats.borrow().blink_calls, 0);
    session.blink(BlinkTarget::Pixels, 3, 0).unwrap();
    assert_eq!(stats.borrow().blink_calls, 1);
}

#[test]
fn options_are_tri_state_and_must_exist() {
    let mut session = open("INVERT=0");
    assert!(session.is_option("INVERT"));
    session.set_option("INVERT", OptionValue::Toggle).unwrap();
    assert_eq!(session.option("INVERT"), Ok(1));
    session.set_option("INVERT", OptionValue::No).unwrap();
    assert_eq!(session.option("INVERT"), Ok(0));

    assert_eq!(
        session.set_option("ROTATE", OptionValue::Yes),
        Err(DisplayError::UnknownOption("ROTATE".to_string()))
    );
    assert!(matches!(session.option("ROTATE"), Err(DisplayError::UnknownOption(_))));
    assert_eq!(
        session.set_option_raw("INVERT", 3),
        Err(DisplayError::InvalidOptionValue { value: 3 })
    );
}

#[test]
fn update_and_rewrite_differ_in_what_they_send() {
    let mut session = open("WIDTH=4;HEIGHT=2");
    let stats = session.device().stats();
    let sent_after_open = stats.borrow().pixels_sent;

    session.set_colour(Point::new(0, 0), Argb::BLACK);
    session.update();
    assert_eq!(stats.borrow().pixels_sent - sent_after_open, 1);

    session.rewrite();
    assert_eq!(stats.borrow().pixels_sent - sent_after_open, 1 + 8);
    assert_eq!(session.device().panel_colour(0, 0), Some(Argb::BLACK));

    session.clear_buffer();
    assert_eq!(session.device().panel_colour(0, 0), Some(Argb::BLACK));
    session.update();
    assert_eq!(session.device().panel_colour(0, 0), Some(Argb::WHITE));
}
