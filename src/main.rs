// src/main.rs

//! Demo binary: opens the configured display, builds the configured widgets
//! and renders a number of frames.
//!
//! Usage: `serdisp-ui [config.json]`. Without a config file the defaults are
//! used (a headless 128x64 display with no widgets).

use anyhow::Context;
use log::{debug, info, warn};
use serdisp_ui::config::Config;
use serdisp_ui::decoder::ImageCrateDecoder;
use serdisp_ui::display::{DisplayDevice, HeadlessDevice, Session};
use serdisp_ui::widget::{self, Widget};
use serdisp_ui::FrameCompositor;
use std::thread;
use std::time::{Duration, Instant};

/// Main entry point for the `serdisp-ui` demo.
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting serdisp-ui...");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            Config::load(&path)?
        }
        None => {
            info!("No configuration file given, using defaults.");
            Config::default()
        }
    };

    if config.device.connection == "headless" || config.device.connection.starts_with("headless:") {
        return run::<HeadlessDevice>(&config);
    }
    run_hardware(&config)
}

#[cfg(feature = "serdisp")]
fn run_hardware(config: &Config) -> anyhow::Result<()> {
    run::<serdisp_ui::display::SerdispDevice>(config)
}

#[cfg(not(feature = "serdisp"))]
fn run_hardware(config: &Config) -> anyhow::Result<()> {
    anyhow::bail!(
        "Connection '{}' needs hardware support; rebuild with `--features serdisp`",
        config.device.connection
    )
}

fn run<D: DisplayDevice>(config: &Config) -> anyhow::Result<()> {
    // Released on every exit path from here on, `?` included.
    let mut session = Session::<D>::open(&config.device).context("Failed to open display")?;
    info!(
        "Display '{}' opened: {:?}",
        session.display_name(),
        session.geometry()
    );

    let decoder = ImageCrateDecoder;
    let mut widgets = config
        .widgets
        .iter()
        .map(|w| widget::from_config(w, &decoder))
        .collect::<Result<Vec<Box<dyn Widget>>, _>>()
        .context("Failed to build widgets")?;
    info!("Built {} widgets", widgets.len());

    let mut compositor = config
        .compositor
        .enabled
        .then(|| FrameCompositor::for_canvas(&session, config.compositor.overdraw));
    let interval = Duration::from_millis(config.render.frame_interval_ms);

    let mut frame: u64 = 0;
    while config.render.frames.map_or(true, |limit| frame < limit) {
        let now = Instant::now();
        match compositor.as_mut() {
            Some(compositor) => {
                for widget in widgets.iter_mut() {
                    widget.draw(&mut *compositor, now)?;
                }
                let stats = compositor.flip(&mut session)?;
                debug!("Frame {}: {} pixels changed", frame, stats.changed);
            }
            None => {
                session.clear_buffer();
                for widget in widgets.iter_mut() {
                    widget.draw(&mut session, now)?;
                }
                session.update();
                debug!("Frame {}: drawn unbuffered", frame);
            }
        }
        if session.runtime_error() {
            warn!(
                "Driver reported a runtime error: {}",
                session.error_message().unwrap_or_default()
            );
        }
        frame += 1;
        thread::sleep(interval);
    }

    info!("Rendered {} frames, shutting down.", frame);
    session.release();
    Ok(())
}
