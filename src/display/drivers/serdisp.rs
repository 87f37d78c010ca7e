//! serdisplib display driver implementation.
//!
//! Thin wrapper over the C library: each `DisplayDevice` primitive maps onto
//! one `serdisp_*` call. Only built with the `serdisp` feature, which links
//! against `libserdisp` (see `build.rs`).

use crate::color::PackedColor;
use crate::display::driver::DisplayDevice;
use crate::display::types::{BlinkTarget, DebugLevel, LogMedium};
use crate::error::{DisplayError, Result};
use libc::{c_char, c_int, c_long};
use log::{info, warn};
use std::ffi::{CStr, CString};

#[repr(C)]
struct SerdispConn {
    _private: [u8; 0],
}

#[repr(C)]
struct Serdisp {
    _private: [u8; 0],
}

// --- FFI Declarations ---
extern "C" {
    fn SDCONN_open(sdcdev: *const c_char) -> *mut SerdispConn;
    fn SDCONN_close(sdcd: *mut SerdispConn);

    fn serdisp_init(
        sdcd: *mut SerdispConn,
        dispname: *const c_char,
        extra: *const c_char,
    ) -> *mut Serdisp;
    fn serdisp_close(dd: *mut Serdisp);
    fn serdisp_quit(dd: *mut Serdisp);
    fn serdisp_reset(dd: *mut Serdisp);
    fn serdisp_fullreset(dd: *mut Serdisp) -> *mut Serdisp;

    fn serdisp_setpixel(dd: *mut Serdisp, x: c_int, y: c_int, colour: c_long);
    fn serdisp_getpixel(dd: *mut Serdisp, x: c_int, y: c_int) -> c_long;
    fn serdisp_setcolour(dd: *mut Serdisp, x: c_int, y: c_int, colour: u32);
    fn serdisp_getcolour(dd: *mut Serdisp, x: c_int, y: c_int) -> u32;
    fn serdisp_setgrey(dd: *mut Serdisp, x: c_int, y: c_int, grey: u8);
    fn serdisp_getgrey(dd: *mut Serdisp, x: c_int, y: c_int) -> u8;

    fn serdisp_clear(dd: *mut Serdisp);
    fn serdisp_clearbuffer(dd: *mut Serdisp);
    fn serdisp_update(dd: *mut Serdisp);
    fn serdisp_rewrite(dd: *mut Serdisp);
    fn serdisp_blink(dd: *mut Serdisp, what: c_int, cnt: c_int, delta: c_int);

    fn serdisp_getwidth(dd: *mut Serdisp) -> c_int;
    fn serdisp_getheight(dd: *mut Serdisp) -> c_int;
    fn serdisp_getcolours(dd: *mut Serdisp) -> c_long;
    fn serdisp_getdepth(dd: *mut Serdisp) -> c_int;
    fn serdisp_getpixelaspect(dd: *mut Serdisp) -> c_int;
    fn serdisp_isdisplay(dispname: *const c_char) -> c_int;

    fn serdisp_setoption(dd: *mut Serdisp, optionname: *const c_char, value: c_long);
    fn serdisp_getoption(dd: *mut Serdisp, optionname: *const c_char, typesize: *mut c_int)
        -> c_long;
    fn serdisp_isoption(dd: *mut Serdisp, optionname: *const c_char) -> c_int;

    fn serdisp_transcolour(dd: *mut Serdisp, colour: u32) -> c_long;
    fn serdisp_transgrey(dd: *mut Serdisp, grey: u8) -> c_long;
    fn serdisp_lookupcolour(dd: *mut Serdisp, colour: c_long) -> u32;
    fn serdisp_lookupgrey(dd: *mut Serdisp, colour: c_long) -> u8;

    fn sd_runtime_error() -> c_int;
    fn sd_geterrormsg() -> *mut c_char;
    fn sd_setdebuglevel(level: c_int);
    fn sd_setlogmedium(medium: c_int) -> c_int;
}

pub struct SerdispDevice {
    dd: *mut Serdisp,
}

fn c_string(value: &str) -> std::result::Result<CString, String> {
    CString::new(value).map_err(|_| format!("{:?} contains a NUL byte", value))
}

fn last_error_message() -> Option<String> {
    // SAFETY: sd_geterrormsg returns a pointer to a static, NUL-terminated buffer or NULL.
    unsafe {
        let msg = sd_geterrormsg();
        if msg.is_null() {
            return None;
        }
        let msg = CStr::from_ptr(msg).to_string_lossy().trim().to_string();
        (!msg.is_empty()).then_some(msg)
    }
}

impl SerdispDevice {
    fn with_option_name<T>(
        &self,
        name: &str,
        fallback: T,
        f: impl FnOnce(*const c_char) -> T,
    ) -> T {
        match CString::new(name) {
            Ok(name) => f(name.as_ptr()),
            Err(_) => {
                warn!("SerdispDevice: Option name {:?} contains a NUL byte", name);
                fallback
            }
        }
    }
}

impl DisplayDevice for SerdispDevice {
    fn open(connection: &str, model: &str, options: &str) -> Result<Self> {
        info!(
            "SerdispDevice::open() connection '{}' model '{}'",
            connection, model
        );
        let open_err = |reason: String| DisplayError::DeviceOpen {
            connection: connection.to_string(),
            model: model.to_string(),
            reason,
        };
        let init_err = |reason: String| DisplayError::DisplayInit {
            model: model.to_string(),
            reason,
        };
        let c_connection = c_string(connection).map_err(open_err)?;
        let c_model = c_string(model).map_err(init_err)?;
        let c_options = c_string(options).map_err(init_err)?;

        // SAFETY: FFI call with a valid NUL-terminated string.
        let conn = unsafe { SDCONN_open(c_connection.as_ptr()) };
        if conn.is_null() {
            return Err(open_err(
                last_error_message().unwrap_or_else(|| "SDCONN_open failed".to_string()),
            ));
        }

        // SAFETY: `conn` is a live connection, strings are NUL-terminated.
        let dd = unsafe { serdisp_init(conn, c_model.as_ptr(), c_options.as_ptr()) };
        if dd.is_null() {
            let reason =
                last_error_message().unwrap_or_else(|| "serdisp_init failed".to_string());
            // SAFETY: `conn` is live and not owned by any display.
            unsafe { SDCONN_close(conn) };
            return Err(init_err(reason));
        }
        info!("SerdispDevice: Initialized '{}'", model);
        Ok(Self { dd })
    }

    fn close(&mut self) {
        info!("SerdispDevice: close");
        // SAFETY: `dd` is live; the owning Session calls close or quit exactly once.
        unsafe { serdisp_close(self.dd) };
    }

    fn quit(&mut self) {
        info!("SerdispDevice: quit");
        // SAFETY: as for close.
        unsafe { serdisp_quit(self.dd) };
    }

    fn reset(&mut self) {
        // SAFETY: `dd` is live.
        unsafe { serdisp_reset(self.dd) };
    }

    fn full_reset(&mut self) {
        // SAFETY: `dd` is live. fullreset may hand back a new handle.
        let dd = unsafe { serdisp_fullreset(self.dd) };
        if dd.is_null() {
            warn!(
                "SerdispDevice: Full reset failed: {}",
                last_error_message().unwrap_or_default()
            );
        } else {
            self.dd = dd;
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: u32) {
        // SAFETY: `dd` is live; the library clips out-of-range coordinates.
        unsafe { serdisp_setpixel(self.dd, x, y, value as c_long) };
    }

    fn get_pixel(&self, x: i32, y: i32) -> u32 {
        // SAFETY: `dd` is live.
        unsafe { serdisp_getpixel(self.dd, x, y) as u32 }
    }

    fn set_colour(&mut self, x: i32, y: i32, colour: PackedColor) {
        // SAFETY: `dd` is live.
        unsafe { serdisp_setcolour(self.dd, x, y, colour.0) };
    }

    fn get_colour(&self, x: i32, y: i32) -> PackedColor {
        // SAFETY: `dd` is live.
        PackedColor(unsafe { serdisp_getcolour(self.dd, x, y) })
    }

    fn set_grey(&mut self, x: i32, y: i32, grey: u8) {
        // SAFETY: `dd` is live.
        unsafe { serdisp_setgrey(self.dd, x, y, grey) };
    }

    fn get_grey(&self, x: i32, y: i32) -> u8 {
        // SAFETY: `dd` is live.
        unsafe { serdisp_getgrey(self.dd, x, y) }
    }

    fn clear(&mut self) {
        // SAFETY: `dd` is live.
        unsafe { serdisp_clear(self.dd) };
    }

    fn clear_buffer(&mut self) {
        // SAFETY: `dd` is live.
        unsafe { serdisp_clearbuffer(self.dd) };
    }

    fn update(&mut self) {
        // SAFETY: `dd` is live.
        unsafe { serdisp_update(self.dd) };
    }

    fn rewrite(&mut self) {
        // SAFETY: `dd` is live.
        unsafe { serdisp_rewrite(self.dd) };
    }

    fn blink(&mut self, target: BlinkTarget, count: u32, delta_ms: u32) {
        let count = c_int::try_from(count).unwrap_or(c_int::MAX);
        let delta_ms = c_int::try_from(delta_ms).unwrap_or(c_int::MAX);
        // SAFETY: `dd` is live. Blocks for count * delta_ms.
        unsafe { serdisp_blink(self.dd, target.as_raw(), count, delta_ms) };
    }

    fn width(&self) -> u32 {
        // SAFETY: `dd` is live.
        unsafe { serdisp_getwidth(self.dd) }.max(0) as u32
    }

    fn height(&self) -> u32 {
        // SAFETY: `dd` is live.
        unsafe { serdisp_getheight(self.dd) }.max(0) as u32
    }

    fn colours(&self) -> u64 {
        // SAFETY: `dd` is live.
        unsafe { serdisp_getcolours(self.dd) }.max(0) as u64
    }

    fn depth(&self) -> u32 {
        // SAFETY: `dd` is live.
        unsafe { serdisp_getdepth(self.dd) }.max(0) as u32
    }

    fn pixel_aspect(&self) -> u32 {
        // SAFETY: `dd` is live.
        unsafe { serdisp_getpixelaspect(self.dd) }.max(0) as u32
    }

    fn is_display(&self, model: &str) -> bool {
        // SAFETY: FFI call with a valid NUL-terminated string.
        self.with_option_name(model, false, |name| unsafe { serdisp_isdisplay(name) } != 0)
    }

    fn option(&self, name: &str) -> Option<i64> {
        if !self.is_option(name) {
            return None;
        }
        let mut typesize: c_int = 0;
        // SAFETY: `dd` is live, `typesize` outlives the call.
        self.with_option_name(name, None, |c_name| {
            Some(unsafe { serdisp_getoption(self.dd, c_name, &mut typesize) } as i64)
        })
    }

    fn set_option(&mut self, name: &str, value: i64) {
        let dd = self.dd;
        // SAFETY: `dd` is live.
        self.with_option_name(name, (), |c_name| unsafe {
            serdisp_setoption(dd, c_name, value as c_long)
        })
    }

    fn is_option(&self, name: &str) -> bool {
        // SAFETY: `dd` is live. Negative results mean read-only, still an option.
        self.with_option_name(name, false, |c_name| unsafe {
            serdisp_isoption(self.dd, c_name) != 0
        })
    }

    fn trans_colour(&self, colour: PackedColor) -> u32 {
        // SAFETY: `dd` is live.
        unsafe { serdisp_transcolour(self.dd, colour.0) as u32 }
    }

    fn trans_grey(&self, grey: u8) -> u32 {
        // SAFETY: `dd` is live.
        unsafe { serdisp_transgrey(self.dd, grey) as u32 }
    }

    fn lookup_colour(&self, value: u32) -> PackedColor {
        // SAFETY: `dd` is live.
        PackedColor(unsafe { serdisp_lookupcolour(self.dd, value as c_long) })
    }

    fn lookup_grey(&self, value: u32) -> u8 {
        // SAFETY: `dd` is live.
        unsafe { serdisp_lookupgrey(self.dd, value as c_long) }
    }

    fn runtime_error(&self) -> bool {
        // SAFETY: reads library-global state only.
        unsafe { sd_runtime_error() != 0 }
    }

    fn error_message(&self) -> Option<String> {
        last_error_message()
    }

    fn set_debug_level(&mut self, level: DebugLevel) {
        // SAFETY: writes library-global state only.
        unsafe { sd_setdebuglevel(level.as_raw()) };
    }

    fn set_log_medium(&mut self, medium: LogMedium) {
        // SAFETY: writes library-global state only.
        if unsafe { sd_setlogmedium(medium.as_raw()) } != 0 {
            warn!("SerdispDevice: Log medium {:?} rejected by library", medium);
        }
    }
}
