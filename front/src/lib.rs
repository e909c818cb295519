//! Frontends for creating simple applications with `dosfire`.
//!
//! A frontend owns the window, the palette used to show palette indices
//! as colors, and the main loop that times frames and polls the keyboard.

use std::time::Duration;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use dosfire_core::render::target::DrawBuffer;

#[cfg(feature = "minifb")]
pub mod minifb;

/// Width and height of the classic VGA mode 13h screen.
pub const MODE_13H: (usize, usize) = (320, 200);

/// Per-frame state. The window run method passes an instance of `Frame`
/// to the callback function on every iteration of the main loop.
pub struct Frame<'a, Win> {
    /// Elapsed time since the start of the first frame.
    pub t: Duration,
    /// Elapsed time since the start of the previous frame.
    pub dt: Duration,
    /// Draw buffer in which to draw, cleared before each frame.
    pub buf: &'a mut DrawBuffer,
    /// Reference to the window object.
    pub win: &'a mut Win,
}

impl<Win> Frame<'_, Win> {
    /// Returns the time since the previous frame in whole milliseconds.
    pub fn dt_ms(&self) -> u32 {
        self.dt.as_millis().try_into().unwrap_or(u32::MAX)
    }
    /// Returns the time since the first frame in whole milliseconds.
    pub fn t_ms(&self) -> u32 {
        self.t.as_millis().try_into().unwrap_or(u32::MAX)
    }
}

/// Logger that writes log records to standard error.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, meta: &Metadata) -> bool {
        meta.level() <= log::max_level()
    }
    fn log(&self, rec: &Record) {
        if self.enabled(rec.metadata()) {
            eprintln!("[{:<5} {}] {}", rec.level(), rec.target(), rec.args());
        }
    }
    fn flush(&self) {}
}

/// Installs a logger that writes records up to `level` to standard error.
///
/// # Errors
/// Returns an error if a logger has already been installed.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
