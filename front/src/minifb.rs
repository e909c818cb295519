//! Frontend using the `minifb` crate for window creation and event handling.

use std::{
    mem,
    ops::ControlFlow::{self, Break},
    time::Instant,
};

use log::info;
use minifb::{KeyRepeat, Scale, WindowOptions};

pub use minifb::Key;

use dosfire_core::render::{
    ctx::DrawOpts,
    stats::Stats,
    target::{DrawBuffer, Planes},
};
use dosfire_core::util::palette::Palette;

use crate::{Frame, MODE_13H};

/// A lightweight wrapper of a `minifb` window.
pub struct Window {
    /// The wrapped minifb window.
    pub imp: minifb::Window,
    /// The width and height of the draw buffer shown in the window.
    pub dims: (usize, usize),
    /// The planes of the draw buffer passed to the frame callback.
    pub planes: Planes,
    /// Initial draw options of the draw buffer passed to the frame callback.
    pub opts: DrawOpts,
    palette: Palette,
    argb: Vec<u32>,
    presented: bool,
}

/// Builder for creating `Window`s.
pub struct Builder<'title> {
    pub dims: (usize, usize),
    pub title: &'title str,
    pub target_fps: Option<u32>,
    pub palette: Palette,
    pub planes: Planes,
    pub opts: WindowOptions,
}

impl Default for Builder<'_> {
    fn default() -> Self {
        Self {
            dims: MODE_13H,
            title: "// dosfire application //",
            target_fps: Some(60),
            palette: Palette::default(),
            planes: Planes::ALL,
            opts: WindowOptions { scale: Scale::X2, ..WindowOptions::default() },
        }
    }
}

impl<'t> Builder<'t> {
    /// Sets the width and height of the draw buffer.
    pub fn dims(mut self, dims: (usize, usize)) -> Self {
        self.dims = dims;
        self
    }
    /// Sets the title of the window.
    pub fn title(mut self, title: &'t str) -> Self {
        self.title = title;
        self
    }
    /// Sets the frame rate cap of the window. `None` means unlimited
    /// frame rate (the main loop runs as fast as possible).
    pub fn target_fps(mut self, fps: Option<u32>) -> Self {
        self.target_fps = fps;
        self
    }
    /// Sets the initial palette of the window.
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
    /// Sets the planes of the draw buffer passed to the frame callback.
    pub fn planes(mut self, planes: Planes) -> Self {
        self.planes = planes;
        self
    }
    /// Sets other `minifb` options.
    pub fn options(mut self, opts: WindowOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Creates the window.
    pub fn build(self) -> minifb::Result<Window> {
        let Self {
            dims,
            title,
            target_fps,
            palette,
            planes,
            opts,
        } = self;
        let mut imp = minifb::Window::new(title, dims.0, dims.1, opts)?;
        if let Some(fps) = target_fps {
            imp.set_target_fps(fps as usize);
        }
        info!("created {}×{} window \"{title}\"", dims.0, dims.1);
        Ok(Window {
            imp,
            dims,
            planes,
            opts: DrawOpts::default(),
            palette,
            argb: Vec::new(),
            presented: false,
        })
    }
}

impl Window {
    /// Returns a window builder.
    pub fn builder() -> Builder<'static> {
        Builder::default()
    }

    /// Returns the palette used to show palette indices as colors.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Replaces the palette used to show palette indices as colors.
    ///
    /// Takes effect on the next call to [`present`][Self::present].
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Updates the window content with the color plane of `buf`, looking
    /// up the color of each index in the current palette.
    ///
    /// Waits as needed to keep to the target frame rate, if any.
    ///
    /// # Errors
    /// Returns an error if the window could not be updated.
    pub fn present(&mut self, buf: &DrawBuffer) -> minifb::Result<()> {
        let (w, h) = buf.dims();
        self.argb.clear();
        self.argb.extend(
            buf.color()
                .data()
                .iter()
                .map(|&i| self.palette.to_argb(i)),
        );
        self.presented = true;
        self.imp.update_with_buffer(&self.argb, w, h)
    }

    /// Returns whether `key` is currently held down.
    pub fn key_down(&self, key: Key) -> bool {
        self.imp.is_key_down(key)
    }

    /// Returns whether `key` was pressed since the previous frame.
    ///
    /// Unlike [`key_down`][Self::key_down], returns `true` only once per
    /// key press.
    pub fn key_pressed(&self, key: Key) -> bool {
        self.imp.is_key_pressed(key, KeyRepeat::No)
    }

    /// Runs the main loop of the program, invoking the callback on each
    /// iteration to compute and draw the next frame.
    ///
    /// The draw buffer passed to the callback is cleared before each frame
    /// and presented after it, unless the callback presented some other
    /// buffer itself.
    ///
    /// The main loop stops and this function returns if:
    /// * the user closes the window via the GUI (e.g. titlebar close button);
    /// * the Esc key is pressed; or
    /// * the callback returns `ControlFlow::Break`.
    ///
    /// Prints the accumulated rendering statistics on exit.
    ///
    /// # Errors
    /// Returns an error if the window could not be updated.
    pub fn run<F>(&mut self, mut frame_fn: F) -> minifb::Result<()>
    where
        F: FnMut(&mut Frame<Self>) -> ControlFlow<()>,
    {
        let (w, h) = self.dims;
        let mut buf = DrawBuffer::new(w, h, self.planes).with_opts(self.opts);
        buf.stats = Stats::start();

        let start = Instant::now();
        let mut last = start;
        while !self.should_quit() {
            let now = Instant::now();
            buf.clear(Planes::ALL);
            self.presented = false;

            let frame = &mut Frame {
                t: now - start,
                dt: now - last,
                buf: &mut buf,
                win: self,
            };
            last = now;
            if let Break(()) = frame_fn(frame) {
                break;
            }
            if !self.presented {
                self.present(&buf)?;
            }
            buf.stats.frames += 1;
        }
        let stats = mem::take(&mut buf.stats).finish();
        println!("{stats}");
        Ok(())
    }

    fn should_quit(&self) -> bool {
        !self.imp.is_open() || self.imp.is_key_down(Key::Escape)
    }
}
