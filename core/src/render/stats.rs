//! Rendering statistics.
//!
//! Every [`DrawBuffer`][super::target::DrawBuffer] keeps a [`Stats`]
//! instance that [`draw_tri`][super::draw_tri] updates on each call. A
//! frontend typically starts the timer when its main loop begins and
//! prints the totals when it ends.

use core::fmt::{self, Display, Formatter};
use core::ops::AddAssign;
use core::time::Duration;
#[cfg(feature = "std")]
use std::time::Instant;

/// Counts of the work done by draw calls, and the time it took.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    /// Time covered by these stats, recorded by [`finish`][Self::finish].
    pub time: Duration,
    /// Number of frames rendered.
    pub frames: u64,
    /// Number of triangles passed to `draw_tri`.
    pub calls: u64,
    /// Triangles submitted, and triangles filled after clipping and culling.
    /// A triangle split in two by the near plane counts twice as output.
    pub tris: Throughput,
    /// Pixels visited by the fillers, and pixels actually written.
    pub frags: Throughput,

    #[cfg(feature = "std")]
    started: Option<Instant>,
}

/// Count of items into and out of a rendering stage.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Throughput {
    /// Items in.
    pub i: usize,
    /// Items out.
    pub o: usize,
}

/// Formats a count with a metric suffix.
struct Si(usize);

/// Formats a duration in the largest unit that keeps it above one.
struct Time(Duration);

impl Stats {
    /// Returns zeroed stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns zeroed stats that remember the time of their creation.
    ///
    /// Without the `std` feature, there is no clock and this is the same
    /// as [`new`][Self::new].
    pub fn start() -> Self {
        Self {
            #[cfg(feature = "std")]
            started: Some(Instant::now()),
            ..Self::default()
        }
    }

    /// Sets `time` to the time elapsed since [`start`][Self::start].
    ///
    /// Leaves `time` unchanged if `self` was not started.
    pub fn finish(self) -> Self {
        #[cfg(feature = "std")]
        let time = self.started.map_or(self.time, |t| t.elapsed());
        #[cfg(not(feature = "std"))]
        let time = self.time;
        Self { time, ..self }
    }

    /// Returns the average number of frames per second, or zero if no
    /// time has been recorded.
    pub fn fps(&self) -> f32 {
        let secs = self.time.as_secs_f32();
        if secs > 0.0 { self.frames as f32 / secs } else { 0.0 }
    }
}

impl Throughput {
    /// Returns the fraction of items that came out, or `None` if none
    /// went in.
    pub fn ratio(&self) -> Option<f32> {
        (self.i > 0).then(|| self.o as f32 / self.i as f32)
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let frames = self.frames.max(1) as f32;
        let per_frame = self.time.div_f32(frames);
        writeln!(
            f,
            " {:<9} {:>8} {:>9} / frame",
            "time",
            Time(self.time),
            Time(per_frame)
        )?;
        writeln!(
            f,
            " {:<9} {:>8} {:>9.1} / s",
            "frames",
            Si(self.frames as usize),
            self.fps()
        )?;
        writeln!(
            f,
            " {:<9} {:>8} {:>9.1} / frame",
            "calls",
            Si(self.calls as usize),
            self.calls as f32 / frames
        )?;
        for (name, io) in [("tris", self.tris), ("frags", self.frags)] {
            let avg = |n: usize| n as f32 / frames;
            writeln!(f, " {name:<5} in  {:>8} {:>9.1} / frame", Si(io.i), avg(io.i))?;
            write!(f, " {name:<5} out {:>8} {:>9.1} / frame", Si(io.o), avg(io.o))?;
            match io.ratio() {
                Some(r) => writeln!(f, " {:>6.1}%", 100.0 * r)?,
                None => writeln!(f)?,
            }
        }
        Ok(())
    }
}

impl Display for Si {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let w = f.width().unwrap_or(0);
        let n = self.0;
        let (v, suffix) = match n {
            0..1_000 => return write!(f, "{n:>w$}"),
            1_000..1_000_000 => (n as f32 / 1e3, 'k'),
            1_000_000..1_000_000_000 => (n as f32 / 1e6, 'M'),
            _ => (n as f32 / 1e9, 'G'),
        };
        write!(f, "{v:>w$.1}{suffix}", w = w.saturating_sub(1))
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let w = f.width().unwrap_or(0);
        let secs = self.0.as_secs_f32();
        let (v, unit) = if secs < 1e-3 {
            (secs * 1e6, "μs")
        } else if secs < 1.0 {
            (secs * 1e3, "ms")
        } else {
            (secs, "s")
        };
        let w = w.saturating_sub(unit.chars().count());
        write!(f, "{v:>w$.1}{unit}")
    }
}

impl AddAssign for Stats {
    /// Adds the counts and time of `other` to `self`.
    fn add_assign(&mut self, other: Self) {
        self.time += other.time;
        self.frames += other.frames;
        self.calls += other.calls;
        self.tris += other.tris;
        self.frags += other.frags;
    }
}

impl AddAssign for Throughput {
    fn add_assign(&mut self, rhs: Self) {
        self.i += rhs.i;
        self.o += rhs.o;
    }
}
