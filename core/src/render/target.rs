//! Draw buffers, the render targets of the rasterizer.
//!
//! A draw buffer comprises a color plane of palette indices and an optional
//! depth plane of reciprocal depth values, together with the options that
//! control drawing into it and the statistics collected while doing so.

use core::fmt::{self, Debug, Formatter};
use core::ops::{BitOr, BitOrAssign};

use log::debug;

use crate::math::vary::Vary;
use crate::util::buf::Buf2;

use super::ctx::{DepthFunc, DrawOpts};
use super::raster::{Frag, Scanline};
use super::stats::{Stats, Throughput};

/// A set of draw buffer planes.
///
/// # Examples
/// ```
/// use dosfire_core::render::target::Planes;
///
/// let planes = Planes::COLOR | Planes::DEPTH;
/// assert!(planes.contains(Planes::DEPTH));
/// assert_eq!(planes, Planes::ALL);
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Planes(u8);

/// The color index [`DrawBuffer::depth_to_color`] writes for pixels with
/// no depth value.
pub const DEPTH_VIS_FAR: u8 = 0x80;

/// A color plane plus an optional depth plane.
pub struct DrawBuffer {
    color: Buf2<u8>,
    depth: Option<Buf2<f32>>,
    /// Options used by draw calls targeting this buffer.
    pub opts: DrawOpts,
    /// Statistics accumulated by draw calls targeting this buffer.
    pub stats: Stats,
}

impl Planes {
    /// No planes.
    pub const NONE: Self = Self(0);
    /// The color plane.
    pub const COLOR: Self = Self(0b01);
    /// The depth plane.
    pub const DEPTH: Self = Self(0b10);
    /// Both the color and the depth plane.
    pub const ALL: Self = Self(0b11);

    /// Returns whether every plane in `other` is also in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Planes {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Planes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl DrawBuffer {
    /// Returns a new `w` × `h` draw buffer with default options.
    ///
    /// The color plane is always allocated; the depth plane only if
    /// `planes` contains [`Planes::DEPTH`]. Both are initially cleared.
    pub fn new(w: usize, h: usize, planes: Planes) -> Self {
        let depth = planes
            .contains(Planes::DEPTH)
            .then(|| Buf2::new_default(w, h));
        debug!("allocated {w}×{h} draw buffer, depth plane: {}", depth.is_some());
        Self {
            color: Buf2::new_default(w, h),
            depth,
            opts: DrawOpts::default(),
            stats: Stats::default(),
        }
    }

    /// Returns `self` with the given draw options.
    pub fn with_opts(self, opts: DrawOpts) -> Self {
        Self { opts, ..self }
    }

    /// Returns the width of `self` in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.color.width()
    }
    /// Returns the height of `self` in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.color.height()
    }
    /// Returns the width and height of `self`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
    /// Returns whether `self` has a depth plane.
    #[inline]
    pub fn has_depth(&self) -> bool {
        self.depth.is_some()
    }

    /// Returns the color plane of `self`.
    pub fn color(&self) -> &Buf2<u8> {
        &self.color
    }
    /// Returns the color plane of `self` mutably.
    pub fn color_mut(&mut self) -> &mut Buf2<u8> {
        &mut self.color
    }
    /// Returns the depth plane of `self`, if any.
    ///
    /// Depth values are reciprocals `1/w` of the view-space depth, so
    /// larger values are closer and a cleared value of zero is infinitely
    /// far away.
    pub fn depth(&self) -> Option<&Buf2<f32>> {
        self.depth.as_ref()
    }

    /// Returns the color index at `(x, y)`.
    ///
    /// # Panics
    /// If `(x, y)` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.color[[x, y]]
    }

    /// Clears the given planes of `self`: color to index 0 and depth to
    /// zero, the reciprocal of infinite depth.
    ///
    /// Planes that `self` lacks are ignored.
    pub fn clear(&mut self, planes: Planes) {
        if planes.contains(Planes::COLOR) {
            self.color.fill(0);
        }
        if planes.contains(Planes::DEPTH) {
            if let Some(depth) = &mut self.depth {
                depth.fill(0.0);
            }
        }
    }

    /// Fills the color plane of `self` with `color`.
    pub fn clear_color(&mut self, color: u8) {
        self.color.fill(color);
    }

    /// Copies the color plane of `src` into `self` so that the top-left
    /// corner of `src` lands at `(x, y)`.
    ///
    /// Parts of `src` that fall outside `self` are not copied.
    pub fn blit(&mut self, src: &DrawBuffer, x: i32, y: i32) {
        let (dw, dh) = (self.width() as i64, self.height() as i64);
        let (sw, sh) = (src.width() as i64, src.height() as i64);
        let (x, y) = (x as i64, y as i64);

        let (x0, x1) = (x.max(0), (x + sw).min(dw));
        let (y0, y1) = (y.max(0), (y + sh).min(dh));
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let src_xs = (x0 - x) as usize..(x1 - x) as usize;
        let dst_xs = x0 as usize..x1 as usize;
        for dy in y0..y1 {
            let src_row = &src.color[(dy - y) as usize];
            self.color[dy as usize][dst_xs.clone()]
                .copy_from_slice(&src_row[src_xs.clone()]);
        }
    }

    /// Writes a grayscale rendition of the depth plane of `self` into the
    /// color plane of `dst`.
    ///
    /// Uncovered pixels map to index [`DEPTH_VIS_FAR`]. Covered pixels get
    /// darker with distance: a view-space depth of `w` maps to
    /// `DEPTH_VIS_FAR - min(2w, 123)`. The mapping is fixed, so a scene
    /// keeps its brightness as it moves. Use with a grayscale palette.
    ///
    /// # Panics
    /// If `self` has no depth plane, or if `dst` has different dimensions.
    #[track_caller]
    pub fn depth_to_color(&self, dst: &mut DrawBuffer) {
        let Some(depth) = &self.depth else {
            missing_depth_plane()
        };
        assert_eq!(self.dims(), dst.dims(), "draw buffer dimensions differ");

        for (c, &z) in dst.color.data_mut().iter_mut().zip(depth.data()) {
            *c = if z > 0.0 {
                // Saturates for depths beyond the u8 range
                let w = (2.0 / z) as u8;
                DEPTH_VIS_FAR - w.min(0x7B)
            } else {
                DEPTH_VIS_FAR
            };
        }
    }

    /// Writes a single pixel without depth testing, if in bounds.
    #[inline]
    pub(crate) fn plot(&mut self, x: usize, y: usize, color: u8) -> bool {
        let in_bounds = x < self.width() && y < self.height();
        if in_bounds {
            self.color[[x, y]] = color;
        }
        in_bounds
    }

    /// Writes a single scanline into `self`, depth testing each fragment
    /// according to `self.opts.depth_func`.
    ///
    /// Calls `shade` for each fragment that passes to get its color.
    /// Returns the count of fragments input and output.
    ///
    /// # Panics
    /// If depth testing is enabled and `self` has no depth plane.
    pub(crate) fn write_span<V, F>(&mut self, sl: Scanline<V>, mut shade: F) -> Throughput
    where
        V: Vary,
        F: FnMut(&Frag<V>) -> u8,
    {
        let (y, xs) = (sl.y, sl.xs.clone());
        let mut io = Throughput { i: xs.len(), o: 0 };
        let cbuf_span = &mut self.color[y][xs.clone()];

        match (self.opts.depth_func, &mut self.depth) {
            (DepthFunc::Always, _) => {
                for (frag, c) in sl.fragments().zip(cbuf_span) {
                    *c = shade(&frag);
                    io.o += 1;
                }
            }
            (func @ DepthFunc::Less, Some(depth)) => {
                let zbuf_span = &mut depth[y][xs];
                for ((frag, c), z) in sl.fragments().zip(cbuf_span).zip(zbuf_span) {
                    if func.test(frag.z, *z) {
                        *c = shade(&frag);
                        *z = frag.z;
                        io.o += 1;
                    }
                }
            }
            (DepthFunc::Less, None) => missing_depth_plane(),
        }
        io
    }
}

impl Debug for DrawBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawBuffer")
            .field("w", &self.width())
            .field("h", &self.height())
            .field("depth", &self.has_depth())
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn missing_depth_plane() -> ! {
    panic!("depth testing requires a draw buffer with a depth plane")
}

#[cfg(test)]
mod tests {
    use crate::math::vec::pt3;
    use crate::render::raster::tri_fill;

    use super::*;

    #[test]
    fn planes() {
        assert!(Planes::ALL.contains(Planes::COLOR));
        assert!(!Planes::COLOR.contains(Planes::DEPTH));
        let mut p = Planes::NONE;
        p |= Planes::DEPTH;
        assert_eq!(p, Planes::DEPTH);
    }

    #[test]
    fn new_allocates_requested_planes() {
        let buf = DrawBuffer::new(4, 3, Planes::COLOR);
        assert_eq!(buf.dims(), (4, 3));
        assert!(!buf.has_depth());

        let buf = DrawBuffer::new(4, 3, Planes::ALL);
        assert!(buf.has_depth());
        assert!(buf.depth().is_some_and(|d| d.data().iter().all(|&z| z == 0.0)));
    }

    #[test]
    fn clear_planes() {
        let mut buf = DrawBuffer::new(2, 2, Planes::ALL);
        buf.clear_color(7);
        assert!(buf.color().data().iter().all(|&c| c == 7));

        buf.clear(Planes::DEPTH);
        assert_eq!(buf.pixel(1, 1), 7);
        buf.clear(Planes::COLOR);
        assert_eq!(buf.pixel(1, 1), 0);
    }

    #[test]
    fn blit_is_clipped_to_destination() {
        let mut dst = DrawBuffer::new(4, 3, Planes::COLOR);
        let mut src = DrawBuffer::new(2, 2, Planes::COLOR);
        src.clear_color(1);
        src.color_mut()[[1, 1]] = 2;

        dst.blit(&src, 0, 0);
        dst.blit(&src, 3, 2);
        dst.blit(&src, -1, -1);
        dst.blit(&src, 10, 10);

        assert_eq!(dst.color()[0], [2, 1, 0, 0]);
        assert_eq!(dst.color()[1], [1, 2, 0, 0]);
        assert_eq!(dst.color()[2], [0, 0, 0, 1]);
    }

    #[test]
    fn depth_to_color_darkens_with_distance() {
        let mut src = DrawBuffer::new(4, 1, Planes::ALL);
        if let Some(d) = &mut src.depth {
            // Uncovered, w = 16, w = 8, and nearly at the eye
            d.data_mut().copy_from_slice(&[0.0, 0.125, 0.25, 1000.0]);
        }
        let mut dst = DrawBuffer::new(4, 1, Planes::COLOR);
        src.depth_to_color(&mut dst);
        assert_eq!(dst.color().data(), &[0x80, 0x70, 0x78, 0x80]);
    }

    #[test]
    fn depth_to_color_clamps_far_values() {
        let mut src = DrawBuffer::new(2, 1, Planes::ALL);
        if let Some(d) = &mut src.depth {
            d.data_mut().copy_from_slice(&[0.03125, 0.0001]);
        }
        let mut dst = DrawBuffer::new(2, 1, Planes::COLOR);
        src.depth_to_color(&mut dst);
        assert_eq!(dst.color().data(), &[0x80 - 64, 0x80 - 0x7B]);
    }

    #[test]
    fn plot_ignores_out_of_bounds() {
        let mut buf = DrawBuffer::new(2, 2, Planes::COLOR);
        assert!(buf.plot(1, 1, 3));
        assert!(!buf.plot(2, 1, 3));
        assert!(!buf.plot(1, 2, 3));
        assert_eq!(buf.color().data(), &[0, 0, 0, 3]);
    }

    #[test]
    fn write_span_depth_tests() {
        let mut buf = DrawBuffer::new(4, 4, Planes::ALL);
        buf.opts.depth_func = DepthFunc::Less;

        let tri = |z| [pt3(0.0, 0.0, z), pt3(4.0, 0.0, z), pt3(0.0, 4.0, z)];
        let mut io = Throughput::default();

        // Near triangle first, far triangle second
        for (z, col) in [(0.5, 1), (0.25, 2)] {
            let verts = tri(z).map(|p| (p, ()));
            tri_fill(verts, buf.dims(), |sl| {
                io += buf.write_span(sl, |_| col);
            });
        }
        assert_eq!(io, Throughput { i: 12, o: 6 });
        assert_eq!(buf.pixel(0, 0), 1);
        assert_eq!(buf.depth().map(|d| d[[0, 0]]), Some(0.5));
    }

    #[test]
    #[should_panic = "depth testing requires a draw buffer with a depth plane"]
    fn depth_test_without_depth_plane() {
        let mut buf = DrawBuffer::new(4, 4, Planes::COLOR);
        buf.opts.depth_func = DepthFunc::Less;
        let verts = [pt3(0.0, 0.0, 1.0), pt3(4.0, 0.0, 1.0), pt3(0.0, 4.0, 1.0)];
        tri_fill(verts.map(|p| (p, ())), buf.dims(), |sl| {
            buf.write_span(sl, |_| 1);
        });
    }
}
