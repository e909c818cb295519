//! Translation of vector shapes into discrete pixels in a draw buffer.
//!
//! Rasterization proceeds by turning a triangle into a sequence of
//! *scanlines*, each corresponding to a horizontal span of pixels covered
//! by the triangle on a given line. The scanlines, in turn, are converted
//! into a series of *fragments* that represent potentially drawn pixels.
//!
//! Every span is clamped to the bounds of the target buffer, so all the
//! coordinates emitted by this module are valid pixel positions no matter
//! how far outside the viewport the input geometry extends.

use core::fmt::{self, Debug, Formatter};
use core::mem::swap;
use core::ops::Range;

use crate::math::{Lerp, float, vary::Iter, vary::Vary, vec::Vec4};

/// Point in screen space.
///
/// `x` and `y` are pixel coordinates, with pixel centers at half-integers.
/// `z` is the reciprocal depth `1/w`, which varies linearly in screen space.
pub type ScreenPt = Vec4;

/// Values to interpolate across a rasterized primitive.
pub type Varyings<V> = (ScreenPt, V);

/// A fragment, or a single "pixel" in a rasterized primitive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frag<V> {
    /// Column of the pixel.
    pub x: usize,
    /// Row of the pixel.
    pub y: usize,
    /// Reciprocal depth at the pixel center.
    pub z: f32,
    /// Interpolated varyings at the pixel center.
    pub var: V,
}

/// A horizontal, 1-pixel-thick "slice" of a primitive being rasterized.
pub struct Scanline<V> {
    /// The y coordinate of the line.
    pub y: usize,
    /// The range of x coordinates spanned by the line.
    pub xs: Range<usize>,
    /// Iterator emitting the varyings on the line.
    pub vs: Iter<Varyings<V>>,
}

/// Iterator emitting scanlines, linearly interpolating values between the
/// left and right endpoints as it goes.
pub struct ScanlineIter<V> {
    y: f32,
    left: Iter<Varyings<V>>,
    right: Iter<f32>,
    dv_dx: Varyings<V>,
    x_end: f32,
    n: u32,
}

impl<V: Vary> Scanline<V> {
    /// Returns an iterator over the fragments of `self`, from left to right.
    pub fn fragments(self) -> impl Iterator<Item = Frag<V>> {
        let y = self.y;
        self.xs
            .zip(self.vs)
            .map(move |(x, (pos, var))| Frag { x, y, z: pos.z(), var })
    }
}

impl<V> Debug for Scanline<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanline")
            .field("y", &self.y)
            .field("xs", &self.xs)
            .finish_non_exhaustive()
    }
}

impl<V: Vary> Iterator for ScanlineIter<V> {
    type Item = Scanline<V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.n == 0 {
            return None;
        }
        let v0 = self.left.next()?;
        let x1 = self.right.next()?;

        // Find the pixel centers at or to the right of each endpoint.
        // The left one is the first covered pixel, the right one is the
        // one-past-the-end pixel. Then scissor both to the buffer, so that
        // spans entirely left or right of it come out empty but in range.
        let x0 = round_up_to_half(v0.0.x()).clamp(0.5, self.x_end);
        let x1 = round_up_to_half(x1).clamp(x0, self.x_end);

        // Adjust v0 to match the rounded x0
        let v0 = v0.lerp(&v0.step(&self.dv_dx), x0 - v0.0.x());

        let vs = v0.vary(self.dv_dx, Some((x1 - x0) as u32));

        let y = self.y as usize;
        let xs = x0 as usize..x1 as usize;

        self.y += 1.0;
        self.n -= 1;

        Some(Scanline { y, xs, vs })
    }
}

/// Rasterizes a one-pixel-thick line between two screen points.
///
/// Invokes `pixel_fn` with the column and row of each pixel drawn. Pixels
/// outside the `w` × `h` bounds are skipped.
pub fn line<F>([mut p0, mut p1]: [ScreenPt; 2], (w, h): (usize, usize), mut pixel_fn: F)
where
    F: FnMut(usize, usize),
{
    if p0.y() > p1.y() {
        swap(&mut p0, &mut p1);
    }
    let (dx, dy) = (p1.x() - p0.x(), p1.y() - p0.y());
    let (w, h) = (w as f32, h as f32);

    if float::f32::abs(dx) > dy {
        // More wide than tall
        if dx < 0.0 {
            // Always draw from left to right
            swap(&mut p0, &mut p1);
        }
        let x0 = round_up_to_half(p0.x()).max(0.5);
        let x1 = round_up_to_half(p1.x()).min(w + 0.5);

        let dy_dx = dy / dx;
        // Adjust y0 to match the rounded x0
        let mut y = p0.y() + dy_dx * (x0 - p0.x());
        let mut x = x0;
        for _ in 0..(x1 - x0) as u32 {
            if (0.0..h).contains(&y) {
                pixel_fn(x as usize, y as usize);
            }
            x += 1.0;
            y += dy_dx;
        }
    } else {
        // More tall than wide
        let y0 = round_up_to_half(p0.y()).max(0.5);
        let y1 = round_up_to_half(p1.y()).min(h + 0.5);

        let dx_dy = dx / dy;
        // Adjust x0 to match the rounded y0
        let mut x = p0.x() + dx_dy * (y0 - p0.y());
        let mut y = y0;
        for _ in 0..(y1 - y0) as u32 {
            if (0.0..w).contains(&x) {
                pixel_fn(x as usize, y as usize);
            }
            x += dx_dy;
            y += 1.0;
        }
    }
}

/// Rasterizes a filled triangle defined by three vertices.
///
/// Converts the triangle into [scanlines][Scanline] and invokes `scanline_fn`
/// for each scanline. The scanlines are guaranteed to cover exactly those
/// pixels whose center point lies inside the triangle and inside the
/// `w` × `h` bounds. For more information on the scanline conversion, see
/// [`scan`].
///
/// Degenerate triangles with zero area produce no scanlines.
pub fn tri_fill<V, F>(
    mut verts: [Varyings<V>; 3],
    dims: (usize, usize),
    mut scanline_fn: F,
) where
    V: Vary,
    F: FnMut(Scanline<V>),
{
    // Sort by y coordinate, start from the top
    verts.sort_by(|a, b| a.0.y().total_cmp(&b.0.y()));
    let [top, mid0, bot] = verts;

    let [top_y, mid_y, bot_y] = [top.0.y(), mid0.0.y(), bot.0.y()];

    // Interpolate a point on the "long" edge at the same y as `mid0`
    let mid1 = top.lerp(&bot, (mid_y - top_y) / (bot_y - top_y));

    let (left, right) = if mid0.0.x() < mid1.0.x() {
        (mid0, mid1)
    } else {
        (mid1, mid0)
    };

    //                       X <--top
    //                     ***
    //                   ******
    //                 ********
    //               ** upper **
    // mid0/left--> X**********X <--right/mid1
    //                ** lower **
    //                   ********
    //                      ******
    //                         ***
    //                            X <--bot

    // The middle chord is the widest horizontal span of the triangle,
    // and dv/dx is constant over the whole triangle; compute it here
    let dx = right.0.x() - left.0.x();
    if dx.is_nan() || dx <= 0.0 {
        return;
    }
    let dv_dx = left.dv_dt(&right, dx.recip());

    // Rasterize the upper half triangle...
    scan(top_y..mid_y, &top..&left, &top..&right, dv_dx, dims)
        .for_each(&mut scanline_fn);

    // ...and the lower half triangle
    scan(mid_y..bot_y, &left..&bot, &right..&bot, dv_dx, dims)
        .for_each(&mut scanline_fn);
}

/// Returns an iterator that emits a scanline for each line from `y0` to `y1`,
/// interpolating varyings from `l0` to `l1` on the left and from `r0` to `r1`
/// on the right side. `dv_dx` is the horizontal rate of change of the
/// varyings.
///
/// The three input ranges define a *trapezoid* with horizontal bases, or, in
/// the special case where `l0 == r0` or `l1 == r1`, a triangle:
/// ```text
///            l0___________ r0
/// y0        _|____________|     .next()
///         _|_______________|    .next()
///       _|__________________|     ...
///      |_____________________|    ...
/// y1   l1                     r1
/// ```
/// Any convex polygon can be converted into scanlines by dividing it into
/// trapezoidal segments and calling this function for each segment.
///
/// The exact pixels that are drawn are determined by whether the vector shape
/// *covers* a pixel or not. A pixel is covered, and drawn, if and only if its
/// center point lies inside the shape. Centers exactly on a left or a top
/// edge count as inside, centers on a right or a bottom edge as outside.
/// This ensures that if two polygons share an edge, or several share a
/// vertex, each pixel at the boundary will be drawn by exactly one of the
/// polygons, with no gaps or overdrawn pixels.
///
/// Lines outside `0..h` and pixels outside `0..w` are not emitted.
pub fn scan<V: Vary>(
    Range { start: y0, end: y1 }: Range<f32>,
    Range { start: l0, end: l1 }: Range<&Varyings<V>>,
    Range { start: r0, end: r1 }: Range<&Varyings<V>>,
    dv_dx: Varyings<V>,
    (w, h): (usize, usize),
) -> ScanlineIter<V> {
    let recip_dy = (y1 - y0).recip();

    // dv/dy for the left edge
    let dl_dy = l0.dv_dt(l1, recip_dy);
    // dv/dy for the right edge
    let dr_dy = r0.dv_dt(r1, recip_dy);

    // Find the y value of the next pixel center (.5) vertically
    //
    // We want to draw exactly those pixels whose center is *covered* by this
    // polygon. Thus if the fractional part of y0 is greater than 0.5, we
    // skip to the next line. Lines above the buffer are skipped entirely.
    //
    //      COVERED               COVERED                NOT COVERED
    //   +-----/-----+           +--------/--+           +-----------+
    //   |    /······|           |       /···|           |     ·     |
    //   |   p·+·····| p.y=0.5   |      p+···| p.y=0.5   |  ·  +  ·  |
    //   |  /········|           |     /·····|           |   p-------- p.y>0.5
    //   +-/---------+           +----/------+           +--/--------+
    //    p.x<0.5                   p.x=0.5               p.x<0.5
    //
    let y0_rounded = round_up_to_half(y0).max(0.5);
    let y1_rounded = round_up_to_half(y1).min(h as f32 + 0.5);

    let y_tweak = y0_rounded - y0;

    // Adjust varyings to correspond to the aligned y value
    let l0 = l0.lerp(&l0.step(&dl_dy), y_tweak);
    let r0 = r0.0.x() + dr_dy.0.x() * y_tweak;

    ScanlineIter {
        y: y0_rounded,
        left: l0.vary(dl_dy, None),
        right: r0.vary(dr_dy.0.x(), None),
        dv_dx,
        x_end: w as f32 + 0.5,
        // Saturates to 0 if negative or NaN
        n: (y1_rounded - y0_rounded) as u32,
    }
}

/// Returns the smallest pixel center coordinate `n + 0.5` such that
/// `n + 0.5 >= x`.
#[inline]
fn round_up_to_half(x: f32) -> f32 {
    0.5 - float::f32::floor(0.5 - x)
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::fmt::Write;

    use crate::assert_approx_eq;
    use crate::math::vec::pt3;
    use crate::util::buf::Buf2;

    use super::*;

    fn fill_count(buf: &mut Buf2<u8>, pts: [ScreenPt; 3]) {
        let dims = (buf.width(), buf.height());
        tri_fill(pts.map(|p| (p, ())), dims, |sl| {
            for x in sl.xs {
                buf[[x, sl.y]] += 1;
            }
        });
    }

    fn to_string(buf: &Buf2<u8>) -> String {
        let mut s = String::new();
        for row in buf.rows() {
            s.push('\n');
            for c in row {
                write!(s, "{c}").ok();
            }
        }
        s
    }

    #[test]
    fn rounding_to_pixel_centers() {
        assert_eq!(round_up_to_half(0.0), 0.5);
        assert_eq!(round_up_to_half(0.5), 0.5);
        assert_eq!(round_up_to_half(0.51), 1.5);
        assert_eq!(round_up_to_half(-0.2), 0.5);
        assert_eq!(round_up_to_half(-0.6), -0.5);
        assert_eq!(round_up_to_half(3.5), 3.5);
    }

    #[test]
    fn shared_edge_should_not_have_gaps_or_overdraw() {
        let mut buf = Buf2::new_default(4, 4);
        let [a, b, c, d] = [
            pt3(0.0, 0.0, 1.0),
            pt3(4.0, 0.0, 1.0),
            pt3(4.0, 4.0, 1.0),
            pt3(0.0, 4.0, 1.0),
        ];
        fill_count(&mut buf, [a, b, d]);
        assert_eq!(
            to_string(&buf),
            "
1110
1100
1000
0000"
        );
        fill_count(&mut buf, [b, c, d]);
        assert_eq!(
            to_string(&buf),
            "
1111
1111
1111
1111"
        );
    }

    #[test]
    fn spans_are_clamped_to_bounds() {
        let mut buf = Buf2::new_default(8, 6);
        fill_count(
            &mut buf,
            [pt3(-10.0, -10.0, 1.0), pt3(30.0, -10.0, 1.0), pt3(-10.0, 30.0, 1.0)],
        );
        assert!(buf.data().iter().all(|&c| c == 1));
    }

    #[test]
    fn triangle_outside_bounds_draws_nothing() {
        let mut buf = Buf2::new_default(8, 8);
        fill_count(
            &mut buf,
            [pt3(-10.0, 2.0, 1.0), pt3(-2.0, 3.0, 1.0), pt3(-5.0, 7.0, 1.0)],
        );
        fill_count(
            &mut buf,
            [pt3(2.0, 9.0, 1.0), pt3(6.0, 12.0, 1.0), pt3(1.0, 15.0, 1.0)],
        );
        assert!(buf.data().iter().all(|&c| c == 0));
    }

    #[test]
    fn spans_right_of_bounds_are_empty_and_in_range() {
        let (w, h) = (8, 8);
        let tris = [
            // Entirely right of the buffer
            [pt3(9.0, 2.0, 1.0), pt3(12.0, 2.0, 1.0), pt3(9.0, 6.0, 1.0)],
            // Straddling the right edge
            [pt3(2.0, 0.5, 1.0), pt3(12.0, 0.5, 1.0), pt3(12.0, 7.5, 1.0)],
            // Straddling the bottom edge
            [pt3(1.0, 4.0, 1.0), pt3(7.0, 4.0, 1.0), pt3(4.0, 20.0, 1.0)],
        ];
        for pts in tris {
            tri_fill(pts.map(|p| (p, ())), (w, h), |sl| {
                assert!(sl.y < h, "{sl:?}");
                assert!(sl.xs.start <= sl.xs.end, "{sl:?}");
                assert!(sl.xs.end <= w, "{sl:?}");
            });
        }
    }

    #[test]
    fn degenerate_triangle_draws_nothing() {
        let mut buf = Buf2::new_default(8, 8);
        fill_count(
            &mut buf,
            [pt3(1.0, 1.0, 1.0), pt3(3.0, 3.0, 1.0), pt3(6.0, 6.0, 1.0)],
        );
        fill_count(
            &mut buf,
            [pt3(1.0, 2.0, 1.0), pt3(5.0, 2.0, 1.0), pt3(7.0, 2.0, 1.0)],
        );
        assert!(buf.data().iter().all(|&c| c == 0));
    }

    #[test]
    fn varyings_are_sampled_at_pixel_centers() {
        let verts = [
            (pt3(0.0, 0.0, 1.0), 0.0f32),
            (pt3(8.0, 0.0, 1.0), 8.0),
            (pt3(0.0, 8.0, 1.0), 0.0),
        ];
        let mut n = 0;
        tri_fill(verts, (8, 8), |sl| {
            for frag in sl.fragments() {
                assert_approx_eq!(frag.var, frag.x as f32 + 0.5);
                assert_eq!(frag.z, 1.0);
                n += 1;
            }
        });
        // The right edge passes exactly through the last pixel center of
        // each line, which is therefore not covered
        assert_eq!(n, 7 + 6 + 5 + 4 + 3 + 2 + 1);
    }

    #[test]
    fn line_horizontal() {
        let mut px = Vec::new();
        line([pt3(0.2, 1.5, 1.0), pt3(5.2, 1.7, 1.0)], (8, 8), |x, y| {
            px.push((x, y))
        });
        assert_eq!(px, [(0, 1), (1, 1), (2, 1), (3, 1), (4, 1)]);
    }

    #[test]
    fn line_is_clipped_to_bounds() {
        let mut px = Vec::new();
        line([pt3(20.0, 20.0, 1.0), pt3(-5.0, -5.0, 1.0)], (8, 8), |x, y| {
            px.push((x, y))
        });
        let expected: Vec<_> = (0..8).map(|i| (i, i)).collect();
        assert_eq!(px, expected);
    }
}
