//! The per-pixel fill routines.
//!
//! These are internal to the rasterization engine: they expect triangles
//! that have already been clipped, projected to screen space, and culled
//! by [`draw_tri`][super::draw_tri], and are not meant to be called
//! directly.
//!
//! Each filler takes three screen-space vertices, whose `z` coordinate
//! holds the reciprocal depth `1/w`, and returns the count of fragments
//! it considered and wrote.

use crate::math::vary::Vary;

use super::raster::{Varyings, line, tri_fill};
use super::stats::Throughput;
use super::target::DrawBuffer;
use super::tex::{Bitmap, TexCoord};

/// A vertex in screen space, carrying its texture coordinate.
pub(crate) type ScreenVert = Varyings<TexCoord>;

/// Draws the edges of a triangle as one-pixel lines in `color`.
///
/// Neither reads nor writes the depth plane.
pub(crate) fn wireframe(
    verts: &[ScreenVert; 3],
    color: u8,
    buf: &mut DrawBuffer,
) -> Throughput {
    let dims = buf.dims();
    let mut io = Throughput::default();
    for i in 0..3 {
        let edge = [verts[i].0, verts[(i + 1) % 3].0];
        line(edge, dims, |x, y| {
            io.i += 1;
            io.o += buf.plot(x, y, color) as usize;
        });
    }
    io
}

/// Fills a triangle with the solid color `color`.
pub(crate) fn flat(
    verts: &[ScreenVert; 3],
    color: u8,
    buf: &mut DrawBuffer,
) -> Throughput {
    let verts = verts.map(|(pos, _)| (pos, ()));
    fill(verts, buf, |_| color)
}

/// Fills a triangle with `tex`, interpolating texture coordinates linearly
/// in screen space.
///
/// Faster than [`perspective_tex`], but the texture appears warped unless
/// the triangle is parallel to the screen.
pub(crate) fn affine_tex(
    verts: &[ScreenVert; 3],
    tex: &Bitmap,
    buf: &mut DrawBuffer,
) -> Throughput {
    fill(*verts, buf, |tc| tex.sample(tc))
}

/// Fills a triangle with `tex`, using perspective-correct texture
/// coordinates.
///
/// `u/w` and `v/w` are linear in screen space, like `1/w`, so those are
/// interpolated and divided by the interpolated `1/w` at each pixel.
pub(crate) fn perspective_tex(
    verts: &[ScreenVert; 3],
    tex: &Bitmap,
    buf: &mut DrawBuffer,
) -> Throughput {
    let verts = verts.map(|(pos, tc)| (pos, (pos.z(), tc * pos.z())));
    fill(verts, buf, |(z, tc_z)| tex.sample(tc_z * z.recip()))
}

/// Scan-converts a triangle into `buf`, calling `shade` with the
/// interpolated varyings of each fragment that passes the depth test.
fn fill<V: Vary>(
    verts: [Varyings<V>; 3],
    buf: &mut DrawBuffer,
    mut shade: impl FnMut(V) -> u8,
) -> Throughput {
    let dims = buf.dims();
    let mut io = Throughput::default();
    tri_fill(verts, dims, |sl| {
        io += buf.write_span(sl, |frag| shade(frag.var));
    });
    io
}
