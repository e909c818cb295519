//! Turning 3D geometry into raster images.
//!
//! This module constitutes the rasterization engine of `dosfire`. It
//! contains code for [clipping][clip], [texturing][tex], [rasterizing][raster],
//! and [outputting][target] triangles, tied together by [`draw_tri`].
//!
//! A triangle passes through the following stages:
//! 1. Its vertices are transformed to clip space by a model-view-projection
//!    matrix.
//! 2. It is clipped against the near plane, resulting in zero to two
//!    triangles.
//! 3. Each resulting triangle is divided by `w` and mapped to the pixel
//!    coordinates of the target buffer.
//! 4. It is optionally culled if facing away from the viewer.
//! 5. It is filled with exactly one of the fill routines, as chosen by
//!    [`DrawOpts::draw_mode`][ctx::DrawOpts::draw_mode].

use log::trace;

use crate::geom::{Tri, signed_area, vertex};
use crate::math::{mat::Mat4, vec::vec4};

use clip::clip_near;
use ctx::{DepthFunc, DrawMode};
use fill::ScreenVert;
use target::DrawBuffer;

pub mod cam;
pub mod clip;
pub mod ctx;
pub(crate) mod fill;
pub mod raster;
pub mod stats;
pub mod target;
pub mod tex;
pub mod text;

/// Draws a triangle into `buf`.
///
/// Transforms the vertices of `tri` by `mvp`, then clips, projects, culls,
/// and fills the result according to `buf.opts`. Triangles that are entirely
/// behind the camera, outside the buffer, culled, or degenerate draw no
/// pixels. Updates the statistics in `buf.stats`.
///
/// # Panics
/// If `buf.opts.depth_func` is [`DepthFunc::Less`] and `buf` has no depth
/// plane.
///
/// # Examples
/// ```
/// use dosfire_core::prelude::*;
///
/// let mut buf = DrawBuffer::new(8, 8, Planes::COLOR);
/// let tri = Tri::flat(
///     [
///         vertex(pt3(-1.0, -1.0, 0.0), uv(0.0, 0.0)),
///         vertex(pt3(1.0, -1.0, 0.0), uv(1.0, 0.0)),
///         vertex(pt3(-1.0, 1.0, 0.0), uv(0.0, 1.0)),
///     ],
///     5,
/// );
/// draw_tri(&tri, &Mat4::identity(), &mut buf);
///
/// assert_eq!(buf.pixel(0, 0), 5);
/// assert_eq!(buf.pixel(7, 7), 0);
/// ```
#[track_caller]
pub fn draw_tri(tri: &Tri, mvp: &Mat4, buf: &mut DrawBuffer) {
    let opts = buf.opts;
    if opts.depth_func == DepthFunc::Less && !buf.has_depth() {
        target::missing_depth_plane();
    }
    buf.stats.calls += 1;
    buf.stats.tris.i += 1;

    let clip_verts = tri.verts.map(|v| vertex(mvp.apply(&v.pos), v.uv));
    let clipped = clip_near(clip_verts);
    trace!("near clip: {} triangle(s) out", clipped.as_slice().len());

    let (w, h) = buf.dims();
    let (half_w, half_h) = (w as f32 / 2.0, h as f32 / 2.0);
    let mode = opts.draw_mode(tri.texture.is_some());

    for verts in clipped.as_slice() {
        let verts: [ScreenVert; 3] = verts.map(|v| {
            // Perspective divide; w becomes 1/w
            let ndc = v.pos.project();
            let x = ndc.x() * half_w + half_w;
            let y = ndc.y() * half_h + half_h;
            (vec4(x, y, ndc.w(), 1.0), v.uv)
        });

        let area = signed_area(verts.map(|(p, _)| [p.x(), p.y()]));
        if opts.face_cull.culls(area) {
            trace!("culled, signed area {area}");
            continue;
        }
        buf.stats.tris.o += 1;

        let io = match (mode, tri.texture) {
            (DrawMode::Wireframe, _) => fill::wireframe(&verts, tri.color, buf),
            (DrawMode::PerspectiveTex, Some(tex)) => {
                fill::perspective_tex(&verts, tex, buf)
            }
            (DrawMode::AffineTex, Some(tex)) => {
                fill::affine_tex(&verts, tex, buf)
            }
            _ => fill::flat(&verts, tri.color, buf),
        };
        buf.stats.frags += io;
    }
}

/// Draws each triangle in `tris` into `buf` with the same `mvp` matrix.
///
/// Equivalent to calling [`draw_tri`] for each triangle in turn.
pub fn draw_tris<'a, 't: 'a>(
    tris: impl IntoIterator<Item = &'a Tri<'t>>,
    mvp: &Mat4,
    buf: &mut DrawBuffer,
) {
    for tri in tris {
        draw_tri(tri, mvp, buf);
    }
}

#[cfg(test)]
mod tests {
    use crate::geom::Vertex;
    use crate::math::vec::vec4;
    use crate::render::{ctx::FaceCull, stats::Throughput, target::Planes};
    use crate::render::tex::uv;

    use super::*;

    fn v(x: f32, y: f32, w: f32) -> Vertex {
        vertex(vec4(x * w, y * w, 0.0, w), uv(0.0, 0.0))
    }

    fn count(buf: &DrawBuffer, c: u8) -> usize {
        buf.color().data().iter().filter(|&&p| p == c).count()
    }

    #[test]
    fn two_tris_cover_screen_exactly_once() {
        let mut buf = DrawBuffer::new(8, 8, Planes::COLOR);
        let m = Mat4::identity();
        let upper = Tri::flat([v(-1.0, -1.0, 1.0), v(1.0, -1.0, 1.0), v(1.0, 1.0, 1.0)], 1);
        let lower = Tri::flat([v(-1.0, -1.0, 1.0), v(1.0, 1.0, 1.0), v(-1.0, 1.0, 1.0)], 2);

        draw_tris([&upper, &lower], &m, &mut buf);

        assert_eq!(count(&buf, 1) + count(&buf, 2), 64);
        assert_eq!(buf.stats.frags, Throughput { i: 64, o: 64 });
        assert_eq!(buf.stats.tris, Throughput { i: 2, o: 2 });
        assert_eq!(buf.stats.calls, 2);
    }

    #[test]
    fn tri_behind_camera_draws_nothing() {
        let mut buf = DrawBuffer::new(8, 8, Planes::COLOR);
        let tri = Tri::flat([v(-1.0, -1.0, -1.0), v(1.0, -1.0, -2.0), v(1.0, 1.0, -1.0)], 1);

        draw_tri(&tri, &Mat4::identity(), &mut buf);

        assert_eq!(count(&buf, 0), 64);
        assert_eq!(buf.stats.tris, Throughput { i: 1, o: 0 });
    }

    #[test]
    fn near_clipped_tri_fills_two() {
        let mut buf = DrawBuffer::new(8, 8, Planes::COLOR);
        let tri = Tri::flat(
            [
                vertex(vec4(-0.5, -0.5, 0.0, 1.0), uv(0.0, 0.0)),
                vertex(vec4(0.5, -0.5, 0.0, 1.0), uv(1.0, 0.0)),
                vertex(vec4(0.0, 0.5, 0.0, -1.0), uv(0.0, 1.0)),
            ],
            3,
        );
        draw_tri(&tri, &Mat4::identity(), &mut buf);
        assert_eq!(buf.stats.tris, Throughput { i: 1, o: 2 });
    }

    #[test]
    fn backface_culling() {
        let tri = Tri::flat([v(-1.0, -1.0, 1.0), v(1.0, -1.0, 1.0), v(1.0, 1.0, 1.0)], 1);
        let mut buf = DrawBuffer::new(8, 8, Planes::COLOR);
        buf.opts.face_cull = FaceCull::Back;

        draw_tri(&tri, &Mat4::identity(), &mut buf);
        assert_eq!(buf.stats.tris.o, 1);

        buf.clear(Planes::COLOR);
        draw_tri(&tri.flipped(), &Mat4::identity(), &mut buf);
        assert_eq!(buf.stats.tris.o, 1);
        assert_eq!(count(&buf, 1), 0);
    }

    #[test]
    #[should_panic = "depth testing requires a draw buffer with a depth plane"]
    fn depth_test_without_depth_plane() {
        let mut buf = DrawBuffer::new(8, 8, Planes::COLOR);
        buf.opts.depth_func = DepthFunc::Less;
        let tri = Tri::flat([v(-1.0, -1.0, 1.0), v(1.0, -1.0, 1.0), v(1.0, 1.0, 1.0)], 1);
        draw_tri(&tri, &Mat4::identity(), &mut buf);
    }
}
