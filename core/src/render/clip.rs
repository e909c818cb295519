//! Clipping triangles against the near plane.
//!
//! Vertices with a homogeneous `w` coordinate below [`W_NEAR`] are behind,
//! or too close to, the camera, and the perspective divide would either
//! flip them to the wrong side of the screen or blow them up to infinity.
//! Triangles with such vertices are trimmed so that only the part in front
//! of the near plane remains.
//!
//! Clipping against the other sides of the view frustum is not needed: the
//! rasterizer scissors every span to the bounds of the draw buffer.
//!
//! ```text
//!                 C
//!                / \            behind
//!  -------------Q---P------------ w = W_NEAR
//!              /     \
//!             A-------B         in front
//! ```
//! Here the clipped polygon is the quadrilateral *ABPQ*, which is returned
//! split into the two triangles *ABP* and *APQ*.

use core::slice;

use crate::geom::Vertex;
use crate::math::Lerp;

/// The `w` coordinate of the near plane.
pub const W_NEAR: f32 = 0.01;

/// The result of clipping a triangle against the near plane.
///
/// Every vertex in the output has `w >= W_NEAR`, and every output triangle
/// has the same winding as the input.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Clipped {
    /// The triangle was entirely behind the near plane.
    Hidden,
    /// The triangle was entirely in front of the near plane.
    Whole([Vertex; 3]),
    /// Two vertices were behind the near plane. The remaining part is
    /// a smaller triangle.
    Trimmed([Vertex; 3]),
    /// One vertex was behind the near plane. The remaining part is
    /// a quadrilateral, returned as two triangles sharing an edge.
    Split([[Vertex; 3]; 2]),
}

impl Clipped {
    /// Returns the zero to two visible triangles as a slice.
    pub fn as_slice(&self) -> &[[Vertex; 3]] {
        match self {
            Self::Hidden => &[],
            Self::Whole(tri) | Self::Trimmed(tri) => slice::from_ref(tri),
            Self::Split(tris) => tris,
        }
    }

    /// Returns whether nothing is left of the triangle.
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }
}

/// Returns whether `v` is in front of the near plane.
///
/// Vertices with a `NaN` `w` coordinate are never in front.
#[inline]
pub fn is_inside(v: &Vertex) -> bool {
    v.pos.w() >= W_NEAR
}

/// Clips the triangle `verts` against the near plane.
///
/// # Examples
/// ```
/// use dosfire_core::prelude::*;
/// use dosfire_core::render::clip::{clip_near, Clipped};
///
/// let v = |w| vertex(vec4(0.0, 0.0, 0.0, w), uv(0.0, 0.0));
///
/// assert!(matches!(clip_near([v(1.0), v(2.0), v(3.0)]), Clipped::Whole(_)));
/// assert!(matches!(clip_near([v(1.0), v(2.0), v(-3.0)]), Clipped::Split(_)));
/// assert!(matches!(clip_near([v(1.0), v(-2.0), v(-3.0)]), Clipped::Trimmed(_)));
/// assert!(matches!(clip_near([v(-1.0), v(-2.0), v(-3.0)]), Clipped::Hidden));
/// ```
pub fn clip_near(verts: [Vertex; 3]) -> Clipped {
    let inside = verts.each_ref().map(is_inside);
    match inside.iter().filter(|&&b| b).count() {
        0 => return Clipped::Hidden,
        3 => return Clipped::Whole(verts),
        _ => {}
    }

    // Sutherland–Hodgman against a single plane. A triangle with one or
    // two vertices inside yields a polygon of four or three vertices.
    let mut out = [Vertex::default(); 4];
    let mut n = 0;
    for i in 0..3 {
        let j = (i + 1) % 3;
        if inside[i] {
            out[n] = verts[i];
            n += 1;
        }
        if inside[i] != inside[j] {
            out[n] = intersect(&verts[i], &verts[j]);
            n += 1;
        }
    }

    let [a, b, c, d] = out;
    if n == 3 {
        Clipped::Trimmed([a, b, c])
    } else {
        // Fan from the first vertex, preserving the winding
        Clipped::Split([[a, b, c], [a, c, d]])
    }
}

/// Returns the point where the edge `ab` crosses the near plane.
///
/// Exactly one of `a` and `b` must be inside.
fn intersect(a: &Vertex, b: &Vertex) -> Vertex {
    let (wa, wb) = (a.pos.w(), b.pos.w());
    let t = (W_NEAR - wa) / (wb - wa);
    let mut v = a.lerp(b, t);
    // Snap away any rounding error
    v.pos.0[3] = W_NEAR;
    v
}
