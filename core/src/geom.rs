//! Basic geometric primitives.

use crate::math::{Lerp, vec::Vec4};
use crate::render::tex::{Bitmap, TexCoord};

/// Vertex with a homogeneous position and a texture coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec4,
    pub uv: TexCoord,
}

/// Triangle, the unit of work of the rasterizer.
///
/// The order of the vertices determines the winding of the triangle on
/// screen, and thus whether it is culled as a backface. If `texture` is
/// `None`, or the triangle is drawn in flat or wireframe mode, it is drawn
/// in the palette index `color`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tri<'t> {
    pub verts: [Vertex; 3],
    pub color: u8,
    pub texture: Option<&'t Bitmap>,
}

/// Polygon winding order, as seen on screen.
///
/// The triangle *ABC* below has clockwise winding, while
/// the triangle *DEF* has counter-clockwise winding.
///
/// ```text
///     B            F
///    / \          / \
///   /   \        /   \
///  /     \      /     \
/// A-------C    D-------E
///    Cw           Ccw
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Winding {
    /// Clockwise winding. Front-facing.
    #[default]
    Cw,
    /// Counter-clockwise winding. Back-facing.
    Ccw,
}

/// Creates a `Vertex` with the given position and texture coordinate.
#[inline]
pub const fn vertex(pos: Vec4, uv: TexCoord) -> Vertex {
    Vertex { pos, uv }
}

impl<'t> Tri<'t> {
    /// Creates an untextured triangle with the given color.
    pub const fn flat(verts: [Vertex; 3], color: u8) -> Self {
        Self { verts, color, texture: None }
    }

    /// Creates a textured triangle. `color` is used when the triangle is
    /// drawn in flat or wireframe mode.
    pub const fn textured(
        verts: [Vertex; 3],
        color: u8,
        texture: &'t Bitmap,
    ) -> Self {
        Self { verts, color, texture: Some(texture) }
    }

    /// Returns `self` with the first and last vertex swapped,
    /// reversing its winding.
    pub fn flipped(self) -> Self {
        let [a, b, c] = self.verts;
        Self { verts: [c, b, a], ..self }
    }
}

impl Lerp for Vertex {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        vertex(self.pos.lerp(&other.pos, t), self.uv.lerp(&other.uv, t))
    }
}

impl Winding {
    /// Returns the winding of a triangle with the given signed area.
    ///
    /// Degenerate triangles with zero or NaN area count as counter-clockwise.
    #[inline]
    pub fn of(signed_area: f32) -> Self {
        if signed_area > 0.0 { Self::Cw } else { Self::Ccw }
    }
}

/// Returns the signed area of the screen-space triangle `abc`.
///
/// Screen y coordinates grow downwards, so the area is positive if the
/// triangle is wound clockwise as seen on screen, negative if wound
/// counter-clockwise, and zero if the points are collinear.
///
/// # Examples
/// ```
/// use dosfire_core::geom::signed_area;
///
/// // Clockwise on screen: right, then down
/// assert_eq!(signed_area([[0.0, 0.0], [4.0, 0.0], [4.0, 2.0]]), 4.0);
/// assert_eq!(signed_area([[0.0, 0.0], [4.0, 2.0], [4.0, 0.0]]), -4.0);
/// ```
#[inline]
pub fn signed_area([a, b, c]: [[f32; 2]; 3]) -> f32 {
    let (abx, aby) = (b[0] - a[0], b[1] - a[1]);
    let (acx, acy) = (c[0] - a[0], c[1] - a[1]);
    (abx * acy - aby * acx) / 2.0
}

/// Returns an iterator over the vertices of all the triangles in `tris`.
///
/// Useful for applying the same transform to every vertex of a mesh:
/// ```
/// use dosfire_core::prelude::*;
///
/// let v = vertex(pt3(1.0, 0.0, 0.0), uv(0.0, 0.0));
/// let mut tris = [Tri::flat([v; 3], 1), Tri::flat([v; 3], 2)];
///
/// let m = translate(vec3(0.0, 2.0, 0.0));
/// for v in verts_mut(&mut tris) {
///     v.pos = m.apply(&v.pos);
/// }
/// assert_eq!(tris[1].verts[2].pos, pt3(1.0, 2.0, 0.0));
/// ```
pub fn verts_mut<'a, 't: 'a, I>(tris: I) -> impl Iterator<Item = &'a mut Vertex>
where
    I: IntoIterator<Item = &'a mut Tri<'t>>,
{
    tris.into_iter().flat_map(|tri| tri.verts.iter_mut())
}
