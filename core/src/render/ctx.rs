//! Draw options.

use crate::geom::Winding;

/// Options that control how triangles are drawn into a draw buffer.
///
/// Options are set by the caller between draw calls and only read by the
/// rasterizer. Each option is independent of the others; the one
/// combination that overlaps, wireframe together with a fill mode, is
/// resolved in favor of wireframe.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DrawOpts {
    /// Which faces to discard before filling, if any.
    ///
    /// If all geometry drawn is closed meshes, backfaces can be culled
    /// because they are always hidden behind front faces.
    pub face_cull: FaceCull,

    /// Whether to depth test fragments before writing them.
    ///
    /// Depth testing requires a draw buffer with a depth plane.
    pub depth_func: DepthFunc,

    /// Whether to draw only triangle edges.
    ///
    /// If `true`, edges are drawn in the triangle's flat color with no
    /// depth testing or depth writes, and `fill` is ignored.
    pub wireframe: bool,

    /// How to fill triangle interiors when `wireframe` is `false`.
    pub fill: FillMode,
}

/// Whether to cull backfaces.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FaceCull {
    /// Draw all triangles regardless of winding.
    #[default]
    None,
    /// Discard triangles wound counter-clockwise on screen, as well as
    /// degenerate ones with zero area.
    Back,
}

/// The depth comparison applied to each fragment.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DepthFunc {
    /// Every fragment passes. The depth plane is neither read nor written.
    #[default]
    Always,
    /// A fragment passes if it is closer than the current depth value,
    /// in which case the depth value is updated.
    Less,
}

/// Strategy for filling triangle interiors.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FillMode {
    /// Solid fill with the triangle's flat color.
    Flat,
    /// Texture mapping with texture coordinates interpolated linearly in
    /// screen space. Cheap but distorts triangles viewed at an angle.
    Affine,
    /// Perspective-correct texture mapping.
    #[default]
    Perspective,
}

/// The filler selected for a triangle by [`DrawOpts::draw_mode`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DrawMode {
    /// Edges only, see [`DrawOpts::wireframe`].
    Wireframe,
    /// Solid fill, also used for untextured triangles in textured modes.
    Flat,
    /// Texture mapping per [`FillMode::Affine`].
    AffineTex,
    /// Texture mapping per [`FillMode::Perspective`].
    PerspectiveTex,
}

impl DepthFunc {
    /// Compares the reciprocal depth value `new` to `curr` and returns
    /// whether `new` passes the depth test.
    ///
    /// Reciprocal depth is larger for closer points, so `Less` passes
    /// iff `new > curr`.
    #[inline]
    pub fn test(self, new: f32, curr: f32) -> bool {
        match self {
            Self::Always => true,
            Self::Less => new > curr,
        }
    }
}

impl FaceCull {
    /// Returns whether a triangle with the given signed screen-space area
    /// should be discarded.
    #[inline]
    pub fn culls(self, signed_area: f32) -> bool {
        match self {
            Self::None => false,
            Self::Back => Winding::of(signed_area) == Winding::Ccw,
        }
    }
}

impl DrawOpts {
    /// Returns the filler to use for a triangle, given whether it has a
    /// texture.
    ///
    /// Wireframe takes priority over all fill modes, and textured fill
    /// modes fall back to flat fill for untextured triangles.
    pub fn draw_mode(&self, textured: bool) -> DrawMode {
        match self.fill {
            _ if self.wireframe => DrawMode::Wireframe,
            FillMode::Perspective if textured => DrawMode::PerspectiveTex,
            FillMode::Affine if textured => DrawMode::AffineTex,
            _ => DrawMode::Flat,
        }
    }
}

impl Default for DrawOpts {
    /// Creates draw options with default settings.
    ///
    /// The default values are:
    /// * Face culling:  None
    /// * Depth testing: Always pass
    /// * Wireframe:     Disabled
    /// * Fill mode:     Perspective-correct texturing
    fn default() -> Self {
        Self {
            face_cull: FaceCull::None,
            depth_func: DepthFunc::Always,
            wireframe: false,
            fill: FillMode::Perspective,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_less_prefers_larger_reciprocal() {
        assert!(DepthFunc::Less.test(0.5, 0.25));
        assert!(!DepthFunc::Less.test(0.25, 0.5));
        assert!(!DepthFunc::Less.test(0.5, 0.5));
        assert!(DepthFunc::Always.test(0.0, 1.0));
    }

    #[test]
    fn back_cull_discards_non_positive_area() {
        assert!(!FaceCull::Back.culls(1.0));
        assert!(FaceCull::Back.culls(0.0));
        assert!(FaceCull::Back.culls(-1.0));
        assert!(FaceCull::Back.culls(f32::NAN));
        assert!(!FaceCull::None.culls(-1.0));
    }

    #[test]
    fn wireframe_wins() {
        let opts = DrawOpts { wireframe: true, ..DrawOpts::default() };
        assert_eq!(opts.draw_mode(true), DrawMode::Wireframe);
        assert_eq!(opts.draw_mode(false), DrawMode::Wireframe);
    }

    #[test]
    fn textured_modes_fall_back_to_flat() {
        let mut opts = DrawOpts::default();
        assert_eq!(opts.draw_mode(true), DrawMode::PerspectiveTex);
        assert_eq!(opts.draw_mode(false), DrawMode::Flat);

        opts.fill = FillMode::Affine;
        assert_eq!(opts.draw_mode(true), DrawMode::AffineTex);
        assert_eq!(opts.draw_mode(false), DrawMode::Flat);

        opts.fill = FillMode::Flat;
        assert_eq!(opts.draw_mode(true), DrawMode::Flat);
    }
}
