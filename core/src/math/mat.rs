//! Matrices and linear transforms.
//!
//! A [`Mat4`] transforms row vectors: `v' = v · M`. Translations are stored
//! in the bottom row, and `a.then(&b)` is the transform that first applies
//! `a` and then `b`, which equals the matrix product `a · b`.

use core::fmt::{self, Debug, Formatter};
use core::ops::{Mul, Range};

use super::{ApproxEq, vec::Vec4};
#[cfg(feature = "fp")]
use super::{float, vec::vec3};

/// A 4×4 matrix of `f32`s, in row-major order.
#[derive(Copy, Clone, PartialEq)]
#[repr(transparent)]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Mat4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    /// Returns the identity matrix.
    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Returns row `i` of `self` as a vector.
    #[inline]
    pub fn row(&self, i: usize) -> Vec4 {
        Vec4(self.0[i])
    }

    /// Returns column `i` of `self` as a vector.
    #[inline]
    pub fn col(&self, i: usize) -> Vec4 {
        let m = &self.0;
        Vec4([m[0][i], m[1][i], m[2][i], m[3][i]])
    }

    /// Returns the matrix product `self · other`.
    ///
    /// With row vectors this is the transform that applies `self` first
    /// and `other` second. See also [`then`][Self::then].
    pub fn mul(&self, other: &Self) -> Self {
        Self(core::array::from_fn(|i| {
            core::array::from_fn(|j| self.row(i).dot(&other.col(j)))
        }))
    }

    /// Returns the composite transform that first applies `self`, then
    /// `other`.
    ///
    /// # Examples
    /// ```
    /// use dosfire_core::math::{mat::*, vec::*};
    ///
    /// let m = scale(2.0, 2.0, 2.0).then(&translate(vec3(1.0, 0.0, 0.0)));
    /// assert_eq!(m.apply(&pt3(1.0, 1.0, 1.0)), pt3(3.0, 2.0, 2.0));
    /// ```
    #[inline]
    pub fn then(&self, other: &Self) -> Self {
        self.mul(other)
    }

    /// Transforms the vector `v` by `self`, returning `v · self`.
    #[inline]
    pub fn apply(&self, v: &Vec4) -> Vec4 {
        let [x, y, z, w] = v.0;
        self.row(0) * x + self.row(1) * y + self.row(2) * z + self.row(3) * w
    }

    /// Returns the transpose of `self`.
    pub fn transpose(&self) -> Self {
        Self(core::array::from_fn(|i| self.col(i).0))
    }
}

impl Default for Mat4 {
    /// Returns the identity matrix.
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Mat4::mul(&self, &rhs)
    }
}

impl Debug for Mat4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mat4[")?;
        for row in &self.0 {
            writeln!(f, "  {row:>8.3?}")?;
        }
        write!(f, "]")
    }
}

impl ApproxEq<Self, f32> for Mat4 {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &f32) -> bool {
        (0..4).all(|i| self.row(i).approx_eq_eps(&other.row(i), rel_eps))
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

/// Returns a matrix that translates by `v`. The `w` component of `v` is
/// ignored.
pub const fn translate(v: Vec4) -> Mat4 {
    let [x, y, z, _] = v.0;
    Mat4([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [x, y, z, 1.0],
    ])
}

/// Returns a matrix that scales the x, y, and z axes by the given factors.
pub const fn scale(sx: f32, sy: f32, sz: f32) -> Mat4 {
    Mat4([
        [sx, 0.0, 0.0, 0.0],
        [0.0, sy, 0.0, 0.0],
        [0.0, 0.0, sz, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Returns a matrix that rotates `angle` radians about `axis`.
///
/// The rotation is counter-clockwise when looking from the tip of `axis`
/// towards the origin. `axis` need not be normalized but must be nonzero.
#[cfg(feature = "fp")]
pub fn rotate(axis: Vec4, angle: f32) -> Mat4 {
    let [x, y, z, _] = axis.normalize().0;
    let (s, c) = (float::f32::sin(angle), float::f32::cos(angle));
    let t = 1.0 - c;
    Mat4([
        [t * x * x + c, t * x * y + s * z, t * x * z - s * y, 0.0],
        [t * x * y - s * z, t * y * y + c, t * y * z + s * x, 0.0],
        [t * x * z + s * y, t * y * z - s * x, t * z * z + c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Rotates the vector `v` by `angle` radians about `axis`.
///
/// Demos use this to animate geometry in place, one vertex at a time.
#[cfg(feature = "fp")]
pub fn rotate_vec(v: Vec4, axis: Vec4, angle: f32) -> Vec4 {
    rotate(axis, angle).apply(&v)
}

/// Returns a perspective projection matrix.
///
/// The camera looks towards negative z. `fov_y` is the vertical angle of
/// view in radians, `aspect` the width-to-height ratio of the viewport, and
/// `near..far` the depth range mapped to `-1..1` in normalized device
/// coordinates. The `w` component of a projected point equals its distance
/// in front of the camera.
///
/// Positive view-space y maps to *negative* NDC y because draw buffer rows
/// are numbered from the top down.
///
/// # Panics
/// If `near` is not positive or `far <= near`.
#[cfg(feature = "fp")]
pub fn perspective(fov_y: f32, aspect: f32, Range { start: n, end: f }: Range<f32>) -> Mat4 {
    assert!(n > 0.0, "near must be positive, was {n}");
    assert!(f > n, "far must be greater than near, was {n}..{f}");

    let cot = 1.0 / float::f32::tan(fov_y / 2.0);
    let d = n - f;
    Mat4([
        [cot / aspect, 0.0, 0.0, 0.0],
        [0.0, -cot, 0.0, 0.0],
        [0.0, 0.0, (f + n) / d, -1.0],
        [0.0, 0.0, 2.0 * f * n / d, 0.0],
    ])
}

/// Returns a view matrix for a camera at `pos` looking at the point
/// `target`, with `up` giving the approximate up direction.
///
/// After the transform the camera sits at the origin looking towards
/// negative z, with positive y up and positive x to the right.
#[cfg(feature = "fp")]
pub fn look_at(pos: Vec4, target: Vec4, up: Vec4) -> Mat4 {
    let pos = vec3(pos.x(), pos.y(), pos.z());
    let fwd = (target - pos).normalize();
    let fwd = vec3(fwd.x(), fwd.y(), fwd.z());
    let right = fwd.cross(&up).normalize();
    let up = right.cross(&fwd);
    Mat4([
        [right.x(), up.x(), -fwd.x(), 0.0],
        [right.y(), up.y(), -fwd.y(), 0.0],
        [right.z(), up.z(), -fwd.z(), 0.0],
        [-right.dot3(&pos), -up.dot3(&pos), fwd.dot3(&pos), 1.0],
    ])
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::vec::{pt3, vec3, vec4};

    use super::*;

    #[test]
    fn identity_apply() {
        let v = vec4(1.0, -2.0, 3.0, 1.0);
        assert_eq!(Mat4::IDENTITY.apply(&v), v);
    }

    #[test]
    fn translate_moves_points_not_directions() {
        let m = translate(vec3(1.0, 2.0, 3.0));
        assert_eq!(m.apply(&pt3(0.0, 0.0, 0.0)), pt3(1.0, 2.0, 3.0));
        assert_eq!(m.apply(&vec3(1.0, 0.0, 0.0)), vec3(1.0, 0.0, 0.0));
    }

    #[test]
    fn composition_order() {
        let t = translate(vec3(1.0, 0.0, 0.0));
        let s = scale(2.0, 2.0, 2.0);
        let p = pt3(1.0, 0.0, 0.0);

        assert_eq!(t.then(&s).apply(&p), pt3(4.0, 0.0, 0.0));
        assert_eq!(s.then(&t).apply(&p), pt3(3.0, 0.0, 0.0));
        assert_eq!(t * s, t.then(&s));
    }

    #[test]
    fn transpose_twice_is_identity() {
        let m = translate(vec3(1.0, 2.0, 3.0)).then(&scale(2.0, 3.0, 4.0));
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose().col(3), m.row(3));
    }

    #[cfg(feature = "fp")]
    #[test]
    fn rotate_z_quarter_turn() {
        use core::f32::consts::FRAC_PI_2;
        let m = rotate(vec3(0.0, 0.0, 1.0), FRAC_PI_2);
        assert_approx_eq!(
            m.apply(&vec3(1.0, 0.0, 0.0)),
            vec3(0.0, 1.0, 0.0),
            eps = 1e-5
        );
        assert_approx_eq!(
            rotate_vec(vec3(0.0, 1.0, 0.0), vec3(0.0, 0.0, 2.0), FRAC_PI_2),
            vec3(-1.0, 0.0, 0.0),
            eps = 1e-5
        );
    }

    #[cfg(feature = "fp")]
    #[test]
    fn perspective_depth_range() {
        let m = perspective(1.0, 1.0, 0.5..100.0);

        let near = m.apply(&pt3(0.0, 0.0, -0.5));
        assert_approx_eq!(near.w(), 0.5);
        assert_approx_eq!(near.z() / near.w(), -1.0, eps = 1e-5);

        let far = m.apply(&pt3(0.0, 0.0, -100.0));
        assert_approx_eq!(far.w(), 100.0);
        assert_approx_eq!(far.z() / far.w(), 1.0, eps = 1e-5);
    }

    #[cfg(feature = "fp")]
    #[test]
    fn perspective_flips_y() {
        let m = perspective(1.0, 1.0, 0.5..100.0);
        let up = m.apply(&pt3(0.0, 1.0, -2.0));
        assert!(up.y() < 0.0);
    }

    #[cfg(feature = "fp")]
    #[test]
    fn look_at_moves_target_in_front() {
        let view = look_at(
            pt3(0.0, 0.0, 60.0),
            pt3(0.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        );
        assert_approx_eq!(
            view.apply(&pt3(0.0, 0.0, 0.0)),
            pt3(0.0, 0.0, -60.0),
            eps = 1e-5
        );
        assert_approx_eq!(
            view.apply(&pt3(1.0, 2.0, 60.0)),
            pt3(1.0, 2.0, 0.0),
            eps = 1e-5
        );
    }
}
