//! Homogeneous four-component vectors.
//!
//! The same type is used for points (`w` = 1), direction vectors (`w` = 0),
//! and clip-space coordinates (arbitrary `w`). After a perspective projection
//! the `w` component carries the view-space depth used for the perspective
//! divide.

use core::fmt::{self, Debug, Formatter};
use core::ops::{Add, AddAssign, Index, Mul, Neg, Sub};

use super::{ApproxEq, Lerp, float};

/// A four-component homogeneous vector `(x, y, z, w)`.
#[derive(Copy, Clone, Default, PartialEq)]
#[repr(transparent)]
pub struct Vec4(pub [f32; 4]);

/// Returns a vector with the given components.
#[inline]
pub const fn vec4(x: f32, y: f32, z: f32, w: f32) -> Vec4 {
    Vec4([x, y, z, w])
}

/// Returns a point with the given coordinates, that is, a vector with
/// `w` set to 1.
#[inline]
pub const fn pt3(x: f32, y: f32, z: f32) -> Vec4 {
    vec4(x, y, z, 1.0)
}

/// Returns a direction vector with the given components, that is, a vector
/// with `w` set to 0. Directions are unaffected by translations.
#[inline]
pub const fn vec3(x: f32, y: f32, z: f32) -> Vec4 {
    vec4(x, y, z, 0.0)
}

impl Vec4 {
    /// The zero vector.
    pub const ZERO: Self = vec4(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn x(&self) -> f32 {
        self.0[0]
    }
    #[inline]
    pub const fn y(&self) -> f32 {
        self.0[1]
    }
    #[inline]
    pub const fn z(&self) -> f32 {
        self.0[2]
    }
    #[inline]
    pub const fn w(&self) -> f32 {
        self.0[3]
    }

    /// Returns the four-dimensional dot product of `self` and `other`.
    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        let [a, b, c, d] = self.0;
        let [e, f, g, h] = other.0;
        a * e + b * f + c * g + d * h
    }

    /// Returns the dot product of the `xyz` parts of `self` and `other`.
    #[inline]
    pub fn dot3(&self, other: &Self) -> f32 {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z()
    }

    /// Returns the cross product of the `xyz` parts of `self` and `other`.
    /// The `w` component of the result is zero.
    pub fn cross(&self, other: &Self) -> Self {
        let [a, b, c, _] = self.0;
        let [d, e, f, _] = other.0;
        vec3(b * f - c * e, c * d - a * f, a * e - b * d)
    }

    /// Returns the Euclidean length of the `xyz` part of `self`.
    #[inline]
    pub fn len(&self) -> f32 {
        float::f32::sqrt(self.dot3(self))
    }

    /// Returns `self` with its `xyz` part scaled to unit length.
    /// The `w` component is preserved.
    ///
    /// The result is unspecified if the `xyz` part of `self` is zero.
    pub fn normalize(&self) -> Self {
        let r = self.len().recip();
        vec4(self.x() * r, self.y() * r, self.z() * r, self.w())
    }

    /// Returns `self` with `x`, `y`, and `z` divided by `w`, and `w`
    /// replaced by its reciprocal.
    ///
    /// This is the perspective divide: the result holds normalized device
    /// coordinates and the reciprocal depth value `1/w` that varies linearly
    /// in screen space.
    #[inline]
    pub fn project(&self) -> Self {
        let rw = self.w().recip();
        vec4(self.x() * rw, self.y() * rw, self.z() * rw, rw)
    }
}

impl Debug for Vec4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Vec4{:?}", self.0)
    }
}

impl From<[f32; 4]> for Vec4 {
    #[inline]
    fn from(els: [f32; 4]) -> Self {
        Self(els)
    }
}

impl Index<usize> for Vec4 {
    type Output = f32;
    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.0[i]
    }
}

impl Add for Vec4 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl AddAssign for Vec4 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec4 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl Mul<f32> for Vec4 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self(self.0.map(|a| a * rhs))
    }
}

impl Neg for Vec4 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0.map(|a| -a))
    }
}

impl Lerp for Vec4 {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

impl ApproxEq<Self, f32> for Vec4 {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, rel_eps)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;

    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(pt3(1.0, 2.0, 3.0).0, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(vec3(1.0, 2.0, 3.0).0, [1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn arithmetic() {
        let a = vec4(1.0, 2.0, 3.0, 4.0);
        let b = vec4(-1.0, 0.5, 0.0, 1.0);
        assert_eq!(a + b, vec4(0.0, 2.5, 3.0, 5.0));
        assert_eq!(a - b, vec4(2.0, 1.5, 3.0, 3.0));
        assert_eq!(a * 2.0, vec4(2.0, 4.0, 6.0, 8.0));
        assert_eq!(-a, vec4(-1.0, -2.0, -3.0, -4.0));
        assert_eq!(a.dot(&b), 1.0 * -1.0 + 2.0 * 0.5 + 4.0);
    }

    #[test]
    fn cross_product_is_right_handed() {
        let x = vec3(1.0, 0.0, 0.0);
        let y = vec3(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), vec3(0.0, 0.0, 1.0));
        assert_eq!(y.cross(&x), vec3(0.0, 0.0, -1.0));
    }

    #[test]
    fn normalize_preserves_w() {
        let v = vec4(3.0, 0.0, 4.0, 1.0).normalize();
        assert_approx_eq!(v, vec4(0.6, 0.0, 0.8, 1.0), eps = 1e-4);
    }

    #[test]
    fn project_divides_by_w() {
        let v = vec4(2.0, -4.0, 1.0, 2.0).project();
        assert_eq!(v, vec4(1.0, -2.0, 0.5, 0.5));
    }

    #[test]
    fn lerp_vec4() {
        let a = pt3(0.0, 0.0, 0.0);
        let b = pt3(2.0, 4.0, -2.0);
        assert_eq!(a.lerp(&b, 0.5), pt3(1.0, 2.0, -1.0));
    }
}
