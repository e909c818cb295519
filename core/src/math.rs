//! Linear algebra and other useful mathematics.
//!
//! Includes homogeneous [vectors][self::vec] and 4×4 [matrices][mat], a
//! floating-point compatibility layer for `no_std` targets, and utilities
//! such as linear interpolation and approximate equality comparisons.
//!
//! Matrices follow the *row vector* convention: a vector is transformed by
//! multiplying it from the left, `v' = v · M`. Consequently a chain of
//! transforms composes left to right, for example
//! ```text
//! model · view · projection
//! ```

pub use {
    approx::ApproxEq,
    mat::{Mat4, scale, translate},
    vary::Vary,
    vec::{Vec4, pt3, vec3, vec4},
};
#[cfg(feature = "fp")]
pub use mat::{look_at, perspective, rotate, rotate_vec};

pub mod approx;
pub mod float;
pub mod mat;
pub mod vary;
pub mod vec;

/// Trait for linear interpolation between two values.
pub trait Lerp: Sized {
    /// Linearly interpolates between `self` and `other`.
    ///
    /// if `t` = 0, returns `self`; if `t` = 1, returns `other`.
    /// For 0 < `t` < 1, returns the weighted average of `self` and `other`
    /// ```text
    /// (1 - t) * self + t * other
    /// ```
    ///
    /// This method does not panic if `t < 0.0` or `t > 1.0`, or if `t`
    /// is `NaN`, but the return value in those cases is unspecified.
    ///
    /// # Examples
    /// ```
    /// use dosfire_core::math::Lerp;
    ///
    /// assert_eq!(f32::lerp(&1.0, &5.0, 0.25), 2.0);
    /// ```
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Returns the (unweighted) average of `self` and `other`.
    fn midpoint(&self, other: &Self) -> Self {
        self.lerp(other, 0.5)
    }
}

/// Linearly interpolates between two values.
///
/// For examples and more information, see [`Lerp::lerp`].
#[inline]
pub fn lerp<T: Lerp>(t: f32, from: T, to: T) -> T {
    from.lerp(&to, t)
}

/// Returns the relative position of `t` between `min` and `max`.
///
/// That is, returns 0 when `t` = `min`, 1 when `t` = `max`, and linearly
/// interpolates in between.
///
/// The result is unspecified if any of the parameters is non-finite, or if
/// `min` = `max`.
///
/// # Examples
/// ```
/// use dosfire_core::math::inv_lerp;
///
/// // Two is one fourth of the way from one to five
/// assert_eq!(inv_lerp(2.0, 1.0, 5.0), 0.25);
/// ```
#[inline]
pub fn inv_lerp(t: f32, min: f32, max: f32) -> f32 {
    (t - min) / (max - min)
}

impl Lerp for f32 {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + t * (other - self)
    }
}

impl Lerp for () {
    fn lerp(&self, _: &Self, _: f32) {}
}

impl<U: Lerp, V: Lerp> Lerp for (U, V) {
    fn lerp(&self, (u, v): &Self, t: f32) -> Self {
        (self.0.lerp(u, t), self.1.lerp(v, t))
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;

    use super::*;

    #[test]
    fn lerp_f32() {
        assert_eq!(2.0f32.lerp(&5.0, 0.0), 2.0);
        assert_eq!(2.0f32.lerp(&5.0, 0.25), 2.75);
        assert_eq!(2.0f32.lerp(&5.0, 0.75), 4.25);
        assert_eq!(2.0f32.lerp(&5.0, 1.0), 5.0);
    }

    #[test]
    fn lerp_tuple() {
        let a = (1.0f32, -2.0f32);
        let b = (3.0, 2.0);
        assert_eq!(a.lerp(&b, 0.5), (2.0, 0.0));
        assert_eq!(a.midpoint(&b), (2.0, 0.0));
    }

    #[test]
    fn inv_lerp_is_inverse_of_lerp() {
        let t = inv_lerp(lerp(0.3, 10.0, 20.0), 10.0, 20.0);
        assert_approx_eq!(t, 0.3);
    }
}
