//! Testing and asserting approximate equality.

use core::iter::zip;

/// Trait for testing approximate equality.
///
/// Rasterization is full of rounding: vertices are transformed, divided by
/// `w`, and interpolated across the screen, and the results rarely compare
/// equal to the "exact" value even when the math is right. Two values are
/// considered approximately equal if their absolute difference is less than
/// some small epsilon *relative* to the magnitude of the values.
pub trait ApproxEq<Other: ?Sized = Self, Epsilon = Self> {
    /// Returns whether `self` and `other` are approximately equal.
    /// Uses the epsilon returned by [`Self::relative_epsilon`].
    fn approx_eq(&self, other: &Other) -> bool {
        self.approx_eq_eps(other, &Self::relative_epsilon())
    }

    /// Returns whether `self` and `other` are approximately equal,
    /// using the relative epsilon `rel_eps`.
    fn approx_eq_eps(&self, other: &Other, rel_eps: &Epsilon) -> bool;

    /// Returns the default relative epsilon of type `E`.
    fn relative_epsilon() -> Epsilon;
}

impl ApproxEq for f32 {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &Self) -> bool {
        use super::float::f32;
        let diff = f32::abs(self - other);
        diff <= *rel_eps * f32::abs(*self).max(1.0)
    }

    fn relative_epsilon() -> Self {
        if cfg!(any(feature = "std", feature = "libm")) {
            1e-6
        } else {
            1e-4
        }
    }
}

impl<E, T: Sized + ApproxEq<T, E>> ApproxEq<Self, E> for [T] {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        self.len() == other.len()
            && zip(self, other).all(|(s, o)| s.approx_eq_eps(o, rel_eps))
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

impl<E, T: Sized + ApproxEq<T, E>, const N: usize> ApproxEq<Self, E>
    for [T; N]
{
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        self.as_slice().approx_eq_eps(other, rel_eps)
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

/// Asserts that two values are approximately equal.
/// Requires that the left operand has an applicable [`ApproxEq`] impl
/// and that both operands impl `Debug` unless a custom message is given.
///
/// # Panics
///
/// If the given values are not approximately equal.
///
/// # Examples
/// `assert_eq` would fail, but `assert_approx_eq` passes:
/// ```
/// # use dosfire_core::assert_approx_eq;
/// assert_ne!(0.1f32 + 0.2, 0.3);
/// assert_approx_eq!(0.1f32 + 0.2, 0.3);
/// ```
/// A custom epsilon can be given:
/// ```
/// # use dosfire_core::assert_approx_eq;
/// assert_approx_eq!(100.0f32, 101.0, eps = 0.01);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr) => {
        match (&$a, &$b) {
            (a, b) => $crate::assert_approx_eq!(
                *a, *b,
                "assertion failed: `{a:?} ≅ {b:?}`"
            )
        }
    };
    ($a:expr, $b:expr, eps = $eps:literal) => {
        match (&$a, &$b) {
            (a, b) => $crate::assert_approx_eq!(
                *a, *b, eps = $eps,
                "assertion failed: `{a:?} ≅ {b:?}`"
            )
        }
    };
    ($a:expr, $b:expr, $fmt:literal $(, $args:expr)*) => {{
        use $crate::math::approx::ApproxEq;
        match (&$a, &$b) {
            (a, b) => assert!(ApproxEq::approx_eq(a, b), $fmt $(, $args)*)
        }
    }};
    ($a:expr, $b:expr, eps = $eps:literal, $fmt:literal $(, $args:expr)*) => {{
        use $crate::math::approx::ApproxEq;
        match (&$a, &$b) {
            (a, b) => assert!(
                ApproxEq::approx_eq_eps(a, b, &$eps),
                $fmt $(, $args)*
            )
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;

    #[test]
    fn approx_eq_zero() {
        assert_approx_eq!(0.0f32, 0.0);
        assert_approx_eq!(-0.0f32, 0.0);
    }

    #[test]
    fn approx_eq_relative() {
        assert_approx_eq!(1.0f32, 1.0000001);
        assert_approx_eq!(1.0e10f32, 1.0000001e10);
        assert_approx_eq!(-1.0f32, -1.0000001);
    }

    #[test]
    fn approx_eq_custom_epsilon() {
        assert_approx_eq!(0.0f32, 0.001, eps = 0.01);
        assert_approx_eq!(100.0f32, 99.9, eps = 0.01);
    }

    #[test]
    fn approx_eq_arrays() {
        assert_approx_eq!([1.0f32, 2.0], [1.0000001, 2.0]);
    }

    #[test]
    #[should_panic]
    fn zero_not_approx_eq_to_one() {
        assert_approx_eq!(0.0f32, 1.0);
    }

    #[test]
    #[should_panic]
    fn nan_not_approx_eq_to_nan() {
        assert_approx_eq!(f32::NAN, f32::NAN);
    }
}
