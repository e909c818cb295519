//! Stepwise linear interpolation of varyings.

use core::mem;

use super::{Lerp, vec::Vec4};

/// A trait for types that can be distributed evenly between two endpoints.
///
/// This trait is designed for *varyings:* values that are interpolated
/// across the face of a triangle while it is scan converted. Where [`Lerp`]
/// computes a single value at a time, `Vary` computes the per-pixel
/// increment once and then advances by repeated addition.
pub trait Vary: Lerp + Copy {
    /// Returns the result of offsetting `self` by `delta`.
    /// For arithmetic types this is simply addition.
    fn step(&self, delta: &Self) -> Self;

    /// Returns the rate of change from `self` to `other`, given the
    /// reciprocal of the distance between them.
    fn dv_dt(&self, other: &Self, recip_dt: f32) -> Self;

    /// Returns an iterator that yields values such that the first value
    /// equals `self`, and each subsequent value is offset by `step` from its
    /// predecessor. If `max` is `Some(n)`, stops after `n` steps, otherwise
    /// the iterator is infinite.
    ///
    /// # Examples
    /// ```
    /// use dosfire_core::math::vary::Vary;
    ///
    /// let mut iter = 0.0f32.vary(0.25, Some(3));
    /// assert_eq!(iter.next(), Some(0.0));
    /// assert_eq!(iter.next(), Some(0.25));
    /// assert_eq!(iter.next(), Some(0.5));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    fn vary(self, step: Self, max: Option<u32>) -> Iter<Self> {
        Iter { val: self, step, n: max }
    }
}

/// Iterator returned by [`Vary::vary`].
#[derive(Copy, Clone, Debug)]
pub struct Iter<T> {
    pub val: T,
    pub step: T,
    pub n: Option<u32>,
}

impl<T: Vary> Iterator for Iter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        match &mut self.n {
            Some(0) => return None,
            Some(n) => *n -= 1,
            None => (),
        }
        let new = self.val.step(&self.step);
        Some(mem::replace(&mut self.val, new))
    }
}

impl Vary for f32 {
    #[inline]
    fn step(&self, delta: &Self) -> Self {
        self + delta
    }
    #[inline]
    fn dv_dt(&self, other: &Self, recip_dt: f32) -> Self {
        (other - self) * recip_dt
    }
}

impl Vary for () {
    fn step(&self, _: &Self) {}
    fn dv_dt(&self, _: &Self, _: f32) {}
}

impl<U: Vary, V: Vary> Vary for (U, V) {
    #[inline]
    fn step(&self, (du, dv): &Self) -> Self {
        (self.0.step(du), self.1.step(dv))
    }
    #[inline]
    fn dv_dt(&self, (u, v): &Self, recip_dt: f32) -> Self {
        (self.0.dv_dt(u, recip_dt), self.1.dv_dt(v, recip_dt))
    }
}

impl Vary for Vec4 {
    #[inline]
    fn step(&self, delta: &Self) -> Self {
        *self + *delta
    }
    #[inline]
    fn dv_dt(&self, other: &Self, recip_dt: f32) -> Self {
        (*other - *self) * recip_dt
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::assert_approx_eq;
    use crate::math::vec::vec4;

    use super::*;

    #[test]
    fn vary_f32() {
        let varying = (-6.0f32).vary(1.2, Some(10));
        assert_approx_eq!(
            varying.collect::<Vec<_>>()[..],
            [-6.0, -4.8, -3.6, -2.4, -1.2, 0.0, 1.2, 2.4, 3.6, 4.8],
            eps = 1e-5
        );
    }

    #[test]
    fn vary_unbounded() {
        let mut varying = 1.0f32.vary(1.0, None);
        assert_eq!(varying.nth(99), Some(100.0));
    }

    #[test]
    fn dv_dt_tuple() {
        let a = (0.0f32, vec4(0.0, 2.0, 4.0, 1.0));
        let b = (4.0f32, vec4(8.0, 2.0, 0.0, 1.0));
        let (d0, d1) = a.dv_dt(&b, 0.25);
        assert_eq!(d0, 1.0);
        assert_eq!(d1, vec4(2.0, 0.0, -1.0, 0.0));
    }
}
