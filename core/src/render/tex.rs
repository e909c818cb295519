//! Textures and texture sampling.

use core::ops::{Add, Mul, Sub};

use crate::math::{ApproxEq, Lerp, Vary};
use crate::util::{buf::Buf2, palette::Palette};

/// Texture coordinates `(u, v)`.
///
/// Coordinates are normalized: `(0, 0)` is the top-left corner of a bitmap
/// and `(1, 1)` the bottom-right corner, regardless of its size.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TexCoord(pub [f32; 2]);

/// Returns a texture coordinate pair.
#[inline]
pub const fn uv(u: f32, v: f32) -> TexCoord {
    TexCoord([u, v])
}

impl TexCoord {
    #[inline]
    pub const fn u(&self) -> f32 {
        self.0[0]
    }
    #[inline]
    pub const fn v(&self) -> f32 {
        self.0[1]
    }
}

impl Add for TexCoord {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        uv(self.u() + rhs.u(), self.v() + rhs.v())
    }
}

impl Sub for TexCoord {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        uv(self.u() - rhs.u(), self.v() - rhs.v())
    }
}

impl Mul<f32> for TexCoord {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        uv(self.u() * rhs, self.v() * rhs)
    }
}

impl Lerp for TexCoord {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

impl Vary for TexCoord {
    #[inline]
    fn step(&self, delta: &Self) -> Self {
        *self + *delta
    }
    #[inline]
    fn dv_dt(&self, other: &Self, recip_dt: f32) -> Self {
        (*other - *self) * recip_dt
    }
}

impl ApproxEq<Self, f32> for TexCoord {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, rel_eps)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

/// An indexed-color image, usable as a texture.
///
/// Pixels are palette indices stored in row-major order, top row first.
/// A bitmap may carry the palette it was authored with, but sampling only
/// ever returns indices.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    pixels: Buf2<u8>,
    palette: Option<Palette>,
}

impl Bitmap {
    /// Returns a bitmap with the given pixels and no palette.
    ///
    /// # Panics
    /// If `pixels` is empty.
    #[track_caller]
    pub fn new(pixels: Buf2<u8>) -> Self {
        assert!(!pixels.is_empty(), "bitmap must not be empty");
        Self { pixels, palette: None }
    }

    /// Returns a `w` × `h` bitmap whose pixel at `(x, y)` is `f(x, y)`.
    ///
    /// # Panics
    /// If `w` or `h` is zero.
    pub fn from_fn(w: usize, h: usize, f: impl FnMut(usize, usize) -> u8) -> Self {
        Self::new(Buf2::new_with(w, h, f))
    }

    /// Returns a `w` × `h` checkerboard of `cell` × `cell` pixel squares,
    /// alternating between the colors `a` and `b`, starting with `a` in the
    /// top-left corner.
    ///
    /// # Examples
    /// ```
    /// use dosfire_core::render::tex::Bitmap;
    ///
    /// let bmp = Bitmap::checker(4, 4, 2, [1, 2]);
    /// assert_eq!(bmp.texel(1, 1), 1);
    /// assert_eq!(bmp.texel(2, 1), 2);
    /// ```
    pub fn checker(w: usize, h: usize, cell: usize, [a, b]: [u8; 2]) -> Self {
        let cell = cell.max(1);
        Self::from_fn(w, h, |x, y| {
            if (x / cell + y / cell) % 2 == 0 { a } else { b }
        })
    }

    /// Attaches `palette` to `self`.
    pub fn with_palette(self, palette: Palette) -> Self {
        Self { palette: Some(palette), ..self }
    }

    /// Returns the width of `self` in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.width()
    }
    /// Returns the height of `self` in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.height()
    }
    /// Returns the pixel data of `self`.
    pub fn pixels(&self) -> &Buf2<u8> {
        &self.pixels
    }
    /// Returns the palette attached to `self`, if any.
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Returns the palette index at pixel `(x, y)`.
    ///
    /// # Panics
    /// If `(x, y)` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn texel(&self, x: usize, y: usize) -> u8 {
        self.pixels[[x, y]]
    }

    /// Returns the texel nearest to the normalized coordinates `tc`.
    ///
    /// Coordinates outside the `[0, 1]` range are clamped to the edges of
    /// the bitmap. `NaN` coordinates sample the top or left edge.
    #[inline]
    pub fn sample(&self, tc: TexCoord) -> u8 {
        let (w, h) = (self.width(), self.height());
        // Float-to-int casts saturate, and truncation equals floor here
        let x = (tc.u() * w as f32).clamp(0.0, (w - 1) as f32) as usize;
        let y = (tc.v() * h as f32).clamp(0.0, (h - 1) as f32) as usize;
        self.texel(x, y)
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;

    use super::*;

    #[rustfmt::skip]
    fn bmp() -> Bitmap {
        Bitmap::new(Buf2::new(2, 2, [
            1, 2,
            3, 4,
        ]))
    }

    #[test]
    fn sample_nearest() {
        let bmp = bmp();
        assert_eq!(bmp.sample(uv(0.0, 0.0)), 1);
        assert_eq!(bmp.sample(uv(0.5, 0.0)), 2);
        assert_eq!(bmp.sample(uv(0.0, 0.5)), 3);
        assert_eq!(bmp.sample(uv(0.99, 0.99)), 4);
    }

    #[test]
    fn sample_clamps_to_edges() {
        let bmp = bmp();
        assert_eq!(bmp.sample(uv(-1.0, 0.0)), 1);
        assert_eq!(bmp.sample(uv(0.0, -1.0)), 1);
        assert_eq!(bmp.sample(uv(1.0, 0.0)), 2);
        assert_eq!(bmp.sample(uv(0.0, 1.5)), 3);
        assert_eq!(bmp.sample(uv(1.5, 1.5)), 4);
        assert_eq!(bmp.sample(uv(f32::NAN, f32::NAN)), 1);
    }

    #[test]
    fn checker_pattern() {
        let bmp = Bitmap::checker(4, 2, 1, [7, 9]);
        assert_eq!(bmp.pixels().data(), &[7, 9, 7, 9, 9, 7, 9, 7]);
    }

    #[test]
    fn palette_attached() {
        let bmp = bmp();
        assert!(bmp.palette().is_none());
        let bmp = bmp.with_palette(Palette::grayscale());
        assert_eq!(bmp.palette().map(|p| p[3]), Some([3, 3, 3]));
    }

    #[test]
    fn texcoord_vary() {
        let a = uv(0.0, 1.0);
        let b = uv(1.0, 0.0);
        assert_approx_eq!(a.lerp(&b, 0.25), uv(0.25, 0.75));
        assert_eq!(a.dv_dt(&b, 0.5), uv(0.5, -0.5));
    }

    #[test]
    #[should_panic = "bitmap must not be empty"]
    fn empty_bitmap() {
        let _ = Bitmap::new(Buf2::new_default(0, 4));
    }
}
