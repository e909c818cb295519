//! Indexed-color palettes.
//!
//! Draw buffers and bitmaps store 8-bit palette indices, never colors. A
//! [`Palette`] maps each index to an RGB triple when an image is presented
//! on screen or written to a file. The rasterizer itself never reads one.

use core::array;
use core::fmt::{self, Debug, Formatter};
use core::ops::{Index, IndexMut};

/// An RGB color with eight bits per channel.
pub type Rgb = [u8; 3];

/// A table of 256 RGB colors.
#[derive(Clone, Eq, PartialEq)]
pub struct Palette(pub [Rgb; 256]);

impl Palette {
    /// Returns a palette with the given colors.
    pub const fn new(colors: [Rgb; 256]) -> Self {
        Self(colors)
    }

    /// Returns a palette where each index `i` maps to the gray `(i, i, i)`.
    ///
    /// Useful for visualizing depth or other scalar values.
    pub fn grayscale() -> Self {
        Self(array::from_fn(|i| [i as u8; 3]))
    }

    /// Returns the 3-3-2 color cube palette.
    ///
    /// Bits 7–5 of an index select the red level, bits 4–2 green, and
    /// bits 1–0 blue, each scaled to the full 0–255 range.
    pub fn rgb332() -> Self {
        Self(array::from_fn(|i| {
            let (r, g, b) = (i >> 5, (i >> 2) & 0b111, i & 0b11);
            [(r * 255 / 7) as u8, (g * 255 / 7) as u8, (b * 255 / 3) as u8]
        }))
    }

    /// Returns a palette decoded from the VGA DAC format: consecutive RGB
    /// triples with six significant bits per channel.
    ///
    /// Entries past the end of `bytes` are black. Extra bytes are ignored.
    pub fn from_vga_bytes(bytes: &[u8]) -> Self {
        let mut res = Self([[0; 3]; 256]);
        for (entry, rgb) in res.0.iter_mut().zip(bytes.chunks_exact(3)) {
            // Replicate the top bits so that 63 maps to 255
            *entry = array::from_fn(|i| {
                let c = rgb[i] & 0x3F;
                (c << 2) | (c >> 4)
            });
        }
        res
    }

    /// Returns the color at `index` packed as `0xAARRGGBB`, with full alpha.
    #[inline]
    pub fn to_argb(&self, index: u8) -> u32 {
        let [r, g, b] = self.0[index as usize];
        u32::from_be_bytes([0xFF, r, g, b])
    }

    /// Returns the index of the palette color closest to `rgb`, measured
    /// by squared Euclidean distance. Ties go to the lowest index.
    pub fn closest(&self, rgb: Rgb) -> u8 {
        let dist = |c: &Rgb| -> u32 {
            (0..3)
                .map(|i| (c[i] as i32 - rgb[i] as i32).pow(2) as u32)
                .sum()
        };
        let mut best = (u32::MAX, 0);
        for (i, c) in self.0.iter().enumerate() {
            let d = dist(c);
            if d < best.0 {
                best = (d, i as u8);
            }
        }
        best.1
    }
}

impl Default for Palette {
    /// Returns the [3-3-2 color cube][Self::rgb332] palette.
    fn default() -> Self {
        Self::rgb332()
    }
}

impl Debug for Palette {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Palette")
            .field("0", &self.0[0])
            .field("255", &self.0[255])
            .finish_non_exhaustive()
    }
}

impl Index<u8> for Palette {
    type Output = Rgb;
    #[inline]
    fn index(&self, i: u8) -> &Rgb {
        &self.0[i as usize]
    }
}

impl IndexMut<u8> for Palette {
    #[inline]
    fn index_mut(&mut self, i: u8) -> &mut Rgb {
        &mut self.0[i as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb332_extremes() {
        let pal = Palette::default();
        assert_eq!(pal[0x00], [0, 0, 0]);
        assert_eq!(pal[0xFF], [255, 255, 255]);
        assert_eq!(pal[0b111_000_00], [255, 0, 0]);
        assert_eq!(pal[0b000_111_00], [0, 255, 0]);
        assert_eq!(pal[0b000_000_11], [0, 0, 255]);
    }

    #[test]
    fn grayscale() {
        let pal = Palette::grayscale();
        assert_eq!(pal[0x80], [0x80; 3]);
        assert_eq!(pal.to_argb(0x80), 0xFF80_8080);
    }

    #[test]
    fn vga_bytes_are_scaled_to_eight_bits() {
        let pal = Palette::from_vga_bytes(&[63, 0, 32, 1, 2, 3]);
        assert_eq!(pal[0], [255, 0, 130]);
        assert_eq!(pal[1], [4, 8, 12]);
        assert_eq!(pal[2], [0, 0, 0]);
    }

    #[test]
    fn closest_color() {
        let pal = Palette::default();
        assert_eq!(pal.closest([250, 10, 5]), 0b111_000_00);
        assert_eq!(pal.closest([0, 0, 0]), 0);

        let mut pal = Palette::grayscale();
        pal[200] = [255, 0, 0];
        assert_eq!(pal.closest([240, 20, 0]), 200);
    }
}
