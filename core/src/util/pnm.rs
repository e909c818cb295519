//! Netpbm (PNM) image support.
//!
//! Netpbm images are a short text header followed by pixel data, either
//! as decimal text or raw bytes. Reading supports these variants:
//!
//! Magic | Pixels
//! ----- | ------
//! P3    | RGB, decimal text
//! P4    | 1-bit monochrome, packed bits
//! P5    | 8-bit grayscale, raw bytes
//! P6    | 8-bit RGB, raw bytes
//!
//! Decoded colors are quantized to a palette. Writing produces P6 images,
//! looking up the color of each index in a palette, which makes it handy
//! for saving screenshots of a draw buffer.

use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};
#[cfg(feature = "std")]
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use Error::*;

use crate::render::tex::Bitmap;
use crate::util::buf::Buf2;
use crate::util::palette::{Palette, Rgb};

/// Error during loading or decoding a PNM file.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// An I/O error occurred.
    #[cfg(feature = "std")]
    Io(io::ErrorKind),
    /// Unsupported magic number or sample depth.
    Unsupported([u8; 2]),
    /// Unexpected end of input while decoding.
    UnexpectedEnd,
    /// A malformed or out-of-range number in the header or text pixels.
    InvalidNumber,
    /// The image has zero width or height.
    Empty,
}

/// Result of loading or decoding a PNM file.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "std")]
            Io(kind) => write!(f, "i/o error reading pnm image: {kind}"),
            Unsupported([a, b]) => write!(
                f,
                "unsupported pnm variant {}{}",
                char::from(*a),
                char::from(*b)
            ),
            UnexpectedEnd => f.write_str("unexpected end of pnm data"),
            InvalidNumber => f.write_str("invalid number in pnm data"),
            Empty => f.write_str("pnm image has zero width or height"),
        }
    }
}

#[cfg(feature = "std")]
impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Io(e.kind())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Kind {
    TextRgb,
    Bits,
    Gray,
    Rgb,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Header {
    kind: Kind,
    width: usize,
    height: usize,
    max: u32,
}

/// Reads header fields and text samples from a byte slice.
struct Cursor<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    /// Skips whitespace and `#` comments running to the end of the line.
    fn skip_blank(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'#' {
                while self.peek().is_some_and(|b| b != b'\n') {
                    self.pos += 1;
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Parses an unsigned decimal number after optional blanks.
    fn number(&mut self) -> Result<u32> {
        self.skip_blank();
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits = &self.src[start..self.pos];
        if digits.is_empty() {
            return Err(if self.peek().is_none() {
                UnexpectedEnd
            } else {
                InvalidNumber
            });
        }
        digits.iter().try_fold(0u32, |n, &d| {
            n.checked_mul(10)
                .and_then(|n| n.checked_add(u32::from(d - b'0')))
                .ok_or(InvalidNumber)
        })
    }

    /// Returns the bytes after the single whitespace byte that ends a
    /// header followed by raw pixel data.
    fn raw_data(&mut self) -> Result<&'a [u8]> {
        match self.peek() {
            Some(b) if b.is_ascii_whitespace() => Ok(&self.src[self.pos + 1..]),
            Some(_) => Err(InvalidNumber),
            None => Err(UnexpectedEnd),
        }
    }
}

impl Header {
    fn parse(cur: &mut Cursor) -> Result<Self> {
        let magic = match cur.src {
            [a, b, ..] => [*a, *b],
            _ => return Err(UnexpectedEnd),
        };
        let kind = match &magic {
            b"P3" => Kind::TextRgb,
            b"P4" => Kind::Bits,
            b"P5" => Kind::Gray,
            b"P6" => Kind::Rgb,
            _ => return Err(Unsupported(magic)),
        };
        cur.pos = 2;
        let width = cur.number()? as usize;
        let height = cur.number()? as usize;
        let max = match kind {
            Kind::Bits => 1,
            _ => cur.number()?,
        };
        if width == 0 || height == 0 {
            return Err(Empty);
        }
        if max == 0 || max > u32::from(u16::MAX) {
            return Err(InvalidNumber);
        }
        // Raw samples wider than a byte are not supported
        if max > 255 && matches!(kind, Kind::Gray | Kind::Rgb) {
            return Err(Unsupported(magic));
        }
        Ok(Self { kind, width, height, max })
    }
}

/// Loads a PNM image from a path, quantizing each pixel to the closest
/// color in `palette`.
///
/// # Errors
/// Returns [`pnm::Error`][Error] in case of an I/O error or an invalid or
/// unsupported PNM image.
#[cfg(feature = "std")]
pub fn load_pnm(path: impl AsRef<Path>, palette: &Palette) -> Result<Bitmap> {
    read_pnm(&fs::read(path)?, palette)
}

/// Decodes a PNM image from bytes, quantizing each pixel to the closest
/// color in `palette`.
///
/// The returned bitmap carries a copy of `palette`.
///
/// # Errors
/// Returns [`pnm::Error`][Error] in case of an invalid or unsupported PNM
/// image.
pub fn read_pnm(src: &[u8], palette: &Palette) -> Result<Bitmap> {
    let cur = &mut Cursor::new(src);
    let Header { kind, width, height, max } = Header::parse(cur)?;
    let count = width.checked_mul(height).ok_or(InvalidNumber)?;

    // From 0..=max to 0..=255
    let scale = |c: u32| (c.min(max) * 255 / max) as u8;

    let colors: Vec<Rgb> = match kind {
        Kind::TextRgb => {
            let mut colors = Vec::new();
            for _ in 0..count {
                let rgb = [cur.number()?, cur.number()?, cur.number()?];
                colors.push(rgb.map(scale));
            }
            colors
        }
        Kind::Rgb => cur
            .raw_data()?
            .chunks_exact(3)
            .take(count)
            .map(|c| [c[0], c[1], c[2]].map(|c| scale(c.into())))
            .collect(),
        Kind::Gray => cur
            .raw_data()?
            .iter()
            .take(count)
            .map(|&c| [scale(c.into()); 3])
            .collect(),
        Kind::Bits => {
            // Each row starts at a byte boundary; a set bit is black
            let row_len = width.div_ceil(8);
            cur.raw_data()?
                .chunks_exact(row_len)
                .take(height)
                .flat_map(|row| {
                    (0..width).map(move |x| (row[x / 8] >> (7 - x % 8)) & 1)
                })
                .map(|bit| [if bit == 1 { 0 } else { 0xFF }; 3])
                .collect()
        }
    };
    if colors.len() < count {
        return Err(UnexpectedEnd);
    }
    let pixels = Buf2::new(width, height, colors.into_iter().map(|c| palette.closest(c)));
    Ok(Bitmap::new(pixels).with_palette(palette.clone()))
}

/// Saves an indexed image to a file as a binary RGB (P6) PPM image,
/// looking up the color of each pixel in `palette`.
///
/// Overwrites the file if it already exists.
///
/// # Errors
/// Returns [`std::io::Error`] if the file could not be created or written.
#[cfg(feature = "std")]
pub fn save_ppm(
    path: impl AsRef<Path>,
    pixels: &Buf2<u8>,
    palette: &Palette,
) -> io::Result<()> {
    write_ppm(BufWriter::new(File::create(path)?), pixels, palette)
}

/// Writes an indexed image to `out` as a binary RGB (P6) PPM image,
/// looking up the color of each pixel in `palette`.
///
/// # Errors
/// Returns [`std::io::Error`] if writing fails.
#[cfg(feature = "std")]
pub fn write_ppm(
    mut out: impl Write,
    pixels: &Buf2<u8>,
    palette: &Palette,
) -> io::Result<()> {
    writeln!(out, "P6 {} {} 255", pixels.width(), pixels.height())?;
    let mut rgb = Vec::with_capacity(3 * pixels.width());
    for row in pixels.rows() {
        rgb.clear();
        rgb.extend(row.iter().flat_map(|&i| palette[i]));
        out.write_all(&rgb)?;
    }
    out.flush()
}
