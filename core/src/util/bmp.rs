//! Windows BMP file format support.
//!
//! Only uncompressed 8-bit palettized images are supported, the format
//! paint programs of the VGA era saved indexed-color images in. Both
//! bottom-up (the default) and top-down row orders are accepted.

use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};
#[cfg(feature = "std")]
use std::{fs, io, path::Path};

use log::debug;

use Error::*;

use crate::render::tex::Bitmap;
use crate::util::buf::Buf2;
use crate::util::palette::Palette;

/// Size of the file header preceding the info header.
const FILE_HEADER_LEN: usize = 14;
/// Size of the smallest supported info header, `BITMAPINFOHEADER`.
const INFO_HEADER_LEN: usize = 40;

/// Error during loading or decoding a BMP file.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// An I/O error occurred.
    #[cfg(feature = "std")]
    Io(io::ErrorKind),
    /// The file does not start with the `BM` magic number.
    InvalidMagic([u8; 2]),
    /// Unsupported bit depth, compression, or info header version.
    Unsupported(&'static str),
    /// Unexpected end of input while decoding.
    UnexpectedEnd,
    /// Zero or otherwise invalid image dimensions.
    InvalidDims(i32, i32),
}

/// Result of loading or decoding a BMP file.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "error decoding bmp image: {self:?}")
    }
}

#[cfg(feature = "std")]
impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Io(e.kind())
    }
}

/// The fields of the file and info headers needed for decoding.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Header {
    data_offset: usize,
    info_len: usize,
    width: usize,
    height: usize,
    top_down: bool,
    colors: usize,
}

impl Header {
    fn parse(src: &[u8]) -> Result<Self> {
        let magic = [byte(src, 0)?, byte(src, 1)?];
        if &magic != b"BM" {
            return Err(InvalidMagic(magic));
        }
        let data_offset = u32_at(src, 10)? as usize;
        let info_len = u32_at(src, 14)? as usize;
        if info_len < INFO_HEADER_LEN {
            return Err(Unsupported("info header version"));
        }
        let w = u32_at(src, 18)? as i32;
        let h = u32_at(src, 22)? as i32;
        if w <= 0 || h == 0 || h == i32::MIN {
            return Err(InvalidDims(w, h));
        }
        if u16_at(src, 28)? != 8 {
            return Err(Unsupported("bit depth"));
        }
        if u32_at(src, 30)? != 0 {
            return Err(Unsupported("compression"));
        }
        let colors = match u32_at(src, 46)? {
            0 => 256,
            n @ 1..=256 => n as usize,
            _ => return Err(Unsupported("palette size")),
        };
        Ok(Self {
            data_offset,
            info_len,
            width: w as usize,
            height: h.unsigned_abs() as usize,
            top_down: h < 0,
            colors,
        })
    }

    /// Returns the length of a row of pixel data, padded to four bytes.
    fn stride(&self) -> usize {
        self.width.next_multiple_of(4)
    }
}

/// Loads an 8-bit palettized BMP image from a path.
///
/// # Errors
/// Returns [`bmp::Error`][Error] in case of an I/O error or an invalid or
/// unsupported BMP image.
#[cfg(feature = "std")]
pub fn load_bmp(path: impl AsRef<Path>) -> Result<Bitmap> {
    parse_bmp(&fs::read(path)?)
}

/// Decodes an 8-bit palettized BMP image from bytes.
///
/// The returned bitmap carries the palette of the image. Palette entries
/// not present in the file are black.
///
/// # Errors
/// Returns [`bmp::Error`][Error] in case of an invalid or unsupported
/// BMP image.
pub fn parse_bmp(src: &[u8]) -> Result<Bitmap> {
    let hdr = Header::parse(src)?;
    debug!("decoding bmp: {hdr:?}");

    let pal_start = FILE_HEADER_LEN + hdr.info_len;
    let pal_bytes = src
        .get(pal_start..pal_start + 4 * hdr.colors)
        .ok_or(UnexpectedEnd)?;
    let mut palette = Palette::new([[0; 3]; 256]);
    for (i, bgrx) in pal_bytes.chunks_exact(4).enumerate() {
        palette.0[i] = [bgrx[2], bgrx[1], bgrx[0]];
    }

    let stride = hdr.stride();
    let len = stride.checked_mul(hdr.height).ok_or(UnexpectedEnd)?;
    let data = src
        .get(hdr.data_offset..)
        .and_then(|d| d.get(..len))
        .ok_or(UnexpectedEnd)?;

    let mut rows: Vec<&[u8]> = data
        .chunks_exact(stride)
        .map(|row| &row[..hdr.width])
        .collect();
    if !hdr.top_down {
        rows.reverse();
    }
    let pixels = Buf2::new(hdr.width, hdr.height, rows.concat());
    Ok(Bitmap::new(pixels).with_palette(palette))
}

fn byte(src: &[u8], i: usize) -> Result<u8> {
    src.get(i).copied().ok_or(UnexpectedEnd)
}

fn u16_at(src: &[u8], i: usize) -> Result<u16> {
    let bytes = src.get(i..i + 2).ok_or(UnexpectedEnd)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn u32_at(src: &[u8], i: usize) -> Result<u32> {
    let bytes = src.get(i..i + 4).ok_or(UnexpectedEnd)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    /// Encodes a minimal 8-bit BMP with a two-color palette.
    fn encode(w: i32, h: i32, rows: &[&[u8]]) -> Vec<u8> {
        let stride = (w as usize).next_multiple_of(4);
        let offset = FILE_HEADER_LEN + INFO_HEADER_LEN + 2 * 4;
        let mut out = vec![];
        out.extend(b"BM");
        out.extend(((offset + stride * rows.len()) as u32).to_le_bytes());
        out.extend([0; 4]);
        out.extend((offset as u32).to_le_bytes());

        out.extend((INFO_HEADER_LEN as u32).to_le_bytes());
        out.extend(w.to_le_bytes());
        out.extend(h.to_le_bytes());
        out.extend(1u16.to_le_bytes());
        out.extend(8u16.to_le_bytes());
        out.extend([0; 4]); // compression
        out.extend([0; 4]); // image size
        out.extend([0; 8]); // resolution
        out.extend(2u32.to_le_bytes()); // colors used
        out.extend([0; 4]); // important colors

        // Blue-green-red-reserved
        out.extend([0x00, 0x00, 0xFF, 0x00]);
        out.extend([0xFF, 0x80, 0x00, 0x00]);

        for row in rows {
            out.extend(*row);
            out.extend(vec![0; stride - row.len()]);
        }
        out
    }

    #[test]
    fn bottom_up_rows() {
        let bmp = parse_bmp(&encode(3, 2, &[&[1, 1, 1], &[0, 1, 0]])).unwrap();
        assert_eq!(bmp.width(), 3);
        assert_eq!(bmp.height(), 2);
        // The last row in the file is the top row of the image
        assert_eq!(bmp.pixels()[0], [0, 1, 0]);
        assert_eq!(bmp.pixels()[1], [1, 1, 1]);
    }

    #[test]
    fn top_down_rows() {
        let bmp = parse_bmp(&encode(3, -2, &[&[1, 1, 1], &[0, 1, 0]])).unwrap();
        assert_eq!(bmp.pixels()[0], [1, 1, 1]);
        assert_eq!(bmp.pixels()[1], [0, 1, 0]);
    }

    #[test]
    fn palette_is_rgb() {
        let bmp = parse_bmp(&encode(1, 1, &[&[0]])).unwrap();
        let pal = bmp.palette().unwrap();
        assert_eq!(pal[0], [0xFF, 0x00, 0x00]);
        assert_eq!(pal[1], [0x00, 0x80, 0xFF]);
        assert_eq!(pal[2], [0x00, 0x00, 0x00]);
    }

    #[test]
    fn invalid_magic() {
        let mut data = encode(1, 1, &[&[0]]);
        data[0] = b'X';
        assert_eq!(parse_bmp(&data), Err(InvalidMagic(*b"XM")));
    }

    #[test]
    fn unsupported_bit_depth() {
        let mut data = encode(1, 1, &[&[0]]);
        data[28] = 24;
        assert_eq!(parse_bmp(&data), Err(Unsupported("bit depth")));
    }

    #[test]
    fn zero_width() {
        let data = encode(0, 1, &[]);
        assert_eq!(parse_bmp(&data), Err(InvalidDims(0, 1)));
    }

    #[test]
    fn truncated_pixel_data() {
        let mut data = encode(4, 2, &[&[1, 1, 1, 1], &[0, 0, 0, 0]]);
        data.truncate(data.len() - 1);
        assert_eq!(parse_bmp(&data), Err(UnexpectedEnd));
        assert_eq!(parse_bmp(b"BM"), Err(UnexpectedEnd));
    }
}
