//! Bitmap text drawn straight into the color plane of a draw buffer.
//!
//! A [`Font`] is an atlas of fixed-size glyph cells laid out in a grid,
//! one cell per character code. Text is written through a [`TextCursor`],
//! which implements [`fmt::Write`] so that `write!` works as usual:
//! ```
//! use core::fmt::Write;
//! use dosfire_core::prelude::*;
//! use dosfire_core::render::text::Font;
//!
//! let font = Font::small();
//! let mut buf = DrawBuffer::new(64, 8, Planes::COLOR);
//! write!(buf.text(&font, 1, 1, 15), "FPS: {}", 70).unwrap();
//!
//! assert!(buf.color().data().contains(&15));
//! ```

use core::fmt;

use crate::util::buf::Buf2;

use super::target::DrawBuffer;

/// A monospaced bitmap font.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    atlas: Buf2<u8>,
    glyph_w: usize,
    glyph_h: usize,
}

/// Writes text into a draw buffer, advancing one glyph cell per character.
///
/// Only the ink pixels of each glyph are written, in a single palette
/// index; the background shows through. Pixels outside the buffer are
/// skipped. A `'\n'` moves the cursor to the start of the next line.
#[derive(Debug)]
pub struct TextCursor<'a> {
    buf: &'a mut DrawBuffer,
    font: &'a Font,
    color: u8,
    left: usize,
    x: usize,
    y: usize,
}

/// Glyphs of [`Font::small`], three pixels wide and five tall, one row
/// per byte with the leftmost pixel in bit 2.
const SMALL_GLYPHS: [(u8, [u8; 5]); 52] = [
    (b'A', [0b111, 0b101, 0b111, 0b101, 0b101]),
    (b'B', [0b110, 0b101, 0b110, 0b101, 0b110]),
    (b'C', [0b111, 0b100, 0b100, 0b100, 0b111]),
    (b'D', [0b110, 0b101, 0b101, 0b101, 0b110]),
    (b'E', [0b111, 0b100, 0b110, 0b100, 0b111]),
    (b'F', [0b111, 0b100, 0b110, 0b100, 0b100]),
    (b'G', [0b111, 0b100, 0b101, 0b101, 0b111]),
    (b'H', [0b101, 0b101, 0b111, 0b101, 0b101]),
    (b'I', [0b111, 0b010, 0b010, 0b010, 0b111]),
    (b'J', [0b001, 0b001, 0b001, 0b101, 0b010]),
    (b'K', [0b101, 0b101, 0b110, 0b101, 0b101]),
    (b'L', [0b100, 0b100, 0b100, 0b100, 0b111]),
    (b'M', [0b101, 0b111, 0b111, 0b101, 0b101]),
    (b'N', [0b110, 0b101, 0b101, 0b101, 0b101]),
    (b'O', [0b111, 0b101, 0b101, 0b101, 0b111]),
    (b'P', [0b111, 0b101, 0b111, 0b100, 0b100]),
    (b'Q', [0b111, 0b101, 0b101, 0b111, 0b001]),
    (b'R', [0b111, 0b101, 0b110, 0b101, 0b101]),
    (b'S', [0b111, 0b100, 0b111, 0b001, 0b111]),
    (b'T', [0b111, 0b010, 0b010, 0b010, 0b010]),
    (b'U', [0b101, 0b101, 0b101, 0b101, 0b111]),
    (b'V', [0b101, 0b101, 0b101, 0b101, 0b010]),
    (b'W', [0b101, 0b101, 0b111, 0b111, 0b101]),
    (b'X', [0b101, 0b101, 0b010, 0b101, 0b101]),
    (b'Y', [0b101, 0b101, 0b010, 0b010, 0b010]),
    (b'Z', [0b111, 0b001, 0b010, 0b100, 0b111]),
    (b'0', [0b111, 0b101, 0b101, 0b101, 0b111]),
    (b'1', [0b010, 0b110, 0b010, 0b010, 0b111]),
    (b'2', [0b111, 0b001, 0b111, 0b100, 0b111]),
    (b'3', [0b111, 0b001, 0b111, 0b001, 0b111]),
    (b'4', [0b101, 0b101, 0b111, 0b001, 0b001]),
    (b'5', [0b111, 0b100, 0b111, 0b001, 0b111]),
    (b'6', [0b111, 0b100, 0b111, 0b101, 0b111]),
    (b'7', [0b111, 0b001, 0b001, 0b001, 0b001]),
    (b'8', [0b111, 0b101, 0b111, 0b101, 0b111]),
    (b'9', [0b111, 0b101, 0b111, 0b001, 0b111]),
    (b' ', [0b000, 0b000, 0b000, 0b000, 0b000]),
    (b':', [0b000, 0b010, 0b000, 0b010, 0b000]),
    (b'.', [0b000, 0b000, 0b000, 0b000, 0b010]),
    (b',', [0b000, 0b000, 0b000, 0b010, 0b100]),
    (b'!', [0b010, 0b010, 0b010, 0b000, 0b010]),
    (b'?', [0b111, 0b001, 0b011, 0b000, 0b010]),
    (b'-', [0b000, 0b000, 0b111, 0b000, 0b000]),
    (b'+', [0b000, 0b010, 0b111, 0b010, 0b000]),
    (b'=', [0b000, 0b111, 0b000, 0b111, 0b000]),
    (b'/', [0b001, 0b001, 0b010, 0b100, 0b100]),
    (b'%', [0b101, 0b001, 0b010, 0b100, 0b101]),
    (b'[', [0b110, 0b100, 0b100, 0b100, 0b110]),
    (b']', [0b011, 0b001, 0b001, 0b001, 0b011]),
    (b'(', [0b010, 0b100, 0b100, 0b100, 0b010]),
    (b')', [0b010, 0b001, 0b001, 0b001, 0b010]),
    (b'_', [0b000, 0b000, 0b000, 0b000, 0b111]),
];

/// Number of glyphs per atlas row.
const ATLAS_COLS: usize = 16;

impl Font {
    /// Creates a font from an atlas of `glyph_w` × `glyph_h` cells.
    ///
    /// The glyph for character code `i` is the cell on row `i / cols`,
    /// column `i % cols`, where `cols` is the number of whole cells that
    /// fit in the width of the atlas. Non-zero atlas pixels are ink.
    ///
    /// # Panics
    /// If either glyph dimension is zero or larger than the atlas.
    #[track_caller]
    pub fn new(atlas: Buf2<u8>, (glyph_w, glyph_h): (usize, usize)) -> Self {
        assert!(
            0 < glyph_w && glyph_w <= atlas.width(),
            "invalid glyph width {glyph_w}"
        );
        assert!(
            0 < glyph_h && glyph_h <= atlas.height(),
            "invalid glyph height {glyph_h}"
        );
        Self { atlas, glyph_w, glyph_h }
    }

    /// Returns a built-in font of 3×5 pixel uppercase glyphs in 4×6 cells.
    ///
    /// Covers ASCII letters, digits, space, and common punctuation.
    /// Lowercase letters are drawn as uppercase, and other printable ASCII
    /// characters as a filled box.
    pub fn small() -> Self {
        let (gw, gh) = (4, 6);
        let glyph = |code: u8| -> [u8; 5] {
            let code = code.to_ascii_uppercase();
            match SMALL_GLYPHS.iter().find(|(c, _)| *c == code) {
                Some((_, rows)) => *rows,
                None if code.is_ascii_graphic() => [0b111; 5],
                None => [0; 5],
            }
        };
        let atlas = Buf2::new_with(ATLAS_COLS * gw, 128 / ATLAS_COLS * gh, |x, y| {
            let (col, row) = (x / gw, y / gh);
            let (gx, gy) = (x % gw, y % gh);
            let code = (row * ATLAS_COLS + col) as u8;
            // The last column and row of each cell are spacing
            let ink = gx < 3 && gy < 5 && glyph(code)[gy] >> (2 - gx) & 1 == 1;
            ink as u8
        });
        Self::new(atlas, (gw, gh))
    }

    /// Returns the width and height of a glyph cell.
    pub fn glyph_dims(&self) -> (usize, usize) {
        (self.glyph_w, self.glyph_h)
    }

    /// Returns the number of glyphs in `self`.
    pub fn num_glyphs(&self) -> usize {
        (self.atlas.width() / self.glyph_w) * (self.atlas.height() / self.glyph_h)
    }

    /// Returns the width in pixels of `s` rendered on a single line.
    pub fn text_width(&self, s: &str) -> usize {
        s.chars().count() * self.glyph_w
    }

    /// Returns whether the glyph for `code` has ink at `(x, y)` within
    /// its cell. Codes without a glyph have no ink.
    fn ink(&self, code: usize, x: usize, y: usize) -> bool {
        if code >= self.num_glyphs() {
            return false;
        }
        let cols = self.atlas.width() / self.glyph_w;
        let (cx, cy) = (code % cols * self.glyph_w, code / cols * self.glyph_h);
        self.atlas[[cx + x, cy + y]] != 0
    }
}

impl DrawBuffer {
    /// Returns a cursor for writing text in `font` and color index `color`,
    /// with the top-left corner of the first glyph at `(x, y)`.
    pub fn text<'a>(
        &'a mut self,
        font: &'a Font,
        x: usize,
        y: usize,
        color: u8,
    ) -> TextCursor<'a> {
        TextCursor { buf: self, font, color, left: x, x, y }
    }
}

impl TextCursor<'_> {
    /// Returns the current cursor position.
    pub fn pos(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    fn write_char(&mut self, c: char) {
        let (gw, gh) = self.font.glyph_dims();
        if c == '\n' {
            self.x = self.left;
            self.y += gh;
            return;
        }
        let code = c as usize;
        for gy in 0..gh {
            for gx in 0..gw {
                if self.font.ink(code, gx, gy) {
                    self.buf.plot(self.x + gx, self.y + gy, self.color);
                }
            }
        }
        self.x += gw;
    }
}

impl fmt::Write for TextCursor<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        s.chars().for_each(|c| self.write_char(c));
        Ok(())
    }
}
