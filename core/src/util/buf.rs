//! Two-dimensional buffers.

use alloc::vec::Vec;
use core::fmt::{self, Debug, Formatter};
use core::iter::repeat_n;
use core::ops::{Index, IndexMut};

/// A rectangular 2D buffer that owns its elements, backed by a `Vec`.
///
/// `Buf2` stores its elements contiguously, in standard row-major order,
/// such that element (x, y) maps to element at index
/// ```text
/// buf.width() * y + x
/// ```
/// in the backing vector.
///
/// # Examples
/// ```
/// # use dosfire_core::util::buf::*;
/// // Elements initialized with `Default::default()`
/// let mut buf = Buf2::new_default(4, 4);
/// // Indexing with [x, y] yields element at row y, column x:
/// buf[[2, 1]] = 123;
/// // Indexing with an usize i yields row with index i as a slice:
/// assert_eq!(&buf[1], &[0, 0, 123, 0]);
/// // Thus you can also do this, row first, column second:
/// assert_eq!(buf[1][2], 123)
/// ```
#[derive(Clone, PartialEq)]
pub struct Buf2<T> {
    w: usize,
    h: usize,
    data: Vec<T>,
}

impl<T> Buf2<T> {
    /// Returns a buffer with size `w` × `h`, with elements initialized
    /// with values from `init` in row-major order.
    ///
    /// # Panics
    /// If there are fewer than `w * h` elements in `init`.
    #[track_caller]
    pub fn new<I>(w: usize, h: usize, init: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let data: Vec<_> = init.into_iter().take(w * h).collect();
        assert_eq!(data.len(), w * h, "too few elements for {w}×{h} buffer");
        Self { w, h, data }
    }
    /// Returns a buffer with size `w` × `h`, with every element
    /// initialized by calling `T::default()`.
    pub fn new_default(w: usize, h: usize) -> Self
    where
        T: Clone + Default,
    {
        Self::new(w, h, repeat_n(T::default(), w * h))
    }
    /// Returns a buffer with size `w` × `h`, with every element
    /// initialized by calling `init_fn(x, y)` where x is the column index
    /// and y the row index of the element being initialized.
    pub fn new_with<F>(w: usize, h: usize, mut init_fn: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            data.extend((0..w).map(|x| init_fn(x, y)));
        }
        Self { w, h, data }
    }

    /// Returns the width of `self`.
    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }
    /// Returns the height of `self`.
    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }
    /// Returns whether `self` has no elements (if its width or height is 0).
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Returns a view of the backing data of `self`.
    pub fn data(&self) -> &[T] {
        &self.data
    }
    /// Returns a mutable view of the backing data of `self`.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns a reference to the element at `(x, y)`,
    /// or `None` if the position is out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        (x < self.w && y < self.h).then(|| &self.data[y * self.w + x])
    }

    /// Returns an iterator over the rows of `self` as `&[T]` slices.
    /// The length of each slice equals [`self.width()`](Self::width).
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // `max` keeps `chunks` from panicking on zero-width buffers
        self.data.chunks(self.w.max(1)).take(self.h)
    }
    /// Returns an iterator over the rows of `self` as `&mut [T]` slices.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [T]> {
        self.data.chunks_mut(self.w.max(1)).take(self.h)
    }

    /// Fills `self` with clones of `val`.
    pub fn fill(&mut self, val: T)
    where
        T: Clone,
    {
        self.data.fill(val);
    }

    #[cold]
    #[inline(never)]
    #[track_caller]
    fn position_out_of_bounds(&self, x: usize, y: usize) -> ! {
        panic!(
            "position (x={x}, y={y}) out of bounds (0..{}, 0..{})",
            self.w, self.h
        )
    }
}

impl<T> Debug for Buf2<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buf2")
            .field("w", &self.w)
            .field("h", &self.h)
            .finish_non_exhaustive()
    }
}

impl<T> Index<usize> for Buf2<T> {
    type Output = [T];

    /// Returns a reference to the row at index `i`.
    ///
    /// # Panics
    /// If `i >= self.height()`.
    #[track_caller]
    fn index(&self, i: usize) -> &[T] {
        if i >= self.h {
            self.position_out_of_bounds(0, i)
        }
        &self.data[i * self.w..][..self.w]
    }
}

impl<T> IndexMut<usize> for Buf2<T> {
    /// Returns a mutable reference to the row at index `i`.
    ///
    /// # Panics
    /// If `i >= self.height()`.
    #[track_caller]
    fn index_mut(&mut self, i: usize) -> &mut [T] {
        if i >= self.h {
            self.position_out_of_bounds(0, i)
        }
        let w = self.w;
        &mut self.data[i * w..][..w]
    }
}

impl<T> Index<[usize; 2]> for Buf2<T> {
    type Output = T;

    /// Returns a reference to the element at position `[x, y]`.
    ///
    /// # Panics
    /// If `x >= self.width()` or `y >= self.height()`.
    #[track_caller]
    fn index(&self, [x, y]: [usize; 2]) -> &T {
        if x >= self.w || y >= self.h {
            self.position_out_of_bounds(x, y)
        }
        &self.data[y * self.w + x]
    }
}

impl<T> IndexMut<[usize; 2]> for Buf2<T> {
    /// Returns a mutable reference to the element at position `[x, y]`.
    ///
    /// # Panics
    /// If `x >= self.width()` or `y >= self.height()`.
    #[track_caller]
    fn index_mut(&mut self, [x, y]: [usize; 2]) -> &mut T {
        if x >= self.w || y >= self.h {
            self.position_out_of_bounds(x, y)
        }
        &mut self.data[y * self.w + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buf_new_with() {
        let buf = Buf2::new_with(3, 2, |x, y| x + 10 * y);
        assert_eq!(buf.data(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 2);
    }

    #[test]
    fn buf_indexing() {
        let mut buf = Buf2::new_default(4, 3);
        buf[[3, 2]] = 7u8;
        buf[1][0] = 5;
        assert_eq!(buf[2], [0, 0, 0, 7]);
        assert_eq!(buf[[0, 1]], 5);
        assert_eq!(buf.get(3, 2), Some(&7));
        assert_eq!(buf.get(4, 2), None);
    }

    #[test]
    fn buf_rows() {
        let mut buf = Buf2::new(2, 3, 0..);
        let rows: Vec<_> = buf.rows().collect();
        assert_eq!(rows, [&[0, 1], &[2, 3], &[4, 5]]);

        buf.rows_mut().for_each(|r| r[1] = -1);
        assert_eq!(buf.data(), &[0, -1, 2, -1, 4, -1]);
    }

    #[test]
    fn buf_fill() {
        let mut buf = Buf2::new_default(2, 2);
        buf.fill(3.5f32);
        assert!(buf.data().iter().all(|&d| d == 3.5));
    }

    #[test]
    fn empty_buf() {
        let buf = Buf2::<u8>::new_default(0, 5);
        assert!(buf.is_empty());
        assert_eq!(buf.rows().count(), 0);
    }

    #[test]
    #[should_panic = "position (x=2, y=0) out of bounds (0..2, 0..2)"]
    fn index_out_of_bounds() {
        let buf = Buf2::<u8>::new_default(2, 2);
        let _px = buf[[2, 0]];
    }

    #[test]
    #[should_panic]
    fn new_with_too_few_elements() {
        let _ = Buf2::new(3, 3, [1, 2, 3]);
    }
}
