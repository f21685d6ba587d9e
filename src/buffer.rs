//! Owned rectangular pixel grid.

use core::fmt;

use imgref::{ImgRef, ImgVec};

use crate::error::BmpError;
use crate::pixel::Pixel;

/// A `width × height` grid of pixels, row 0 at the top.
///
/// Backed by a single flat [`ImgVec`] whose stride always equals the width,
/// so every row has exactly `width` cells.
#[derive(Clone)]
pub struct PixelBuffer<T> {
    img: ImgVec<T>,
}

impl<T: Pixel> PixelBuffer<T> {
    /// Allocate a buffer filled with `T::default()` (black).
    pub fn new(width: usize, height: usize) -> Result<Self, BmpError> {
        let len = checked_len(width, height)?;
        let buf = try_alloc(len, T::default())?;
        Ok(Self {
            img: ImgVec::new(buf, width, height),
        })
    }

    /// Allocate a buffer filled with `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, BmpError> {
        let len = checked_len(width, height)?;
        let buf = try_alloc(len, value)?;
        Ok(Self {
            img: ImgVec::new(buf, width, height),
        })
    }

    /// Wrap row-major pixels. `buf.len()` must equal `width * height`.
    pub fn from_vec(buf: Vec<T>, width: usize, height: usize) -> Result<Self, BmpError> {
        let len = checked_len(width, height)?;
        if buf.len() != len {
            return Err(BmpError::BufferTooSmall {
                needed: len,
                actual: buf.len(),
            });
        }
        Ok(Self {
            img: ImgVec::new(buf, width, height),
        })
    }

    /// Build a buffer by evaluating `f(x, y)` for every cell.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> T,
    ) -> Result<Self, BmpError> {
        let mut out = Self::new(width, height)?;
        for (y, row) in out.rows_mut().enumerate() {
            for (x, px) in row.iter_mut().enumerate() {
                *px = f(x, y);
            }
        }
        Ok(out)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.img.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Pixel at column `x`, row `y`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.pixels()[self.index(x, y)]
    }

    /// Overwrite the pixel at column `x`, row `y`. Panics when out of bounds.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.pixels_mut()[idx] = value;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        let w = self.width();
        &self.pixels()[y * w..(y + 1) * w]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let w = self.width();
        &mut self.pixels_mut()[y * w..(y + 1) * w]
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        self.pixels().chunks_exact(self.width())
    }

    /// Mutable rows from top to bottom.
    pub fn rows_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [T]> + '_ {
        let w = self.width();
        self.pixels_mut().chunks_exact_mut(w)
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[T] {
        self.img.buf()
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        self.img.buf_mut()
    }

    /// Borrow as an [`ImgRef`] for interop with the `imgref` ecosystem.
    pub fn as_imgref(&self) -> ImgRef<'_, T> {
        self.img.as_ref()
    }

    /// Unwrap into the underlying [`ImgVec`].
    pub fn into_imgvec(self) -> ImgVec<T> {
        self.img
    }

    /// Total pixel count.
    #[inline]
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    /// Always false: dimensions are at least 1×1.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width() && y < self.height(),
            "pixel ({x}, {y}) out of bounds for {}x{}",
            self.width(),
            self.height()
        );
        y * self.width() + x
    }
}

impl<T: Pixel> PartialEq for PixelBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.pixels() == other.pixels()
    }
}

impl<T: Pixel> Eq for PixelBuffer<T> {}

impl<T: Pixel> fmt::Debug for PixelBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, BmpError> {
    if width == 0 || height == 0 {
        return Err(BmpError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(BmpError::DimensionsTooLarge {
            width: width as u64,
            height: height as u64,
        })
}

fn try_alloc<T: Clone>(len: usize, value: T) -> Result<Vec<T>, BmpError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| BmpError::Allocation {
        bytes: len.saturating_mul(core::mem::size_of::<T>()),
    })?;
    buf.resize(len, value);
    Ok(buf)
}
