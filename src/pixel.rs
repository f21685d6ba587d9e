use rgb::RGB8;

/// Pixel storage depth of a BMP image.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// One byte per pixel, grayscale through a 256-entry color table.
    Gray8,
    /// Three bytes per pixel, stored B, G, R on disk.
    Rgb24,
}

impl BitDepth {
    /// Value of the `bits per pixel` header field.
    pub fn bits_per_pixel(&self) -> u16 {
        match self {
            Self::Gray8 => 8,
            Self::Rgb24 => 24,
        }
    }

    /// Bytes per pixel in the on-disk pixel array.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb24 => 3,
        }
    }

    /// Parse the `bits per pixel` header field.
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(Self::Gray8),
            24 => Some(Self::Rgb24),
            _ => None,
        }
    }

    /// Bytes in one on-disk row of `width` pixels, padded to a 4-byte boundary.
    pub fn row_stride(&self, width: usize) -> Option<usize> {
        width
            .checked_mul(self.bytes_per_pixel())
            .and_then(|r| r.checked_add(3))
            .map(|r| r & !3)
    }
}

/// A pixel made of 8-bit channels.
///
/// Implemented for `u8` (grayscale) and [`RGB8`]. Filters are written once
/// against this trait and work on both image depths.
pub trait Pixel: Copy + Default + PartialEq + core::fmt::Debug + 'static {
    /// Number of 8-bit channels.
    const CHANNELS: usize;

    /// Channel `idx`, `0..CHANNELS`.
    fn channel(self, idx: usize) -> u8;

    /// Build a pixel from a per-channel function.
    fn from_channels(f: impl FnMut(usize) -> u8) -> Self;

    /// Apply `f` to every channel.
    #[inline]
    fn map_channels(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self::from_channels(|i| f(self.channel(i)))
    }
}

impl Pixel for u8 {
    const CHANNELS: usize = 1;

    #[inline]
    fn channel(self, _idx: usize) -> u8 {
        self
    }

    #[inline]
    fn from_channels(mut f: impl FnMut(usize) -> u8) -> Self {
        f(0)
    }
}

impl Pixel for RGB8 {
    const CHANNELS: usize = 3;

    #[inline]
    fn channel(self, idx: usize) -> u8 {
        match idx {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }

    #[inline]
    fn from_channels(mut f: impl FnMut(usize) -> u8) -> Self {
        let r = f(0);
        let g = f(1);
        let b = f(2);
        RGB8::new(r, g, b)
    }
}
