use enough::{Stop, Unstoppable};

use crate::bmp;
use crate::error::BmpError;
use crate::image::{Image, Image8, Image24};
use crate::limits::Limits;

/// Configurable BMP decode.
///
/// ```no_run
/// use zenbmpfx::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // your BMP bytes
/// let limits = Limits {
///     max_pixels: Some(16_000_000),
///     ..Limits::default()
/// };
/// let image = DecodeRequest::new(data)
///     .with_limits(&limits)
///     .decode(Unstoppable)?;
/// println!("{}x{}", image.width(), image.height());
/// # Ok::<(), zenbmpfx::BmpError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    /// Reject files whose dimensions or decoded size exceed `limits`.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode either depth.
    pub fn decode(self, stop: impl Stop) -> Result<Image, BmpError> {
        bmp::decode(self.data, self.limits, &stop)
    }

    /// Decode, requiring an 8-bit file.
    pub fn decode_gray(self, stop: impl Stop) -> Result<Image8, BmpError> {
        self.decode(stop)?.into_gray()
    }

    /// Decode, requiring a 24-bit file.
    pub fn decode_rgb(self, stop: impl Stop) -> Result<Image24, BmpError> {
        self.decode(stop)?.into_rgb()
    }
}

/// Decode an 8-bit or 24-bit BMP with no limits.
pub fn decode(data: &[u8]) -> Result<Image, BmpError> {
    DecodeRequest::new(data).decode(Unstoppable)
}

/// Decode an 8-bit BMP. A 24-bit file fails with [`BmpError::DepthMismatch`].
pub fn decode_gray(data: &[u8]) -> Result<Image8, BmpError> {
    DecodeRequest::new(data).decode_gray(Unstoppable)
}

/// Decode a 24-bit BMP. An 8-bit file fails with [`BmpError::DepthMismatch`].
pub fn decode_rgb(data: &[u8]) -> Result<Image24, BmpError> {
    DecodeRequest::new(data).decode_rgb(Unstoppable)
}
