use enough::StopReason;

use crate::pixel::BitDepth;

/// Errors from BMP decoding, encoding, and filter setup.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The first two bytes are not `BM`.
    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("unsupported BMP bit depth {0} (only 8 and 24 are supported)")]
    UnsupportedDepth(u16),

    #[error("unsupported BMP compression type {0} (only uncompressed is supported)")]
    UnsupportedCompression(u32),

    #[error("invalid convolution kernel: {0}")]
    InvalidKernel(String),

    #[error("failed to allocate {bytes} bytes for pixel data")]
    Allocation { bytes: usize },

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u64, height: u64 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("buffer too small: need {needed} pixels, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("bit depth mismatch: expected {expected:?}, got {actual:?}")]
    DepthMismatch { expected: BitDepth, actual: BitDepth },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for BmpError {
    fn from(r: StopReason) -> Self {
        BmpError::Cancelled(r)
    }
}
