//! Fixed binary layouts of the BMP container.
//!
//! All multi-byte fields are little-endian and packed without padding:
//! the file header is 14 bytes and the `BITMAPINFOHEADER` is 40 bytes.

use core::fmt;

use crate::error::BmpError;

/// `BM`
pub const SIGNATURE: [u8; 2] = *b"BM";
/// Size of [`FileHeader`] on disk.
pub const FILE_HEADER_LEN: usize = 14;
/// Size of [`InfoHeader`] on disk.
pub const INFO_HEADER_LEN: usize = 40;
/// Size of [`ColorTable`] on disk.
pub const COLOR_TABLE_LEN: usize = 256 * 4;
/// 72 DPI expressed in pixels per metre.
pub const DEFAULT_RESOLUTION: i32 = 2835;

/// BMP file header (14 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    pub signature: [u8; 2],
    /// Total file size in bytes.
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    /// Byte offset from the start of the file to the pixel array.
    pub pixel_offset: u32,
}

impl FileHeader {
    /// Parse from the first 14 bytes of `data`.
    ///
    /// The signature is checked before the length so that short non-BMP
    /// input reports [`BmpError::UnrecognizedFormat`].
    pub fn parse(data: &[u8]) -> Result<Self, BmpError> {
        if data.len() >= 2 && data[0..2] != SIGNATURE {
            return Err(BmpError::UnrecognizedFormat);
        }
        let b: &[u8; FILE_HEADER_LEN] = data
            .get(..FILE_HEADER_LEN)
            .and_then(|s| s.try_into().ok())
            .ok_or(BmpError::UnexpectedEof)?;
        Ok(Self {
            signature: [b[0], b[1]],
            file_size: u32::from_le_bytes([b[2], b[3], b[4], b[5]]),
            reserved1: u16::from_le_bytes([b[6], b[7]]),
            reserved2: u16::from_le_bytes([b[8], b[9]]),
            pixel_offset: u32::from_le_bytes([b[10], b[11], b[12], b[13]]),
        })
    }

    pub fn to_bytes(&self) -> [u8; FILE_HEADER_LEN] {
        let mut out = [0u8; FILE_HEADER_LEN];
        out[0..2].copy_from_slice(&self.signature);
        out[2..6].copy_from_slice(&self.file_size.to_le_bytes());
        out[6..8].copy_from_slice(&self.reserved1.to_le_bytes());
        out[8..10].copy_from_slice(&self.reserved2.to_le_bytes());
        out[10..14].copy_from_slice(&self.pixel_offset.to_le_bytes());
        out
    }
}

/// Order in which pixel rows are stored on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowOrder {
    /// Positive height: the first stored row is the bottom of the image.
    BottomUp,
    /// Negative height: the first stored row is the top of the image.
    TopDown,
}

impl RowOrder {
    /// Buffer row (0 = top) for the `file_row`-th row stored on disk.
    #[inline]
    pub fn buffer_row(self, file_row: usize, height: usize) -> usize {
        match self {
            Self::BottomUp => height - 1 - file_row,
            Self::TopDown => file_row,
        }
    }
}

/// DIB header, `BITMAPINFOHEADER` layout (40 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InfoHeader {
    pub header_size: u32,
    pub width: i32,
    /// Sign encodes [`RowOrder`].
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    /// Raw pixel array size in bytes; may be 0 for uncompressed images.
    pub image_size: u32,
    pub x_resolution: i32,
    pub y_resolution: i32,
    pub colors_used: u32,
    pub important_colors: u32,
}

impl InfoHeader {
    /// Parse the 40-byte info header that starts at byte 14 of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, BmpError> {
        let b: &[u8; INFO_HEADER_LEN] = data
            .get(FILE_HEADER_LEN..FILE_HEADER_LEN + INFO_HEADER_LEN)
            .and_then(|s| s.try_into().ok())
            .ok_or(BmpError::UnexpectedEof)?;
        let u32_at = |o: usize| u32::from_le_bytes([b[o], b[o + 1], b[o + 2], b[o + 3]]);
        let i32_at = |o: usize| i32::from_le_bytes([b[o], b[o + 1], b[o + 2], b[o + 3]]);
        let u16_at = |o: usize| u16::from_le_bytes([b[o], b[o + 1]]);
        Ok(Self {
            header_size: u32_at(0),
            width: i32_at(4),
            height: i32_at(8),
            planes: u16_at(12),
            bits_per_pixel: u16_at(14),
            compression: u32_at(16),
            image_size: u32_at(20),
            x_resolution: i32_at(24),
            y_resolution: i32_at(28),
            colors_used: u32_at(32),
            important_colors: u32_at(36),
        })
    }

    pub fn to_bytes(&self) -> [u8; INFO_HEADER_LEN] {
        let mut out = [0u8; INFO_HEADER_LEN];
        out[0..4].copy_from_slice(&self.header_size.to_le_bytes());
        out[4..8].copy_from_slice(&self.width.to_le_bytes());
        out[8..12].copy_from_slice(&self.height.to_le_bytes());
        out[12..14].copy_from_slice(&self.planes.to_le_bytes());
        out[14..16].copy_from_slice(&self.bits_per_pixel.to_le_bytes());
        out[16..20].copy_from_slice(&self.compression.to_le_bytes());
        out[20..24].copy_from_slice(&self.image_size.to_le_bytes());
        out[24..28].copy_from_slice(&self.x_resolution.to_le_bytes());
        out[28..32].copy_from_slice(&self.y_resolution.to_le_bytes());
        out[32..36].copy_from_slice(&self.colors_used.to_le_bytes());
        out[36..40].copy_from_slice(&self.important_colors.to_le_bytes());
        out
    }

    #[inline]
    pub fn row_order(&self) -> RowOrder {
        if self.height < 0 {
            RowOrder::TopDown
        } else {
            RowOrder::BottomUp
        }
    }

    #[inline]
    pub fn abs_height(&self) -> u32 {
        self.height.unsigned_abs()
    }
}

/// 256-entry palette, 4 bytes per entry (B, G, R, reserved).
///
/// Carried byte-for-byte between decode and encode; never interpreted.
#[derive(Clone, PartialEq, Eq)]
pub struct ColorTable(pub [u8; COLOR_TABLE_LEN]);

impl ColorTable {
    /// Identity gray ramp: entry `i` is `(i, i, i, 0)`.
    pub fn grayscale() -> Self {
        let mut table = [0u8; COLOR_TABLE_LEN];
        for (i, entry) in table.chunks_exact_mut(4).enumerate() {
            let v = i as u8;
            entry.copy_from_slice(&[v, v, v, 0]);
        }
        Self(table)
    }

    /// Copy up to 1024 bytes from `bytes`, zero-filling the rest.
    pub fn from_partial(bytes: &[u8]) -> Self {
        let mut table = [0u8; COLOR_TABLE_LEN];
        let n = bytes.len().min(COLOR_TABLE_LEN);
        table[..n].copy_from_slice(&bytes[..n]);
        Self(table)
    }

    pub fn as_bytes(&self) -> &[u8; COLOR_TABLE_LEN] {
        &self.0
    }

    /// Entry `idx` as `[b, g, r, reserved]`.
    pub fn entry(&self, idx: u8) -> [u8; 4] {
        let o = usize::from(idx) * 4;
        [self.0[o], self.0[o + 1], self.0[o + 2], self.0[o + 3]]
    }
}

impl fmt::Debug for ColorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ColorTable")
            .field(&format_args!("[{} bytes]", COLOR_TABLE_LEN))
            .finish()
    }
}

impl fmt::Display for FileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  File Header:")?;
        writeln!(
            f,
            "    Type: {}{}",
            char::from(self.signature[0]),
            char::from(self.signature[1])
        )?;
        writeln!(f, "    Size: {} bytes", self.file_size)?;
        writeln!(f, "    Pixel Data Offset: {}", self.pixel_offset)
    }
}

impl fmt::Display for InfoHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Info Header (DIB):")?;
        writeln!(f, "    Header Size: {}", self.header_size)?;
        writeln!(f, "    Width: {} pixels", self.width)?;
        writeln!(f, "    Height: {} pixels", self.height)?;
        writeln!(f, "    Planes: {}", self.planes)?;
        writeln!(f, "    Bits per Pixel: {}", self.bits_per_pixel)?;
        writeln!(f, "    Compression: {}", self.compression)?;
        writeln!(f, "    Image Size (raw data): {} bytes", self.image_size)?;
        writeln!(f, "    X Pixels/Meter: {}", self.x_resolution)?;
        writeln!(f, "    Y Pixels/Meter: {}", self.y_resolution)?;
        writeln!(f, "    Colors in Palette: {}", self.colors_used)?;
        write!(f, "    Important Colors: {}", self.important_colors)
    }
}
