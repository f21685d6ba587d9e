//! BMP images: headers plus an owned pixel grid.

use core::fmt;

use rgb::RGB8;

use crate::buffer::PixelBuffer;
use crate::error::BmpError;
use crate::filters::{self, Kernel, KernelPreset};
use crate::header::{
    COLOR_TABLE_LEN, ColorTable, DEFAULT_RESOLUTION, FILE_HEADER_LEN, FileHeader,
    INFO_HEADER_LEN, InfoHeader, RowOrder, SIGNATURE,
};
use crate::pixel::BitDepth;

/// 8-bit palettized grayscale image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image8 {
    pub file_header: FileHeader,
    pub info_header: InfoHeader,
    pub color_table: ColorTable,
    pub pixels: PixelBuffer<u8>,
}

/// 24-bit RGB image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image24 {
    pub file_header: FileHeader,
    pub info_header: InfoHeader,
    pub pixels: PixelBuffer<RGB8>,
}

/// A decoded BMP of either supported depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Image {
    Gray(Image8),
    Rgb(Image24),
}

/// Headers for a freshly allocated image, with every size field computed.
fn default_headers(
    width: usize,
    height: usize,
    depth: BitDepth,
    order: RowOrder,
) -> Result<(FileHeader, InfoHeader), BmpError> {
    let too_large = || BmpError::DimensionsTooLarge {
        width: width as u64,
        height: height as u64,
    };
    let w = i32::try_from(width).map_err(|_| too_large())?;
    let h = i32::try_from(height).map_err(|_| too_large())?;
    let stride = depth.row_stride(width).ok_or_else(too_large)?;
    let image_size = stride
        .checked_mul(height)
        .and_then(|s| u32::try_from(s).ok())
        .ok_or_else(too_large)?;
    let table_len = match depth {
        BitDepth::Gray8 => COLOR_TABLE_LEN,
        BitDepth::Rgb24 => 0,
    };
    let pixel_offset = (FILE_HEADER_LEN + INFO_HEADER_LEN + table_len) as u32;
    let file_size = pixel_offset.checked_add(image_size).ok_or_else(too_large)?;

    let file_header = FileHeader {
        signature: SIGNATURE,
        file_size,
        reserved1: 0,
        reserved2: 0,
        pixel_offset,
    };
    let info_header = InfoHeader {
        header_size: INFO_HEADER_LEN as u32,
        width: w,
        height: match order {
            RowOrder::BottomUp => h,
            RowOrder::TopDown => -h,
        },
        planes: 1,
        bits_per_pixel: depth.bits_per_pixel(),
        compression: 0,
        image_size,
        x_resolution: DEFAULT_RESOLUTION,
        y_resolution: DEFAULT_RESOLUTION,
        colors_used: match depth {
            BitDepth::Gray8 => 256,
            BitDepth::Rgb24 => 0,
        },
        important_colors: 0,
    };
    Ok((file_header, info_header))
}

impl Image8 {
    /// Allocate a black bottom-up image with a gray-ramp color table.
    pub fn new(width: usize, height: usize) -> Result<Self, BmpError> {
        Self::from_pixels(PixelBuffer::new(width, height)?)
    }

    /// Wrap existing pixels, computing default headers.
    pub fn from_pixels(pixels: PixelBuffer<u8>) -> Result<Self, BmpError> {
        Self::with_row_order(pixels, RowOrder::BottomUp)
    }

    /// Wrap existing pixels, storing rows on disk in `order`.
    pub fn with_row_order(pixels: PixelBuffer<u8>, order: RowOrder) -> Result<Self, BmpError> {
        let (file_header, info_header) =
            default_headers(pixels.width(), pixels.height(), BitDepth::Gray8, order)?;
        Ok(Self {
            file_header,
            info_header,
            color_table: ColorTable::grayscale(),
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// Pixel array size from the header, or `stride * height` when the
    /// header leaves it zero.
    pub fn data_size(&self) -> u64 {
        match self.info_header.image_size {
            0 => BitDepth::Gray8
                .row_stride(self.width())
                .map_or(0, |s| s as u64 * self.height() as u64),
            n => u64::from(n),
        }
    }

    pub fn negative(&mut self) {
        filters::negative(&mut self.pixels);
        log::debug!("applied negative to 8-bit image");
    }

    pub fn brightness(&mut self, delta: i32) {
        filters::brightness(&mut self.pixels, delta);
        log::debug!("applied brightness {delta} to 8-bit image");
    }

    pub fn threshold(&mut self, threshold: i32) {
        filters::threshold(&mut self.pixels, threshold);
        log::debug!("applied threshold {threshold} to 8-bit image");
    }

    pub fn convolve(&mut self, kernel: &Kernel) {
        filters::apply_kernel(&mut self.pixels, kernel);
        log::debug!("applied {0}x{0} kernel to 8-bit image", kernel.size());
    }

    pub fn apply_preset(&mut self, preset: KernelPreset) {
        filters::apply_kernel(&mut self.pixels, &preset.kernel());
        log::debug!("applied {preset} to 8-bit image");
    }

    pub fn box_blur(&mut self) {
        self.apply_preset(KernelPreset::BoxBlur);
    }

    pub fn gaussian_blur(&mut self) {
        self.apply_preset(KernelPreset::GaussianBlur);
    }

    pub fn outline(&mut self) {
        self.apply_preset(KernelPreset::Outline);
    }

    pub fn emboss(&mut self) {
        self.apply_preset(KernelPreset::Emboss);
    }

    pub fn sharpen(&mut self) {
        self.apply_preset(KernelPreset::Sharpen);
    }

    /// Histogram equalization over all pixel values.
    pub fn equalize(&mut self) {
        filters::equalize8(&mut self.pixels);
        log::debug!("applied histogram equalization to 8-bit image");
    }
}

impl Image24 {
    /// Allocate a black bottom-up image.
    pub fn new(width: usize, height: usize) -> Result<Self, BmpError> {
        Self::from_pixels(PixelBuffer::new(width, height)?)
    }

    pub fn from_pixels(pixels: PixelBuffer<RGB8>) -> Result<Self, BmpError> {
        Self::with_row_order(pixels, RowOrder::BottomUp)
    }

    pub fn with_row_order(pixels: PixelBuffer<RGB8>, order: RowOrder) -> Result<Self, BmpError> {
        let (file_header, info_header) =
            default_headers(pixels.width(), pixels.height(), BitDepth::Rgb24, order)?;
        Ok(Self {
            file_header,
            info_header,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    pub fn negative(&mut self) {
        filters::negative(&mut self.pixels);
        log::debug!("applied negative to 24-bit image");
    }

    pub fn brightness(&mut self, delta: i32) {
        filters::brightness(&mut self.pixels, delta);
        log::debug!("applied brightness {delta} to 24-bit image");
    }

    pub fn grayscale(&mut self) {
        filters::grayscale(&mut self.pixels);
        log::debug!("applied grayscale to 24-bit image");
    }

    pub fn convolve(&mut self, kernel: &Kernel) {
        filters::apply_kernel(&mut self.pixels, kernel);
        log::debug!("applied {0}x{0} kernel to 24-bit image", kernel.size());
    }

    pub fn apply_preset(&mut self, preset: KernelPreset) {
        filters::apply_kernel(&mut self.pixels, &preset.kernel());
        log::debug!("applied {preset} to 24-bit image");
    }

    pub fn box_blur(&mut self) {
        self.apply_preset(KernelPreset::BoxBlur);
    }

    pub fn gaussian_blur(&mut self) {
        self.apply_preset(KernelPreset::GaussianBlur);
    }

    pub fn outline(&mut self) {
        self.apply_preset(KernelPreset::Outline);
    }

    pub fn emboss(&mut self) {
        self.apply_preset(KernelPreset::Emboss);
    }

    pub fn sharpen(&mut self) {
        self.apply_preset(KernelPreset::Sharpen);
    }

    /// Histogram equalization of the luma channel.
    pub fn equalize(&mut self) {
        filters::equalize24(&mut self.pixels);
        log::debug!("applied luma histogram equalization to 24-bit image");
    }
}

impl Image {
    pub fn depth(&self) -> BitDepth {
        match self {
            Self::Gray(_) => BitDepth::Gray8,
            Self::Rgb(_) => BitDepth::Rgb24,
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Self::Gray(img) => img.width(),
            Self::Rgb(img) => img.width(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            Self::Gray(img) => img.height(),
            Self::Rgb(img) => img.height(),
        }
    }

    pub fn file_header(&self) -> &FileHeader {
        match self {
            Self::Gray(img) => &img.file_header,
            Self::Rgb(img) => &img.file_header,
        }
    }

    pub fn info_header(&self) -> &InfoHeader {
        match self {
            Self::Gray(img) => &img.info_header,
            Self::Rgb(img) => &img.info_header,
        }
    }

    pub fn as_gray(&self) -> Option<&Image8> {
        match self {
            Self::Gray(img) => Some(img),
            Self::Rgb(_) => None,
        }
    }

    pub fn as_rgb(&self) -> Option<&Image24> {
        match self {
            Self::Rgb(img) => Some(img),
            Self::Gray(_) => None,
        }
    }

    /// Unwrap an 8-bit image, or fail with [`BmpError::DepthMismatch`].
    pub fn into_gray(self) -> Result<Image8, BmpError> {
        match self {
            Self::Gray(img) => Ok(img),
            Self::Rgb(_) => Err(BmpError::DepthMismatch {
                expected: BitDepth::Gray8,
                actual: BitDepth::Rgb24,
            }),
        }
    }

    /// Unwrap a 24-bit image, or fail with [`BmpError::DepthMismatch`].
    pub fn into_rgb(self) -> Result<Image24, BmpError> {
        match self {
            Self::Rgb(img) => Ok(img),
            Self::Gray(_) => Err(BmpError::DepthMismatch {
                expected: BitDepth::Rgb24,
                actual: BitDepth::Gray8,
            }),
        }
    }

    pub fn negative(&mut self) {
        match self {
            Self::Gray(img) => img.negative(),
            Self::Rgb(img) => img.negative(),
        }
    }

    pub fn brightness(&mut self, delta: i32) {
        match self {
            Self::Gray(img) => img.brightness(delta),
            Self::Rgb(img) => img.brightness(delta),
        }
    }

    pub fn convolve(&mut self, kernel: &Kernel) {
        match self {
            Self::Gray(img) => img.convolve(kernel),
            Self::Rgb(img) => img.convolve(kernel),
        }
    }

    pub fn apply_preset(&mut self, preset: KernelPreset) {
        match self {
            Self::Gray(img) => img.apply_preset(preset),
            Self::Rgb(img) => img.apply_preset(preset),
        }
    }

    /// Histogram equalization: direct for 8-bit, luma-only for 24-bit.
    pub fn equalize(&mut self) {
        match self {
            Self::Gray(img) => img.equalize(),
            Self::Rgb(img) => img.equalize(),
        }
    }
}

impl From<Image8> for Image {
    fn from(img: Image8) -> Self {
        Self::Gray(img)
    }
}

impl From<Image24> for Image {
    fn from(img: Image24) -> Self {
        Self::Rgb(img)
    }
}

impl fmt::Display for Image8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image Info (8-bit):")?;
        writeln!(f, "  Width: {}", self.width())?;
        writeln!(f, "  Height: {}", self.height())?;
        writeln!(f, "  Color Depth: {}", self.info_header.bits_per_pixel)?;
        writeln!(f, "  Data Size: {} bytes", self.data_size())?;
        write!(f, "{}{}", self.file_header, self.info_header)
    }
}

impl fmt::Display for Image24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image Info (24-bit):")?;
        write!(f, "{}{}", self.file_header, self.info_header)
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gray(img) => fmt::Display::fmt(img, f),
            Self::Rgb(img) => fmt::Display::fmt(img, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_gray_headers() {
        let img = Image8::new(5, 3).unwrap();
        assert_eq!(img.file_header.signature, *b"BM");
        assert_eq!(img.file_header.pixel_offset, 1078);
        // 5 bytes padded to 8 per row
        assert_eq!(img.info_header.image_size, 24);
        assert_eq!(img.file_header.file_size, 1078 + 24);
        assert_eq!(img.info_header.bits_per_pixel, 8);
        assert_eq!(img.info_header.height, 3);
        assert_eq!(img.data_size(), 24);
    }

    #[test]
    fn new_rgb_headers() {
        let img = Image24::with_row_order(PixelBuffer::new(5, 3).unwrap(), RowOrder::TopDown)
            .unwrap();
        assert_eq!(img.file_header.pixel_offset, 54);
        assert_eq!(img.info_header.image_size, 16 * 3);
        assert_eq!(img.info_header.height, -3);
        assert_eq!(img.info_header.row_order(), RowOrder::TopDown);
        assert_eq!(img.info_header.colors_used, 0);
    }

    #[test]
    fn depth_conversion() {
        let img: Image = Image24::new(2, 2).unwrap().into();
        assert_eq!(img.depth(), BitDepth::Rgb24);
        assert!(img.as_gray().is_none());
        assert!(matches!(
            img.clone().into_gray(),
            Err(BmpError::DepthMismatch { .. })
        ));
        assert!(img.into_rgb().is_ok());
    }

    #[test]
    fn display_lists_fields() {
        let text = Image::from(Image8::new(4, 4).unwrap()).to_string();
        assert!(text.contains("Image Info (8-bit)"));
        assert!(text.contains("Width: 4"));
        assert!(text.contains("Bits per Pixel: 8"));
        assert!(text.contains("Type: BM"));
    }

    #[test]
    fn enum_dispatches_filters() {
        let mut img = Image::from(Image8::new(3, 3).unwrap());
        img.negative();
        img.brightness(-5);
        assert!(img.as_gray().unwrap().pixels.pixels().iter().all(|&v| v == 250));
    }
}
