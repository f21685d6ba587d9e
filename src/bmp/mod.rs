//! BMP container codec (internal).
//!
//! Use the top-level `decode` / `encode` functions or `DecodeRequest`.

mod decode;
mod encode;

pub(crate) use decode::{BmpHeaders, parse_headers};

use enough::Stop;

use crate::error::BmpError;
use crate::image::Image;
use crate::limits::Limits;
use crate::pixel::BitDepth;

/// Decode a full BMP file.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Image, BmpError> {
    let headers = parse_headers(data)?;
    check_limits(limits, &headers)?;
    stop.check()?;
    log::debug!(
        "decoding {}x{} {}-bit BMP ({:?})",
        headers.width,
        headers.height,
        headers.depth.bits_per_pixel(),
        headers.info.row_order()
    );
    Ok(match headers.depth {
        BitDepth::Gray8 => Image::Gray(decode::decode_gray(data, &headers, stop)?),
        BitDepth::Rgb24 => Image::Rgb(decode::decode_rgb(data, &headers, stop)?),
    })
}

fn check_limits(limits: Option<&Limits>, headers: &BmpHeaders) -> Result<(), BmpError> {
    let Some(limits) = limits else {
        return Ok(());
    };
    // Both fit in u32: width comes from a positive i32, height from |i32|.
    limits.check(headers.width as u32, headers.height as u32)?;
    let out_bytes = headers.width as u64
        * headers.height as u64
        * headers.depth.bytes_per_pixel() as u64;
    limits.check_memory(out_bytes)
}

/// Encode an image to BMP bytes.
pub(crate) fn encode(image: &Image, stop: &dyn Stop) -> Result<Vec<u8>, BmpError> {
    log::debug!(
        "encoding {}x{} {}-bit BMP",
        image.width(),
        image.height(),
        image.depth().bits_per_pixel()
    );
    match image {
        Image::Gray(img) => encode::encode_gray(img, stop),
        Image::Rgb(img) => encode::encode_rgb(img, stop),
    }
}
