use enough::{Stop, Unstoppable};

use crate::bmp;
use crate::error::BmpError;
use crate::image::Image;

/// Encode to an uncompressed BMP.
///
/// Layout fields (header size, dimensions, depth, compression, pixel offset,
/// image and file size) are recomputed from the pixel buffer. Every other
/// header field is written as stored in the image.
pub fn encode(image: &Image) -> Result<Vec<u8>, BmpError> {
    encode_with_stop(image, Unstoppable)
}

/// Like [`encode`], checking `stop` every 16 rows.
pub fn encode_with_stop(image: &Image, stop: impl Stop) -> Result<Vec<u8>, BmpError> {
    bmp::encode(image, &stop)
}
