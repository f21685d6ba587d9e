//! Whole-file load and save.

use std::fs;
use std::path::Path;

use crate::decode::decode;
use crate::encode::encode;
use crate::error::BmpError;
use crate::image::Image;

/// Read and decode a BMP file.
pub fn load(path: impl AsRef<Path>) -> Result<Image, BmpError> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let image = decode(&data)?;
    log::info!(
        "loaded {} ({}x{}, {}-bit)",
        path.display(),
        image.width(),
        image.height(),
        image.depth().bits_per_pixel()
    );
    Ok(image)
}

/// Encode and write a BMP file, replacing any existing file.
pub fn save(path: impl AsRef<Path>, image: &Image) -> Result<(), BmpError> {
    let path = path.as_ref();
    let data = encode(image)?;
    fs::write(path, &data)?;
    log::info!("saved {} ({} bytes)", path.display(), data.len());
    Ok(())
}
