//! Per-pixel transforms: each output pixel depends only on the same input pixel.

use rgb::RGB8;

use crate::buffer::PixelBuffer;
use crate::pixel::Pixel;

/// Invert every channel: `255 - value`.
pub fn negative<T: Pixel>(buf: &mut PixelBuffer<T>) {
    for px in buf.pixels_mut() {
        *px = px.map_channels(|c| 255 - c);
    }
}

/// Add `delta` to every channel, saturating at 0 and 255.
pub fn brightness<T: Pixel>(buf: &mut PixelBuffer<T>, delta: i32) {
    for px in buf.pixels_mut() {
        *px = px.map_channels(|c| i32::from(c).saturating_add(delta).clamp(0, 255) as u8);
    }
}

/// Binarize: values `>= threshold` become 255, the rest 0.
///
/// `threshold` is clamped to `0..=255` first, so any value above 255 acts
/// like 255.
pub fn threshold(buf: &mut PixelBuffer<u8>, threshold: i32) {
    let t = threshold.clamp(0, 255) as u8;
    for px in buf.pixels_mut() {
        *px = if *px >= t { 255 } else { 0 };
    }
}

/// Replace each pixel by the rounded mean of its channels.
pub fn grayscale(buf: &mut PixelBuffer<RGB8>) {
    for px in buf.pixels_mut() {
        let sum = u16::from(px.r) + u16::from(px.g) + u16::from(px.b);
        let gray = super::to_byte(f32::from(sum) / 3.0);
        *px = RGB8::new(gray, gray, gray);
    }
}
