//! In-place image transforms.
//!
//! Every filter works directly on a [`PixelBuffer`](crate::PixelBuffer);
//! [`Image8`](crate::Image8), [`Image24`](crate::Image24) and
//! [`Image`](crate::Image) expose the same operations as methods.

pub mod convolve;
pub mod histogram;
pub mod point;

pub use convolve::{Kernel, KernelPreset, apply_kernel};
pub use histogram::{Yuv, compute_histogram, equalization_map, equalize8, equalize24};
pub use point::{brightness, grayscale, negative, threshold};

/// Round to nearest (half away from zero) and saturate to `0..=255`.
#[inline]
pub(crate) fn to_byte(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::to_byte;

    #[test]
    fn to_byte_rounds_and_clamps() {
        assert_eq!(to_byte(-3.0), 0);
        assert_eq!(to_byte(0.49), 0);
        assert_eq!(to_byte(0.5), 1);
        assert_eq!(to_byte(254.5), 255);
        assert_eq!(to_byte(1000.0), 255);
        assert_eq!(to_byte(f32::NAN), 0);
    }
}
