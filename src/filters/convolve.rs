//! Square-kernel convolution over a [`PixelBuffer`].
//!
//! The engine is kernel-agnostic; every preset is just a [`Kernel`] value.

use core::fmt;

use crate::buffer::PixelBuffer;
use crate::error::BmpError;
use crate::pixel::Pixel;

/// An odd-sized square matrix of weights, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Build a `size × size` kernel from row-major `weights`.
    ///
    /// Fails with [`BmpError::InvalidKernel`] when `size` is zero or even,
    /// when `weights` is empty or not `size * size` long, or when any weight
    /// is not finite.
    pub fn new(size: usize, weights: Vec<f32>) -> Result<Self, BmpError> {
        if weights.is_empty() {
            return Err(BmpError::InvalidKernel("kernel has no weights".into()));
        }
        if size == 0 || size % 2 == 0 {
            return Err(BmpError::InvalidKernel(format!(
                "kernel size must be odd and positive, got {size}"
            )));
        }
        let expected = size.checked_mul(size).ok_or_else(|| {
            BmpError::InvalidKernel(format!("kernel size {size} is too large"))
        })?;
        if weights.len() != expected {
            return Err(BmpError::InvalidKernel(format!(
                "{size}x{size} kernel needs {expected} weights, got {}",
                weights.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite()) {
            return Err(BmpError::InvalidKernel(format!("non-finite weight {w}")));
        }
        Ok(Self { size, weights })
    }

    /// Build from a fixed-size row array, e.g. `[[0.0, -1.0, 0.0], ...]`.
    pub fn from_rows<const N: usize>(rows: [[f32; N]; N]) -> Result<Self, BmpError> {
        Self::new(N, rows.iter().flatten().copied().collect())
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// `size / 2`: the width of the border left untouched by [`apply_kernel`].
    #[inline]
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight at column `kx`, row `ky`.
    #[inline]
    pub fn weight(&self, kx: usize, ky: usize) -> f32 {
        self.weights[ky * self.size + kx]
    }

    /// Sum of all weights. Kernels summing to 1 preserve flat regions.
    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// 3×3 mean filter, every weight 1/9.
    pub fn box_blur() -> Self {
        Self::fixed([[1.0 / 9.0; 3]; 3])
    }

    /// 3×3 binomial blur: `[1 2 1]ᵀ·[1 2 1] / 16`.
    pub fn gaussian_blur() -> Self {
        Self::fixed([
            [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
            [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
            [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
        ])
    }

    /// 3×3 Laplacian-style edge detector: center 8, neighbours -1.
    pub fn outline() -> Self {
        Self::fixed([[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]])
    }

    /// 3×3 diagonal relief.
    pub fn emboss() -> Self {
        Self::fixed([[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]])
    }

    /// 3×3 sharpen: center 5, four-neighbours -1.
    pub fn sharpen() -> Self {
        Self::fixed([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]])
    }

    fn fixed(rows: [[f32; 3]; 3]) -> Self {
        Self {
            size: 3,
            weights: rows.iter().flatten().copied().collect(),
        }
    }
}

/// The built-in 3×3 kernels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KernelPreset {
    BoxBlur,
    GaussianBlur,
    Outline,
    Emboss,
    Sharpen,
}

impl KernelPreset {
    pub const ALL: [KernelPreset; 5] = [
        Self::BoxBlur,
        Self::GaussianBlur,
        Self::Outline,
        Self::Emboss,
        Self::Sharpen,
    ];

    pub fn kernel(self) -> Kernel {
        match self {
            Self::BoxBlur => Kernel::box_blur(),
            Self::GaussianBlur => Kernel::gaussian_blur(),
            Self::Outline => Kernel::outline(),
            Self::Emboss => Kernel::emboss(),
            Self::Sharpen => Kernel::sharpen(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::BoxBlur => "box blur",
            Self::GaussianBlur => "gaussian blur",
            Self::Outline => "outline",
            Self::Emboss => "emboss",
            Self::Sharpen => "sharpen",
        }
    }
}

impl fmt::Display for KernelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convolve `buf` with `kernel` in place.
///
/// Only interior pixels (`n <= x < width - n`, `n <= y < height - n`, with
/// `n = kernel.radius()`) are written; the border is left as is. All reads
/// come from a snapshot taken before the pass. The kernel is applied flipped:
/// cell `(kx, ky)` weighs source pixel `(x - (kx - n), y - (ky - n))`.
/// Channels accumulate in `f32` and are rounded and clamped to `0..=255`.
pub fn apply_kernel<T: Pixel>(buf: &mut PixelBuffer<T>, kernel: &Kernel) {
    let n = kernel.radius();
    let size = kernel.size();
    let (w, h) = (buf.width(), buf.height());
    if w < size || h < size {
        log::trace!("{w}x{h} image has no interior for a {size}x{size} kernel");
        return;
    }

    let src = buf.pixels().to_vec();
    for y in n..h - n {
        let out = buf.row_mut(y);
        for x in n..w - n {
            let mut sums = [0f32; 4];
            for ky in 0..size {
                let sy = y + n - ky;
                let src_row = &src[sy * w..(sy + 1) * w];
                for kx in 0..size {
                    let weight = kernel.weight(kx, ky);
                    let px = src_row[x + n - kx];
                    for (c, sum) in sums.iter_mut().enumerate().take(T::CHANNELS) {
                        *sum += f32::from(px.channel(c)) * weight;
                    }
                }
            }
            out[x] = T::from_channels(|c| super::to_byte(sums[c]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGB8;

    fn noise(w: usize, h: usize) -> PixelBuffer<u8> {
        let mut state: u32 = 0xDEAD_BEEF;
        PixelBuffer::from_fn(w, h, |_, _| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .unwrap()
    }

    #[test]
    fn rejects_bad_kernels() {
        assert!(matches!(Kernel::new(2, vec![0.25; 4]), Err(BmpError::InvalidKernel(_))));
        assert!(matches!(Kernel::new(0, vec![1.0]), Err(BmpError::InvalidKernel(_))));
        assert!(matches!(Kernel::new(3, vec![]), Err(BmpError::InvalidKernel(_))));
        assert!(matches!(Kernel::new(3, vec![1.0; 8]), Err(BmpError::InvalidKernel(_))));
        assert!(matches!(
            Kernel::new(1, vec![f32::INFINITY]),
            Err(BmpError::InvalidKernel(_))
        ));
        assert!(Kernel::new(5, vec![0.04; 25]).is_ok());
    }

    #[test]
    fn presets_are_valid_3x3() {
        for preset in KernelPreset::ALL {
            let k = preset.kernel();
            assert_eq!(k.size(), 3);
            assert_eq!(k, Kernel::new(3, k.weights().to_vec()).unwrap());
        }
        assert!((Kernel::box_blur().sum() - 1.0).abs() < 1e-6);
        assert!((Kernel::gaussian_blur().sum() - 1.0).abs() < 1e-6);
        assert!((Kernel::sharpen().sum() - 1.0).abs() < 1e-6);
        assert_eq!(Kernel::outline().sum(), 0.0);
    }

    #[test]
    fn border_untouched() {
        let original = noise(9, 7);
        for preset in KernelPreset::ALL {
            let mut buf = original.clone();
            apply_kernel(&mut buf, &preset.kernel());
            for y in 0..7 {
                for x in 0..9 {
                    if x < 1 || x >= 8 || y < 1 || y >= 6 {
                        assert_eq!(buf.get(x, y), original.get(x, y), "{preset} at ({x},{y})");
                    }
                }
            }
        }
    }

    #[test]
    fn box_blur_constant_is_noop() {
        let original = PixelBuffer::filled(6, 5, RGB8::new(37, 128, 250)).unwrap();
        let mut buf = original.clone();
        apply_kernel(&mut buf, &Kernel::box_blur());
        assert_eq!(buf, original);
    }

    #[test]
    fn kernel_is_flipped() {
        // Only the top-left weight is non-zero. With true convolution it
        // picks up the pixel at (x + 1, y + 1).
        let kernel = Kernel::from_rows([[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]).unwrap();
        let mut buf = PixelBuffer::from_fn(3, 3, |x, y| (y * 3 + x) as u8 * 10).unwrap();
        apply_kernel(&mut buf, &kernel);
        assert_eq!(buf.get(1, 1), 80);
    }

    #[test]
    fn reads_from_snapshot() {
        // Shift-left kernel: each interior pixel takes its right neighbour.
        // Reading the live buffer would smear one value across the row.
        let kernel = Kernel::from_rows([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]).unwrap();
        let mut buf = PixelBuffer::from_fn(5, 3, |x, _| x as u8).unwrap();
        apply_kernel(&mut buf, &kernel);
        assert_eq!(buf.row(1), &[0, 2, 3, 4, 4]);
    }

    #[test]
    fn sharpen_clamps() {
        let mut buf = PixelBuffer::filled(3, 3, 0u8).unwrap();
        buf.set(1, 1, 200);
        apply_kernel(&mut buf, &Kernel::sharpen());
        assert_eq!(buf.get(1, 1), 255);

        let mut buf = PixelBuffer::filled(3, 3, 200u8).unwrap();
        buf.set(1, 1, 0);
        apply_kernel(&mut buf, &Kernel::sharpen());
        assert_eq!(buf.get(1, 1), 0);
    }

    #[test]
    fn too_small_for_kernel() {
        let original = noise(2, 5);
        let mut buf = original.clone();
        apply_kernel(&mut buf, &Kernel::outline());
        assert_eq!(buf, original);
    }

    #[test]
    fn rgb_channels_independent() {
        let mut buf = PixelBuffer::filled(3, 3, RGB8::new(90, 0, 18)).unwrap();
        buf.set(1, 1, RGB8::new(0, 90, 9));
        apply_kernel(&mut buf, &Kernel::box_blur());
        // (8*90 + 0)/9 = 80, 90/9 = 10, (8*18 + 9)/9 = 17
        assert_eq!(buf.get(1, 1), RGB8::new(80, 10, 17));
    }
}
