//! Histogram equalization.
//!
//! Grayscale images are equalized directly. Color images are equalized on
//! the luma (Y) channel of a YUV decomposition so hue and saturation are
//! preserved.

use rgb::RGB8;

use super::to_byte;
use crate::buffer::PixelBuffer;

/// Count of each byte value.
pub type Histogram = [u64; 256];

/// Intensity remapping table.
pub type EqualizationMap = [u8; 256];

/// Count occurrences of each value `0..=255` in `samples`.
pub fn compute_histogram(samples: &[u8]) -> Histogram {
    let mut hist = [0u64; 256];
    for &s in samples {
        hist[usize::from(s)] += 1;
    }
    hist
}

/// Running sum of `hist`: `cdf[i] = hist[0] + ... + hist[i]`.
pub fn cumulative(hist: &Histogram) -> Histogram {
    let mut cdf = [0u64; 256];
    let mut acc = 0u64;
    for (c, &h) in cdf.iter_mut().zip(hist) {
        acc += h;
        *c = acc;
    }
    cdf
}

/// Build the equalization map for a histogram of `total_pixels` samples.
///
/// `cdf_min` is the cumulative count at the lowest intensity present.
/// Each level maps to `round((cdf[i] - cdf_min) / (total - cdf_min) * 255)`,
/// clamped to `0..=255`, which makes the map monotonic non-decreasing. When
/// every pixel has the same intensity (`total == cdf_min`) the identity map
/// is returned.
pub fn equalization_map(hist: &Histogram, total_pixels: u64) -> EqualizationMap {
    let cdf = cumulative(hist);
    let cdf_min = hist
        .iter()
        .position(|&h| h > 0)
        .map_or(0, |level| cdf[level]);

    let mut map = identity_map();
    if total_pixels == cdf_min {
        return map;
    }

    let range = total_pixels as f64 - cdf_min as f64;
    for (m, &c) in map.iter_mut().zip(&cdf) {
        let scaled = (c as f64 - cdf_min as f64) / range * 255.0;
        *m = scaled.round().clamp(0.0, 255.0) as u8;
    }
    map
}

/// `map[i] == i` for every level.
pub fn identity_map() -> EqualizationMap {
    core::array::from_fn(|i| i as u8)
}

pub fn is_identity(map: &EqualizationMap) -> bool {
    map.iter().enumerate().all(|(i, &m)| usize::from(m) == i)
}

/// Equalize a grayscale buffer in place.
pub fn equalize8(buf: &mut PixelBuffer<u8>) {
    let hist = compute_histogram(buf.pixels());
    let map = equalization_map(&hist, buf.len() as u64);
    if is_identity(&map) {
        return;
    }
    for px in buf.pixels_mut() {
        *px = map[usize::from(*px)];
    }
}

/// A pixel in the YUV color space (BT.601 analog coefficients).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Yuv {
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

impl Yuv {
    pub fn from_rgb(px: RGB8) -> Self {
        let (r, g, b) = (f32::from(px.r), f32::from(px.g), f32::from(px.b));
        Self {
            y: 0.299 * r + 0.587 * g + 0.114 * b,
            u: -0.14713 * r - 0.28886 * g + 0.436 * b,
            v: 0.615 * r - 0.51499 * g - 0.10001 * b,
        }
    }

    /// Inverse transform; each channel is rounded and clamped to `0..=255`.
    pub fn to_rgb(self) -> RGB8 {
        let r = self.y + 1.13983 * self.v;
        let g = self.y - 0.39465 * self.u - 0.58060 * self.v;
        let b = self.y + 2.03211 * self.u;
        RGB8::new(to_byte(r), to_byte(g), to_byte(b))
    }

    /// Luma rounded and clamped to a byte, the histogram bucket of this pixel.
    #[inline]
    pub fn luma_byte(self) -> u8 {
        to_byte(self.y)
    }
}

/// Equalize a color buffer in place by remapping luma only.
///
/// U and V are kept as computed from the original pixel; Y is replaced by
/// the mapped value of its rounded byte.
pub fn equalize24(buf: &mut PixelBuffer<RGB8>) {
    let yuv: Vec<Yuv> = buf.pixels().iter().map(|&px| Yuv::from_rgb(px)).collect();
    let luma: Vec<u8> = yuv.iter().map(|p| p.luma_byte()).collect();

    let hist = compute_histogram(&luma);
    let map = equalization_map(&hist, luma.len() as u64);
    if is_identity(&map) {
        return;
    }

    for ((px, mut p), &l) in buf.pixels_mut().iter_mut().zip(yuv).zip(&luma) {
        p.y = f32::from(map[usize::from(l)]);
        *px = p.to_rgb();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts() {
        let hist = compute_histogram(&[0, 0, 7, 255, 7, 7]);
        assert_eq!(hist[0], 2);
        assert_eq!(hist[7], 3);
        assert_eq!(hist[255], 1);
        assert_eq!(hist.iter().sum::<u64>(), 6);
        let cdf = cumulative(&hist);
        assert_eq!(cdf[0], 2);
        assert_eq!(cdf[6], 2);
        assert_eq!(cdf[7], 5);
        assert_eq!(cdf[255], 6);
    }

    #[test]
    fn worked_example_map() {
        let mut hist = [0u64; 256];
        hist[52] = 1;
        hist[100] = 40;
        hist[154] = 23;
        let map = equalization_map(&hist, 64);
        assert_eq!(map[52], 0);
        // 40 / 63 * 255 = 161.9
        assert_eq!(map[100], 162);
        assert_eq!(map[154], 255);
        assert_eq!(map[0], 0);
        assert_eq!(map[255], 255);
        assert!(map.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn single_intensity_is_identity() {
        let mut hist = [0u64; 256];
        hist[90] = 12;
        assert!(is_identity(&equalization_map(&hist, 12)));
        assert!(is_identity(&equalization_map(&[0; 256], 0)));

        let original = PixelBuffer::filled(4, 3, 90u8).unwrap();
        let mut buf = original.clone();
        equalize8(&mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn equalize8_stretches_range() {
        let mut buf = PixelBuffer::from_fn(8, 8, |x, _| 100 + x as u8).unwrap();
        equalize8(&mut buf);
        assert_eq!(buf.get(0, 0), 0);
        assert_eq!(buf.get(7, 0), 255);
        for row in buf.rows() {
            assert!(row.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn yuv_roundtrip_close() {
        for &px in &[
            RGB8::new(0, 0, 0),
            RGB8::new(255, 255, 255),
            RGB8::new(200, 30, 90),
            RGB8::new(12, 250, 128),
        ] {
            let back = Yuv::from_rgb(px).to_rgb();
            assert!(px.r.abs_diff(back.r) <= 1, "{px:?} -> {back:?}");
            assert!(px.g.abs_diff(back.g) <= 1, "{px:?} -> {back:?}");
            assert!(px.b.abs_diff(back.b) <= 1, "{px:?} -> {back:?}");
        }
    }

    #[test]
    fn equalize24_gray_levels() {
        // Neutral grays have U = V ~ 0, so equalization acts like equalize8.
        let mut buf = PixelBuffer::from_fn(4, 2, |x, y| {
            let v = if (x + y) % 2 == 0 { 60 } else { 120 };
            RGB8::new(v, v, v)
        })
        .unwrap();
        equalize24(&mut buf);
        assert_eq!(buf.get(0, 0), RGB8::new(0, 0, 0));
        assert_eq!(buf.get(1, 0), RGB8::new(255, 255, 255));
    }

    #[test]
    fn equalize24_single_color_untouched() {
        let original = PixelBuffer::filled(5, 5, RGB8::new(200, 30, 90)).unwrap();
        let mut buf = original.clone();
        equalize24(&mut buf);
        assert_eq!(buf, original);
    }
}
