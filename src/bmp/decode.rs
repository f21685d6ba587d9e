//! BMP decoder for uncompressed 8-bit and 24-bit images.

use enough::Stop;
use rgb::RGB8;

use crate::buffer::PixelBuffer;
use crate::error::BmpError;
use crate::header::{
    COLOR_TABLE_LEN, ColorTable, FILE_HEADER_LEN, FileHeader, INFO_HEADER_LEN, InfoHeader,
};
use crate::image::{Image8, Image24};
use crate::pixel::{BitDepth, Pixel};

// ── Cursor for reading from &[u8] ───────────────────────────────────

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn set_position(&mut self, pos: usize) -> Result<(), BmpError> {
        if pos > self.data.len() {
            return Err(BmpError::UnexpectedEof);
        }
        self.pos = pos;
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], BmpError> {
        let end = self.pos.checked_add(n).ok_or(BmpError::UnexpectedEof)?;
        let bytes = self.data.get(self.pos..end).ok_or(BmpError::UnexpectedEof)?;
        self.pos = end;
        Ok(bytes)
    }

    /// Skip up to `n` bytes; stops at end of input.
    fn skip_lenient(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n).min(self.data.len());
    }
}

// ── Parsed header info ──────────────────────────────────────────────

/// Validated headers plus the geometry derived from them.
pub(crate) struct BmpHeaders {
    pub file: FileHeader,
    pub info: InfoHeader,
    pub depth: BitDepth,
    pub width: usize,
    /// Absolute value of the stored height.
    pub height: usize,
}

/// Parse and validate the file header and info header.
pub(crate) fn parse_headers(data: &[u8]) -> Result<BmpHeaders, BmpError> {
    let file = FileHeader::parse(data)?;
    let info = InfoHeader::parse(data)?;

    if (info.header_size as usize) < INFO_HEADER_LEN {
        return Err(BmpError::InvalidHeader(format!(
            "unsupported BMP info header size: {}",
            info.header_size
        )));
    }
    let depth = BitDepth::from_bits(info.bits_per_pixel)
        .ok_or(BmpError::UnsupportedDepth(info.bits_per_pixel))?;
    if info.compression != 0 {
        return Err(BmpError::UnsupportedCompression(info.compression));
    }
    if info.planes != 1 {
        return Err(BmpError::InvalidHeader(format!(
            "BMP planes field is {}, expected 1",
            info.planes
        )));
    }
    if info.width <= 0 {
        return Err(BmpError::InvalidHeader(format!(
            "BMP width is {}",
            info.width
        )));
    }
    if info.height == 0 {
        return Err(BmpError::InvalidHeader("BMP height is zero".into()));
    }

    Ok(BmpHeaders {
        file,
        info,
        depth,
        width: info.width as usize,
        height: info.abs_height() as usize,
    })
}

// ── Pixel decoding ──────────────────────────────────────────────────

/// Decode an 8-bit image: color table, then one byte per pixel.
pub(crate) fn decode_gray(
    data: &[u8],
    headers: &BmpHeaders,
    stop: &dyn Stop,
) -> Result<Image8, BmpError> {
    let table_start = FILE_HEADER_LEN + headers.info.header_size as usize;
    // A short palette ends where the pixel array begins.
    let table_end = (headers.file.pixel_offset as usize)
        .clamp(table_start, table_start + COLOR_TABLE_LEN);
    let table_bytes = data
        .get(table_start..table_end)
        .ok_or(BmpError::UnexpectedEof)?;
    let color_table = ColorTable::from_partial(table_bytes);

    let pixels = read_rows(data, headers, stop, |src, out: &mut [u8]| {
        out.copy_from_slice(src);
    })?;

    Ok(Image8 {
        file_header: headers.file,
        info_header: headers.info,
        color_table,
        pixels,
    })
}

/// Decode a 24-bit image, swapping on-disk B, G, R to R, G, B.
pub(crate) fn decode_rgb(
    data: &[u8],
    headers: &BmpHeaders,
    stop: &dyn Stop,
) -> Result<Image24, BmpError> {
    let pixels = read_rows(data, headers, stop, |src, out: &mut [RGB8]| {
        for (px, bgr) in out.iter_mut().zip(src.chunks_exact(3)) {
            *px = RGB8::new(bgr[2], bgr[1], bgr[0]);
        }
    })?;

    Ok(Image24 {
        file_header: headers.file,
        info_header: headers.info,
        pixels,
    })
}

/// Read every stored row starting at the pixel offset into a buffer with
/// row 0 at the top, skipping the per-row padding.
fn read_rows<T: Pixel>(
    data: &[u8],
    headers: &BmpHeaders,
    stop: &dyn Stop,
    mut convert: impl FnMut(&[u8], &mut [T]),
) -> Result<PixelBuffer<T>, BmpError> {
    let (w, h) = (headers.width, headers.height);
    let too_large = BmpError::DimensionsTooLarge {
        width: w as u64,
        height: h as u64,
    };
    let row_bytes = w
        .checked_mul(headers.depth.bytes_per_pixel())
        .ok_or(too_large)?;
    // row_bytes fits, so the padded stride is at most row_bytes + 3.
    let pad = headers.depth.row_stride(w).unwrap_or(row_bytes) - row_bytes;

    // Fail on truncated input before allocating the output.
    let needed = (headers.file.pixel_offset as u64)
        .saturating_add(row_bytes as u64 * h as u64)
        .saturating_add(pad as u64 * (h as u64 - 1));
    if needed > data.len() as u64 {
        return Err(BmpError::UnexpectedEof);
    }

    let mut pixels = PixelBuffer::<T>::new(w, h)?;
    let order = headers.info.row_order();
    let mut cursor = Cursor::new(data);
    cursor.set_position(headers.file.pixel_offset as usize)?;

    for file_row in 0..h {
        if file_row % 16 == 0 {
            stop.check()?;
        }
        let src = cursor.take(row_bytes)?;
        convert(src, pixels.row_mut(order.buffer_row(file_row, h)));
        // The last row's padding may be missing in hand-written files.
        cursor.skip_lenient(pad);
    }

    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    /// 2x2 24-bit bottom-up file: bottom row red, green; top row blue, white.
    fn tiny_rgb() -> Vec<u8> {
        let mut bmp = vec![0u8; 54];
        bmp[0] = b'B';
        bmp[1] = b'M';
        bmp[2..6].copy_from_slice(&70u32.to_le_bytes());
        bmp[10..14].copy_from_slice(&54u32.to_le_bytes());
        bmp[14..18].copy_from_slice(&40u32.to_le_bytes());
        bmp[18..22].copy_from_slice(&2i32.to_le_bytes());
        bmp[22..26].copy_from_slice(&2i32.to_le_bytes());
        bmp[26..28].copy_from_slice(&1u16.to_le_bytes());
        bmp[28..30].copy_from_slice(&24u16.to_le_bytes());
        // disk row 0 (bottom): red, green + 2 padding bytes
        bmp.extend_from_slice(&[0, 0, 255, 0, 255, 0, 0xEE, 0xEE]);
        // disk row 1 (top): blue, white + padding
        bmp.extend_from_slice(&[255, 0, 0, 255, 255, 255, 0xEE, 0xEE]);
        bmp
    }

    #[test]
    fn rgb_bottom_up_flip_and_swap() {
        let data = tiny_rgb();
        let headers = parse_headers(&data).unwrap();
        let img = decode_rgb(&data, &headers, &Unstoppable).unwrap();
        assert_eq!(img.pixels.get(0, 0), RGB8::new(0, 0, 255));
        assert_eq!(img.pixels.get(1, 0), RGB8::new(255, 255, 255));
        assert_eq!(img.pixels.get(0, 1), RGB8::new(255, 0, 0));
        assert_eq!(img.pixels.get(1, 1), RGB8::new(0, 255, 0));
    }

    #[test]
    fn rgb_top_down_keeps_order() {
        let mut data = tiny_rgb();
        data[22..26].copy_from_slice(&(-2i32).to_le_bytes());
        let headers = parse_headers(&data).unwrap();
        let img = decode_rgb(&data, &headers, &Unstoppable).unwrap();
        assert_eq!(img.pixels.get(0, 0), RGB8::new(255, 0, 0));
        assert_eq!(img.pixels.get(0, 1), RGB8::new(0, 0, 255));
    }

    #[test]
    fn missing_final_padding_tolerated() {
        let mut data = tiny_rgb();
        data.truncate(data.len() - 2);
        let headers = parse_headers(&data).unwrap();
        assert!(decode_rgb(&data, &headers, &Unstoppable).is_ok());
        data.truncate(data.len() - 1);
        assert!(matches!(
            decode_rgb(&data, &headers, &Unstoppable),
            Err(BmpError::UnexpectedEof)
        ));
    }

    #[test]
    fn header_validation() {
        let mut data = tiny_rgb();
        data[28..30].copy_from_slice(&16u16.to_le_bytes());
        assert!(matches!(parse_headers(&data), Err(BmpError::UnsupportedDepth(16))));

        let mut data = tiny_rgb();
        data[30..34].copy_from_slice(&1u32.to_le_bytes());
        assert!(matches!(
            parse_headers(&data),
            Err(BmpError::UnsupportedCompression(1))
        ));

        let mut data = tiny_rgb();
        data[22..26].copy_from_slice(&0i32.to_le_bytes());
        assert!(matches!(parse_headers(&data), Err(BmpError::InvalidHeader(_))));

        let mut data = tiny_rgb();
        data[18..22].copy_from_slice(&(-2i32).to_le_bytes());
        assert!(matches!(parse_headers(&data), Err(BmpError::InvalidHeader(_))));

        let mut data = tiny_rgb();
        data[14..18].copy_from_slice(&12u32.to_le_bytes());
        assert!(matches!(parse_headers(&data), Err(BmpError::InvalidHeader(_))));

        let mut data = tiny_rgb();
        data[0] = b'X';
        assert!(matches!(parse_headers(&data), Err(BmpError::UnrecognizedFormat)));
    }

    #[test]
    fn short_color_table_zero_filled() {
        // 1x1 8-bit file whose palette holds only two entries.
        let mut bmp = vec![0u8; 54];
        bmp[0..2].copy_from_slice(b"BM");
        bmp[10..14].copy_from_slice(&62u32.to_le_bytes());
        bmp[14..18].copy_from_slice(&40u32.to_le_bytes());
        bmp[18..22].copy_from_slice(&1i32.to_le_bytes());
        bmp[22..26].copy_from_slice(&1i32.to_le_bytes());
        bmp[26..28].copy_from_slice(&1u16.to_le_bytes());
        bmp[28..30].copy_from_slice(&8u16.to_le_bytes());
        bmp.extend_from_slice(&[0, 0, 0, 0, 255, 255, 255, 0]);
        bmp.extend_from_slice(&[1, 0, 0, 0]);
        let headers = parse_headers(&bmp).unwrap();
        let img = decode_gray(&bmp, &headers, &Unstoppable).unwrap();
        assert_eq!(img.color_table.entry(1), [255, 255, 255, 0]);
        assert_eq!(img.color_table.entry(2), [0, 0, 0, 0]);
        assert_eq!(img.pixels.pixels(), &[1]);
    }
}
