//! BMP encoder: uncompressed 8-bit and 24-bit BMP.

use enough::Stop;
use rgb::RGB8;

use crate::buffer::PixelBuffer;
use crate::error::BmpError;
use crate::header::{
    COLOR_TABLE_LEN, FILE_HEADER_LEN, FileHeader, INFO_HEADER_LEN, InfoHeader, RowOrder,
    SIGNATURE,
};
use crate::image::{Image8, Image24};
use crate::pixel::{BitDepth, Pixel};

/// Encode an 8-bit image: headers, full color table, pixel rows.
pub(crate) fn encode_gray(img: &Image8, stop: &dyn Stop) -> Result<Vec<u8>, BmpError> {
    let (file, info) = sync_headers(
        &img.file_header,
        &img.info_header,
        &img.pixels,
        BitDepth::Gray8,
    )?;
    let mut out = start_file(&file, &info)?;
    out.extend_from_slice(img.color_table.as_bytes());
    write_rows(&mut out, &img.pixels, BitDepth::Gray8, info.row_order(), stop, |out, row| {
        out.extend_from_slice(row);
    })?;
    Ok(out)
}

/// Encode a 24-bit image, writing each pixel as B, G, R.
pub(crate) fn encode_rgb(img: &Image24, stop: &dyn Stop) -> Result<Vec<u8>, BmpError> {
    let (file, info) = sync_headers(
        &img.file_header,
        &img.info_header,
        &img.pixels,
        BitDepth::Rgb24,
    )?;
    let mut out = start_file(&file, &info)?;
    write_rows(&mut out, &img.pixels, BitDepth::Rgb24, info.row_order(), stop, |out, row: &[RGB8]| {
        for px in row {
            out.extend_from_slice(&[px.b, px.g, px.r]);
        }
    })?;
    Ok(out)
}

/// Copy the stored headers, recomputing every field that describes layout:
/// header size, geometry, depth, compression, pixel offset, image size and
/// file size. The height sign, reserved words, resolution and color counts
/// are kept as stored.
fn sync_headers<T: Pixel>(
    file: &FileHeader,
    info: &InfoHeader,
    pixels: &PixelBuffer<T>,
    depth: BitDepth,
) -> Result<(FileHeader, InfoHeader), BmpError> {
    let (w, h) = (pixels.width(), pixels.height());
    let too_large = || BmpError::DimensionsTooLarge {
        width: w as u64,
        height: h as u64,
    };
    let width = i32::try_from(w).map_err(|_| too_large())?;
    let height = i32::try_from(h).map_err(|_| too_large())?;
    let image_size = depth
        .row_stride(w)
        .and_then(|s| s.checked_mul(h))
        .and_then(|s| u32::try_from(s).ok())
        .ok_or_else(too_large)?;
    let table_len = match depth {
        BitDepth::Gray8 => COLOR_TABLE_LEN,
        BitDepth::Rgb24 => 0,
    };
    let pixel_offset = (FILE_HEADER_LEN + INFO_HEADER_LEN + table_len) as u32;
    let file_size = pixel_offset.checked_add(image_size).ok_or_else(too_large)?;

    let file = FileHeader {
        signature: SIGNATURE,
        file_size,
        pixel_offset,
        ..*file
    };
    let info = InfoHeader {
        header_size: INFO_HEADER_LEN as u32,
        width,
        height: match info.row_order() {
            RowOrder::BottomUp => height,
            RowOrder::TopDown => -height,
        },
        bits_per_pixel: depth.bits_per_pixel(),
        compression: 0,
        image_size,
        ..*info
    };
    Ok((file, info))
}

fn start_file(file: &FileHeader, info: &InfoHeader) -> Result<Vec<u8>, BmpError> {
    let capacity = file.file_size as usize;
    let mut out = Vec::new();
    out.try_reserve_exact(capacity)
        .map_err(|_| BmpError::Allocation { bytes: capacity })?;
    out.extend_from_slice(&file.to_bytes());
    out.extend_from_slice(&info.to_bytes());
    Ok(out)
}

/// Write rows in on-disk order, each followed by zero padding to a 4-byte
/// boundary.
fn write_rows<T: Pixel>(
    out: &mut Vec<u8>,
    pixels: &PixelBuffer<T>,
    depth: BitDepth,
    order: RowOrder,
    stop: &dyn Stop,
    mut write_row: impl FnMut(&mut Vec<u8>, &[T]),
) -> Result<(), BmpError> {
    let (w, h) = (pixels.width(), pixels.height());
    let row_bytes = w * depth.bytes_per_pixel();
    let pad = depth.row_stride(w).unwrap_or(row_bytes) - row_bytes;
    for file_row in 0..h {
        if file_row % 16 == 0 {
            stop.check()?;
        }
        write_row(out, pixels.row(order.buffer_row(file_row, h)));
        out.extend(core::iter::repeat_n(0u8, pad));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    #[test]
    fn rgb_layout_bytes() {
        let mut img = Image24::new(1, 2).unwrap();
        img.pixels.set(0, 0, RGB8::new(1, 2, 3)); // top
        img.pixels.set(0, 1, RGB8::new(4, 5, 6)); // bottom
        let bytes = encode_rgb(&img, &Unstoppable).unwrap();
        assert_eq!(bytes.len(), 54 + 8);
        assert_eq!(&bytes[2..6], &62u32.to_le_bytes());
        // Bottom-up: bottom row first, BGR, one pad byte.
        assert_eq!(&bytes[54..62], &[6, 5, 4, 0, 3, 2, 1, 0]);
    }

    #[test]
    fn gray_layout_bytes() {
        let mut img = Image8::with_row_order(
            PixelBuffer::from_vec(vec![10, 20, 30, 40, 50, 60], 3, 2).unwrap(),
            RowOrder::TopDown,
        )
        .unwrap();
        img.color_table.0[4] = 0xAB;
        let bytes = encode_gray(&img, &Unstoppable).unwrap();
        assert_eq!(bytes.len(), 1078 + 8);
        assert_eq!(bytes[54 + 4], 0xAB);
        assert_eq!(&bytes[1078..], &[10, 20, 30, 0, 40, 50, 60, 0]);
    }

    #[test]
    fn layout_fields_resynced() {
        let mut img = Image24::new(3, 3).unwrap();
        img.file_header.file_size = 1;
        img.file_header.pixel_offset = 9999;
        img.file_header.reserved1 = 0x1234;
        img.info_header.image_size = 0;
        img.info_header.height = -100;
        img.info_header.x_resolution = 42;
        let bytes = encode_rgb(&img, &Unstoppable).unwrap();
        let file = FileHeader::parse(&bytes).unwrap();
        let info = InfoHeader::parse(&bytes).unwrap();
        assert_eq!(file.pixel_offset, 54);
        assert_eq!(file.file_size as usize, bytes.len());
        assert_eq!(file.reserved1, 0x1234);
        assert_eq!(info.image_size, 12 * 3);
        assert_eq!(info.height, -3);
        assert_eq!(info.x_resolution, 42);
    }
}
