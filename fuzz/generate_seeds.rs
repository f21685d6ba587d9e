#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(width: i32, height: i32, bpp: u16, offset: u32, pixel_bytes: u32) -> Vec<u8> {
    let mut bmp = vec![0u8; offset as usize];
    bmp[0] = b'B'; bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&(offset + pixel_bytes).to_le_bytes()); // file size
    bmp[10..14].copy_from_slice(&offset.to_le_bytes()); // data offset
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes()); // DIB header size
    bmp[18..22].copy_from_slice(&width.to_le_bytes());
    bmp[22..26].copy_from_slice(&height.to_le_bytes());
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    bmp[28..30].copy_from_slice(&bpp.to_le_bytes());
    bmp[34..38].copy_from_slice(&pixel_bytes.to_le_bytes()); // image size
    bmp
}

fn main() {
    use std::fs;
    for target in ["fuzz_decode", "fuzz_roundtrip", "fuzz_filters"] {
        let dir = format!("fuzz/corpus/{target}");
        fs::create_dir_all(&dir).unwrap();

        // 24-bit 1x1 bottom-up
        let mut bmp = header(1, 1, 24, 54, 4);
        bmp.extend_from_slice(&[0xff, 0x00, 0x00, 0x00]); // BGR + pad
        fs::write(format!("{dir}/rgb_1x1.bmp"), bmp).unwrap();

        // 24-bit 3x3 top-down
        let mut bmp = header(3, -3, 24, 54, 36);
        for i in 0..3u8 {
            bmp.extend_from_slice(&[i, 40 * i, 80 * i, 7, 7, 7, 200, 100, i, 0, 0, 0]);
        }
        fs::write(format!("{dir}/rgb_3x3_topdown.bmp"), bmp).unwrap();

        // 8-bit 5x4 with grayscale table
        let mut bmp = header(5, 4, 8, 1078, 32);
        for i in 0..256usize {
            bmp[54 + i * 4..54 + i * 4 + 3].fill(i as u8);
        }
        for y in 0..4u8 {
            bmp.extend_from_slice(&[y * 60, 10, 20, 250, y, 0, 0, 0]);
        }
        fs::write(format!("{dir}/gray_5x4.bmp"), bmp).unwrap();

        // Truncated/malformed seeds for edge coverage
        fs::write(format!("{dir}/empty.bin"), b"").unwrap();
        fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
        fs::write(format!("{dir}/rgb_no_pixels.bmp"), header(4, 4, 24, 54, 48)).unwrap();
        fs::write(format!("{dir}/bpp16.bmp"), header(1, 1, 16, 54, 0)).unwrap();
    }

    println!("Generated seed corpus in fuzz/corpus/");
}
