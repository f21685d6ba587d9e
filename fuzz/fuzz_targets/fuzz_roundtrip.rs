#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbmpfx::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };
    let Ok(decoded) = DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    // Re-encoding syncs layout fields; pixels and color table must survive.
    let reencoded = encode(&decoded).expect("decoded image failed to encode");
    let decoded2 = decode(&reencoded).expect("re-encoded data failed to decode");
    match (&decoded, &decoded2) {
        (Image::Gray(a), Image::Gray(b)) => {
            assert_eq!(a.pixels, b.pixels, "roundtrip pixel mismatch");
            assert_eq!(a.color_table, b.color_table);
        }
        (Image::Rgb(a), Image::Rgb(b)) => assert_eq!(a.pixels, b.pixels, "roundtrip pixel mismatch"),
        _ => panic!("depth changed on roundtrip"),
    }

    // Canonical files roundtrip byte-exactly.
    assert_eq!(encode(&decoded2).unwrap(), reencoded);
});
