#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbmpfx::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 16),
        ..Default::default()
    };
    let Ok(mut image) = DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };
    let (w, h) = (image.width(), image.height());

    // Filters must never panic or change geometry
    image.negative();
    image.brightness(i32::from(data.len() as u8) - 128);
    for preset in KernelPreset::ALL {
        image.apply_preset(preset);
    }
    image.equalize();
    match &mut image {
        Image::Gray(img) => img.threshold(128),
        Image::Rgb(img) => img.grayscale(),
    }
    assert_eq!((image.width(), image.height()), (w, h));
});
