#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic
    let _ = zenbmpfx::decode(data);

    // Keep huge headers from dominating the run
    let limits = zenbmpfx::Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };
    let _ = zenbmpfx::DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable);
});
