#![no_main]
use bmpfilter::{DecodeRequest, Limits, Permissiveness};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic, at any permissiveness
    let _ = bmpfilter::decode_bmp(data, enough::Unstoppable);
    let _ = bmpfilter::header_fields(data);

    let limits = Limits::with_max_pixels(1 << 22);
    for permissiveness in [
        Permissiveness::Strict,
        Permissiveness::Standard,
        Permissiveness::Permissive,
    ] {
        let _ = DecodeRequest::new(data)
            .with_limits(&limits)
            .with_permissiveness(permissiveness)
            .decode(enough::Unstoppable);
    }
});
