#![no_main]
use bmpfilter::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must re-encode and decode to the same pixels
    let limits = Limits::with_max_pixels(1 << 22);
    let Ok(decoded) = DecodeRequest::new(data)
        .with_limits(&limits)
        .with_permissiveness(Permissiveness::Permissive)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    let reencoded = encode_bmp(&decoded, enough::Unstoppable).expect("decoded grid must encode");
    let decoded2 = DecodeRequest::new(&reencoded)
        .with_permissiveness(Permissiveness::Strict)
        .decode(enough::Unstoppable)
        .expect("re-encoded data failed to decode");

    assert_eq!(decoded.width(), decoded2.width());
    assert_eq!(decoded.height(), decoded2.height());
    assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
});
