#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn bmp(width: i32, height: i32, bpp: u16, compression: u32, pixels: &[u8]) -> Vec<u8> {
    let size = 54 + pixels.len() as u32;
    let mut out = vec![0u8; 54];
    out[0] = b'B';
    out[1] = b'M';
    out[2..6].copy_from_slice(&size.to_le_bytes()); // file size
    out[10..14].copy_from_slice(&54u32.to_le_bytes()); // data offset
    out[14..18].copy_from_slice(&40u32.to_le_bytes()); // info header size
    out[18..22].copy_from_slice(&width.to_le_bytes());
    out[22..26].copy_from_slice(&height.to_le_bytes());
    out[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    out[28..30].copy_from_slice(&bpp.to_le_bytes());
    out[30..34].copy_from_slice(&compression.to_le_bytes());
    out[38..42].copy_from_slice(&2835u32.to_le_bytes());
    out[42..46].copy_from_slice(&2835u32.to_le_bytes());
    out.extend_from_slice(pixels);
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 1x1 24-bit: 3 bytes BGR + 1 padding
    fs::write(format!("{dir}/bmp_1x1.bmp"), bmp(1, 1, 24, 0, &[0, 0, 0xff, 0])).unwrap();

    // 2x2 24-bit: rows of 6 bytes padded to 8
    let rows = [0u8, 0, 0xff, 0, 0xff, 0, 0, 0, 0xff, 0, 0, 0x80, 0x80, 0x80, 0, 0];
    fs::write(format!("{dir}/bmp_2x2.bmp"), bmp(2, 2, 24, 0, &rows)).unwrap();

    // 2x1 top-down 32-bit
    let rows = [1u8, 2, 3, 0xff, 4, 5, 6, 0xff];
    fs::write(format!("{dir}/bmp_topdown_32.bmp"), bmp(2, -1, 32, 3, &rows)).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    let mut truncated = bmp(4, 4, 24, 0, &[0u8; 48]);
    truncated.truncate(70);
    fs::write(format!("{dir}/bmp_truncated.bin"), truncated).unwrap();
    fs::write(format!("{dir}/bmp_8bit.bin"), bmp(1, 1, 8, 0, &[0, 0, 0, 0])).unwrap();

    println!("Generated seed corpus in {dir}/");
}
