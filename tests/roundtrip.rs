use bmpfilter::*;

/// Build a BMP by hand. `stored_rows` are in file order (bottom row first
/// unless `height` is negative) and hold `bpp / 8` bytes per pixel in B, G,
/// R(, X) order, without padding.
fn handmade_bmp(width: u32, height: i32, bpp: u16, stored_rows: &[Vec<u8>]) -> Vec<u8> {
    let line = width as usize * usize::from(bpp / 8);
    let pad = (4 - line % 4) % 4;
    let pixel_bytes = (line + pad) * stored_rows.len();
    let file_size = 54 + pixel_bytes;

    let mut out = Vec::with_capacity(file_size);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(&54u32.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&bpp.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(pixel_bytes as u32).to_le_bytes());
    out.extend_from_slice(&2835u32.to_le_bytes());
    out.extend_from_slice(&2835u32.to_le_bytes());
    out.extend_from_slice(&[0u8; 8]);
    for row in stored_rows {
        assert_eq!(row.len(), line);
        out.extend_from_slice(row);
        out.extend(std::iter::repeat_n(0u8, pad));
    }
    out
}

fn grid(rows: &[&[(u8, u8, u8)]]) -> PixelGrid {
    PixelGrid::from_rows(
        rows.iter()
            .map(|row| row.iter().map(|&(r, g, b)| Pixel::new(r, g, b)).collect())
            .collect(),
    )
    .unwrap()
}

fn noise_grid(width: usize, height: usize) -> PixelGrid {
    let mut state: u32 = 0xDEAD_BEEF;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state as u8
    };
    let pixels = (0..width * height)
        .map(|_| Pixel::new(next(), next(), next()))
        .collect();
    PixelGrid::new(pixels, width, height).unwrap()
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
}

// ── Encoder ─────────────────────────────────────────────────────────

#[test]
fn encoded_header_fields() {
    let g = grid(&[&[(1, 2, 3), (4, 5, 6)], &[(7, 8, 9), (10, 11, 12)]]);
    let bytes = encode_bmp(&g, Unstoppable).unwrap();

    // 2 px * 3 bytes = 6, padded to 8, times 2 rows
    assert_eq!(bytes.len(), 54 + 16);
    assert_eq!(&bytes[0..2], b"BM");
    assert_eq!(u32_at(&bytes, 2), 70);
    assert_eq!(u16_at(&bytes, 6), 0);
    assert_eq!(u16_at(&bytes, 8), 0);
    assert_eq!(u32_at(&bytes, 10), 54);
    assert_eq!(u32_at(&bytes, 14), 40);
    assert_eq!(u32_at(&bytes, 18), 2);
    assert_eq!(u32_at(&bytes, 22), 2);
    assert_eq!(u16_at(&bytes, 26), 1);
    assert_eq!(u16_at(&bytes, 28), 24);
    assert_eq!(u32_at(&bytes, 30), 0);
    assert_eq!(u32_at(&bytes, 34), 16);
    assert_eq!(u32_at(&bytes, 38), 2835);
    assert_eq!(u32_at(&bytes, 42), 2835);
    assert_eq!(u32_at(&bytes, 46), 0);
    assert_eq!(u32_at(&bytes, 50), 0);
}

#[test]
fn encoder_writes_bottom_row_first_in_bgr_with_zero_padding() {
    // 1 wide: 3 bytes per line, 1 padding byte
    let g = grid(&[&[(1, 2, 3)], &[(4, 5, 6)]]);
    let bytes = encode_bmp(&g, Unstoppable).unwrap();
    assert_eq!(&bytes[54..58], &[6, 5, 4, 0]);
    assert_eq!(&bytes[58..62], &[3, 2, 1, 0]);
}

#[test]
fn encoder_output_matches_handmade_file() {
    let g = grid(&[
        &[(255, 0, 0), (0, 255, 0), (0, 0, 255)],
        &[(128, 128, 128), (64, 64, 64), (0, 0, 0)],
    ]);
    let expected = handmade_bmp(
        3,
        2,
        24,
        &[
            vec![128, 128, 128, 64, 64, 64, 0, 0, 0],
            vec![0, 0, 255, 0, 255, 0, 255, 0, 0],
        ],
    );
    assert_eq!(encode_bmp(&g, Unstoppable).unwrap(), expected);
}

// ── Decoder ─────────────────────────────────────────────────────────

#[test]
fn decode_24bit_bottom_up() {
    let _ = env_logger::builder().is_test(true).try_init();
    let data = handmade_bmp(
        3,
        2,
        24,
        &[
            // bottom row
            vec![3, 2, 1, 6, 5, 4, 9, 8, 7],
            // top row
            vec![30, 20, 10, 60, 50, 40, 90, 80, 70],
        ],
    );
    let decoded = decode_bmp(&data, Unstoppable).unwrap();
    assert_eq!(decoded.width(), 3);
    assert_eq!(decoded.height(), 2);
    assert_eq!(
        decoded,
        grid(&[
            &[(10, 20, 30), (40, 50, 60), (70, 80, 90)],
            &[(1, 2, 3), (4, 5, 6), (7, 8, 9)],
        ])
    );
}

#[test]
fn decode_32bit_drops_fourth_byte() {
    let data = handmade_bmp(
        2,
        2,
        32,
        &[vec![3, 2, 1, 255, 6, 5, 4, 0], vec![9, 8, 7, 17, 12, 11, 10, 99]],
    );
    let decoded = decode_bmp(&data, Unstoppable).unwrap();
    assert_eq!(
        decoded,
        grid(&[&[(7, 8, 9), (10, 11, 12)], &[(1, 2, 3), (4, 5, 6)]])
    );
}

#[test]
fn decode_top_down() {
    let data = handmade_bmp(1, -2, 24, &[vec![3, 2, 1], vec![6, 5, 4]]);
    let decoded = decode_bmp(&data, Unstoppable).unwrap();
    assert_eq!(decoded, grid(&[&[(1, 2, 3)], &[(4, 5, 6)]]));
}

#[test]
fn roundtrip_every_padding_width() {
    for width in 1..=5 {
        let original = noise_grid(width, 3);
        let encoded = encode_bmp(&original, Unstoppable).unwrap();
        let decoded = decode_bmp(&encoded, Unstoppable).unwrap();
        assert_eq!(decoded, original, "width {width}");
    }
}

#[test]
fn reencode_reproduces_handmade_file() {
    let data = handmade_bmp(
        2,
        3,
        24,
        &[
            vec![1, 2, 3, 4, 5, 6],
            vec![7, 8, 9, 10, 11, 12],
            vec![13, 14, 15, 16, 17, 18],
        ],
    );
    let decoded = decode_bmp(&data, Unstoppable).unwrap();
    assert_eq!(encode_bmp(&decoded, Unstoppable).unwrap(), data);
}

// ── Validation ──────────────────────────────────────────────────────

#[test]
fn declared_size_mismatch_is_rejected() {
    let mut data = handmade_bmp(2, 2, 24, &[vec![0; 6], vec![0; 6]]);
    data[2..6].copy_from_slice(&71u32.to_le_bytes());
    match decode_bmp(&data, Unstoppable) {
        Err(BitmapError::SizeMismatch { declared, expected }) => {
            assert_eq!(declared, 71);
            assert_eq!(expected, 70);
        }
        other => panic!("expected SizeMismatch, got {other:?}"),
    }
}

#[test]
fn wrong_height_for_data_is_rejected() {
    let mut data = handmade_bmp(2, 2, 24, &[vec![0; 6], vec![0; 6]]);
    data[22..26].copy_from_slice(&3i32.to_le_bytes());
    assert!(matches!(
        decode_bmp(&data, Unstoppable),
        Err(BitmapError::SizeMismatch { .. })
    ));
}

#[test]
fn truncated_pixel_data() {
    let data = handmade_bmp(2, 2, 24, &[vec![0; 6], vec![0; 6]]);
    assert!(matches!(
        decode_bmp(&data[..data.len() - 1], Unstoppable),
        Err(BitmapError::UnexpectedEof)
    ));
    assert!(matches!(
        decode_bmp(&data[..20], Unstoppable),
        Err(BitmapError::UnexpectedEof)
    ));
}

#[test]
fn bad_magic() {
    let mut data = handmade_bmp(1, 1, 24, &[vec![1, 2, 3]]);
    data[0] = b'X';
    assert!(matches!(
        decode_bmp(&data, Unstoppable),
        Err(BitmapError::UnrecognizedFormat)
    ));
    let decoded = DecodeRequest::new(&data)
        .with_permissiveness(Permissiveness::Permissive)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(decoded[(0, 0)], Pixel::new(3, 2, 1));
}

#[test]
fn unsupported_bit_depth() {
    let data = handmade_bmp(4, 1, 8, &[vec![0, 1, 2, 3]]);
    assert!(matches!(
        decode_bmp(&data, Unstoppable),
        Err(BitmapError::UnsupportedVariant(_))
    ));
}

#[test]
fn rle_compression_is_unsupported() {
    let mut data = handmade_bmp(1, 1, 24, &[vec![1, 2, 3]]);
    data[30..34].copy_from_slice(&1u32.to_le_bytes());
    assert!(matches!(
        decode_bmp(&data, Unstoppable),
        Err(BitmapError::UnsupportedVariant(_))
    ));
}

#[test]
fn zero_width_is_invalid() {
    let mut data = handmade_bmp(1, 1, 24, &[vec![1, 2, 3]]);
    data[18..22].copy_from_slice(&0u32.to_le_bytes());
    assert!(matches!(
        decode_bmp(&data, Unstoppable),
        Err(BitmapError::InvalidHeader(_))
    ));
}

#[test]
fn zero_size_field_needs_permissive() {
    let mut data = handmade_bmp(1, 1, 24, &[vec![1, 2, 3]]);
    data[2..6].copy_from_slice(&0u32.to_le_bytes());
    assert!(matches!(
        decode_bmp(&data, Unstoppable),
        Err(BitmapError::SizeMismatch { .. })
    ));
    let decoded = DecodeRequest::new(&data)
        .with_permissiveness(Permissiveness::Permissive)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(decoded.pixels(), &[Pixel::new(3, 2, 1)]);
}

#[test]
fn strict_rejects_trailing_bytes() {
    let mut data = handmade_bmp(1, 1, 24, &[vec![1, 2, 3]]);
    data.extend_from_slice(&[0, 0]);
    assert!(decode_bmp(&data, Unstoppable).is_ok());
    assert!(matches!(
        DecodeRequest::new(&data)
            .with_permissiveness(Permissiveness::Strict)
            .decode(Unstoppable),
        Err(BitmapError::InvalidHeader(_))
    ));
}

#[test]
fn limits_reject_large() {
    let data = handmade_bmp(2, 2, 24, &[vec![0; 6], vec![0; 6]]);
    let limits = Limits::with_max_pixels(3);
    match DecodeRequest::new(&data)
        .with_limits(&limits)
        .decode(Unstoppable)
    {
        Err(BitmapError::LimitExceeded(_)) => {}
        other => panic!("expected LimitExceeded, got {other:?}"),
    }

    let tight = [
        Limits {
            max_memory_bytes: Some(11),
            ..Default::default()
        },
        Limits {
            max_width: Some(1),
            ..Default::default()
        },
        Limits {
            max_height: Some(1),
            ..Default::default()
        },
    ];
    for limits in &tight {
        match DecodeRequest::new(&data).with_limits(limits).decode(Unstoppable) {
            Err(BitmapError::LimitExceeded(_)) => {}
            other => panic!("{limits:?}: expected LimitExceeded, got {other:?}"),
        }
    }

    let exact = Limits {
        max_width: Some(2),
        max_height: Some(2),
        max_pixels: Some(4),
        max_memory_bytes: Some(12),
    };
    assert!(
        DecodeRequest::new(&data)
            .with_limits(&exact)
            .decode(Unstoppable)
            .is_ok()
    );
}

#[test]
fn header_fields_in_file_order() {
    let data = handmade_bmp(3, 2, 24, &[vec![0; 9], vec![0; 9]]);
    let fields = header_fields(&data).unwrap();
    assert_eq!(fields.len(), 15);
    assert_eq!(fields[0], ("file size", 54 + 24));
    assert!(fields.contains(&("width", 3)));
    assert!(fields.contains(&("height", 2)));
    assert!(fields.contains(&("bits per pixel", 24)));
    assert!(matches!(
        header_fields(&data[..53]),
        Err(BitmapError::UnexpectedEof)
    ));
}

// ── Files ───────────────────────────────────────────────────────────

#[test]
fn file_helpers_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.bmp");
    let original = noise_grid(7, 5);
    write_bmp_file(&path, &original).unwrap();
    assert_eq!(read_bmp_file(&path).unwrap(), original);
}

#[test]
fn unwritable_destination_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.bmp");
    let g = noise_grid(1, 1);
    assert!(matches!(
        write_bmp_file(&path, &g),
        Err(BitmapError::Io(_))
    ));
    assert!(!path.exists());
}

#[test]
fn missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_bmp_file(dir.path().join("nope.bmp")),
        Err(BitmapError::Io(_))
    ));
}

// ── Cancellation ────────────────────────────────────────────────────

/// Lets `budget` polls through, then reports cancellation.
struct CancelAfter {
    budget: std::sync::atomic::AtomicUsize,
}

impl CancelAfter {
    fn new(budget: usize) -> Self {
        Self {
            budget: std::sync::atomic::AtomicUsize::new(budget),
        }
    }
}

impl Stop for CancelAfter {
    fn check(&self) -> Result<(), StopReason> {
        use std::sync::atomic::Ordering;
        self.budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map(|_| ())
            .map_err(|_| StopReason::Cancelled)
    }
}

#[test]
fn cancelled_decode() {
    let data = encode_bmp(&noise_grid(3, 20), Unstoppable).unwrap();
    // before the pixel loop, then at its first row
    for budget in [0, 1] {
        assert!(matches!(
            decode_bmp(&data, CancelAfter::new(budget)),
            Err(BitmapError::Cancelled(StopReason::Cancelled))
        ));
    }
    // 20 rows poll at rows 0 and 16, plus once after the header
    assert!(decode_bmp(&data, CancelAfter::new(3)).is_ok());
}

#[test]
fn cancelled_encode() {
    let g = noise_grid(3, 20);
    // before the header, then at the first row
    for budget in [0, 1] {
        assert!(matches!(
            encode_bmp(&g, CancelAfter::new(budget)),
            Err(BitmapError::Cancelled(StopReason::Cancelled))
        ));
    }
    assert!(matches!(
        encode_bmp(&g, CancelAfter::new(2)),
        Err(BitmapError::Cancelled(_))
    ));
    assert!(encode_bmp(&g, CancelAfter::new(3)).is_ok());
}
