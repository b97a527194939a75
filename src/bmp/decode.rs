//! BMP decoder for uncompressed 24-bit and 32-bit bitmaps.
//!
//! Header validation runs to completion before a pixel buffer is allocated,
//! so a failed decode never yields a partially filled grid.

use alloc::vec;
use alloc::vec::Vec;
use core::slice::ChunksExact;

use enough::Stop;

use super::header::{BI_BITFIELDS, BI_RGB, BitmapHeader, HEADER_SIZE};
use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::Pixel;

// ── Permissiveness ──────────────────────────────────────────────────

/// Controls how strictly the BMP decoder validates input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permissiveness {
    /// Everything `Standard` checks, plus: the declared file size must equal
    /// the actual input length and the color plane count must be 1.
    Strict,

    /// Default behavior. Requires the `BM` tag, a supported bit depth and
    /// compression, and a declared file size that exactly matches
    /// `offset + stride * height`.
    #[default]
    Standard,

    /// Ignore the declared file size (some writers leave it 0) and the `BM`
    /// tag. The pixel array must still be fully present.
    Permissive,
}

// ── Header validation ───────────────────────────────────────────────

/// Parse and validate the header. Nothing is allocated here.
pub(crate) fn parse_bmp_header(
    data: &[u8],
    permissiveness: Permissiveness,
    limits: Option<&Limits>,
) -> Result<BitmapHeader, BitmapError> {
    let header = BitmapHeader::parse(data)?;
    log::debug!(
        "bmp header: {}x{} ({}), {} bpp, compression {}, offset {}, declared size {}",
        header.width,
        header.height,
        if header.top_down { "top-down" } else { "bottom-up" },
        header.bits_per_pixel,
        header.compression,
        header.pixel_offset,
        header.file_size,
    );

    if permissiveness != Permissiveness::Permissive && &data[0..2] != b"BM" {
        return Err(BitmapError::UnrecognizedFormat);
    }

    if permissiveness == Permissiveness::Strict {
        if header.planes != 1 {
            return Err(BitmapError::InvalidHeader(alloc::format!(
                "BMP color plane count must be 1, got {}",
                header.planes
            )));
        }
        if header.file_size as usize != data.len() {
            return Err(BitmapError::InvalidHeader(alloc::format!(
                "BMP file size field ({}) doesn't match actual size ({})",
                header.file_size,
                data.len()
            )));
        }
    }

    match header.bits_per_pixel {
        24 | 32 => {}
        other => {
            return Err(BitmapError::UnsupportedVariant(alloc::format!(
                "{other} bits per pixel (only 24 and 32 are supported)"
            )));
        }
    }

    match (header.compression, header.bits_per_pixel) {
        (BI_RGB, _) | (BI_BITFIELDS, 32) => {}
        (other, bpp) => {
            return Err(BitmapError::UnsupportedVariant(alloc::format!(
                "compression type {other} with {bpp} bits per pixel"
            )));
        }
    }

    if header.width == 0 || header.height == 0 {
        return Err(BitmapError::InvalidHeader(alloc::format!(
            "zero-sized image {}x{}",
            header.width,
            header.height
        )));
    }

    if (header.pixel_offset as usize) < HEADER_SIZE {
        return Err(BitmapError::InvalidHeader(alloc::format!(
            "pixel offset {} overlaps the {HEADER_SIZE}-byte header",
            header.pixel_offset
        )));
    }

    let expected = header.expected_file_size()?;
    if permissiveness != Permissiveness::Permissive && u64::from(header.file_size) != expected {
        return Err(BitmapError::SizeMismatch {
            declared: u64::from(header.file_size),
            expected,
        });
    }

    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }

    if (data.len() as u64) < expected {
        return Err(BitmapError::UnexpectedEof);
    }

    Ok(header)
}

// ── Pixel decode ────────────────────────────────────────────────────

/// Decode the pixel array described by a validated header into row-major
/// RGB, top row first.
pub(crate) fn decode_bmp_pixels(
    data: &[u8],
    header: &BitmapHeader,
    stop: &dyn Stop,
) -> Result<Vec<Pixel>, BitmapError> {
    let width = header.width as usize;
    let height = header.height as usize;
    let bpp = header.bytes_per_pixel();
    let stride = header.row_stride()?;
    let start = header.pixel_offset as usize;

    let pixel_data = data
        .get(start..start + stride * height)
        .ok_or(BitmapError::UnexpectedEof)?;

    let mut pixels = vec![Pixel::default(); width * height];
    let stored_rows = pixel_data.chunks_exact(stride);

    // Bottom-up files store the last visual row first.
    if header.top_down {
        fill_rows(pixels.chunks_exact_mut(width), stored_rows, width * bpp, bpp, stop)?;
    } else {
        fill_rows(pixels.rchunks_exact_mut(width), stored_rows, width * bpp, bpp, stop)?;
    }

    Ok(pixels)
}

fn fill_rows<'a>(
    out_rows: impl Iterator<Item = &'a mut [Pixel]>,
    stored_rows: ChunksExact<'_, u8>,
    line_bytes: usize,
    bpp: usize,
    stop: &dyn Stop,
) -> Result<(), BitmapError> {
    for (row_idx, (out, stored)) in out_rows.zip(stored_rows).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        // B, G, R, then any extra bytes (alpha / X) which are dropped.
        for (px, bgr) in out.iter_mut().zip(stored[..line_bytes].chunks_exact(bpp)) {
            *px = Pixel::new(bgr[2], bgr[1], bgr[0]);
        }
    }
    Ok(())
}
