//! BMP encoder: uncompressed 24-bit, bottom-up.

use alloc::vec::Vec;
use enough::Stop;

use super::header::{
    BI_RGB, BITS_PER_PIXEL, COLORS_IMPORTANT, COLORS_USED, COMPRESSION, FILE_SIZE, HEADER_SIZE,
    HEIGHT, IMAGE_SIZE, INFO_HEADER_SIZE, INFO_SIZE, PIXEL_OFFSET, PIXELS_PER_METER, PLANES,
    RESERVED_1, RESERVED_2, WIDTH, X_PIXELS_PER_METER, Y_PIXELS_PER_METER, row_padding,
};
use crate::error::BitmapError;
use crate::pixel::PixelGrid;

/// Encode a grid as a 24-bit BMP.
pub(crate) fn encode_bmp(grid: &PixelGrid, stop: &dyn Stop) -> Result<Vec<u8>, BitmapError> {
    let w = grid.width();
    let h = grid.height();
    let too_large = || BitmapError::DimensionsTooLarge {
        width: u32::try_from(w).unwrap_or(u32::MAX),
        height: u32::try_from(h).unwrap_or(u32::MAX),
    };

    // Width and height are signed 32-bit in the info header.
    let width = i32::try_from(w).map_err(|_| too_large())?;
    let height = i32::try_from(h).map_err(|_| too_large())?;

    let line_bytes = w.checked_mul(3).ok_or_else(too_large)?;
    let pad_bytes = row_padding(line_bytes);
    let pixel_data_size = (line_bytes + pad_bytes)
        .checked_mul(h)
        .ok_or_else(too_large)?;
    let file_size = pixel_data_size
        .checked_add(HEADER_SIZE)
        .ok_or_else(too_large)?;
    let file_size_field = u32::try_from(file_size).map_err(|_| too_large())?;

    stop.check()?;

    let mut out = Vec::with_capacity(file_size);
    out.extend_from_slice(&bmp_header(
        file_size_field,
        pixel_data_size as u32,
        width,
        height,
    ));

    for (row_idx, row) in grid.rows().rev().enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        for px in row {
            out.extend_from_slice(&[px.b, px.g, px.r]);
        }
        out.extend(core::iter::repeat_n(0u8, pad_bytes));
    }

    log::debug!("bmp encode: {w}x{h}, {file_size} bytes, {pad_bytes} padding bytes per row");
    Ok(out)
}

fn bmp_header(file_size: u32, pixel_data_size: u32, width: i32, height: i32) -> [u8; HEADER_SIZE] {
    let mut header = [0u8; HEADER_SIZE];
    header[0..2].copy_from_slice(b"BM");

    // File header
    FILE_SIZE.write(&mut header, file_size);
    RESERVED_1.write(&mut header, 0);
    RESERVED_2.write(&mut header, 0);
    PIXEL_OFFSET.write(&mut header, HEADER_SIZE as u32);

    // Info header (BITMAPINFOHEADER)
    INFO_SIZE.write(&mut header, INFO_HEADER_SIZE as u32);
    WIDTH.write(&mut header, width as u32);
    HEIGHT.write(&mut header, height as u32); // positive = bottom-up
    PLANES.write(&mut header, 1);
    BITS_PER_PIXEL.write(&mut header, 24);
    COMPRESSION.write(&mut header, BI_RGB);
    IMAGE_SIZE.write(&mut header, pixel_data_size);
    X_PIXELS_PER_METER.write(&mut header, PIXELS_PER_METER);
    Y_PIXELS_PER_METER.write(&mut header, PIXELS_PER_METER);
    COLORS_USED.write(&mut header, 0);
    COLORS_IMPORTANT.write(&mut header, 0);

    header
}
