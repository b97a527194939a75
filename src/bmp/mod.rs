//! BMP codec (internal).
//!
//! Use top-level [`crate::decode_bmp`], [`crate::encode_bmp`], or
//! [`crate::DecodeRequest`].

mod decode;
mod encode;
mod header;

pub use decode::Permissiveness;

use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::PixelGrid;
use alloc::vec::Vec;
use enough::Stop;

/// Decode BMP data into a grid.
pub(crate) fn decode(
    data: &[u8],
    permissiveness: Permissiveness,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<PixelGrid, BitmapError> {
    let header = decode::parse_bmp_header(data, permissiveness, limits)?;
    stop.check()?;
    let pixels = decode::decode_bmp_pixels(data, &header, stop)?;
    PixelGrid::new(pixels, header.width as usize, header.height as usize)
}

/// Encode a grid to 24-bit BMP.
pub(crate) fn encode(grid: &PixelGrid, stop: &dyn Stop) -> Result<Vec<u8>, BitmapError> {
    encode::encode_bmp(grid, stop)
}

/// Raw values of every numeric header field, in file order.
///
/// No validation beyond requiring the full 54-byte header.
pub fn header_fields(data: &[u8]) -> Result<Vec<(&'static str, u32)>, BitmapError> {
    if data.len() < header::HEADER_SIZE {
        return Err(BitmapError::UnexpectedEof);
    }
    header::FIELDS
        .iter()
        .map(|field| Ok((field.name, field.read(data)?)))
        .collect()
}
