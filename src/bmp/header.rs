//! BMP header layout as a table of fields.
//!
//! Both the decoder and the encoder go through [`HeaderField::read`] and
//! [`HeaderField::write`]; no other code knows header offsets.

use crate::error::BitmapError;

/// Size of the file header (`BITMAPFILEHEADER`).
pub(crate) const FILE_HEADER_SIZE: usize = 14;
/// Size of the info header (`BITMAPINFOHEADER`).
pub(crate) const INFO_HEADER_SIZE: usize = 40;
/// Both headers together; also the pixel offset of every file we write.
pub(crate) const HEADER_SIZE: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

/// Print resolution written to every output file (72 DPI).
pub(crate) const PIXELS_PER_METER: u32 = 2835;

/// A little-endian integer field at a fixed byte offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HeaderField {
    pub name: &'static str,
    pub offset: usize,
    /// Width in bytes: 2 or 4.
    pub width: usize,
}

impl HeaderField {
    const fn new(name: &'static str, offset: usize, width: usize) -> Self {
        Self {
            name,
            offset,
            width,
        }
    }

    /// Read the field, least significant byte first.
    pub(crate) fn read(&self, data: &[u8]) -> Result<u32, BitmapError> {
        let bytes = data
            .get(self.offset..self.offset + self.width)
            .ok_or(BitmapError::UnexpectedEof)?;
        Ok(bytes
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
    }

    /// Write the low `width` bytes of `value`, least significant byte first.
    pub(crate) fn write(&self, out: &mut [u8; HEADER_SIZE], value: u32) {
        let le = value.to_le_bytes();
        out[self.offset..self.offset + self.width].copy_from_slice(&le[..self.width]);
    }
}

pub(crate) const FILE_SIZE: HeaderField = HeaderField::new("file size", 2, 4);
pub(crate) const RESERVED_1: HeaderField = HeaderField::new("reserved 1", 6, 2);
pub(crate) const RESERVED_2: HeaderField = HeaderField::new("reserved 2", 8, 2);
pub(crate) const PIXEL_OFFSET: HeaderField = HeaderField::new("pixel offset", 10, 4);
pub(crate) const INFO_SIZE: HeaderField = HeaderField::new("info header size", 14, 4);
pub(crate) const WIDTH: HeaderField = HeaderField::new("width", 18, 4);
pub(crate) const HEIGHT: HeaderField = HeaderField::new("height", 22, 4);
pub(crate) const PLANES: HeaderField = HeaderField::new("color planes", 26, 2);
pub(crate) const BITS_PER_PIXEL: HeaderField = HeaderField::new("bits per pixel", 28, 2);
pub(crate) const COMPRESSION: HeaderField = HeaderField::new("compression", 30, 4);
pub(crate) const IMAGE_SIZE: HeaderField = HeaderField::new("image size", 34, 4);
pub(crate) const X_PIXELS_PER_METER: HeaderField = HeaderField::new("x resolution", 38, 4);
pub(crate) const Y_PIXELS_PER_METER: HeaderField = HeaderField::new("y resolution", 42, 4);
pub(crate) const COLORS_USED: HeaderField = HeaderField::new("colors used", 46, 4);
pub(crate) const COLORS_IMPORTANT: HeaderField = HeaderField::new("important colors", 50, 4);

/// Every numeric field, in file order. The `BM` tag occupies bytes 0..2.
pub(crate) const FIELDS: [HeaderField; 15] = [
    FILE_SIZE,
    RESERVED_1,
    RESERVED_2,
    PIXEL_OFFSET,
    INFO_SIZE,
    WIDTH,
    HEIGHT,
    PLANES,
    BITS_PER_PIXEL,
    COMPRESSION,
    IMAGE_SIZE,
    X_PIXELS_PER_METER,
    Y_PIXELS_PER_METER,
    COLORS_USED,
    COLORS_IMPORTANT,
];

/// Compression: none.
pub(crate) const BI_RGB: u32 = 0;
/// Compression: channel masks. Accepted only for 32-bit input.
pub(crate) const BI_BITFIELDS: u32 = 3;

/// Bytes needed to pad a scan line of `line_bytes` to a multiple of 4.
pub(crate) const fn row_padding(line_bytes: usize) -> usize {
    (4 - line_bytes % 4) % 4
}

/// The header fields that drive decoding. Discarded once pixels are read.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BitmapHeader {
    pub file_size: u32,
    pub pixel_offset: u32,
    pub width: u32,
    /// Absolute row count.
    pub height: u32,
    /// Rows are stored top row first (negative height field).
    pub top_down: bool,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
}

impl BitmapHeader {
    /// Read all fields from the first 54 bytes. Performs no validation.
    pub(crate) fn parse(data: &[u8]) -> Result<Self, BitmapError> {
        if data.len() < HEADER_SIZE {
            return Err(BitmapError::UnexpectedEof);
        }
        let raw_height = HEIGHT.read(data)? as i32;
        Ok(Self {
            file_size: FILE_SIZE.read(data)?,
            pixel_offset: PIXEL_OFFSET.read(data)?,
            width: WIDTH.read(data)?,
            height: raw_height.unsigned_abs(),
            top_down: raw_height < 0,
            planes: PLANES.read(data)? as u16,
            bits_per_pixel: BITS_PER_PIXEL.read(data)? as u16,
            compression: COMPRESSION.read(data)?,
        })
    }

    pub(crate) fn bytes_per_pixel(&self) -> usize {
        usize::from(self.bits_per_pixel / 8)
    }

    /// Bytes of one stored row, padding included.
    pub(crate) fn row_stride(&self) -> Result<usize, BitmapError> {
        let line = (self.width as usize)
            .checked_mul(self.bytes_per_pixel())
            .ok_or(self.too_large())?;
        line.checked_add(row_padding(line)).ok_or(self.too_large())
    }

    /// File size implied by offset, stride and row count.
    pub(crate) fn expected_file_size(&self) -> Result<u64, BitmapError> {
        let pixel_bytes = (self.row_stride()? as u64)
            .checked_mul(u64::from(self.height))
            .ok_or(self.too_large())?;
        u64::from(self.pixel_offset)
            .checked_add(pixel_bytes)
            .ok_or(self.too_large())
    }

    fn too_large(&self) -> BitmapError {
        BitmapError::DimensionsTooLarge {
            width: self.width,
            height: self.height,
        }
    }
}
