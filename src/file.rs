use std::fs;
use std::path::Path;

use enough::Unstoppable;

use crate::decode::DecodeRequest;
use crate::error::BitmapError;
use crate::pixel::PixelGrid;

/// Read and decode a BMP file with default validation.
pub fn read_bmp_file(path: impl AsRef<Path>) -> Result<PixelGrid, BitmapError> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    log::debug!("read {} bytes from {}", data.len(), path.display());
    DecodeRequest::new(&data).decode(Unstoppable)
}

/// Encode `grid` and write it to `path`, replacing any existing file.
///
/// Nothing is written if encoding fails. A destination that cannot be
/// created or written yields [`BitmapError::Io`].
pub fn write_bmp_file(path: impl AsRef<Path>, grid: &PixelGrid) -> Result<(), BitmapError> {
    let path = path.as_ref();
    let bytes = crate::encode_bmp(grid, Unstoppable)?;
    fs::write(path, &bytes)?;
    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
