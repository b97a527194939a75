use crate::error::BitmapError;
use crate::pixel::Pixel;

/// Resource limits applied while decoding, before any pixel buffer is
/// allocated.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for the decoded [`crate::PixelGrid`] buffer.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Limits that only cap the total pixel count.
    pub fn with_max_pixels(max_pixels: u64) -> Self {
        Self {
            max_pixels: Some(max_pixels),
            ..Self::default()
        }
    }

    /// Check a header's dimensions (and the grid they would allocate).
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), BitmapError> {
        if let Some(max_w) = self.max_width
            && u64::from(width) > max_w
        {
            return Err(BitmapError::LimitExceeded(alloc::format!(
                "width {width} exceeds limit {max_w}"
            )));
        }
        if let Some(max_h) = self.max_height
            && u64::from(height) > max_h
        {
            return Err(BitmapError::LimitExceeded(alloc::format!(
                "height {height} exceeds limit {max_h}"
            )));
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max_px) = self.max_pixels
            && pixels > max_px
        {
            return Err(BitmapError::LimitExceeded(alloc::format!(
                "pixel count {pixels} exceeds limit {max_px}"
            )));
        }
        let bytes = pixels.saturating_mul(core::mem::size_of::<Pixel>() as u64);
        if let Some(max_mem) = self.max_memory_bytes
            && bytes > max_mem
        {
            return Err(BitmapError::LimitExceeded(alloc::format!(
                "allocation {bytes} bytes exceeds memory limit {max_mem}"
            )));
        }
        Ok(())
    }
}
