//! Pixel and pixel grid types shared by the codec and the filters.

use alloc::vec::Vec;
use core::ops::Index;

use imgref::{ImgRef, ImgVec};
use rgb::ComponentBytes as _;

use crate::error::BitmapError;

/// One pixel: red, green and blue, 8 bits each.
pub type Pixel = rgb::RGB8;

/// Pure white.
pub const WHITE: Pixel = Pixel { r: 255, g: 255, b: 255 };
/// Pure black.
pub const BLACK: Pixel = Pixel { r: 0, g: 0, b: 0 };

/// A rectangular, non-empty grid of pixels.
///
/// Addressed by `(row, col)`: row 0 is the visual top of the image and
/// column 0 the left edge. Storage is row-major with no padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    pixels: Vec<Pixel>,
    width: usize,
    height: usize,
}

impl PixelGrid {
    /// Wrap a row-major pixel buffer.
    ///
    /// Fails with [`BitmapError::InvalidGrid`] if either dimension is zero or
    /// the buffer length is not `width * height`.
    pub fn new(pixels: Vec<Pixel>, width: usize, height: usize) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::InvalidGrid(alloc::format!(
                "{width}x{height} grid has no pixels"
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            BitmapError::InvalidGrid(alloc::format!("{width}x{height} overflows"))
        })?;
        if pixels.len() != expected {
            return Err(BitmapError::InvalidGrid(alloc::format!(
                "expected {expected} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Build a grid from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<Pixel>>) -> Result<Self, BitmapError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != width) {
            return Err(BitmapError::InvalidGrid(alloc::format!(
                "row {bad} has {} pixels, row 0 has {width}",
                rows[bad].len()
            )));
        }
        let pixels = rows.into_iter().flatten().collect();
        Self::new(pixels, width, height)
    }

    /// A grid where every pixel is `pixel`.
    pub fn filled(width: usize, height: usize, pixel: Pixel) -> Result<Self, BitmapError> {
        let len = width.saturating_mul(height);
        Self::new(alloc::vec![pixel; len], width, height)
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    ///
    /// Callers pass dimensions taken from an existing grid, so both are
    /// non-zero and already allocated once.
    pub(crate) fn from_fn(
        width: usize,
        height: usize,
        f: impl FnMut(usize, usize) -> Pixel,
    ) -> Self {
        debug_assert!(width > 0 && height > 0);
        let mut pixels = Vec::with_capacity(width * height);
        fill_cells(&mut pixels, width, height, f);
        Self {
            pixels,
            width,
            height,
        }
    }

    /// [`PixelGrid::from_fn`] for dimensions that did not come from an
    /// existing grid. Fails with [`BitmapError::DimensionsTooLarge`] instead
    /// of aborting when the buffer cannot be reserved.
    pub(crate) fn try_from_fn(
        width: usize,
        height: usize,
        f: impl FnMut(usize, usize) -> Pixel,
    ) -> Result<Self, BitmapError> {
        debug_assert!(width > 0 && height > 0);
        let too_large = || BitmapError::DimensionsTooLarge {
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(height).unwrap_or(u32::MAX),
        };
        let len = width.checked_mul(height).ok_or_else(too_large)?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| too_large())?;
        fill_cells(&mut pixels, width, height, f);
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Pixel> {
        if row < self.height && col < self.width {
            Some(self.pixels[row * self.width + col])
        } else {
            None
        }
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Pixel]> + ExactSizeIterator {
        self.pixels.chunks_exact(self.width)
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Interleaved `R, G, B` bytes in row-major order.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    pub fn into_pixels(self) -> Vec<Pixel> {
        self.pixels
    }

    /// Borrow as an [`imgref::ImgRef`]. No copy.
    pub fn as_imgref(&self) -> ImgRef<'_, Pixel> {
        ImgRef::new(&self.pixels, self.width, self.height)
    }

    /// Convert into an [`imgref::ImgVec`]. No copy.
    pub fn into_imgvec(self) -> ImgVec<Pixel> {
        ImgVec::new(self.pixels, self.width, self.height)
    }
}

fn fill_cells(
    pixels: &mut Vec<Pixel>,
    width: usize,
    height: usize,
    mut f: impl FnMut(usize, usize) -> Pixel,
) {
    for row in 0..height {
        for col in 0..width {
            pixels.push(f(row, col));
        }
    }
}

impl Index<(usize, usize)> for PixelGrid {
    type Output = Pixel;

    /// Index by `(row, col)`.
    fn index(&self, (row, col): (usize, usize)) -> &Pixel {
        assert!(
            row < self.height && col < self.width,
            "({row}, {col}) out of bounds for {}x{} grid",
            self.width,
            self.height
        );
        &self.pixels[row * self.width + col]
    }
}

impl TryFrom<ImgVec<Pixel>> for PixelGrid {
    type Error = BitmapError;

    /// Copies out of strided images; contiguous ones are moved.
    fn try_from(img: ImgVec<Pixel>) -> Result<Self, BitmapError> {
        let (width, height, stride) = (img.width(), img.height(), img.stride());
        if stride == width {
            let mut pixels = img.into_buf();
            pixels.truncate(width * height);
            return Self::new(pixels, width, height);
        }
        let buf = img.buf();
        let mut pixels = Vec::with_capacity(width * height);
        for row in 0..height {
            let start = row * stride;
            pixels.extend_from_slice(&buf[start..start + width]);
        }
        Self::new(pixels, width, height)
    }
}
