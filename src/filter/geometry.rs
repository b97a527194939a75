//! Rotation and enlargement. These read arbitrary source coordinates, so the
//! source grid is borrowed whole for the duration of the call.

use core::num::NonZeroU32;

use crate::error::BitmapError;
use crate::pixel::PixelGrid;

/// A clockwise rotation by a whole number of quarter turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rotation {
    quarter_turns: u8,
}

impl Rotation {
    /// Any count of clockwise quarter turns. Negative counts turn
    /// counter-clockwise; the result is reduced modulo 4.
    pub fn from_turns(turns: i32) -> Self {
        Self {
            quarter_turns: turns.rem_euclid(4) as u8,
        }
    }

    /// Clockwise rotation in degrees. Must be a multiple of 90.
    pub fn from_degrees(degrees: i32) -> Result<Self, BitmapError> {
        if degrees % 90 != 0 {
            return Err(BitmapError::InvalidParameter(alloc::format!(
                "rotation of {degrees} degrees is not a multiple of 90"
            )));
        }
        Ok(Self::from_turns(degrees / 90))
    }

    /// Clockwise quarter turns, `0..=3`.
    pub fn quarter_turns(self) -> u8 {
        self.quarter_turns
    }

    pub fn degrees(self) -> u16 {
        u16::from(self.quarter_turns) * 90
    }
}

/// How [`enlarge`] treats the output size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnlargeMode {
    /// Output is `height * scale` by `width * scale`; each source pixel
    /// becomes a `scale x scale` block.
    #[default]
    Magnify,
    /// Output keeps the input size. Cell `(row, col)` samples the source at
    /// `(row * scale, col * scale)`, clamped to the last row and column.
    Resample,
}

/// Rotate 90 degrees clockwise. Width and height swap.
pub fn rotate_90(grid: &PixelGrid) -> PixelGrid {
    let rows = grid.height();
    // out[col][rows - 1 - row] = in[row][col]
    PixelGrid::from_fn(rows, grid.width(), |row, col| grid[(rows - 1 - col, row)])
}

/// Apply [`rotate_90`] once per quarter turn.
pub fn rotate(grid: &PixelGrid, rotation: Rotation) -> PixelGrid {
    let mut out = grid.clone();
    for _ in 0..rotation.quarter_turns() {
        out = rotate_90(&out);
    }
    out
}

/// Scale up by an integer factor.
///
/// Fails only in [`EnlargeMode::Magnify`], with
/// [`BitmapError::DimensionsTooLarge`], when an output side exceeds what a
/// BMP header can hold (`i32::MAX`) or the output buffer cannot be reserved.
pub fn enlarge(
    grid: &PixelGrid,
    scale: NonZeroU32,
    mode: EnlargeMode,
) -> Result<PixelGrid, BitmapError> {
    let scale = scale.get() as usize;
    let (width, height) = (grid.width(), grid.height());
    match mode {
        EnlargeMode::Magnify => {
            let too_large = || BitmapError::DimensionsTooLarge {
                width: u32::try_from(width.saturating_mul(scale)).unwrap_or(u32::MAX),
                height: u32::try_from(height.saturating_mul(scale)).unwrap_or(u32::MAX),
            };
            let max_side = i32::MAX as usize;
            let out_w = width
                .checked_mul(scale)
                .filter(|&w| w <= max_side)
                .ok_or_else(too_large)?;
            let out_h = height
                .checked_mul(scale)
                .filter(|&h| h <= max_side)
                .ok_or_else(too_large)?;
            PixelGrid::try_from_fn(out_w, out_h, |row, col| {
                grid[(row / scale, col / scale)]
            })
        }
        EnlargeMode::Resample => Ok(PixelGrid::from_fn(width, height, |row, col| {
            let src_row = row.saturating_mul(scale).min(height - 1);
            let src_col = col.saturating_mul(scale).min(width - 1);
            grid[(src_row, src_col)]
        })),
    }
}
