//! Per-pixel filters. Output dimensions always equal input dimensions.

use crate::pixel::{BLACK, Pixel, PixelGrid, WHITE};

/// Channel average at or above which clarendon pulls toward white.
pub const CLARENDON_LIGHT_THRESHOLD: u32 = 170;
/// Channel average below which clarendon pulls toward black.
pub const CLARENDON_DARK_THRESHOLD: u32 = 90;
/// Channel average at or above which high contrast outputs white.
pub const HIGH_CONTRAST_THRESHOLD: u32 = 255 / 2;
/// Channel sum at or above which primaries outputs white.
pub const PRIMARIES_WHITE_SUM: u32 = 550;
/// Channel sum at or below which primaries outputs black.
pub const PRIMARIES_BLACK_SUM: u32 = 150;

/// Truncate toward zero, then clamp into a channel. NaN becomes 0.
fn to_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

fn sum(px: Pixel) -> u32 {
    u32::from(px.r) + u32::from(px.g) + u32::from(px.b)
}

/// Integer (truncated) channel average.
fn average(px: Pixel) -> u32 {
    sum(px) / 3
}

fn map_channels(px: Pixel, f: impl Fn(u8) -> u8) -> Pixel {
    Pixel::new(f(px.r), f(px.g), f(px.b))
}

fn darken_channel(c: u8, factor: f64) -> u8 {
    to_channel(f64::from(c) * factor)
}

fn lighten_channel(c: u8, factor: f64) -> u8 {
    to_channel(255.0 - (255.0 - f64::from(c)) * factor)
}

fn map_pixels(grid: &PixelGrid, f: impl Fn(Pixel) -> Pixel) -> PixelGrid {
    PixelGrid::from_fn(grid.width(), grid.height(), |row, col| f(grid[(row, col)]))
}

/// Darken toward the edges by the distance from the image center.
///
/// Each channel is scaled by `(rows - d) / rows`, where `d` is the truncated
/// Euclidean distance from `(row, col)` to `(rows / 2, cols / 2)`. Pixels
/// farther than `rows` from the center go black.
pub fn vignette(grid: &PixelGrid) -> PixelGrid {
    let rows = grid.height();
    let center_row = (rows / 2) as i64;
    let center_col = (grid.width() / 2) as i64;

    PixelGrid::from_fn(grid.width(), grid.height(), |row, col| {
        let dr = row as i64 - center_row;
        let dc = col as i64 - center_col;
        // Integer square root is the truncated Euclidean distance.
        let distance = (dr * dr + dc * dc).unsigned_abs().isqrt();
        let factor = (rows as f64 - distance as f64) / rows as f64;
        map_channels(grid[(row, col)], |c| darken_channel(c, factor))
    })
}

/// Push bright pixels brighter and dark pixels darker.
///
/// Pixels whose channel average is at least 170 are lightened by `factor`,
/// those below 90 are darkened by `factor`, everything else is copied.
pub fn clarendon(grid: &PixelGrid, factor: f64) -> PixelGrid {
    map_pixels(grid, |px| {
        let avg = average(px);
        if avg >= CLARENDON_LIGHT_THRESHOLD {
            map_channels(px, |c| lighten_channel(c, factor))
        } else if avg < CLARENDON_DARK_THRESHOLD {
            map_channels(px, |c| darken_channel(c, factor))
        } else {
            px
        }
    })
}

/// Replace every channel by the truncated channel average.
pub fn grayscale(grid: &PixelGrid) -> PixelGrid {
    map_pixels(grid, |px| {
        let gray = average(px) as u8;
        Pixel::new(gray, gray, gray)
    })
}

/// Black or white by grayscale value.
pub fn high_contrast(grid: &PixelGrid) -> PixelGrid {
    map_pixels(grid, |px| {
        if average(px) >= HIGH_CONTRAST_THRESHOLD {
            WHITE
        } else {
            BLACK
        }
    })
}

/// `255 - (255 - c) * factor` per channel. `factor < 1` lightens.
pub fn lighten(grid: &PixelGrid, factor: f64) -> PixelGrid {
    map_pixels(grid, |px| map_channels(px, |c| lighten_channel(c, factor)))
}

/// `c * factor` per channel. `factor < 1` darkens.
pub fn darken(grid: &PixelGrid, factor: f64) -> PixelGrid {
    map_pixels(grid, |px| map_channels(px, |c| darken_channel(c, factor)))
}

/// Reduce every pixel to black, white, red, green or blue.
///
/// A channel wins only if it is strictly greater than both others; any tie
/// for the maximum yields blue.
pub fn primaries(grid: &PixelGrid) -> PixelGrid {
    map_pixels(grid, |px| {
        let total = sum(px);
        if total >= PRIMARIES_WHITE_SUM {
            WHITE
        } else if total <= PRIMARIES_BLACK_SUM {
            BLACK
        } else if px.r > px.g && px.r > px.b {
            Pixel::new(255, 0, 0)
        } else if px.g > px.r && px.g > px.b {
            Pixel::new(0, 255, 0)
        } else {
            Pixel::new(0, 0, 255)
        }
    })
}
