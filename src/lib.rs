//! # bmpfilter
//!
//! Uncompressed BMP decoder/encoder plus a small set of image filters.
//!
//! ## Pieces
//!
//! - **Codec**: [`decode_bmp`] / [`DecodeRequest`] turn 24-bit or 32-bit
//!   uncompressed BMP bytes into a [`PixelGrid`]; [`encode_bmp`] always
//!   writes 24-bit, bottom-up, row-padded BMP.
//! - **Filters**: [`filter`] holds pure functions from one grid to a new
//!   one (vignette, clarendon, grayscale, rotations, enlarge, high contrast,
//!   lighten, darken, primaries). [`FilterKind`] is the numbered menu table
//!   the `bmpfilter` binary is driven by.
//!
//! The codec knows nothing about filters and the filters know nothing about
//! file formats.
//!
//! ## Channel arithmetic
//!
//! Filters that scale channels compute in `f64`, truncate toward zero and
//! clamp to `0..=255`. Nothing wraps.
//!
//! ## Non-Goals
//!
//! - RLE or palette BMPs, 16-bit BMPs
//! - Alpha processing (a 32-bit input's fourth byte is dropped)
//! - Streaming or tiled decode
//!
//! ## Usage
//!
//! ```no_run
//! use bmpfilter::{FilterKind, Unstoppable, decode_bmp, encode_bmp};
//!
//! let data: &[u8] = &[]; // your BMP bytes
//! let grid = decode_bmp(data, Unstoppable)?;
//!
//! let filter = FilterKind::Rotate.with_param(Some("3"))?;
//! let rotated = filter.apply(&grid)?;
//! assert_eq!(rotated.width(), grid.height());
//!
//! let bytes = encode_bmp(&rotated, Unstoppable)?;
//! assert_eq!(&bytes[0..2], b"BM");
//! # Ok::<(), bmpfilter::BitmapError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod bmp;
mod decode;
mod error;
#[cfg(feature = "std")]
mod file;
pub mod filter;
mod limits;
mod pixel;

use alloc::vec::Vec;

// Re-exports
pub use bmp::{Permissiveness, header_fields};
pub use decode::DecodeRequest;
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::BitmapError;
#[cfg(feature = "std")]
pub use file::{read_bmp_file, write_bmp_file};
pub use filter::{EnlargeMode, Filter, FilterKind, ParamKind, Rotation};
pub use limits::Limits;
pub use pixel::{BLACK, Pixel, PixelGrid, WHITE};

/// Decode a BMP with default validation and no limits.
pub fn decode_bmp(data: &[u8], stop: impl Stop) -> Result<PixelGrid, BitmapError> {
    DecodeRequest::new(data).decode(stop)
}

/// Encode a grid as a 24-bit uncompressed BMP.
pub fn encode_bmp(grid: &PixelGrid, stop: impl Stop) -> Result<Vec<u8>, BitmapError> {
    bmp::encode(grid, &stop)
}
