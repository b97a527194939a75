use enough::Stop;

use crate::bmp::{self, Permissiveness};
use crate::error::BitmapError;
use crate::limits::Limits;
use crate::pixel::PixelGrid;

/// Builder for a BMP decode with optional limits and validation level.
///
/// ```
/// use bmpfilter::{DecodeRequest, Limits, Permissiveness, Unstoppable};
///
/// # fn run(data: &[u8]) -> Result<(), bmpfilter::BitmapError> {
/// let limits = Limits::with_max_pixels(4096 * 4096);
/// let grid = DecodeRequest::new(data)
///     .with_limits(&limits)
///     .with_permissiveness(Permissiveness::Strict)
///     .decode(Unstoppable)?;
/// println!("{}x{}", grid.width(), grid.height());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    permissiveness: Permissiveness,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            permissiveness: Permissiveness::default(),
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_permissiveness(mut self, permissiveness: Permissiveness) -> Self {
        self.permissiveness = permissiveness;
        self
    }

    /// Decode. Fails before allocating if the header is inconsistent.
    pub fn decode(self, stop: impl Stop) -> Result<PixelGrid, BitmapError> {
        bmp::decode(self.data, self.permissiveness, self.limits, &stop)
    }
}
