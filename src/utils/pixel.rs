//! Pixel types the mosaic operations can read from and write to.
//!
//! Averaging and blending only look at the red, green and blue channels, and
//! tile filling needs to build a pixel from an averaged color. `OverlayPixel`
//! captures exactly that for the 8-bit RGB and RGBA pixels of the `image`
//! crate.

use image::{Pixel, Rgb, Rgba};

use crate::mosaic_kit::tile_average::AverageColor;

/// An 8-bit color pixel that can take part in pixelization and blending.
pub trait OverlayPixel: Pixel<Subpixel = u8> + Send + Sync {
    /// Returns the red, green and blue channels.
    fn rgb(&self) -> [u8; 3];

    /// Builds a pixel carrying the averaged color.
    ///
    /// Pixel types with an alpha channel take the color's alpha; types
    /// without one drop it.
    fn from_average(color: AverageColor) -> Self;
}

impl OverlayPixel for Rgb<u8> {
    #[inline]
    fn rgb(&self) -> [u8; 3] {
        self.0
    }

    #[inline]
    fn from_average(color: AverageColor) -> Self {
        Self(color.rgb)
    }
}

impl OverlayPixel for Rgba<u8> {
    #[inline]
    fn rgb(&self) -> [u8; 3] {
        let Self([red, green, blue, _]) = *self;
        [red, green, blue]
    }

    #[inline]
    fn from_average(color: AverageColor) -> Self {
        let [red, green, blue] = color.rgb;
        Self([red, green, blue, color.alpha])
    }
}
