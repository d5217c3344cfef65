use image::{GenericImageView, Rgba};

use crate::mosaic_kit::tile::Tile;
use crate::utils::OverlayPixel;

/// Alpha given to averaged tiles unless the caller picks another one.
pub const DEFAULT_OVERLAY_ALPHA: u8 = 150;

/// Mean color of a tile.
///
/// Each channel is the integer mean of the tile's channel values, truncated
/// toward zero. The alpha is not averaged: it is the overlay alpha the tile
/// will be painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AverageColor {
    /// Red, green and blue means
    pub rgb: [u8; 3],
    /// Overlay alpha
    pub alpha: u8,
}

impl AverageColor {
    /// Returns the same color with another alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { alpha, ..self }
    }

    #[must_use]
    pub const fn to_rgba(self) -> Rgba<u8> {
        let [red, green, blue] = self.rgb;
        Rgba([red, green, blue, self.alpha])
    }
}

/// Computes the mean color of `tile` with the default overlay alpha of 150.
///
/// # Panics
///
/// Panics if the tile reaches outside the image.
///
/// # Examples
/// ```
/// use image::{Rgb, RgbImage};
/// use mosaic_kit::{Tile, average_color};
///
/// let image = RgbImage::from_fn(2, 1, |x, _| if x == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 100, 7]) });
/// let color = average_color(&image, &Tile::new(0, 0, 2, 1).unwrap());
/// assert_eq!(color.rgb, [127, 50, 3]);
/// assert_eq!(color.alpha, 150);
/// ```
#[must_use]
pub fn average_color<I, P>(image: &I, tile: &Tile) -> AverageColor
where
    I: GenericImageView<Pixel = P>,
    P: OverlayPixel,
{
    average_color_with_alpha(image, tile, DEFAULT_OVERLAY_ALPHA)
}

/// Computes the mean color of `tile`, tagged with `alpha`.
///
/// Channel sums are accumulated as `u64`, so no tile that fits in memory can
/// overflow them.
///
/// # Panics
///
/// Panics if the tile reaches outside the image.
#[must_use]
pub fn average_color_with_alpha<I, P>(image: &I, tile: &Tile, alpha: u8) -> AverageColor
where
    I: GenericImageView<Pixel = P>,
    P: OverlayPixel,
{
    let (width, height) = image.dimensions();
    assert!(
        tile.fits_within(width, height),
        "tile {tile:?} exceeds {width}x{height} image"
    );

    let sums = tile.coordinates().fold([0u64; 3], |mut sums, (x, y)| {
        let rgb = image.get_pixel(x, y).rgb();
        for (sum, channel) in sums.iter_mut().zip(rgb) {
            *sum += u64::from(channel);
        }
        sums
    });

    // Each mean is bounded by the largest channel value, so it fits in u8.
    let area = tile.area();
    AverageColor {
        rgb: sums.map(|sum| (sum / area) as u8),
        alpha,
    }
}
