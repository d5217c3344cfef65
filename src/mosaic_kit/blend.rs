use image::{GenericImageView, Pixel, Rgb, Rgba, RgbaImage};
use imageproc::definitions::Image;
use itertools::Itertools;
use log::debug;

use crate::error::BlendError;
use crate::utils::{OverlayPixel, is_empty_image, is_unit_interval, validate_matching_dimensions};

/// Interpolation weight toward the pixelized image, within `[0.0, 1.0]`.
///
/// `0.0` keeps the original image, `1.0` shows only the pixelized one.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BlendRatio(f64);

impl BlendRatio {
    /// Shows only the original image.
    pub const ORIGINAL: Self = Self(0.0);
    /// Shows only the pixelized image.
    pub const PIXELIZED: Self = Self(1.0);

    /// Validate a blend ratio.
    ///
    /// # Errors
    ///
    /// * `BlendError::InvalidRatio` - When `ratio` is NaN or outside `[0.0, 1.0]`
    pub fn new(ratio: f64) -> Result<Self, BlendError> {
        if is_unit_interval(ratio) {
            Ok(Self(ratio))
        } else {
            Err(BlendError::InvalidRatio { ratio })
        }
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for BlendRatio {
    type Error = BlendError;

    fn try_from(ratio: f64) -> Result<Self, Self::Error> {
        Self::new(ratio)
    }
}

/// Conversion of a blended channel value back to `u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Rounding {
    /// Drop the fractional part.
    #[default]
    Truncate,
    /// Round half away from zero.
    Nearest,
}

impl Rounding {
    /// Converts a channel value in `[0.0, 255.0]` to `u8`.
    #[inline]
    #[must_use]
    pub fn apply(self, value: f64) -> u8 {
        // `as` saturates out-of-range floats
        match self {
            Self::Truncate => value as u8,
            Self::Nearest => value.round() as u8,
        }
    }
}

/// Linear blend of an original image and its pixelized counterpart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blender {
    ratio: BlendRatio,
    rounding: Rounding,
}

impl Blender {
    /// Create a new blender that truncates blended channels.
    ///
    /// # Errors
    ///
    /// * `BlendError::InvalidRatio` - When `ratio` is NaN or outside `[0.0, 1.0]`
    pub fn new(ratio: f64) -> Result<Self, BlendError> {
        BlendRatio::new(ratio).map(Self::from_ratio)
    }

    #[must_use]
    pub const fn from_ratio(ratio: BlendRatio) -> Self {
        Self {
            ratio,
            rounding: Rounding::Truncate,
        }
    }

    #[must_use]
    pub const fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    #[must_use]
    pub const fn ratio(&self) -> BlendRatio {
        self.ratio
    }

    #[must_use]
    pub const fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Blend one pixel's RGB channels into an opaque pixel.
    #[inline]
    #[must_use]
    pub fn mix(&self, original: [u8; 3], pixelized: [u8; 3]) -> Rgba<u8> {
        let ratio = self.ratio.get();
        let [red, green, blue] = std::array::from_fn(|channel| {
            let value = f64::from(pixelized[channel]) * ratio
                + f64::from(original[channel]) * (1.0 - ratio);
            self.rounding.apply(value)
        });
        Rgba([red, green, blue, u8::MAX])
    }

    /// Blend `pixelized` over `original` into a new, fully opaque image.
    ///
    /// # Errors
    ///
    /// * `BlendError::DimensionMismatch` - When the images differ in size
    pub fn blend<P, Q>(
        &self,
        original: &Image<P>,
        pixelized: &Image<Q>,
    ) -> Result<RgbaImage, BlendError>
    where
        P: OverlayPixel,
        Q: OverlayPixel,
    {
        validate_dimensions_impl(original, pixelized)?;

        let (width, height) = original.dimensions();
        debug!(
            "Blend: {width}x{height} image, ratio {}, {:?} rounding",
            self.ratio.get(),
            self.rounding
        );

        let mut output = RgbaImage::new(width, height);
        if is_empty_image(width, height) {
            return Ok(output);
        }
        let row_len = width as usize * usize::from(<Rgba<u8> as Pixel>::CHANNEL_COUNT);

        let blend_row = |(y, row): (usize, &mut [u8])| {
            let y = y as u32;
            for (x, out) in (0..width).zip(row.chunks_exact_mut(4)) {
                let mixed = self.mix(
                    original.get_pixel(x, y).rgb(),
                    pixelized.get_pixel(x, y).rgb(),
                );
                out.copy_from_slice(&mixed.0);
            }
        };

        let buffer: &mut [u8] = &mut output;
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            buffer.par_chunks_mut(row_len).enumerate().for_each(blend_row);
        }
        #[cfg(not(feature = "rayon"))]
        buffer.chunks_mut(row_len).enumerate().for_each(blend_row);

        Ok(output)
    }

    /// Blend `pixelized` over an RGBA `original`, writing the result back into it.
    ///
    /// # Errors
    ///
    /// * `BlendError::DimensionMismatch` - When the images differ in size; the
    ///   original is left untouched
    pub fn blend_in_place<Q>(
        &self,
        original: &mut RgbaImage,
        pixelized: &Image<Q>,
    ) -> Result<(), BlendError>
    where
        Q: OverlayPixel,
    {
        validate_dimensions_impl(original, pixelized)?;

        original
            .pixels_mut()
            .zip_eq(pixelized.pixels())
            .for_each(|(pixel, pixelized)| {
                *pixel = self.mix(pixel.rgb(), pixelized.rgb());
            });

        Ok(())
    }
}

/// Blend `pixelized` over `original` at `ratio`, truncating channel values.
///
/// The ratio is validated before the dimensions, and nothing is computed when
/// either check fails.
///
/// # Errors
///
/// * `BlendError::InvalidRatio` - When `ratio` is NaN or outside `[0.0, 1.0]`
/// * `BlendError::DimensionMismatch` - When the images differ in size
///
/// # Examples
/// ```
/// use image::{Rgb, RgbImage, Rgba};
/// use mosaic_kit::blend;
///
/// let original = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
/// let pixelized = RgbImage::from_pixel(2, 2, Rgb([200, 100, 50]));
///
/// let blended = blend(&original, &pixelized, 0.5).unwrap();
/// assert_eq!(blended.get_pixel(0, 0), &Rgba([100, 50, 25, 255]));
///
/// assert!(blend(&original, &pixelized, 1.5).is_err());
/// ```
pub fn blend<P, Q>(
    original: &Image<P>,
    pixelized: &Image<Q>,
    ratio: f64,
) -> Result<RgbaImage, BlendError>
where
    P: OverlayPixel,
    Q: OverlayPixel,
{
    Blender::new(ratio)?.blend(original, pixelized)
}

/// Ensures both images have the same size so every pixel has a counterpart
#[inline]
fn validate_dimensions_impl<I1, I2>(original: &I1, pixelized: &I2) -> Result<(), BlendError>
where
    I1: GenericImageView,
    I2: GenericImageView,
{
    validate_matching_dimensions(original.dimensions(), pixelized.dimensions())
        .map_err(|(expected, actual)| BlendError::DimensionMismatch { expected, actual })
}

/// Extension trait for blending an original image with its pixelized counterpart.
pub trait BlendExt<Q: OverlayPixel> {
    /// Blend `pixelized` over this image at `ratio`.
    ///
    /// This consumes the original image and returns a new opaque RGBA image.
    ///
    /// # Errors
    ///
    /// * `BlendError::InvalidRatio` - When `ratio` is NaN or outside `[0.0, 1.0]`
    /// * `BlendError::DimensionMismatch` - When the images differ in size
    ///
    /// # Examples
    /// ```
    /// use image::{Rgba, RgbaImage};
    /// use mosaic_kit::{BlendExt, PixelizeExt};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let image = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
    /// let pixelized = image.clone().pixelize(2)?;
    /// let blended = image.blend_with(&pixelized, 0.5)?;
    /// assert_eq!(blended.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    fn blend_with(self, pixelized: &Image<Q>, ratio: f64) -> Result<RgbaImage, BlendError>
    where
        Self: Sized;

    /// Blend `pixelized` over this image in place.
    ///
    /// Only available for RGBA images, since the result carries an alpha
    /// channel.
    ///
    /// # Errors
    ///
    /// * `BlendError::InvalidRatio` - When `ratio` is NaN or outside `[0.0, 1.0]`
    /// * `BlendError::DimensionMismatch` - When the images differ in size
    fn blend_with_mut(
        &mut self,
        pixelized: &Image<Q>,
        ratio: f64,
    ) -> Result<&mut Self, BlendError>;
}

impl<Q: OverlayPixel> BlendExt<Q> for RgbaImage {
    fn blend_with(mut self, pixelized: &Image<Q>, ratio: f64) -> Result<RgbaImage, BlendError> {
        self.blend_with_mut(pixelized, ratio)?;
        Ok(self)
    }

    fn blend_with_mut(
        &mut self,
        pixelized: &Image<Q>,
        ratio: f64,
    ) -> Result<&mut Self, BlendError> {
        Blender::new(ratio)?.blend_in_place(self, pixelized)?;
        Ok(self)
    }
}

impl<Q: OverlayPixel> BlendExt<Q> for Image<Rgb<u8>> {
    fn blend_with(self, pixelized: &Image<Q>, ratio: f64) -> Result<RgbaImage, BlendError> {
        blend(&self, pixelized, ratio)
    }

    #[doc(hidden)]
    fn blend_with_mut(
        &mut self,
        _pixelized: &Image<Q>,
        _ratio: f64,
    ) -> Result<&mut Self, BlendError> {
        unimplemented!(
            "blend_with_mut is not available for RGB images because the result has an alpha channel"
        )
    }
}
