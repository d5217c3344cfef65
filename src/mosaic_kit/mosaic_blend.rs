use image::RgbaImage;
use imageproc::definitions::Image;
use log::debug;

use crate::error::{BlendError, MosaicError, PixelizeError};
use crate::mosaic_kit::blend::{BlendRatio, Blender, Rounding};
use crate::mosaic_kit::pixelize::Pixelizer;
use crate::mosaic_kit::tile::BoundaryPolicy;
use crate::mosaic_kit::tile_average::DEFAULT_OVERLAY_ALPHA;
use crate::utils::OverlayPixel;

/// Settings for the pixelize-then-blend pipeline.
///
/// The defaults reproduce the classic effect: 50 pixel tiles painted with
/// alpha 150, blended half-and-half over the original with truncation, and
/// the last pixel row and column left out of the tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MosaicBlend {
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// Alpha painted into RGBA tiles of the intermediate pixelized image
    pub overlay_alpha: u8,
    /// Blend weight toward the pixelized image
    pub ratio: f64,
    /// Conversion of blended channels back to `u8`
    pub rounding: Rounding,
    /// Clipping of tiles at the image border
    pub boundary: BoundaryPolicy,
}

impl Default for MosaicBlend {
    fn default() -> Self {
        Self {
            tile_size: Pixelizer::DEFAULT_TILE_SIZE,
            overlay_alpha: DEFAULT_OVERLAY_ALPHA,
            ratio: 0.5,
            rounding: Rounding::Truncate,
            boundary: BoundaryPolicy::Legacy,
        }
    }
}

impl MosaicBlend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    #[must_use]
    pub const fn with_overlay_alpha(mut self, overlay_alpha: u8) -> Self {
        self.overlay_alpha = overlay_alpha;
        self
    }

    #[must_use]
    pub const fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    #[must_use]
    pub const fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    #[must_use]
    pub const fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    /// Pixelizer configured from these settings.
    ///
    /// # Errors
    ///
    /// * `PixelizeError::InvalidTileSize` - When `tile_size` is zero
    pub const fn pixelizer(&self) -> Result<Pixelizer, PixelizeError> {
        match Pixelizer::new(self.tile_size) {
            Ok(pixelizer) => Ok(pixelizer
                .with_overlay_alpha(self.overlay_alpha)
                .with_boundary(self.boundary)),
            Err(error) => Err(error),
        }
    }

    /// Blender configured from these settings.
    ///
    /// # Errors
    ///
    /// * `BlendError::InvalidRatio` - When `ratio` is NaN or outside `[0.0, 1.0]`
    pub fn blender(&self) -> Result<Blender, BlendError> {
        let ratio = BlendRatio::new(self.ratio)?;
        Ok(Blender::from_ratio(ratio).with_rounding(self.rounding))
    }

    /// Pixelize a copy of `image` and blend it back over `image`.
    ///
    /// Both parameters are validated before any pixel is read, and `image`
    /// itself is never modified.
    ///
    /// # Errors
    ///
    /// * `MosaicError::Pixelize` - When `tile_size` is zero
    /// * `MosaicError::Blend` - When `ratio` is NaN or outside `[0.0, 1.0]`
    ///
    /// # Examples
    /// ```no_run
    /// use mosaic_kit::MosaicBlend;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let image = image::open("photo.jpg")?.to_rgba8();
    /// let blended = MosaicBlend::new().with_tile_size(16).apply(&image)?;
    /// blended.save("pixelated_photo.png")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn apply<P>(&self, image: &Image<P>) -> Result<RgbaImage, MosaicError>
    where
        P: OverlayPixel,
    {
        let pixelizer = self.pixelizer()?;
        let blender = self.blender()?;
        debug!("MosaicBlend: {self:?}");

        let pixelized = pixelizer.pixelize(image);
        Ok(blender.blend(image, &pixelized)?)
    }
}

/// Extension trait for running the pixelize-then-blend pipeline on an image.
pub trait MosaicBlendExt {
    /// Pixelize a copy of this image and blend it back over the original.
    ///
    /// The image is borrowed and left unmodified.
    ///
    /// # Errors
    ///
    /// * `MosaicError::Pixelize` - When the tile size is zero
    /// * `MosaicError::Blend` - When the ratio is NaN or outside `[0.0, 1.0]`
    fn mosaic_blend(&self, settings: &MosaicBlend) -> Result<RgbaImage, MosaicError>;
}

impl<P> MosaicBlendExt for Image<P>
where
    P: OverlayPixel,
{
    fn mosaic_blend(&self, settings: &MosaicBlend) -> Result<RgbaImage, MosaicError> {
        settings.apply(self)
    }
}
