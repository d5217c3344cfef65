//! # mosaic-kit
//!
//! Tile-averaging pixelization and ratio blending for raster images.
//!
//! The crate turns an image into a mosaic and composites that mosaic back over
//! the original:
//!
//! - **Tile averaging**: Mean color of a rectangular region, truncated per channel
//! - **Pixelization**: Paints every tile of a fixed-size grid with its mean color
//! - **Blending**: Per-channel linear interpolation between an original image
//!   and its pixelized counterpart, producing an opaque RGBA image
//! - **Mosaic blend**: Pixelize-then-blend in one call, driven by a single
//!   settings value
//!
//! Decoding and encoding files is left to the `image` crate.
//!
//! ## Example Usage
//!
//! ```no_run
//! use mosaic_kit::{BlendExt, BoundaryPolicy, MosaicBlend, PixelizeExt, Pixelizer};
//! use image::{Rgba, RgbaImage};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Pixelize with 16 pixel tiles
//! let image = RgbaImage::from_pixel(100, 100, Rgba([10, 20, 30, 255]));
//! let pixelized = image.clone().pixelize(16)?;
//!
//! // Blend the mosaic over the original, 30% mosaic
//! let blended = image.blend_with(&pixelized, 0.3)?;
//!
//! // Explicit pixelizer with opaque tiles covering the whole image
//! let pixelizer = Pixelizer::new(16)?
//!     .with_overlay_alpha(255)
//!     .with_boundary(BoundaryPolicy::Full);
//! let opaque = pixelizer.pixelize(&blended);
//!
//! // Whole pipeline with the classic settings
//! let photo = image::open("photo.jpg")?.to_rgba8();
//! MosaicBlend::new().apply(&photo)?.save("pixelated_photo.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `rayon`: Processes tile bands and blend scanlines in parallel
//! - `serde`: Enables serialization support for the settings types

mod error;
mod mosaic_kit;
mod utils;

#[cfg(test)]
mod test_utils;

pub use error::{BlendError, MosaicError, PixelizeError};
pub use mosaic_kit::blend::{BlendExt, BlendRatio, Blender, Rounding, blend};
pub use mosaic_kit::mosaic_blend::{MosaicBlend, MosaicBlendExt};
pub use mosaic_kit::pixelize::{PixelizeExt, Pixelizer};
pub use mosaic_kit::tile::{BoundaryPolicy, Tile, TileGrid};
pub use mosaic_kit::tile_average::{
    AverageColor, DEFAULT_OVERLAY_ALPHA, average_color, average_color_with_alpha,
};
pub use utils::OverlayPixel;

// Re-export imageproc::definitions::Image for convenience
pub use imageproc::definitions::Image;
