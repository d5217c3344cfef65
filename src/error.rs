//! Error types for the mosaic operations.
//!
//! Each operation owns one error enum so callers can match on exactly the
//! failures that operation can produce. `MosaicError` covers the combined
//! pixelize-then-blend pipeline.

use thiserror::Error;

/// Errors reported by the pixelization pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelizeError {
    /// The tile edge length must be at least one pixel.
    #[error("Tile size must be at least 1 pixel, got {tile_size}")]
    InvalidTileSize { tile_size: u32 },
}

/// Errors reported by the blending pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlendError {
    /// The blend ratio is outside `[0.0, 1.0]` or is NaN.
    #[error("Blend ratio must be between 0.0 and 1.0, got {ratio}")]
    InvalidRatio { ratio: f64 },

    /// The original and pixelized images differ in size.
    #[error("Image dimensions must match: original is {expected:?}, pixelized is {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Errors reported by the combined pixelize-and-blend pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MosaicError {
    #[error(transparent)]
    Pixelize(#[from] PixelizeError),

    #[error(transparent)]
    Blend(#[from] BlendError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_ratio_message_includes_rejected_value() {
        let error = BlendError::InvalidRatio { ratio: 1.5 };
        assert_eq!(
            error.to_string(),
            "Blend ratio must be between 0.0 and 1.0, got 1.5"
        );
    }

    #[test]
    fn dimension_mismatch_message_lists_both_sizes() {
        let error = BlendError::DimensionMismatch {
            expected: (4, 4),
            actual: (2, 3),
        };
        assert_eq!(
            error.to_string(),
            "Image dimensions must match: original is (4, 4), pixelized is (2, 3)"
        );
    }

    #[test]
    fn mosaic_error_from_pixelize_error_is_transparent() {
        let error: MosaicError = PixelizeError::InvalidTileSize { tile_size: 0 }.into();
        assert_eq!(error.to_string(), "Tile size must be at least 1 pixel, got 0");
        assert!(matches!(
            error,
            MosaicError::Pixelize(PixelizeError::InvalidTileSize { tile_size: 0 })
        ));
    }
}
