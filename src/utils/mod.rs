//! Internal utility functions for mosaic-kit.
//!
//! Input validation shared by the pixelization and blending passes, and the
//! pixel abstraction both of them operate on.

mod pixel;
pub use pixel::OverlayPixel;

/// Returns `true` when an image has no pixels to process.
#[inline]
#[must_use]
pub const fn is_empty_image(width: u32, height: u32) -> bool {
    width == 0 || height == 0
}

/// Validates that two images have matching dimensions.
///
/// # Arguments
///
/// * `expected` - Dimensions of the reference image (width, height)
/// * `actual` - Dimensions of the image being checked (width, height)
///
/// # Returns
///
/// `Ok(())` if the dimensions match, otherwise both dimension pairs so the
/// caller can build its own error
pub const fn validate_matching_dimensions(
    expected: (u32, u32),
    actual: (u32, u32),
) -> Result<(), ((u32, u32), (u32, u32))> {
    if expected.0 == actual.0 && expected.1 == actual.1 {
        Ok(())
    } else {
        Err((expected, actual))
    }
}

/// Returns `true` for values inside the closed unit interval.
///
/// NaN is never inside the interval.
#[inline]
#[must_use]
pub fn is_unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}
