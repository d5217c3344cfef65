//! Shared fixtures for the unit tests.

use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// 2x2 RGB image with a distinct color in every pixel.
pub fn create_test_rgb_image() -> RgbImage {
    let mut image = RgbImage::new(2, 2);
    image.put_pixel(0, 0, Rgb([200, 150, 100]));
    image.put_pixel(1, 0, Rgb([50, 100, 150]));
    image.put_pixel(0, 1, Rgb([25, 75, 125]));
    image.put_pixel(1, 1, Rgb([250, 200, 0]));
    image
}

/// Opaque black and white checkerboard, black where `x + y` is even.
pub fn create_checkerboard(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    })
}

/// RGB image whose channels vary with the coordinates.
pub fn create_gradient_rgb_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 37 % 256) as u8,
            (y * 53 % 256) as u8,
            ((x * 11 + y * 29) % 256) as u8,
        ])
    })
}

/// RGB image filled by cycling through `seed`, which must not be empty.
pub fn create_seeded_rgb_image(width: u32, height: u32, seed: &[u8]) -> RgbImage {
    let mut samples = seed.iter().copied().cycle();
    RgbImage::from_fn(width, height, |_, _| {
        Rgb(std::array::from_fn(|_| samples.next().unwrap_or(0)))
    })
}

/// Routes `log` output through the test harness.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
