use std::num::NonZeroU32;

use image::{GenericImage, ImageBuffer};
use imageproc::definitions::Image;
use log::{debug, trace};

use crate::error::PixelizeError;
use crate::mosaic_kit::tile::{BoundaryPolicy, Tile, TileGrid};
use crate::mosaic_kit::tile_average::{DEFAULT_OVERLAY_ALPHA, average_color_with_alpha};
use crate::utils::{OverlayPixel, is_empty_image};

/// Tile-averaging pixelizer.
///
/// Partitions an image into a grid of `tile_size × tile_size` tiles and paints
/// every tile with its mean color. Tiles are visited row by row, top to
/// bottom, and never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixelizer {
    tile_size: NonZeroU32,
    overlay_alpha: u8,
    boundary: BoundaryPolicy,
}

impl Pixelizer {
    /// Tile edge length used by `MosaicBlend::default()`.
    pub const DEFAULT_TILE_SIZE: u32 = 50;

    /// Create a new pixelizer with the default overlay alpha and boundary policy.
    ///
    /// # Errors
    ///
    /// * `PixelizeError::InvalidTileSize` - When `tile_size` is zero
    pub const fn new(tile_size: u32) -> Result<Self, PixelizeError> {
        match NonZeroU32::new(tile_size) {
            Some(tile_size) => Ok(Self {
                tile_size,
                overlay_alpha: DEFAULT_OVERLAY_ALPHA,
                boundary: BoundaryPolicy::Legacy,
            }),
            None => Err(PixelizeError::InvalidTileSize { tile_size }),
        }
    }

    /// Set the alpha painted into RGBA tiles.
    #[must_use]
    pub const fn with_overlay_alpha(mut self, overlay_alpha: u8) -> Self {
        self.overlay_alpha = overlay_alpha;
        self
    }

    /// Set how tiles are clipped at the image border.
    #[must_use]
    pub const fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size.get()
    }

    #[must_use]
    pub const fn overlay_alpha(&self) -> u8 {
        self.overlay_alpha
    }

    #[must_use]
    pub const fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    /// Tile grid this pixelizer lays over a `width × height` image.
    #[must_use]
    pub const fn grid(&self, width: u32, height: u32) -> TileGrid {
        TileGrid::new(width, height, self.tile_size, self.boundary)
    }

    /// Pixelize a copy of `image`, leaving `image` untouched.
    #[must_use]
    pub fn pixelize<P>(&self, image: &Image<P>) -> Image<P>
    where
        P: OverlayPixel,
    {
        let mut pixelized = image.clone();
        self.pixelize_in_place(&mut pixelized);
        pixelized
    }

    /// Pixelize `image` in place.
    ///
    /// The image is processed in bands of `tile_size` rows. With the `rayon`
    /// feature the bands run in parallel; each band owns a disjoint slice of
    /// the buffer, so the result is identical to the serial pass.
    pub fn pixelize_in_place<P>(&self, image: &mut Image<P>)
    where
        P: OverlayPixel,
    {
        let (width, height) = image.dimensions();
        if is_empty_image(width, height) {
            return;
        }

        let grid = self.grid(width, height);
        let (columns, rows) = grid.stages();
        debug!(
            "Pixelize: {width}x{height} image, tile size {}, {columns}x{rows} grid, {:?} boundary",
            self.tile_size, self.boundary
        );

        let row_len = width as usize * usize::from(P::CHANNEL_COUNT);
        let band_len = row_len.saturating_mul(self.tile_size.get() as usize);
        let buffer: &mut [u8] = image;
        let pixelize_band = |(stage_y, band): (usize, &mut [u8])| {
            pixelize_band_impl::<P>(band, width, stage_y as u32, &grid, self.overlay_alpha);
        };

        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            buffer
                .par_chunks_mut(band_len)
                .enumerate()
                .for_each(pixelize_band);
        }
        #[cfg(not(feature = "rayon"))]
        buffer.chunks_mut(band_len).enumerate().for_each(pixelize_band);
    }
}

/// Pixelizes the tiles of one grid row.
///
/// `band` holds the image rows starting at `stage_y * tile_size`; every tile
/// of the grid row lies inside it.
fn pixelize_band_impl<P>(band: &mut [u8], width: u32, stage_y: u32, grid: &TileGrid, alpha: u8)
where
    P: OverlayPixel,
{
    let rows = band.len() / (width as usize * usize::from(P::CHANNEL_COUNT));
    let mut view: ImageBuffer<P, &mut [u8]> = ImageBuffer::from_raw(width, rows as u32, band)
        .expect("Band length is a whole number of rows - this should not happen");
    let band_top = stage_y * grid.tile_size();

    for tile in grid.row_tiles(stage_y) {
        let local = tile.shifted_up(band_top);
        let color = average_color_with_alpha(&view, &local, alpha);
        trace!("Pixelize: tile {tile:?} -> {color:?}");
        fill_tile_impl(&mut view, &local, P::from_average(color));
    }
}

/// Overwrites every pixel of `tile` with `color`.
#[inline]
fn fill_tile_impl<I, P>(image: &mut I, tile: &Tile, color: P)
where
    I: GenericImage<Pixel = P>,
    P: OverlayPixel,
{
    tile.coordinates()
        .for_each(|(x, y)| image.put_pixel(x, y, color));
}

/// Extension trait for `ImageBuffer` to provide fluent pixelization methods.
pub trait PixelizeExt {
    /// Pixelize the image with `tile_size` tiles and the default overlay alpha.
    ///
    /// This consumes the original image and returns it pixelized.
    ///
    /// # Errors
    ///
    /// * `PixelizeError::InvalidTileSize` - When `tile_size` is zero
    ///
    /// # Examples
    /// ```
    /// use image::{Rgba, RgbaImage};
    /// use mosaic_kit::PixelizeExt;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let image = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
    /// let pixelized = image.pixelize(4)?;
    /// assert_eq!(pixelized.get_pixel(0, 0), &Rgba([10, 20, 30, 150]));
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    fn pixelize(self, tile_size: u32) -> Result<Self, PixelizeError>
    where
        Self: Sized;

    /// Pixelize the image in place.
    ///
    /// # Errors
    ///
    /// * `PixelizeError::InvalidTileSize` - When `tile_size` is zero; the
    ///   image is left untouched
    fn pixelize_mut(&mut self, tile_size: u32) -> Result<&mut Self, PixelizeError>;
}

impl<P> PixelizeExt for Image<P>
where
    P: OverlayPixel,
{
    fn pixelize(mut self, tile_size: u32) -> Result<Self, PixelizeError> {
        self.pixelize_mut(tile_size)?;
        Ok(self)
    }

    fn pixelize_mut(&mut self, tile_size: u32) -> Result<&mut Self, PixelizeError> {
        Pixelizer::new(tile_size)?.pixelize_in_place(self);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    const GRAY: Rgba<u8> = Rgba([127, 127, 127, DEFAULT_OVERLAY_ALPHA]);

    #[test]
    fn new_with_zero_tile_size_returns_error() {
        assert_eq!(
            Pixelizer::new(0),
            Err(PixelizeError::InvalidTileSize { tile_size: 0 })
        );
    }

    #[test]
    fn new_uses_default_alpha_and_legacy_boundary() {
        let pixelizer = Pixelizer::new(5).unwrap();
        assert_eq!(pixelizer.tile_size(), 5);
        assert_eq!(pixelizer.overlay_alpha(), 150);
        assert_eq!(pixelizer.boundary(), BoundaryPolicy::Legacy);
    }

    #[test]
    fn pixelize_checkerboard_with_legacy_boundary_keeps_last_row_and_column() {
        init_logger();
        let image = create_checkerboard(4, 4);
        let pixelized = Pixelizer::new(2).unwrap().pixelize(&image);

        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1), (2, 0), (2, 1), (0, 2), (1, 2)] {
            assert_eq!(pixelized.get_pixel(x, y), &GRAY, "pixel ({x}, {y})");
        }
        // Single-pixel tile at (2, 2) keeps its color but takes the overlay alpha.
        assert_eq!(pixelized.get_pixel(2, 2), &Rgba([0, 0, 0, DEFAULT_OVERLAY_ALPHA]));

        for i in 0..4 {
            assert_eq!(pixelized.get_pixel(3, i), image.get_pixel(3, i));
            assert_eq!(pixelized.get_pixel(i, 3), image.get_pixel(i, 3));
        }
    }

    #[test]
    fn pixelize_checkerboard_with_full_boundary_covers_every_pixel() {
        let image = create_checkerboard(4, 4);
        let pixelized = Pixelizer::new(2)
            .unwrap()
            .with_boundary(BoundaryPolicy::Full)
            .pixelize(&image);

        assert!(pixelized.pixels().all(|pixel| *pixel == GRAY));
    }

    #[test]
    fn pixelize_with_oversized_tile_produces_single_uniform_tile() {
        let image = create_checkerboard(4, 4);
        let pixelized = Pixelizer::new(10).unwrap().pixelize(&image);

        // Nine pixels in [0, 3) x [0, 3): five black, four white.
        let expected = Rgba([113, 113, 113, DEFAULT_OVERLAY_ALPHA]);
        for (x, y, pixel) in pixelized.enumerate_pixels() {
            if x < 3 && y < 3 {
                assert_eq!(pixel, &expected, "pixel ({x}, {y})");
            } else {
                assert_eq!(pixel, image.get_pixel(x, y), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn pixelize_leaves_source_image_untouched() {
        let image = create_checkerboard(4, 4);
        let before = image.clone();
        let _ = Pixelizer::new(2).unwrap().pixelize(&image);
        assert_eq!(image, before);
    }

    #[test]
    fn pixelize_with_overlay_alpha_paints_requested_alpha() {
        let image = RgbaImage::from_pixel(6, 6, Rgba([40, 50, 60, 255]));
        let pixelized = Pixelizer::new(3)
            .unwrap()
            .with_overlay_alpha(255)
            .pixelize(&image);
        assert!(pixelized.pixels().all(|pixel| *pixel == Rgba([40, 50, 60, 255])));
    }

    #[test]
    fn pixelize_rgb_image_averages_partial_tiles() {
        let image = create_gradient_rgb_image(5, 3);
        let pixelized = Pixelizer::new(2)
            .unwrap()
            .with_boundary(BoundaryPolicy::Full)
            .pixelize(&image);

        // Right-hand column tile [4, 5) x [0, 2) averages two pixels.
        let top = image.get_pixel(4, 0).0;
        let below = image.get_pixel(4, 1).0;
        let expected: [u8; 3] =
            std::array::from_fn(|c| ((u16::from(top[c]) + u16::from(below[c])) / 2) as u8);
        assert_eq!(pixelized.get_pixel(4, 0), &Rgb(expected));
        assert_eq!(pixelized.get_pixel(4, 1), &Rgb(expected));
    }

    #[test]
    fn pixelize_tiles_are_uniform_within_each_tile() {
        let image = create_gradient_rgb_image(9, 7);
        let pixelizer = Pixelizer::new(3).unwrap();
        let pixelized = pixelizer.pixelize(&image);

        for tile in pixelizer.grid(9, 7).tiles() {
            let first = pixelized.get_pixel(tile.start_x(), tile.start_y());
            assert!(tile.coordinates().all(|(x, y)| pixelized.get_pixel(x, y) == first));
        }
    }

    #[test]
    fn pixelize_single_pixel_image_with_legacy_boundary_is_unchanged() {
        let image = RgbImage::from_pixel(1, 1, Rgb([1, 2, 3]));
        let pixelized = Pixelizer::new(1).unwrap().pixelize(&image);
        assert_eq!(pixelized, image);
    }

    #[test]
    fn pixelize_empty_image_returns_empty_image() {
        let image = RgbaImage::new(0, 0);
        let pixelized = Pixelizer::new(4).unwrap().pixelize(&image);
        assert_eq!(pixelized.dimensions(), (0, 0));
    }

    #[test]
    fn pixelize_with_tile_size_one_and_full_boundary_only_changes_alpha() {
        let image = create_checkerboard(3, 3);
        let pixelized = Pixelizer::new(1)
            .unwrap()
            .with_boundary(BoundaryPolicy::Full)
            .pixelize(&image);
        for (x, y, pixel) in pixelized.enumerate_pixels() {
            let Rgba([red, green, blue, _]) = *image.get_pixel(x, y);
            assert_eq!(pixel, &Rgba([red, green, blue, DEFAULT_OVERLAY_ALPHA]));
        }
    }

    #[test]
    fn pixelize_ext_with_method_chaining_enables_fluent_interface() {
        let image = create_checkerboard(4, 4);
        let result = image.pixelize(2).unwrap();
        assert_eq!(result.dimensions(), (4, 4));
        assert_eq!(result.get_pixel(0, 0), &GRAY);
    }

    #[test]
    fn pixelize_mut_with_zero_tile_size_leaves_image_untouched() {
        let mut image = create_checkerboard(4, 4);
        let before = image.clone();
        assert_eq!(
            image.pixelize_mut(0).map(|_| ()),
            Err(PixelizeError::InvalidTileSize { tile_size: 0 })
        );
        assert_eq!(image, before);
    }

    #[test]
    fn pixelize_in_place_matches_copying_pixelize() {
        let image = create_gradient_rgb_image(11, 8);
        let pixelizer = Pixelizer::new(4).unwrap();
        let copied = pixelizer.pixelize(&image);
        let mut in_place = image;
        pixelizer.pixelize_in_place(&mut in_place);
        assert_eq!(copied, in_place);
    }
}
