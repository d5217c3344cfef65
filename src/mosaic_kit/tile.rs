use std::num::NonZeroU32;

use itertools::iproduct;

/// How the far edge of a tile is clipped at the image border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoundaryPolicy {
    /// Clip to `min(nominal_end, dimension - 1)`.
    ///
    /// The last pixel row and column of the image never belong to a tile and
    /// keep their original values.
    #[default]
    Legacy,
    /// Clip to `min(nominal_end, dimension)`, so tiles cover the whole image.
    Full,
}

impl BoundaryPolicy {
    /// Clips a nominal tile end to the image dimension.
    #[inline]
    #[must_use]
    pub const fn clip(self, nominal_end: u64, dimension: u32) -> u32 {
        let limit = match self {
            Self::Legacy => dimension.saturating_sub(1),
            Self::Full => dimension,
        };
        if nominal_end < limit as u64 {
            nominal_end as u32
        } else {
            limit
        }
    }
}

/// A non-empty, axis-aligned rectangle `[start_x, end_x) × [start_y, end_y)`.
///
/// A `Tile` always contains at least one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    start_x: u32,
    start_y: u32,
    end_x: u32,
    end_y: u32,
}

impl Tile {
    /// Creates a tile, or `None` when the rectangle has zero width or height.
    ///
    /// # Examples
    /// ```
    /// use mosaic_kit::Tile;
    ///
    /// assert!(Tile::new(0, 0, 2, 2).is_some());
    /// assert!(Tile::new(2, 0, 2, 2).is_none());
    /// ```
    #[must_use]
    pub const fn new(start_x: u32, start_y: u32, end_x: u32, end_y: u32) -> Option<Self> {
        if end_x <= start_x || end_y <= start_y {
            return None;
        }
        Some(Self {
            start_x,
            start_y,
            end_x,
            end_y,
        })
    }

    #[must_use]
    pub const fn start_x(&self) -> u32 {
        self.start_x
    }

    #[must_use]
    pub const fn start_y(&self) -> u32 {
        self.start_y
    }

    #[must_use]
    pub const fn end_x(&self) -> u32 {
        self.end_x
    }

    #[must_use]
    pub const fn end_y(&self) -> u32 {
        self.end_y
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.end_x - self.start_x
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.end_y - self.start_y
    }

    /// Number of pixels in the tile. Never zero.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Returns `true` when the tile lies inside a `width × height` image.
    #[must_use]
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        self.end_x <= width && self.end_y <= height
    }

    /// Pixel coordinates `(x, y)` of the tile in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = (u32, u32)> + use<> {
        iproduct!(self.start_y..self.end_y, self.start_x..self.end_x).map(|(y, x)| (x, y))
    }

    /// Moves the tile up by `rows`, for addressing it inside a band of rows.
    pub(crate) const fn shifted_up(self, rows: u32) -> Self {
        Self {
            start_y: self.start_y - rows,
            end_y: self.end_y - rows,
            ..self
        }
    }
}

/// Partition of a `width × height` image into a grid of `tile_size` tiles.
///
/// Stages advance by `tile_size` from the origin. The grid has
/// `ceil(width / tile_size) × ceil(height / tile_size)` cells, and the far
/// edge of every cell is clipped according to the `BoundaryPolicy`. Cells
/// left without pixels after clipping produce no tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: NonZeroU32,
    boundary: BoundaryPolicy,
}

impl TileGrid {
    #[must_use]
    pub const fn new(
        width: u32,
        height: u32,
        tile_size: NonZeroU32,
        boundary: BoundaryPolicy,
    ) -> Self {
        Self {
            width,
            height,
            tile_size,
            boundary,
        }
    }

    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size.get()
    }

    /// Number of grid cells along each axis, (columns, rows).
    #[must_use]
    pub const fn stages(&self) -> (u32, u32) {
        (
            self.width.div_ceil(self.tile_size.get()),
            self.height.div_ceil(self.tile_size.get()),
        )
    }

    /// The clipped tile of the cell at zero-based stage indices, if it has pixels.
    #[must_use]
    pub const fn tile_at(&self, stage_x: u32, stage_y: u32) -> Option<Tile> {
        let size = self.tile_size.get() as u64;
        let start_x = size * stage_x as u64;
        let start_y = size * stage_y as u64;
        if start_x >= self.width as u64 || start_y >= self.height as u64 {
            return None;
        }
        let end_x = self.boundary.clip(start_x + size, self.width);
        let end_y = self.boundary.clip(start_y + size, self.height);
        Tile::new(start_x as u32, start_y as u32, end_x, end_y)
    }

    /// Tiles of one grid row, left to right.
    pub fn row_tiles(&self, stage_y: u32) -> impl Iterator<Item = Tile> + '_ {
        (0..self.stages().0).filter_map(move |stage_x| self.tile_at(stage_x, stage_y))
    }

    /// All tiles, outer loop over rows and inner loop over columns.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let (columns, rows) = self.stages();
        iproduct!(0..rows, 0..columns)
            .filter_map(move |(stage_y, stage_x)| self.tile_at(stage_x, stage_y))
    }
}
