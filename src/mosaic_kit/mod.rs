pub mod blend;
pub mod mosaic_blend;
pub mod pixelize;
pub mod tile;
pub mod tile_average;
