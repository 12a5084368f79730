use image::imageops::{self, FilterType};
use tracing::info;

use crate::error::Result;
use crate::frame::PixelGrid;

/// Resize `grid` to exactly `width × height` with bicubic (Catmull-Rom)
/// filtering. Grids already at that size are returned unchanged.
pub fn resize_to_canonical(grid: PixelGrid, width: usize, height: usize) -> Result<PixelGrid> {
    if grid.dimensions() == (width, height) {
        return Ok(grid);
    }

    info!(
        from_width = grid.width(),
        from_height = grid.height(),
        width,
        height,
        "Resizing result to canonical size"
    );
    let resized = imageops::resize(
        &grid.to_rgb_image(),
        width as u32,
        height as u32,
        FilterType::CatmullRom,
    );
    PixelGrid::from_rgb(width, height, resized.into_raw())
}
