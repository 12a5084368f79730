use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::{info, warn};

use crate::error::Result;
use crate::frame::PixelGrid;
use crate::pipeline::config::OutputFormat;

use super::fits;

/// Load a JPEG/PNG/TIFF (or any format the `image` crate detects) as RGB.
pub fn load_image(path: &Path) -> Result<PixelGrid> {
    let img = image::open(path)?;
    PixelGrid::from_dynamic(img)
}

/// Decode an in-memory image of a known format.
pub fn load_image_from_memory(bytes: &[u8], format: ImageFormat) -> Result<PixelGrid> {
    let img = image::load_from_memory_with_format(bytes, format)?;
    PixelGrid::from_dynamic(img)
}

/// Save an 8-bit RGB PNG.
pub fn save_png(grid: &PixelGrid, path: &Path) -> Result<()> {
    grid.to_rgb_image().save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a baseline JPEG.
pub fn save_jpeg(grid: &PixelGrid, path: &Path) -> Result<()> {
    grid.to_rgb_image().save_with_format(path, ImageFormat::Jpeg)?;
    Ok(())
}

/// Save an 8-bit RGB TIFF.
pub fn save_tiff(grid: &PixelGrid, path: &Path) -> Result<()> {
    grid.to_rgb_image().save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// `path` with the format's extension appended unless it already ends
/// with it (case-insensitive).
pub fn output_path(path: &Path, format: OutputFormat) -> PathBuf {
    let ext = format.extension();
    let name = path.to_string_lossy();
    if name.to_ascii_lowercase().ends_with(ext) {
        path.to_path_buf()
    } else {
        PathBuf::from(format!("{name}{ext}"))
    }
}

/// Save the stacked result in `format` and return the path written.
pub fn save_result(grid: &PixelGrid, path: &Path, format: OutputFormat) -> Result<PathBuf> {
    let path = output_path(path, format);
    let written = match format {
        OutputFormat::Fits => {
            fits::write_rgb_planes(grid, &path)?;
            path
        }
        OutputFormat::Png => {
            save_png(grid, &path)?;
            path
        }
        OutputFormat::Jpeg => {
            save_jpeg(grid, &path)?;
            path
        }
        OutputFormat::Tiff => {
            save_tiff(grid, &path)?;
            path
        }
        OutputFormat::Cr2 => {
            let tiff_path = path.with_extension("tif");
            save_tiff(grid, &tiff_path)?;
            warn!(
                path = %tiff_path.display(),
                "CR2 output written as TIFF; native CR2 encoding is not supported"
            );
            tiff_path
        }
    };
    info!(path = %written.display(), format = %format, "Result saved");
    Ok(written)
}
