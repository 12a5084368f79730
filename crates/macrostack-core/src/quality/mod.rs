pub mod contrast;
pub mod laplacian;

use crate::consts::{
    DEPTH_COARSE_RADIUS, DEPTH_COARSE_WEIGHT, DEPTH_FINE_RADIUS, DEPTH_FINE_WEIGHT,
    DEPTH_LAPLACIAN_WEIGHT,
};
use crate::frame::GrayPlane;

pub use contrast::local_contrast;
pub use laplacian::laplacian_at;

/// Combined sharpness used by the depth map: two contrast scales plus the
/// Laplacian magnitude.
pub fn depth_sharpness(gray: &GrayPlane, x: usize, y: usize) -> f64 {
    DEPTH_FINE_WEIGHT * local_contrast(gray, x, y, DEPTH_FINE_RADIUS)
        + DEPTH_COARSE_WEIGHT * local_contrast(gray, x, y, DEPTH_COARSE_RADIUS)
        + DEPTH_LAPLACIAN_WEIGHT * laplacian_at(gray, x, y).abs()
}
