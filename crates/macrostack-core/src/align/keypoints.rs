use crate::consts::{
    KEYPOINT_MIN_CONTRAST, KEYPOINT_MIN_STRIDE, KEYPOINT_RADIUS, KEYPOINT_STRIDE_DIVISOR,
};
use crate::frame::GrayPlane;
use crate::quality::local_contrast;

/// A grid sample with enough local contrast to carry alignment signal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    pub x: usize,
    pub y: usize,
    pub contrast: f64,
}

/// Grid stride for keypoint sampling: `max(20, min(w, h) / 40)`.
pub fn keypoint_stride(width: usize, height: usize) -> usize {
    KEYPOINT_MIN_STRIDE.max(width.min(height) / KEYPOINT_STRIDE_DIVISOR)
}

/// Sample the frame on a grid and keep points whose radius-10 contrast
/// exceeds 30 gray levels. A margin of one stride is left on every side.
pub fn detect_keypoints(gray: &GrayPlane) -> Vec<Keypoint> {
    let (w, h) = (gray.width(), gray.height());
    let step = keypoint_stride(w, h);
    let mut points = Vec::new();

    for y in (step..h.saturating_sub(step)).step_by(step) {
        for x in (step..w.saturating_sub(step)).step_by(step) {
            let contrast = local_contrast(gray, x, y, KEYPOINT_RADIUS);
            if contrast > KEYPOINT_MIN_CONTRAST {
                points.push(Keypoint { x, y, contrast });
            }
        }
    }

    points
}
