use crate::frame::GrayPlane;

/// Local contrast at `(x, y)`: max − min gray over the square window of
/// the given radius, clamped to the image. Sentinel pixels are skipped.
///
/// Returns 0 when the window holds no valid sample.
pub fn local_contrast(gray: &GrayPlane, x: usize, y: usize, radius: usize) -> f64 {
    let (w, h) = (gray.width(), gray.height());
    let x0 = x.saturating_sub(radius);
    let x1 = (x + radius).min(w - 1);
    let y0 = y.saturating_sub(radius);
    let y1 = (y + radius).min(h - 1);

    let mut min = i16::MAX;
    let mut max = i16::MIN;
    for row in y0..=y1 {
        for col in x0..=x1 {
            if let Some(g) = gray.get(col, row) {
                min = min.min(g);
                max = max.max(g);
            }
        }
    }

    if max < min {
        0.0
    } else {
        (max - min) as f64
    }
}
