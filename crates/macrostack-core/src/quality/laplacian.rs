use crate::frame::GrayPlane;

/// Discrete 4-neighbour Laplacian at `(x, y)`:
///
///   4·center − top − bottom − left − right
///
/// Border pixels score 0. Sentinel pixels read as gray 0.
pub fn laplacian_at(gray: &GrayPlane, x: usize, y: usize) -> f64 {
    let (w, h) = (gray.width(), gray.height());
    if x == 0 || y == 0 || x + 1 >= w || y + 1 >= h {
        return 0.0;
    }

    let center = gray.get_or_zero(x, y) as f64;
    let top = gray.get_or_zero(x, y - 1) as f64;
    let bottom = gray.get_or_zero(x, y + 1) as f64;
    let left = gray.get_or_zero(x - 1, y) as f64;
    let right = gray.get_or_zero(x + 1, y) as f64;

    4.0 * center - top - bottom - left - right
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelGrid;

    fn plane(values: &[u8], width: usize) -> GrayPlane {
        let pixels = values.iter().flat_map(|&v| [v, v, v]).collect();
        PixelGrid::from_rgb(width, values.len() / width, pixels)
            .unwrap()
            .gray()
    }

    #[test]
    fn flat_region_scores_zero() {
        let gray = plane(&[50; 9], 3);
        assert_eq!(laplacian_at(&gray, 1, 1), 0.0);
    }

    #[test]
    fn peak_scores_positive() {
        #[rustfmt::skip]
        let gray = plane(&[
            10, 10, 10,
            10, 60, 10,
            10, 10, 10,
        ], 3);
        assert_eq!(laplacian_at(&gray, 1, 1), 200.0);
    }

    #[test]
    fn border_scores_zero() {
        let gray = plane(&[10, 200, 10, 200, 10, 200, 10, 200, 10], 3);
        assert_eq!(laplacian_at(&gray, 0, 1), 0.0);
        assert_eq!(laplacian_at(&gray, 2, 2), 0.0);
    }
}
