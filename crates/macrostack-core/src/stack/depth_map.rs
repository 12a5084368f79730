//! Depth map stacking.
//!
//! Three barrier-separated phases over the same row bands:
//! 1. per pixel, record which source is sharpest (index map);
//! 2. median-filter the index map to remove speckle;
//! 3. composite from the smoothed map, blending the two dominant sources
//!    where the map changes.

use ndarray::{Array2, Array3};
use rayon::ThreadPool;
use tracing::debug;

use crate::consts::{COLOR_CHANNEL_COUNT, DEPTH_MEDIAN_RADIUS, DEPTH_ROW_REPORT_INTERVAL};
use crate::error::Result;
use crate::frame::{is_sentinel, PixelGrid};
use crate::parallel::{run_bands, WorkBand};
use crate::pipeline::{PipelineStage, ProgressReporter, ProgressSpan};
use crate::quality::depth_sharpness;

use super::{put_pixel, StackInput};

/// Per-pixel winner of the sharpness contest.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DepthSample {
    /// Index of the sharpest non-sentinel frame (0 if none).
    pub index: usize,
    /// Its sharpness, or -1 when every frame is sentinel here.
    pub sharpness: f64,
}

pub fn depth_map_stack(
    input: &StackInput<'_>,
    pool: &ThreadPool,
    bands: &[WorkBand],
    reporter: &dyn ProgressReporter,
) -> Result<PixelGrid> {
    let samples = compute_depth_map(input, pool, bands, reporter)?;
    let index_map = samples.map(|s| s.index);
    debug!(
        peak_sharpness = samples.iter().map(|s| s.sharpness).fold(f64::MIN, f64::max),
        "Depth map computed"
    );
    drop(samples);

    let smoothed = median_smooth(&index_map, DEPTH_MEDIAN_RADIUS, pool, bands, reporter)?;
    drop(index_map);

    composite(input, &smoothed, pool, bands, reporter)
}

/// Phase 1: sharpest source per pixel.
pub fn compute_depth_map(
    input: &StackInput<'_>,
    pool: &ThreadPool,
    bands: &[WorkBand],
    reporter: &dyn ProgressReporter,
) -> Result<Array2<DepthSample>> {
    let (w, h) = (input.width, input.height);
    let mut samples = Array2::<DepthSample>::default((h, w));
    let progress = ProgressSpan::new(
        reporter,
        PipelineStage::DepthSelection,
        h,
        DEPTH_ROW_REPORT_INTERVAL,
    );
    progress.begin("Computing depth map...");

    run_bands(pool, samples.view_mut(), bands, |band, mut rows| {
        for y in band.rows() {
            for x in 0..w {
                let mut best = DepthSample {
                    index: 0,
                    sharpness: -1.0,
                };
                for (i, (frame, gray)) in input.sources().enumerate() {
                    if frame.is_sentinel_at(x, y) {
                        continue;
                    }
                    let sharpness = depth_sharpness(gray, x, y);
                    if sharpness > best.sharpness {
                        best = DepthSample {
                            index: i,
                            sharpness,
                        };
                    }
                }
                rows[[y - band.start, x]] = best;
            }
            progress.tick();
        }
        Ok(())
    })?;

    Ok(samples)
}

/// Phase 2: median of the `(2·radius+1)²` neighbourhood, clamped at the
/// borders.
pub fn median_smooth(
    index_map: &Array2<usize>,
    radius: usize,
    pool: &ThreadPool,
    bands: &[WorkBand],
    reporter: &dyn ProgressReporter,
) -> Result<Array2<usize>> {
    let (h, w) = index_map.dim();
    let mut smoothed = Array2::<usize>::zeros((h, w));
    let progress = ProgressSpan::new(
        reporter,
        PipelineStage::DepthSmoothing,
        h,
        DEPTH_ROW_REPORT_INTERVAL,
    );
    progress.begin("Median smoothing...");

    let side = 2 * radius + 1;
    run_bands(pool, smoothed.view_mut(), bands, |band, mut rows| {
        let mut window = Vec::with_capacity(side * side);
        for y in band.rows() {
            for x in 0..w {
                window.clear();
                for dy in 0..side {
                    let ny = (y + dy).saturating_sub(radius).min(h - 1);
                    for dx in 0..side {
                        let nx = (x + dx).saturating_sub(radius).min(w - 1);
                        window.push(index_map[[ny, nx]]);
                    }
                }
                let mid = window.len() / 2;
                rows[[y - band.start, x]] = *window.select_nth_unstable(mid).1;
            }
            progress.tick();
        }
        Ok(())
    })?;

    Ok(smoothed)
}

/// Phase 3: build the output from the smoothed index map.
fn composite(
    input: &StackInput<'_>,
    index_map: &Array2<usize>,
    pool: &ThreadPool,
    bands: &[WorkBand],
    reporter: &dyn ProgressReporter,
) -> Result<PixelGrid> {
    let (w, h) = (input.width, input.height);
    let frame_count = input.frames.len();
    let mut output = Array3::<u8>::zeros((h, w, COLOR_CHANNEL_COUNT));
    let progress = ProgressSpan::new(
        reporter,
        PipelineStage::DepthCompositing,
        h,
        DEPTH_ROW_REPORT_INTERVAL,
    );
    progress.begin("Compositing...");

    run_bands(pool, output.view_mut(), bands, |band, mut rows| {
        let mut counts = vec![0usize; frame_count];
        for y in band.rows() {
            for x in 0..w {
                let rgb = if is_edge_pixel(index_map, x, y) {
                    let (first, second) = dominant_pair(index_map, x, y, &mut counts);
                    blend(
                        input.frames[first].pixel(x, y),
                        input.frames[second].pixel(x, y),
                    )
                } else {
                    input.frames[index_map[[y, x]]].pixel(x, y)
                };
                if !is_sentinel(rgb) {
                    put_pixel(&mut rows, y - band.start, x, rgb);
                }
            }
            progress.tick();
        }
        Ok(())
    })?;

    PixelGrid::new(output)
}

/// An interior pixel whose index differs from any of its 4 neighbours.
/// Border pixels are never edges.
pub fn is_edge_pixel(map: &Array2<usize>, x: usize, y: usize) -> bool {
    let (h, w) = map.dim();
    if x == 0 || y == 0 || x + 1 >= w || y + 1 >= h {
        return false;
    }
    let center = map[[y, x]];
    map[[y - 1, x]] != center
        || map[[y + 1, x]] != center
        || map[[y, x - 1]] != center
        || map[[y, x + 1]] != center
}

/// The two most frequent indices in the clamped 3×3 neighbourhood.
///
/// Ties go to the lower index. `counts` is scratch space with one slot per
/// frame.
pub fn dominant_pair(
    map: &Array2<usize>,
    x: usize,
    y: usize,
    counts: &mut [usize],
) -> (usize, usize) {
    let (h, w) = map.dim();
    counts.fill(0);
    for dy in 0..3 {
        let ny = (y + dy).saturating_sub(1).min(h - 1);
        for dx in 0..3 {
            let nx = (x + dx).saturating_sub(1).min(w - 1);
            counts[map[[ny, nx]]] += 1;
        }
    }

    let (mut first, mut second) = (0, 0);
    let (mut first_count, mut second_count) = (0, 0);
    for (i, &count) in counts.iter().enumerate() {
        if count > first_count {
            second = first;
            second_count = first_count;
            first = i;
            first_count = count;
        } else if count > second_count {
            second = i;
            second_count = count;
        }
    }
    (first, second)
}

/// Channel-wise mean of two pixels; if one is sentinel the other wins.
pub fn blend(a: [u8; 3], b: [u8; 3]) -> [u8; 3] {
    if is_sentinel(a) {
        return b;
    }
    if is_sentinel(b) {
        return a;
    }
    [0, 1, 2].map(|c| ((a[c] as u16 + b[c] as u16) / 2) as u8)
}
