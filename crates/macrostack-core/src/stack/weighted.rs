use ndarray::Array3;
use rayon::ThreadPool;

use crate::consts::{COLOR_CHANNEL_COUNT, CONTRAST_RADIUS, ROW_REPORT_INTERVAL};
use crate::error::Result;
use crate::frame::{is_sentinel, PixelGrid};
use crate::parallel::{run_bands, WorkBand};
use crate::pipeline::{PipelineStage, ProgressReporter, ProgressSpan};
use crate::quality::local_contrast;

use super::{put_pixel, StackInput};

/// Blend every non-sentinel source, weighting each by
/// `(local_contrast + 1)²`.
///
/// Pixels where every source is sentinel stay sentinel.
pub fn weighted_average_stack(
    input: &StackInput<'_>,
    pool: &ThreadPool,
    bands: &[WorkBand],
    reporter: &dyn ProgressReporter,
) -> Result<PixelGrid> {
    let (w, h) = (input.width, input.height);
    let mut output = Array3::<u8>::zeros((h, w, COLOR_CHANNEL_COUNT));
    let progress = ProgressSpan::new(reporter, PipelineStage::Stacking, h, ROW_REPORT_INTERVAL);

    run_bands(pool, output.view_mut(), bands, |band, mut rows| {
        for y in band.rows() {
            for x in 0..w {
                let mut totals = [0.0f64; COLOR_CHANNEL_COUNT];
                let mut total_weight = 0.0f64;

                for (frame, gray) in input.sources() {
                    let rgb = frame.pixel(x, y);
                    if is_sentinel(rgb) {
                        continue;
                    }
                    let contrast = local_contrast(gray, x, y, CONTRAST_RADIUS);
                    let weight = (contrast + 1.0).powi(2);
                    for (t, &c) in totals.iter_mut().zip(rgb.iter()) {
                        *t += c as f64 * weight;
                    }
                    total_weight += weight;
                }

                if total_weight > 0.0 {
                    let avg = totals.map(|t| (t / total_weight).min(255.0) as u8);
                    put_pixel(&mut rows, y - band.start, x, avg);
                }
            }
            progress.tick();
        }
        Ok(())
    })?;

    PixelGrid::new(output)
}
