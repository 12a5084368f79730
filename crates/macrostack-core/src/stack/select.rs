use ndarray::Array3;
use rayon::ThreadPool;

use crate::consts::{COLOR_CHANNEL_COUNT, ROW_REPORT_INTERVAL};
use crate::error::Result;
use crate::frame::{is_sentinel, GrayPlane, PixelGrid};
use crate::parallel::{run_bands, WorkBand};
use crate::pipeline::{PipelineStage, ProgressReporter, ProgressSpan};

use super::{put_pixel, StackInput};

/// Per pixel, copy the non-sentinel source with the highest `score`.
///
/// Ties keep the earliest frame. When no source qualifies the pixel takes
/// frame 0's value, which is then sentinel and left unwritten.
pub(super) fn select_by_score<F>(
    input: &StackInput<'_>,
    pool: &ThreadPool,
    bands: &[WorkBand],
    reporter: &dyn ProgressReporter,
    score: F,
) -> Result<PixelGrid>
where
    F: Fn(&GrayPlane, usize, usize) -> f64 + Send + Sync,
{
    let (w, h) = (input.width, input.height);
    let mut output = Array3::<u8>::zeros((h, w, COLOR_CHANNEL_COUNT));
    let progress = ProgressSpan::new(reporter, PipelineStage::Stacking, h, ROW_REPORT_INTERVAL);

    run_bands(pool, output.view_mut(), bands, |band, mut rows| {
        for y in band.rows() {
            for x in 0..w {
                let mut best = input.frames[0].pixel(x, y);
                let mut best_score = -1.0;
                for (frame, gray) in input.sources() {
                    let rgb = frame.pixel(x, y);
                    if is_sentinel(rgb) {
                        continue;
                    }
                    let s = score(gray, x, y);
                    if s > best_score {
                        best_score = s;
                        best = rgb;
                    }
                }
                if !is_sentinel(best) {
                    put_pixel(&mut rows, y - band.start, x, best);
                }
            }
            progress.tick();
        }
        Ok(())
    })?;

    PixelGrid::new(output)
}
