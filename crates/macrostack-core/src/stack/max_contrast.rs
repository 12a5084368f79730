use rayon::ThreadPool;

use crate::consts::CONTRAST_RADIUS;
use crate::error::Result;
use crate::frame::PixelGrid;
use crate::parallel::WorkBand;
use crate::pipeline::ProgressReporter;
use crate::quality::local_contrast;

use super::select::select_by_score;
use super::StackInput;

/// Per pixel, keep the source with the highest local contrast.
pub fn max_contrast_stack(
    input: &StackInput<'_>,
    pool: &ThreadPool,
    bands: &[WorkBand],
    reporter: &dyn ProgressReporter,
) -> Result<PixelGrid> {
    select_by_score(input, pool, bands, reporter, |gray, x, y| {
        local_contrast(gray, x, y, CONTRAST_RADIUS)
    })
}
