use rayon::ThreadPool;

use crate::error::Result;
use crate::frame::PixelGrid;
use crate::parallel::WorkBand;
use crate::pipeline::ProgressReporter;
use crate::quality::laplacian_at;

use super::select::select_by_score;
use super::StackInput;

/// Per pixel, keep the source with the strongest Laplacian response.
pub fn laplacian_stack(
    input: &StackInput<'_>,
    pool: &ThreadPool,
    bands: &[WorkBand],
    reporter: &dyn ProgressReporter,
) -> Result<PixelGrid> {
    select_by_score(input, pool, bands, reporter, |gray, x, y| {
        laplacian_at(gray, x, y).abs()
    })
}
