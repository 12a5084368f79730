pub mod keypoints;
pub mod search;
mod translate;

pub use keypoints::{detect_keypoints, Keypoint};
pub use search::{alignment_score, find_offset};
pub use translate::translate;

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, info, warn};

use crate::error::{MacrostackError, Result};
use crate::frame::{AlignmentOffset, PixelGrid};
use crate::pipeline::{PipelineStage, ProgressReporter, ProgressSpan};

/// Frames translated onto the reference canvas, with the offset applied to
/// each. `offsets[0]` is always `(0, 0)`.
#[derive(Clone, Debug)]
pub struct Alignment {
    pub frames: Vec<PixelGrid>,
    pub offsets: Vec<AlignmentOffset>,
}

/// Align every frame to frame 0 by integer translation.
///
/// Offsets are searched in parallel on `pool`. An inconclusive search yields
/// `(0, 0)`; alignment itself never fails.
pub fn align_frames(
    frames: Vec<PixelGrid>,
    pool: &ThreadPool,
    reporter: &dyn ProgressReporter,
) -> Result<Alignment> {
    let Some(first) = frames.first() else {
        return Err(MacrostackError::EmptyInput);
    };
    let (width, height) = first.dimensions();
    let reference = first.gray();

    let keypoints = detect_keypoints(&reference);
    if keypoints.is_empty() {
        warn!("Reference frame has little texture, alignment may be unreliable");
    } else {
        info!(keypoints = keypoints.len(), "Reference keypoints detected");
    }

    let progress = ProgressSpan::new(reporter, PipelineStage::Alignment, frames.len() - 1, 1);
    progress.begin("Auto-aligning...");

    let results: Vec<Result<(PixelGrid, AlignmentOffset)>> = pool.install(|| {
        frames
            .into_par_iter()
            .enumerate()
            .map(|(i, frame)| {
                if i == 0 {
                    return Ok((frame, AlignmentOffset::IDENTITY));
                }
                let offset = find_offset(&reference, &frame.gray());
                debug!(frame = i, dx = offset.dx, dy = offset.dy, "Offset found");
                let aligned = translate(&frame, offset, width, height)?;
                progress.tick_with(|done, total| format!("Aligned {done}/{total}"));
                Ok((aligned, offset))
            })
            .collect()
    });

    let (frames, offsets): (Vec<_>, Vec<_>) = results
        .into_iter()
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .unzip();

    reporter.report(PipelineStage::Alignment.range().1, "Alignment complete");
    Ok(Alignment { frames, offsets })
}

/// Re-canvas frames that do not match the canonical size, without
/// translating them. Frames already at canonical size pass through.
pub fn fit_to_canvas(frames: Vec<PixelGrid>, width: usize, height: usize) -> Result<Vec<PixelGrid>> {
    frames
        .into_iter()
        .enumerate()
        .map(|(i, frame)| {
            if frame.dimensions() == (width, height) {
                Ok(frame)
            } else {
                debug!(
                    frame = i,
                    width = frame.width(),
                    height = frame.height(),
                    "Re-canvasing frame to canonical size"
                );
                translate(&frame, AlignmentOffset::IDENTITY, width, height)
            }
        })
        .collect()
}
