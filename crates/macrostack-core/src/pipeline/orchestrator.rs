use std::path::PathBuf;

use tracing::info;

use crate::align::{align_frames, fit_to_canvas};
use crate::error::{MacrostackError, Result};
use crate::frame::PixelGrid;
use crate::io::decode::{Decoder, FileDecoder};
use crate::parallel::build_pool;
use crate::stack::stack_frames;

use super::config::StackConfig;
use super::ingest::load_frames;
use super::resize::resize_to_canonical;
use super::types::{NoOpReporter, PipelineStage, ProgressReporter};

/// Decode, align, stack and resize `paths` with a progress reporter and a
/// custom decoder.
pub fn run_stack_reported(
    paths: &[PathBuf],
    config: &StackConfig,
    decoder: &dyn Decoder,
    reporter: &dyn ProgressReporter,
) -> Result<PixelGrid> {
    if paths.is_empty() {
        return Err(MacrostackError::EmptyInput);
    }
    let pool = build_pool(config.effective_threads())?;
    info!(
        inputs = paths.len(),
        threads = pool.current_num_threads(),
        algorithm = %config.algorithm,
        auto_align = config.auto_align,
        "Starting stack"
    );

    let frames = load_frames(paths, decoder, &pool, reporter)?;
    stack_loaded(frames, config, &pool, reporter)
}

/// Run the pipeline on frames that are already decoded.
pub fn stack_decoded(
    frames: Vec<PixelGrid>,
    config: &StackConfig,
    reporter: &dyn ProgressReporter,
) -> Result<PixelGrid> {
    if frames.is_empty() {
        return Err(MacrostackError::EmptyInput);
    }
    let pool = build_pool(config.effective_threads())?;
    stack_loaded(frames, config, &pool, reporter)
}

fn stack_loaded(
    frames: Vec<PixelGrid>,
    config: &StackConfig,
    pool: &rayon::ThreadPool,
    reporter: &dyn ProgressReporter,
) -> Result<PixelGrid> {
    let Some(first) = frames.first() else {
        return Err(MacrostackError::EmptyInput);
    };
    let (width, height) = first.dimensions();
    info!(width, height, "Canonical resolution");
    reporter.report(
        PipelineStage::Loading.range().1,
        &format!("Resolution: {width}x{height}"),
    );

    let frames = if config.auto_align && frames.len() > 1 {
        let alignment = align_frames(frames, pool, reporter)?;
        for (i, offset) in alignment.offsets.iter().enumerate().skip(1) {
            info!(frame = i, offset = %offset, "Aligned");
        }
        alignment.frames
    } else {
        fit_to_canvas(frames, width, height)?
    };

    reporter.report(
        PipelineStage::Stacking.range().0,
        &format!("Stacking ({} threads)...", pool.current_num_threads()),
    );
    let result = stack_frames(config.algorithm, &frames, width, height, pool, reporter)?;
    drop(frames);

    if result.dimensions() != (width, height) {
        reporter.report(PipelineStage::Resizing.range().0, "Final resize...");
    }
    let result = resize_to_canonical(result, width, height)?;

    reporter.report(
        100,
        &format!("Done - {}x{}", result.width(), result.height()),
    );
    Ok(result)
}

/// Decode, align, stack and resize `paths` with the default file decoder
/// and no progress reporting.
pub fn run_stack(paths: &[PathBuf], config: &StackConfig) -> Result<PixelGrid> {
    run_stack_reported(paths, config, &FileDecoder::default(), &NoOpReporter)
}
