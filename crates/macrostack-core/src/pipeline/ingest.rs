use std::path::PathBuf;

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::info;

use crate::error::{MacrostackError, Result};
use crate::frame::PixelGrid;
use crate::io::decode::Decoder;

use super::types::{PipelineStage, ProgressReporter, ProgressSpan};

/// Decode every path on the pool, preserving input order.
///
/// The first decode error observed aborts the phase; frames decoded by
/// tasks still in flight are discarded.
pub fn load_frames(
    paths: &[PathBuf],
    decoder: &dyn Decoder,
    pool: &ThreadPool,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<PixelGrid>> {
    if paths.is_empty() {
        return Err(MacrostackError::EmptyInput);
    }

    let progress = ProgressSpan::new(reporter, PipelineStage::Loading, paths.len(), 1);
    progress.begin(&format!(
        "Loading {} images ({} threads)...",
        paths.len(),
        pool.current_num_threads()
    ));

    let frames = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let frame = decoder.decode(path).map_err(|e| match e {
                    e @ MacrostackError::DecodeFailure { .. } => e,
                    other => MacrostackError::DecodeFailure {
                        path: path.clone(),
                        cause: other.to_string(),
                    },
                })?;
                progress.tick_with(|_, _| format!("Loaded: {}", file_label(path)));
                Ok(frame)
            })
            .collect::<Result<Vec<_>>>()
    })?;

    info!(frames = frames.len(), "Frames loaded");
    Ok(frames)
}

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
