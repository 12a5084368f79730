//! Pixel selection and blending strategies.
//!
//! Every strategy reads the aligned frame set and writes disjoint row bands
//! of one canonical-sized output on the shared worker pool.

pub mod depth_map;
pub mod laplacian;
pub mod max_contrast;
mod select;
pub mod weighted;

use ndarray::ArrayViewMut3;
use rayon::ThreadPool;
use tracing::{info, warn};

use crate::error::{MacrostackError, Result};
use crate::frame::{GrayPlane, PixelGrid};
use crate::parallel::{partition, WorkBand};
use crate::pipeline::config::StackAlgorithm;
use crate::pipeline::{PipelineStage, ProgressReporter};

/// Aligned frames plus their grayscale caches, all at canonical size.
pub struct StackInput<'a> {
    pub frames: &'a [PixelGrid],
    pub grays: Vec<GrayPlane>,
    pub width: usize,
    pub height: usize,
}

impl<'a> StackInput<'a> {
    /// Validate that every frame has the canonical `(width, height)` and
    /// build the gray caches.
    pub fn new(frames: &'a [PixelGrid], width: usize, height: usize) -> Result<Self> {
        if frames.is_empty() {
            return Err(MacrostackError::EmptyInput);
        }
        for (index, frame) in frames.iter().enumerate() {
            if frame.dimensions() != (width, height) {
                return Err(MacrostackError::DimensionMismatch {
                    index,
                    width: frame.width(),
                    height: frame.height(),
                    expected_width: width,
                    expected_height: height,
                });
            }
        }
        let grays = frames.iter().map(PixelGrid::gray).collect();
        Ok(Self {
            frames,
            grays,
            width,
            height,
        })
    }

    /// Frames paired with their gray caches.
    pub fn sources(&self) -> impl Iterator<Item = (&PixelGrid, &GrayPlane)> {
        self.frames.iter().zip(self.grays.iter())
    }
}

/// Stack `frames` with `algorithm`, splitting rows across the pool's
/// threads. The result has the canonical size `(width, height)`.
pub fn stack_frames(
    algorithm: StackAlgorithm,
    frames: &[PixelGrid],
    width: usize,
    height: usize,
    pool: &ThreadPool,
    reporter: &dyn ProgressReporter,
) -> Result<PixelGrid> {
    let input = StackInput::new(frames, width, height)?;
    let bands = partition(height, pool.current_num_threads());
    info!(
        algorithm = %algorithm,
        frames = frames.len(),
        bands = bands.len(),
        "Stacking"
    );
    log_bands(&bands);

    match algorithm {
        StackAlgorithm::WeightedAverage => {
            weighted::weighted_average_stack(&input, pool, &bands, reporter)
        }
        StackAlgorithm::MaxContrast => {
            max_contrast::max_contrast_stack(&input, pool, &bands, reporter)
        }
        StackAlgorithm::Pyramid => {
            // No multi-resolution blending exists; pyramid selects like max contrast.
            warn!("Pyramid stacking is an alias of max contrast selection");
            reporter.report(PipelineStage::Stacking.range().0, "Pyramid (max contrast)...");
            max_contrast::max_contrast_stack(&input, pool, &bands, reporter)
        }
        StackAlgorithm::Laplacian => laplacian::laplacian_stack(&input, pool, &bands, reporter),
        StackAlgorithm::DepthMap => depth_map::depth_map_stack(&input, pool, &bands, reporter),
    }
}

fn log_bands(bands: &[WorkBand]) {
    for (i, band) in bands.iter().enumerate() {
        tracing::debug!(worker = i, rows = band.len(), "{band}");
    }
}

/// Write `rgb` at row `row` (relative to the band) and column `col`.
#[inline]
pub(crate) fn put_pixel(rows: &mut ArrayViewMut3<'_, u8>, row: usize, col: usize, rgb: [u8; 3]) {
    rows[[row, col, 0]] = rgb[0];
    rows[[row, col, 1]] = rgb[1];
    rows[[row, col, 2]] = rgb[2];
}
