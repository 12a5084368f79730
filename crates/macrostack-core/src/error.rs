use std::path::PathBuf;

use thiserror::Error;

use crate::parallel::WorkBand;

#[derive(Error, Debug)]
pub enum MacrostackError {
    #[error("No input frames supplied")]
    EmptyInput,

    #[error("Failed to decode {}: {cause}", path.display())]
    DecodeFailure { path: PathBuf, cause: String },

    #[error("Worker failure in band {band}: {cause}")]
    WorkerFailure { band: WorkBand, cause: String },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Frame {index} is {width}x{height}, expected canonical {expected_width}x{expected_height}")]
    DimensionMismatch {
        index: usize,
        width: usize,
        height: usize,
        expected_width: usize,
        expected_height: usize,
    },

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("Invalid FITS file: {0}")]
    Fits(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, MacrostackError>;
