use std::path::Path;

use crate::error::Result;
use crate::frame::PixelGrid;

use super::image_io::load_image;
use super::is_standard_image;
use super::raw::RawLadder;

/// Turns a source path into a [`PixelGrid`].
///
/// Implementations are shared across ingestion worker threads.
pub trait Decoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<PixelGrid>;
}

/// Standard rasters through the `image` crate, everything else through the
/// raw fallback ladder.
pub struct FileDecoder {
    raw: RawLadder,
}

impl FileDecoder {
    pub fn new(raw: RawLadder) -> Self {
        Self { raw }
    }
}

impl Default for FileDecoder {
    fn default() -> Self {
        Self::new(RawLadder::standard())
    }
}

impl Decoder for FileDecoder {
    fn decode(&self, path: &Path) -> Result<PixelGrid> {
        if is_standard_image(path) {
            load_image(path)
        } else {
            self.raw.decode(path)
        }
    }
}
