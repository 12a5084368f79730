//! Camera raw decoding.
//!
//! Raw files are tried against an ordered list of rungs: the `dcraw`
//! converter, ImageMagick, then the JPEG preview most cameras embed. The
//! first rung to produce an image wins; if all fail, every rung's error is
//! reported together.

use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};

use image::ImageFormat;
use memmap2::Mmap;
use tracing::{debug, info, warn};

use crate::consts::{EMBEDDED_MIN_JPEG_BYTES, EMBEDDED_SCAN_LIMIT, MIN_EXTERNAL_DECODE_BYTES};
use crate::error::{MacrostackError, Result};
use crate::frame::PixelGrid;

use super::image_io::load_image_from_memory;

/// One fallible strategy in the raw decode ladder.
pub trait RawRung: Send + Sync {
    fn name(&self) -> &str;
    fn decode(&self, path: &Path) -> std::result::Result<PixelGrid, String>;
}

/// Ordered list of raw decode strategies.
pub struct RawLadder {
    rungs: Vec<Box<dyn RawRung>>,
}

impl RawLadder {
    pub fn new(rungs: Vec<Box<dyn RawRung>>) -> Self {
        Self { rungs }
    }

    /// `dcraw`, then ImageMagick, then the embedded preview.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(Dcraw::default()),
            Box::new(ImageMagick::default()),
            Box::new(EmbeddedPreview),
        ])
    }

    pub fn rung_names(&self) -> Vec<&str> {
        self.rungs.iter().map(|r| r.name()).collect()
    }

    /// Try each rung in order until one succeeds.
    pub fn decode(&self, path: &Path) -> Result<PixelGrid> {
        let mut failures = Vec::with_capacity(self.rungs.len());
        for rung in &self.rungs {
            match rung.decode(path) {
                Ok(grid) => {
                    info!(
                        rung = rung.name(),
                        width = grid.width(),
                        height = grid.height(),
                        path = %path.display(),
                        "Raw file decoded"
                    );
                    return Ok(grid);
                }
                Err(cause) => {
                    warn!(rung = rung.name(), path = %path.display(), "{cause}");
                    failures.push(format!("{}: {}", rung.name(), cause));
                }
            }
        }

        let cause = if failures.is_empty() {
            "no raw decoder configured".to_string()
        } else {
            failures.join("; ")
        };
        Err(MacrostackError::DecodeFailure {
            path: path.to_path_buf(),
            cause,
        })
    }
}

/// Full-resolution decode via `dcraw` writing 16-bit sRGB PNM to stdout.
pub struct Dcraw {
    program: String,
}

impl Default for Dcraw {
    fn default() -> Self {
        Self {
            program: "dcraw".into(),
        }
    }
}

impl RawRung for Dcraw {
    fn name(&self) -> &str {
        "dcraw"
    }

    fn decode(&self, path: &Path) -> std::result::Result<PixelGrid, String> {
        let mut cmd = Command::new(&self.program);
        // stdout, camera white balance, high quality, sRGB, 16-bit linear
        cmd.args(["-c", "-w", "-q", "3", "-o", "1", "-4"]).arg(path);
        let bytes = run_tool(cmd, &self.program)?;
        load_image_from_memory(&bytes, ImageFormat::Pnm).map_err(|e| e.to_string())
    }
}

/// Decode via ImageMagick 7 (`magick convert`), falling back to the legacy
/// `convert` binary.
pub struct ImageMagick {
    commands: Vec<Vec<String>>,
}

impl Default for ImageMagick {
    fn default() -> Self {
        Self {
            commands: vec![
                vec!["magick".into(), "convert".into()],
                vec!["convert".into()],
            ],
        }
    }
}

impl RawRung for ImageMagick {
    fn name(&self) -> &str {
        "imagemagick"
    }

    fn decode(&self, path: &Path) -> std::result::Result<PixelGrid, String> {
        let mut errors = Vec::new();
        for command in &self.commands {
            let Some((program, prefix)) = command.split_first() else {
                continue;
            };
            let mut cmd = Command::new(program);
            cmd.args(prefix).arg(path).args(["-auto-orient", "png:-"]);
            match run_tool(cmd, program)
                .and_then(|bytes| {
                    load_image_from_memory(&bytes, ImageFormat::Png).map_err(|e| e.to_string())
                }) {
                Ok(grid) => return Ok(grid),
                Err(e) => {
                    debug!(program = %program, "{e}");
                    errors.push(e);
                }
            }
        }
        Err(errors.join(", "))
    }
}

/// Run an external converter and return its stdout.
fn run_tool(mut cmd: Command, program: &str) -> std::result::Result<Vec<u8>, String> {
    let output = cmd
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| format!("failed to run {program}: {e}"))?;
    if !output.status.success() {
        return Err(format!("{program} exited with {}", output.status));
    }
    if output.stdout.len() < MIN_EXTERNAL_DECODE_BYTES {
        return Err(format!("{program} output too small or missing"));
    }
    Ok(output.stdout)
}

/// Largest decodable JPEG preview embedded in the raw container. Low
/// resolution compared to a full raw decode.
pub struct EmbeddedPreview;

impl RawRung for EmbeddedPreview {
    fn name(&self) -> &str {
        "embedded-preview"
    }

    fn decode(&self, path: &Path) -> std::result::Result<PixelGrid, String> {
        warn!(path = %path.display(), "Using embedded JPEG preview (low resolution)");
        let file = File::open(path).map_err(|e| e.to_string())?;
        let len = file.metadata().map_err(|e| e.to_string())?.len();
        if len == 0 {
            return Err("empty file".into());
        }
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| e.to_string())?;
        let bytes = &mmap[..mmap.len().min(EMBEDDED_SCAN_LIMIT)];

        find_embedded_jpegs(bytes)
            .into_iter()
            .filter_map(|jpeg| load_image_from_memory(jpeg, ImageFormat::Jpeg).ok())
            .max_by_key(|grid| grid.width() * grid.height())
            .ok_or_else(|| "no valid embedded JPEG found".to_string())
    }
}

/// Markers accepted right after an SOI as the start of a real JPEG stream.
const JPEG_LEADING_MARKERS: [u8; 6] = [0xE0, 0xE1, 0xDB, 0xC0, 0xC2, 0xC4];

/// Byte ranges that look like complete JPEG streams: `FF D8 FF xx` with a
/// known marker `xx`, up to the first `FF D9` at least 10 bytes later.
/// Streams of 1024 bytes or less are ignored.
pub fn find_embedded_jpegs(bytes: &[u8]) -> Vec<&[u8]> {
    let mut found = Vec::new();
    if bytes.len() <= 10 {
        return found;
    }

    for i in 0..bytes.len() - 10 {
        if bytes[i] != 0xFF || bytes[i + 1] != 0xD8 {
            continue;
        }
        if bytes[i + 2] != 0xFF || !JPEG_LEADING_MARKERS.contains(&bytes[i + 3]) {
            continue;
        }
        let search_from = i + 10;
        let Some(pos) = bytes[search_from..]
            .windows(2)
            .position(|w| w == [0xFF, 0xD9])
        else {
            continue;
        };
        let end = search_from + pos + 2;
        if end - i > EMBEDDED_MIN_JPEG_BYTES {
            found.push(&bytes[i..end]);
        }
    }

    found
}
