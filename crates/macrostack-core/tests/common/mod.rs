use std::collections::HashMap;
use std::path::{Path, PathBuf};

use macrostack_core::error::{MacrostackError, Result};
use macrostack_core::frame::PixelGrid;
use macrostack_core::io::decode::Decoder;

/// Side of the square sharp patches in [`patch_frames`].
pub const PATCH: usize = 20;

/// Top-left corners of the sharp patch owned by each frame of
/// [`patch_frames`].
pub const PATCH_ORIGINS: [(usize, usize); 3] = [(10, 10), (60, 15), (35, 65)];

/// A smooth colour gradient with no sentinel pixels.
pub fn gradient_frame(width: usize, height: usize) -> PixelGrid {
    let mut pixels = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            pixels.push((40 + x * 150 / width.max(1)) as u8);
            pixels.push((60 + y * 150 / height.max(1)) as u8);
            pixels.push(90);
        }
    }
    PixelGrid::from_rgb(width, height, pixels).unwrap()
}

/// Deterministic pseudo-random texture; compresses poorly.
pub fn noise_frame(width: usize, height: usize, seed: u32) -> PixelGrid {
    let mut state = seed.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let pixels = (0..width * height * 3)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8 | 1
        })
        .collect();
    PixelGrid::from_rgb(width, height, pixels).unwrap()
}

/// Gray frame filled with `value` everywhere.
pub fn flat_frame(width: usize, height: usize, value: u8) -> PixelGrid {
    PixelGrid::filled(width, height, [value, value, value]).unwrap()
}

/// Smooth texture of overlapping bright blobs, sampled with the content
/// moved by `(dx, dy)`: `frame(x, y) = texture(x - dx, y - dy)`.
pub fn blob_frame(width: usize, height: usize, dx: i32, dy: i32) -> PixelGrid {
    const BLOBS: [(f64, f64, f64); 5] = [
        (50.0, 40.0, 12.0),
        (140.0, 55.0, 16.0),
        (90.0, 110.0, 10.0),
        (30.0, 130.0, 14.0),
        (170.0, 140.0, 11.0),
    ];

    let mut pixels = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let sx = x as f64 - dx as f64;
            let sy = y as f64 - dy as f64;
            let mut v = 40.0;
            for (cx, cy, sigma) in BLOBS {
                let d2 = (sx - cx).powi(2) + (sy - cy).powi(2);
                v += 180.0 * (-d2 / (2.0 * sigma * sigma)).exp();
            }
            let v = v.round().min(255.0) as u8;
            pixels.extend([v, v, v]);
        }
    }
    PixelGrid::from_rgb(width, height, pixels).unwrap()
}

/// Three 100×100 frames. Frame `i` carries a 2-pixel checkerboard (60/200)
/// inside the patch at `PATCH_ORIGINS[i]` and is flat everywhere else, with
/// a different flat level per frame.
pub fn patch_frames() -> Vec<PixelGrid> {
    const SIZE: usize = 100;
    const FLAT: [u8; 3] = [110, 128, 146];

    (0..3)
        .map(|i| {
            let (px, py) = PATCH_ORIGINS[i];
            let mut pixels = Vec::with_capacity(SIZE * SIZE * 3);
            for y in 0..SIZE {
                for x in 0..SIZE {
                    let inside = (px..px + PATCH).contains(&x) && (py..py + PATCH).contains(&y);
                    let v = if inside {
                        if ((x - px) / 2 + (y - py) / 2) % 2 == 0 {
                            200
                        } else {
                            60
                        }
                    } else {
                        FLAT[i]
                    };
                    pixels.extend([v, v, v]);
                }
            }
            PixelGrid::from_rgb(SIZE, SIZE, pixels).unwrap()
        })
        .collect()
}

/// Centre of the patch owned by frame `i`.
pub fn patch_center(i: usize) -> (usize, usize) {
    let (x, y) = PATCH_ORIGINS[i];
    (x + PATCH / 2, y + PATCH / 2)
}

/// Write `frames` as numbered PNG files into `dir` and return their paths.
pub fn write_pngs(dir: &Path, frames: &[PixelGrid]) -> Vec<PathBuf> {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let path = dir.join(format!("frame_{i:02}.png"));
            frame.to_rgb_image().save(&path).unwrap();
            path
        })
        .collect()
}

/// Decoder serving in-memory frames by path. Unknown paths fail with an
/// I/O error.
pub struct MockDecoder {
    frames: HashMap<PathBuf, PixelGrid>,
}

impl MockDecoder {
    /// Register `frames` under `frame_0`, `frame_1`, ... and return the
    /// decoder with the paths in order.
    pub fn with_frames(frames: Vec<PixelGrid>) -> (Self, Vec<PathBuf>) {
        let paths: Vec<PathBuf> = (0..frames.len())
            .map(|i| PathBuf::from(format!("frame_{i}")))
            .collect();
        let frames = paths.iter().cloned().zip(frames).collect();
        (Self { frames }, paths)
    }
}

impl Decoder for MockDecoder {
    fn decode(&self, path: &Path) -> Result<PixelGrid> {
        self.frames.get(path).cloned().ok_or_else(|| {
            MacrostackError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such mock frame",
            ))
        })
    }
}

/// Encode `frame` as an in-memory JPEG.
pub fn jpeg_bytes(frame: &PixelGrid) -> Vec<u8> {
    let mut bytes = std::io::Cursor::new(Vec::new());
    frame
        .to_rgb_image()
        .write_to(&mut bytes, image::ImageFormat::Jpeg)
        .unwrap();
    bytes.into_inner()
}
