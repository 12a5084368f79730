use ndarray::{s, Array3};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::Result;
use crate::frame::{AlignmentOffset, PixelGrid};

/// Place `frame` on a `width × height` sentinel canvas so that
/// `canvas(x, y) = frame(x + dx, y + dy)`.
///
/// Canvas pixels with no source pixel stay sentinel.
pub fn translate(
    frame: &PixelGrid,
    offset: AlignmentOffset,
    width: usize,
    height: usize,
) -> Result<PixelGrid> {
    let mut canvas = Array3::<u8>::zeros((height, width, COLOR_CHANNEL_COUNT));
    let (fw, fh) = (frame.width() as i64, frame.height() as i64);
    let (dx, dy) = (offset.dx as i64, offset.dy as i64);

    let x0 = 0.max(-dx);
    let x1 = (width as i64).min(fw - dx);
    let y0 = 0.max(-dy);
    let y1 = (height as i64).min(fh - dy);

    if x0 < x1 && y0 < y1 {
        let (sx0, sx1) = ((x0 + dx) as usize, (x1 + dx) as usize);
        let (sy0, sy1) = ((y0 + dy) as usize, (y1 + dy) as usize);
        let (x0, x1, y0, y1) = (x0 as usize, x1 as usize, y0 as usize, y1 as usize);
        let src = frame.data().slice(s![sy0..sy1, sx0..sx1, ..]);
        canvas.slice_mut(s![y0..y1, x0..x1, ..]).assign(&src);
    }

    PixelGrid::new(canvas)
}
