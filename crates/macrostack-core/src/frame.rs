use image::{DynamicImage, RgbImage};
use ndarray::{s, Array2, Array3, ArrayView1, Axis};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{MacrostackError, Result};

/// Reserved "no data" pixel. Aggregation skips it instead of treating it as
/// a valid dark sample.
pub const SENTINEL: [u8; 3] = [0, 0, 0];

/// Gray value stored for sentinel pixels in a [`GrayPlane`].
pub const SENTINEL_GRAY: i16 = -1;

#[inline]
pub fn is_sentinel(rgb: [u8; 3]) -> bool {
    rgb == SENTINEL
}

/// An immutable RGB image.
///
/// Pixel data is one contiguous row-major buffer of shape
/// `(height, width, 3)`.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelGrid {
    data: Array3<u8>,
}

impl PixelGrid {
    /// Wrap an `(height, width, 3)` array.
    pub fn new(data: Array3<u8>) -> Result<Self> {
        let (h, w, c) = data.dim();
        if h == 0 || w == 0 || c != COLOR_CHANNEL_COUNT {
            return Err(MacrostackError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Ok(Self { data })
    }

    /// Build a grid from interleaved RGB bytes.
    pub fn from_rgb(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        let data = Array3::from_shape_vec((height, width, COLOR_CHANNEL_COUNT), pixels)
            .map_err(|_| MacrostackError::InvalidDimensions { width, height })?;
        Self::new(data)
    }

    /// A canvas where every pixel is `rgb`.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self> {
        let mut data = Array3::<u8>::zeros((height, width, COLOR_CHANNEL_COUNT));
        for mut px in data.lanes_mut(Axis(2)) {
            px[0] = rgb[0];
            px[1] = rgb[1];
            px[2] = rgb[2];
        }
        Self::new(data)
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Pixel at column `x`, row `y`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    #[inline]
    pub fn is_sentinel_at(&self, x: usize, y: usize) -> bool {
        is_sentinel(self.pixel(x, y))
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    pub fn into_data(self) -> Array3<u8> {
        self.data
    }

    /// Grayscale `(r + g + b) / 3` of every pixel, sentinel pixels marked.
    pub fn gray(&self) -> GrayPlane {
        let (h, w) = (self.height(), self.width());
        let mut gray = Array2::<i16>::zeros((h, w));
        for ((row, col), g) in gray.indexed_iter_mut() {
            *g = gray_value(self.data.slice(s![row, col, ..]));
        }
        GrayPlane { data: gray }
    }

    /// Convert an image of any color type, dropping alpha and reducing
    /// 16-bit channels to 8 bits.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        let rgb = image.to_rgb8();
        let (w, h) = rgb.dimensions();
        Self::from_rgb(w as usize, h as usize, rgb.into_raw())
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let (w, h) = self.dimensions();
        let raw: Vec<u8> = self.data.iter().copied().collect();
        RgbImage::from_raw(w as u32, h as u32, raw)
            .expect("buffer size matches dimensions")
    }
}

fn gray_value(px: ArrayView1<'_, u8>) -> i16 {
    if px[0] == 0 && px[1] == 0 && px[2] == 0 {
        return SENTINEL_GRAY;
    }
    (px[0] as i16 + px[1] as i16 + px[2] as i16) / 3
}

/// Grayscale cache of a [`PixelGrid`], `SENTINEL_GRAY` where the source
/// pixel carries no data.
#[derive(Clone, Debug)]
pub struct GrayPlane {
    data: Array2<i16>,
}

impl GrayPlane {
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Gray value, or `None` for a sentinel pixel.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<i16> {
        let v = self.data[[y, x]];
        (v != SENTINEL_GRAY).then_some(v)
    }

    /// Gray value with sentinel pixels reading as 0.
    #[inline]
    pub fn get_or_zero(&self, x: usize, y: usize) -> i16 {
        self.get(x, y).unwrap_or(0)
    }

    pub fn data(&self) -> &Array2<i16> {
        &self.data
    }
}

/// Integer translation of a frame relative to the reference frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlignmentOffset {
    pub dx: i32,
    pub dy: i32,
}

impl AlignmentOffset {
    pub const IDENTITY: Self = Self { dx: 0, dy: 0 };

    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl std::fmt::Display for AlignmentOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:+}, {:+})", self.dx, self.dy)
    }
}
