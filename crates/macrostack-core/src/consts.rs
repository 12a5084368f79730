/// Fraction of the progress range reserved for each run phase, as
/// `(start, end)` percent pairs.
pub const PROGRESS_INGEST: (u8, u8) = (0, 30);
pub const PROGRESS_ALIGN: (u8, u8) = (30, 50);
pub const PROGRESS_STACK: (u8, u8) = (50, 100);
pub const PROGRESS_DEPTH_SELECT: (u8, u8) = (50, 75);
pub const PROGRESS_DEPTH_SMOOTH: (u8, u8) = (75, 85);
pub const PROGRESS_DEPTH_COMPOSITE: (u8, u8) = (85, 95);
pub const PROGRESS_RESIZE: (u8, u8) = (95, 100);

/// Rows completed between two progress events for single-pass strategies.
pub const ROW_REPORT_INTERVAL: usize = 100;

/// Rows completed between two progress events in depth map phases.
pub const DEPTH_ROW_REPORT_INTERVAL: usize = 50;

/// Window radius for the local contrast metric of the weighted average,
/// max contrast and pyramid strategies.
pub const CONTRAST_RADIUS: usize = 5;

/// Depth map sharpness: fine and coarse contrast radii and their weights.
pub const DEPTH_FINE_RADIUS: usize = 3;
pub const DEPTH_COARSE_RADIUS: usize = 7;
pub const DEPTH_FINE_WEIGHT: f64 = 0.5;
pub const DEPTH_COARSE_WEIGHT: f64 = 0.3;
pub const DEPTH_LAPLACIAN_WEIGHT: f64 = 2.0;

/// Radius of the median filter applied to the depth index map.
pub const DEPTH_MEDIAN_RADIUS: usize = 5;

/// Keypoint grid: minimum stride, window radius and contrast threshold.
pub const KEYPOINT_MIN_STRIDE: usize = 20;
pub const KEYPOINT_STRIDE_DIVISOR: usize = 40;
pub const KEYPOINT_RADIUS: usize = 10;
pub const KEYPOINT_MIN_CONTRAST: f64 = 30.0;

/// Offset search: radius cap, radius divisor and coarse stride.
pub const ALIGN_MAX_RADIUS: i64 = 100;
pub const ALIGN_RADIUS_DIVISOR: usize = 10;
pub const ALIGN_COARSE_STRIDE: usize = 5;
pub const ALIGN_REFINE_RADIUS: i64 = 4;

/// Sampling stride for the alignment score: `max(MIN, min(w, h) / DIVISOR)`.
pub const ALIGN_SAMPLE_MIN_STRIDE: usize = 10;
pub const ALIGN_SAMPLE_STRIDE_DIVISOR: usize = 80;

/// Number of channels in a pixel (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Minimum byte count accepted from an external raw decoder.
pub const MIN_EXTERNAL_DECODE_BYTES: usize = 1000;

/// Only the first part of a raw file is scanned for an embedded preview.
pub const EMBEDDED_SCAN_LIMIT: usize = 100_000_000;

/// Embedded JPEG candidates smaller than this are thumbnails, not previews.
pub const EMBEDDED_MIN_JPEG_BYTES: usize = 1024;
