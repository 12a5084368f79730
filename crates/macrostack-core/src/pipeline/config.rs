use serde::{Deserialize, Serialize};

/// Settings consumed by one stacking run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    #[serde(default)]
    pub algorithm: StackAlgorithm,
    /// Translate frames onto the first frame before stacking.
    #[serde(default = "default_auto_align")]
    pub auto_align: bool,
    /// Worker pool size. Values below 1 are treated as 1.
    #[serde(default = "default_threads")]
    pub threads: usize,
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            algorithm: StackAlgorithm::default(),
            auto_align: default_auto_align(),
            threads: default_threads(),
            output_format: OutputFormat::default(),
        }
    }
}

impl StackConfig {
    pub fn effective_threads(&self) -> usize {
        self.threads.max(1)
    }
}

fn default_auto_align() -> bool {
    true
}

/// Number of logical CPUs, or 1 if it cannot be determined.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Pixel selection / blending strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackAlgorithm {
    WeightedAverage,
    #[default]
    DepthMap,
    /// Currently selects pixels exactly like [`StackAlgorithm::MaxContrast`].
    Pyramid,
    MaxContrast,
    Laplacian,
}

impl StackAlgorithm {
    pub const ALL: [StackAlgorithm; 5] = [
        Self::WeightedAverage,
        Self::DepthMap,
        Self::Pyramid,
        Self::MaxContrast,
        Self::Laplacian,
    ];
}

impl std::fmt::Display for StackAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WeightedAverage => write!(f, "Weighted Average"),
            Self::DepthMap => write!(f, "Depth Map"),
            Self::Pyramid => write!(f, "Pyramid"),
            Self::MaxContrast => write!(f, "Max Contrast"),
            Self::Laplacian => write!(f, "Laplacian"),
        }
    }
}

/// Output container for the stacked result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Three float32 planes (RED, GREEN, BLUE) normalised to [0, 1].
    Fits,
    Png,
    Jpeg,
    #[default]
    Tiff,
    /// Written as TIFF; native CR2 encoding is not supported.
    Cr2,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Fits => ".fits",
            Self::Png => ".png",
            Self::Jpeg => ".jpg",
            Self::Tiff => ".tif",
            Self::Cr2 => ".cr2",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fits => write!(f, "FITS"),
            Self::Png => write!(f, "PNG"),
            Self::Jpeg => write!(f, "JPEG"),
            Self::Tiff => write!(f, "TIFF"),
            Self::Cr2 => write!(f, "Canon RAW (CR2)"),
        }
    }
}
