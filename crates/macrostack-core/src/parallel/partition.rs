use std::ops::Range;

/// Half-open row range `[start, end)` processed by one worker in one phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkBand {
    pub start: usize,
    pub end: usize,
}

impl WorkBand {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl std::fmt::Display for WorkBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rows {}..{}", self.start, self.end)
    }
}

/// Split `height` rows into at most `bands` contiguous bands.
///
/// Every band but the last holds `ceil(height / bands)` rows. Bands that
/// would start past the last row are omitted, so the result may be shorter
/// than `bands` but never contains an empty band.
pub fn partition(height: usize, bands: usize) -> Vec<WorkBand> {
    let bands = bands.max(1);
    if height == 0 {
        return Vec::new();
    }
    let rows_per_band = height.div_ceil(bands);

    (0..bands)
        .map(|i| i * rows_per_band)
        .take_while(|&start| start < height)
        .map(|start| WorkBand {
            start,
            end: (start + rows_per_band).min(height),
        })
        .collect()
}
