//! Coarse-to-fine integer translation search.
//!
//! The score of a candidate offset is the mean absolute gray difference
//! between `reference(x, y)` and `target(x + dx, y + dy)`, sampled on a
//! sparse grid over the region where both are in bounds. A stride-5 scan
//! over `[-R, R]²` is followed by an exhaustive ±4 refinement.

use tracing::debug;

use crate::consts::{
    ALIGN_COARSE_STRIDE, ALIGN_MAX_RADIUS, ALIGN_RADIUS_DIVISOR, ALIGN_REFINE_RADIUS,
    ALIGN_SAMPLE_MIN_STRIDE, ALIGN_SAMPLE_STRIDE_DIVISOR,
};
use crate::frame::{AlignmentOffset, GrayPlane};

/// Sampling stride of the score: `max(10, min(w, h) / 80)`.
pub fn sample_stride(width: usize, height: usize) -> usize {
    ALIGN_SAMPLE_MIN_STRIDE.max(width.min(height) / ALIGN_SAMPLE_STRIDE_DIVISOR)
}

/// Search radius: `min(100, min(w, h) / 10)`.
pub fn search_radius(width: usize, height: usize) -> i64 {
    ALIGN_MAX_RADIUS.min((width.min(height) / ALIGN_RADIUS_DIVISOR) as i64)
}

/// Mean absolute gray difference for `offset`, or `f64::MAX` when the
/// overlap holds no sample.
pub fn alignment_score(reference: &GrayPlane, target: &GrayPlane, offset: AlignmentOffset) -> f64 {
    let (w, h) = (reference.width() as i64, reference.height() as i64);
    let (tw, th) = (target.width() as i64, target.height() as i64);
    let (dx, dy) = (offset.dx as i64, offset.dy as i64);
    let step = sample_stride(reference.width(), reference.height());

    let mut total = 0.0f64;
    let mut samples = 0usize;

    for y in (0.max(-dy)..h.min(h - dy)).step_by(step) {
        let y2 = y + dy;
        if y2 < 0 || y2 >= th {
            continue;
        }
        for x in (0.max(-dx)..w.min(w - dx)).step_by(step) {
            let x2 = x + dx;
            if x2 < 0 || x2 >= tw {
                continue;
            }
            let a = reference.get_or_zero(x as usize, y as usize);
            let b = target.get_or_zero(x2 as usize, y2 as usize);
            total += (a - b).abs() as f64;
            samples += 1;
        }
    }

    if samples > 0 {
        total / samples as f64
    } else {
        f64::MAX
    }
}

/// Best integer offset of `target` relative to `reference`.
///
/// Scans rows of `dy` outermost; among equal scores the first one found
/// wins. Falls back to `(0, 0)` when nothing scores below `f64::MAX`.
pub fn find_offset(reference: &GrayPlane, target: &GrayPlane) -> AlignmentOffset {
    let radius = search_radius(reference.width(), reference.height());
    let mut best = AlignmentOffset::IDENTITY;
    let mut best_score = f64::MAX;

    let coarse = (-radius..=radius).step_by(ALIGN_COARSE_STRIDE);
    for dy in coarse.clone() {
        for dx in coarse.clone() {
            let candidate = AlignmentOffset::new(dx as i32, dy as i32);
            let score = alignment_score(reference, target, candidate);
            if score < best_score {
                best_score = score;
                best = candidate;
            }
        }
    }

    let center = best;
    for dy in -ALIGN_REFINE_RADIUS..=ALIGN_REFINE_RADIUS {
        for dx in -ALIGN_REFINE_RADIUS..=ALIGN_REFINE_RADIUS {
            let candidate =
                AlignmentOffset::new(center.dx + dx as i32, center.dy + dy as i32);
            let score = alignment_score(reference, target, candidate);
            if score < best_score {
                best_score = score;
                best = candidate;
            }
        }
    }

    if ties_with_identity(reference, target, best, best_score) {
        debug!(
            dx = best.dx,
            dy = best.dy,
            score = best_score,
            "Offset ties with identity; first candidate in scan order kept"
        );
    }

    best
}

/// True when `best` moved the frame but scores no better than `(0, 0)`.
fn ties_with_identity(
    reference: &GrayPlane,
    target: &GrayPlane,
    best: AlignmentOffset,
    best_score: f64,
) -> bool {
    best != AlignmentOffset::IDENTITY
        && alignment_score(reference, target, AlignmentOffset::IDENTITY) <= best_score
}
