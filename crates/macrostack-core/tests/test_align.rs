#[allow(dead_code)]
mod common;

use common::{blob_frame, flat_frame, gradient_frame};
use macrostack_core::align::{
    align_frames, alignment_score, detect_keypoints, find_offset, fit_to_canvas, translate,
};
use macrostack_core::frame::{AlignmentOffset, SENTINEL};
use macrostack_core::parallel::build_pool;
use macrostack_core::pipeline::NoOpReporter;

#[test]
fn test_identical_frames_align_at_origin() {
    let frame = blob_frame(200, 160, 0, 0);
    let gray = frame.gray();
    assert_eq!(find_offset(&gray, &gray), AlignmentOffset::IDENTITY);
    assert_eq!(alignment_score(&gray, &gray, AlignmentOffset::IDENTITY), 0.0);
}

#[test]
fn test_recovers_shift_off_the_coarse_grid() {
    let reference = blob_frame(200, 160, 0, 0).gray();
    let shifted = blob_frame(200, 160, 6, -4).gray();
    assert_eq!(find_offset(&reference, &shifted), AlignmentOffset::new(6, -4));
}

#[test]
fn test_recovers_negative_shift() {
    let reference = blob_frame(200, 160, 0, 0).gray();
    let shifted = blob_frame(200, 160, -7, 3).gray();
    assert_eq!(find_offset(&reference, &shifted), AlignmentOffset::new(-7, 3));
}

#[test]
fn test_score_without_overlap_is_max() {
    let gray = gradient_frame(40, 30).gray();
    let score = alignment_score(&gray, &gray, AlignmentOffset::new(45, 0));
    assert_eq!(score, f64::MAX);
}

#[test]
fn test_translate_reads_from_offset_and_fills_sentinel() {
    let frame = gradient_frame(30, 20);
    let offset = AlignmentOffset::new(3, -2);
    let moved = translate(&frame, offset, 30, 20).unwrap();

    assert_eq!(moved.dimensions(), (30, 20));
    // canvas(x, y) = frame(x + 3, y - 2)
    assert_eq!(moved.pixel(5, 10), frame.pixel(8, 8));
    assert_eq!(moved.pixel(0, 2), frame.pixel(3, 0));
    // No source rows above, no source columns on the right.
    assert_eq!(moved.pixel(5, 0), SENTINEL);
    assert_eq!(moved.pixel(5, 1), SENTINEL);
    assert_eq!(moved.pixel(27, 10), SENTINEL);
    assert_eq!(moved.pixel(29, 19), SENTINEL);
}

#[test]
fn test_translate_onto_larger_canvas() {
    let frame = flat_frame(10, 8, 90);
    let canvas = translate(&frame, AlignmentOffset::IDENTITY, 16, 12).unwrap();
    assert_eq!(canvas.dimensions(), (16, 12));
    assert_eq!(canvas.pixel(9, 7), [90, 90, 90]);
    assert_eq!(canvas.pixel(10, 7), SENTINEL);
    assert_eq!(canvas.pixel(9, 8), SENTINEL);
}

#[test]
fn test_align_frames_reports_offsets_and_keeps_canvas() {
    let frames = vec![
        blob_frame(200, 160, 0, 0),
        blob_frame(200, 160, 6, -4),
        blob_frame(200, 160, -7, 3),
    ];
    let pool = build_pool(3).unwrap();
    let alignment = align_frames(frames.clone(), &pool, &NoOpReporter).unwrap();

    assert_eq!(
        alignment.offsets,
        vec![
            AlignmentOffset::IDENTITY,
            AlignmentOffset::new(6, -4),
            AlignmentOffset::new(-7, 3),
        ]
    );
    assert_eq!(alignment.frames[0], frames[0]);
    for aligned in &alignment.frames[1..] {
        assert_eq!(aligned.dimensions(), (200, 160));
        // Interior pixels now match the reference exactly.
        assert_eq!(aligned.pixel(100, 80), frames[0].pixel(100, 80));
        assert_eq!(aligned.pixel(50, 40), frames[0].pixel(50, 40));
    }
}

#[test]
fn test_align_frames_on_featureless_input_never_fails() {
    let frames = vec![flat_frame(64, 48, 120), flat_frame(64, 48, 120)];
    let pool = build_pool(2).unwrap();
    let alignment = align_frames(frames, &pool, &NoOpReporter).unwrap();
    // Every candidate ties at 0, so the first one scanned wins.
    assert_eq!(alignment.offsets[1], AlignmentOffset::new(-4, -4));
    assert_eq!(alignment.frames[1].dimensions(), (64, 48));
}

#[test]
fn test_tiny_frames_fall_back_to_identity() {
    // 12x8 has a search radius of 0.
    let gray = gradient_frame(12, 8).gray();
    assert_eq!(find_offset(&gray, &gray), AlignmentOffset::IDENTITY);
}

#[test]
fn test_fit_to_canvas_recanvases_only_mismatched_frames() {
    let frames = vec![gradient_frame(40, 30), gradient_frame(50, 20)];
    let fitted = fit_to_canvas(frames.clone(), 40, 30).unwrap();
    assert_eq!(fitted[0], frames[0]);
    assert_eq!(fitted[1].dimensions(), (40, 30));
    assert_eq!(fitted[1].pixel(39, 19), frames[1].pixel(39, 19));
    assert_eq!(fitted[1].pixel(0, 20), SENTINEL);
}

#[test]
fn test_keypoints_need_texture() {
    assert!(detect_keypoints(&flat_frame(200, 160, 100).gray()).is_empty());
    assert!(!detect_keypoints(&blob_frame(200, 160, 0, 0).gray()).is_empty());
}
