#[allow(dead_code)]
mod common;

use std::path::{Path, PathBuf};

use common::{gradient_frame, jpeg_bytes, noise_frame};
use macrostack_core::error::MacrostackError;
use macrostack_core::frame::PixelGrid;
use macrostack_core::io::decode::{Decoder, FileDecoder};
use macrostack_core::io::raw::{find_embedded_jpegs, EmbeddedPreview, RawLadder, RawRung};
use macrostack_core::io::{collect_inputs, is_supported_input};

struct FixedRung {
    name: &'static str,
    outcome: Option<PixelGrid>,
}

impl RawRung for FixedRung {
    fn name(&self) -> &str {
        self.name
    }

    fn decode(&self, _path: &Path) -> Result<PixelGrid, String> {
        self.outcome
            .clone()
            .ok_or_else(|| format!("{} unavailable", self.name))
    }
}

fn failing(name: &'static str) -> Box<dyn RawRung> {
    Box::new(FixedRung {
        name,
        outcome: None,
    })
}

#[test]
fn test_supported_extensions() {
    for name in ["a.jpg", "b.JPEG", "c.png", "d.Tif", "e.tiff", "f.CR2", "g.nef", "h.dng", "i.srf"] {
        assert!(is_supported_input(Path::new(name)), "{name}");
    }
    for name in ["a.gif", "b.txt", "c.fits", "noext"] {
        assert!(!is_supported_input(Path::new(name)), "{name}");
    }
}

#[test]
fn test_collect_inputs_expands_directories_sorted() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.png", "a.JPG", "notes.txt", "c.nef"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    std::fs::create_dir(dir.path().join("nested.png")).unwrap();
    let extra = PathBuf::from("/elsewhere/z.tif");

    let inputs = collect_inputs(&[extra.clone(), dir.path().to_path_buf()]).unwrap();
    assert_eq!(
        inputs,
        vec![
            extra,
            dir.path().join("a.JPG"),
            dir.path().join("b.png"),
            dir.path().join("c.nef"),
        ]
    );
}

#[test]
fn test_file_decoder_reads_standard_images() {
    let dir = tempfile::tempdir().unwrap();
    let frame = gradient_frame(24, 18);
    let path = dir.path().join("frame.png");
    frame.to_rgb_image().save(&path).unwrap();

    let decoded = FileDecoder::default().decode(&path).unwrap();
    assert_eq!(decoded, frame);
}

#[test]
fn test_ladder_returns_first_success() {
    let winner = gradient_frame(8, 6);
    let ladder = RawLadder::new(vec![
        failing("first"),
        Box::new(FixedRung {
            name: "second",
            outcome: Some(winner.clone()),
        }),
        Box::new(FixedRung {
            name: "third",
            outcome: Some(gradient_frame(4, 4)),
        }),
    ]);
    assert_eq!(ladder.decode(Path::new("x.arw")).unwrap(), winner);
}

#[test]
fn test_ladder_failure_lists_every_rung() {
    let ladder = RawLadder::new(vec![failing("dcraw"), failing("imagemagick")]);
    let err = ladder.decode(Path::new("x.cr2")).unwrap_err();
    match err {
        MacrostackError::DecodeFailure { path, cause } => {
            assert_eq!(path, PathBuf::from("x.cr2"));
            assert!(cause.contains("dcraw: dcraw unavailable"));
            assert!(cause.contains("imagemagick: imagemagick unavailable"));
        }
        other => panic!("expected DecodeFailure, got {other:?}"),
    }
}

#[test]
fn test_standard_ladder_order() {
    assert_eq!(
        RawLadder::standard().rung_names(),
        vec!["dcraw", "imagemagick", "embedded-preview"]
    );
}

#[test]
fn test_embedded_preview_picks_largest_jpeg() {
    let small = jpeg_bytes(&noise_frame(120, 90, 1));
    let large = jpeg_bytes(&noise_frame(200, 150, 2));
    assert!(small.len() > 1024 && large.len() > 1024);

    let mut container = vec![0x49, 0x49, 0x2A, 0x00];
    container.extend(std::iter::repeat(0x11).take(500));
    container.extend(&small);
    container.extend(std::iter::repeat(0x22).take(300));
    container.extend(&large);
    container.extend(std::iter::repeat(0x33).take(64));

    assert_eq!(find_embedded_jpegs(&container).len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shot.nef");
    std::fs::write(&path, &container).unwrap();

    let grid = EmbeddedPreview.decode(&path).unwrap();
    assert_eq!(grid.dimensions(), (200, 150));

    // Raw extensions route through the ladder.
    let decoder = FileDecoder::new(RawLadder::new(vec![failing("dcraw"), Box::new(EmbeddedPreview)]));
    assert_eq!(decoder.decode(&path).unwrap().dimensions(), (200, 150));
}

#[test]
fn test_embedded_preview_rejects_empty_and_jpegless_files() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty.cr2");
    std::fs::write(&empty, b"").unwrap();
    assert!(EmbeddedPreview.decode(&empty).is_err());

    let junk = dir.path().join("junk.cr2");
    std::fs::write(&junk, vec![0x5A; 4096]).unwrap();
    assert_eq!(
        EmbeddedPreview.decode(&junk).unwrap_err(),
        "no valid embedded JPEG found"
    );
}
