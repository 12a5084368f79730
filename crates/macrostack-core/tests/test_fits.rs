#[allow(dead_code)]
mod common;

use approx::assert_abs_diff_eq;
use common::gradient_frame;
use macrostack_core::error::MacrostackError;
use macrostack_core::io::fits::{read_planes, write_rgb_planes};
use macrostack_core::io::image_io::save_result;
use macrostack_core::pipeline::config::OutputFormat;

#[test]
fn test_fits_planes_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let frame = gradient_frame(7, 5);
    let path = dir.path().join("result.fits");
    write_rgb_planes(&frame, &path).unwrap();

    let planes = read_planes(&path).unwrap();
    let channels: Vec<&str> = planes.iter().map(|p| p.channel.as_str()).collect();
    assert_eq!(channels, vec!["RED", "GREEN", "BLUE"]);

    for (c, plane) in planes.iter().enumerate() {
        assert_eq!((plane.width, plane.height), (7, 5));
        for y in 0..5 {
            for x in 0..7 {
                let expected = frame.pixel(x, y)[c] as f32 / 255.0;
                assert_abs_diff_eq!(plane.data[[y, x]], expected, epsilon = 1e-6);
            }
        }
    }
}

#[test]
fn test_fits_file_is_block_aligned() {
    let dir = tempfile::tempdir().unwrap();
    let frame = gradient_frame(40, 30);
    let written = save_result(&frame, &dir.path().join("stack"), OutputFormat::Fits).unwrap();
    assert_eq!(written, dir.path().join("stack.fits"));

    let bytes = std::fs::read(&written).unwrap();
    // Each HDU: one header block plus ceil(40*30*4 / 2880) = 2 data blocks.
    assert_eq!(bytes.len(), 3 * 3 * 2880);
    assert!(bytes.starts_with(b"SIMPLE  =                    T"));
    assert!(bytes[3 * 2880..].starts_with(b"XTENSION= 'IMAGE   '"));
}

#[test]
fn test_fits_values_are_big_endian_floats() {
    let dir = tempfile::tempdir().unwrap();
    let frame = macrostack_core::frame::PixelGrid::filled(1, 1, [255, 51, 0]).unwrap();
    let path = dir.path().join("px.fits");
    write_rgb_planes(&frame, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[2880..2884], &1.0f32.to_be_bytes());
    assert_eq!(&bytes[2 * 2880 + 2880..2 * 2880 + 2884], &0.2f32.to_be_bytes());
}

#[test]
fn test_truncated_fits_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.fits");
    write_rgb_planes(&gradient_frame(40, 30), &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..2880 + 100]).unwrap();

    assert!(matches!(read_planes(&path), Err(MacrostackError::Fits(_))));
}

#[test]
fn test_non_fits_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.fits");
    std::fs::write(&path, b"not a fits file").unwrap();

    assert!(matches!(read_planes(&path), Err(MacrostackError::Fits(_))));
}

fn header_block(cards: &[(&str, &str)]) -> Vec<u8> {
    let mut header: String = cards
        .iter()
        .map(|(key, value)| format!("{key:<8}= {value:>20}{:50}", ""))
        .collect();
    header.push_str(&format!("{:<80}", "END"));
    let mut bytes = header.into_bytes();
    bytes.resize(2880, b' ');
    bytes
}

#[test]
fn test_negative_axis_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("negative.fits");
    let header = header_block(&[
        ("SIMPLE", "T"),
        ("BITPIX", "-32"),
        ("NAXIS", "2"),
        ("NAXIS1", "-1"),
        ("NAXIS2", "4"),
    ]);
    std::fs::write(&path, header).unwrap();

    match read_planes(&path) {
        Err(MacrostackError::Fits(msg)) => assert!(msg.contains("NAXIS1"), "{msg}"),
        other => panic!("expected Fits error, got {other:?}"),
    }
}

#[test]
fn test_oversized_axes_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.fits");
    let header = header_block(&[
        ("SIMPLE", "T"),
        ("BITPIX", "-32"),
        ("NAXIS", "2"),
        ("NAXIS1", "9223372036854775807"),
        ("NAXIS2", "9223372036854775807"),
    ]);
    std::fs::write(&path, header).unwrap();

    assert!(matches!(read_planes(&path), Err(MacrostackError::Fits(_))));
}

#[test]
fn test_three_axis_hdu_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cube.fits");
    let mut bytes = header_block(&[
        ("SIMPLE", "T"),
        ("BITPIX", "-32"),
        ("NAXIS", "3"),
        ("NAXIS1", "2"),
        ("NAXIS2", "2"),
        ("NAXIS3", "3"),
    ]);
    bytes.resize(2 * 2880, 0);
    std::fs::write(&path, bytes).unwrap();

    match read_planes(&path) {
        Err(MacrostackError::Fits(msg)) => assert!(msg.contains("NAXIS 3"), "{msg}"),
        other => panic!("expected Fits error, got {other:?}"),
    }
}
