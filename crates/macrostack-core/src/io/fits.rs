//! Minimal FITS writer/reader for RGB results.
//!
//! Layout: a primary HDU holding the red plane, followed by two IMAGE
//! extensions for green and blue. Each plane is `BITPIX = -32` (big-endian
//! IEEE float) with values normalised to `[0, 1]`. Headers and data are
//! padded to 2880-byte blocks.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use ndarray::Array2;
use tracing::debug;

use crate::error::{MacrostackError, Result};
use crate::frame::PixelGrid;

const BLOCK_SIZE: usize = 2880;
const CARD_SIZE: usize = 80;
const CHANNEL_NAMES: [&str; 3] = ["RED", "GREEN", "BLUE"];

/// One float plane read back from a FITS file.
#[derive(Clone, Debug)]
pub struct FitsPlane {
    pub channel: String,
    pub width: usize,
    pub height: usize,
    /// `[row, col]`, values in `[0, 1]`.
    pub data: Array2<f32>,
}

/// Write the grid as three float32 planes.
pub fn write_rgb_planes(grid: &PixelGrid, path: &Path) -> Result<()> {
    let (width, height) = grid.dimensions();
    let mut writer = BufWriter::new(File::create(path)?);

    for (channel, name) in CHANNEL_NAMES.iter().enumerate() {
        let header = plane_header(channel == 0, width, height, name);
        writer.write_all(header.as_bytes())?;

        let plane = grid.data().index_axis(ndarray::Axis(2), channel);
        for &value in plane.iter() {
            writer.write_f32::<BigEndian>(value as f32 / 255.0)?;
        }
        let written = width * height * 4;
        write_padding(&mut writer, written, 0)?;
    }

    writer.flush()?;
    debug!(path = %path.display(), width, height, "FITS planes written");
    Ok(())
}

fn plane_header(primary: bool, width: usize, height: usize, channel: &str) -> String {
    let mut cards = Vec::with_capacity(10);
    if primary {
        cards.push(logical_card("SIMPLE", true));
    } else {
        cards.push(string_card("XTENSION", "IMAGE"));
    }
    cards.push(integer_card("BITPIX", -32));
    cards.push(integer_card("NAXIS", 2));
    cards.push(integer_card("NAXIS1", width as i64));
    cards.push(integer_card("NAXIS2", height as i64));
    if primary {
        cards.push(logical_card("EXTEND", true));
    } else {
        cards.push(integer_card("PCOUNT", 0));
        cards.push(integer_card("GCOUNT", 1));
    }
    cards.push(string_card("CHANNEL", channel));
    cards.push(format!("{:<80}", "END"));

    let mut header = cards.concat();
    let rem = header.len() % BLOCK_SIZE;
    if rem != 0 {
        header.push_str(&" ".repeat(BLOCK_SIZE - rem));
    }
    header
}

/// Fixed-format card: keyword in columns 1-8, `= ` in 9-10, value
/// right-justified to column 30.
fn value_card(keyword: &str, value: &str) -> String {
    format!("{keyword:<8}= {value:>20}{:50}", "")
}

fn logical_card(keyword: &str, value: bool) -> String {
    value_card(keyword, if value { "T" } else { "F" })
}

fn integer_card(keyword: &str, value: i64) -> String {
    value_card(keyword, &value.to_string())
}

/// String values are quoted, left-justified and padded to at least 8
/// characters.
fn string_card(keyword: &str, value: &str) -> String {
    let quoted = format!("'{value:<8}'");
    format!("{keyword:<8}= {quoted:<70}")
}

fn write_padding<W: Write>(writer: &mut W, written: usize, fill: u8) -> Result<()> {
    let rem = written % BLOCK_SIZE;
    if rem != 0 {
        writer.write_all(&vec![fill; BLOCK_SIZE - rem])?;
    }
    Ok(())
}

/// Read every 2-D float32 HDU back.
pub fn read_planes(path: &Path) -> Result<Vec<FitsPlane>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut planes = Vec::new();

    while let Some(header) = read_header(&mut reader)? {
        let bitpix = header_int(&header, "BITPIX")?;
        if bitpix != -32 {
            return Err(MacrostackError::Fits(format!(
                "unsupported BITPIX {bitpix}"
            )));
        }
        let naxis = header_int(&header, "NAXIS")?;
        if naxis != 2 {
            return Err(MacrostackError::Fits(format!("unsupported NAXIS {naxis}")));
        }
        let width = header_axis(&header, "NAXIS1")?;
        let height = header_axis(&header, "NAXIS2")?;
        let channel = header_value(&header, "CHANNEL")
            .map(|v| v.trim_matches('\'').trim().to_string())
            .unwrap_or_default();

        let len = width
            .checked_mul(height)
            .filter(|len| len.checked_mul(4).is_some())
            .ok_or_else(|| MacrostackError::Fits(format!("plane {width}x{height} too large")))?;
        let available = reader.get_ref().metadata()?.len();
        if len as u64 * 4 > available {
            return Err(MacrostackError::Fits(format!(
                "plane {width}x{height} exceeds file size"
            )));
        }

        let mut values = vec![0f32; len];
        reader
            .read_f32_into::<BigEndian>(&mut values)
            .map_err(|e| MacrostackError::Fits(format!("truncated data for {channel}: {e}")))?;
        let rem = (len * 4) % BLOCK_SIZE;
        if rem != 0 {
            let mut pad = vec![0u8; BLOCK_SIZE - rem];
            reader
                .read_exact(&mut pad)
                .map_err(|e| MacrostackError::Fits(format!("missing data padding: {e}")))?;
        }

        let data = Array2::from_shape_vec((height, width), values)
            .map_err(|e| MacrostackError::Fits(e.to_string()))?;
        planes.push(FitsPlane {
            channel,
            width,
            height,
            data,
        });
    }

    if planes.is_empty() {
        return Err(MacrostackError::Fits("no HDU found".into()));
    }
    Ok(planes)
}

/// Header cards up to `END`, or `None` at a clean end of file.
fn read_header<R: Read>(reader: &mut R) -> Result<Option<Vec<String>>> {
    let mut cards = Vec::new();
    let mut block = vec![0u8; BLOCK_SIZE];
    loop {
        match reader.read_exact(&mut block) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof && cards.is_empty() => {
                return Ok(None);
            }
            Err(e) => return Err(MacrostackError::Fits(format!("truncated header: {e}"))),
        }
        for chunk in block.chunks(CARD_SIZE) {
            let card = String::from_utf8_lossy(chunk).into_owned();
            if card.trim_end() == "END" {
                return Ok(Some(cards));
            }
            cards.push(card);
        }
    }
}

fn header_value<'a>(cards: &'a [String], keyword: &str) -> Option<&'a str> {
    cards.iter().find_map(|card| {
        let key = card.get(..8)?;
        let rest = card.get(8..)?;
        if key.trim_end() != keyword {
            return None;
        }
        rest.strip_prefix("= ").map(str::trim)
    })
}

fn header_int(cards: &[String], keyword: &str) -> Result<i64> {
    header_value(cards, keyword)
        .ok_or_else(|| MacrostackError::Fits(format!("missing {keyword}")))?
        .parse()
        .map_err(|_| MacrostackError::Fits(format!("invalid {keyword}")))
}

/// Axis length; must be positive.
fn header_axis(cards: &[String], keyword: &str) -> Result<usize> {
    let value = header_int(cards, keyword)?;
    usize::try_from(value)
        .ok()
        .filter(|&len| len > 0)
        .ok_or_else(|| MacrostackError::Fits(format!("invalid {keyword} {value}")))
}
