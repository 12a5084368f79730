pub mod decode;
pub mod fits;
pub mod image_io;
pub mod raw;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Extensions decoded directly by the `image` crate.
pub const STANDARD_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff"];

/// Camera raw extensions, decoded through the raw fallback ladder.
pub const RAW_EXTENSIONS: &[&str] = &[
    "arw", "cr2", "cr3", "nef", "raw", "dng", "orf", "raf", "rw2", "pef", "srw", "sr2", "srf",
];

fn extension_in(path: &Path, list: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| list.contains(&e.as_str()))
}

/// JPEG, PNG or TIFF by extension (case-insensitive).
pub fn is_standard_image(path: &Path) -> bool {
    extension_in(path, STANDARD_EXTENSIONS)
}

/// Any extension accepted as stack input.
pub fn is_supported_input(path: &Path) -> bool {
    is_standard_image(path) || extension_in(path, RAW_EXTENSIONS)
}

/// Expand directories into their supported files (sorted by name). Plain
/// file arguments are kept as given, in order.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_supported_input(p))
                .collect();
            entries.sort();
            inputs.extend(entries);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}
