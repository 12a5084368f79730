use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use macrostack_core::io::decode::{Decoder, FileDecoder};
use macrostack_core::io::fits::read_planes;
use macrostack_core::io::is_supported_input;

#[derive(Args)]
pub struct InfoArgs {
    /// Image, raw or FITS files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let decoder = FileDecoder::default();

    for file in &args.files {
        println!("File:        {}", file.display());

        let is_fits = file
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("fits") || e.eq_ignore_ascii_case("fit"));
        if is_fits {
            let planes = read_planes(file)
                .with_context(|| format!("Failed to read FITS {}", file.display()))?;
            println!("Format:      FITS ({} planes)", planes.len());
            for plane in &planes {
                println!(
                    "  {:<10} {}x{}",
                    if plane.channel.is_empty() { "-" } else { plane.channel.as_str() },
                    plane.width,
                    plane.height
                );
            }
        } else {
            if !is_supported_input(file) {
                println!("Supported:   no");
                println!();
                continue;
            }
            let grid = decoder
                .decode(file)
                .with_context(|| format!("Failed to decode {}", file.display()))?;
            println!("Dimensions:  {}x{}", grid.width(), grid.height());
            let megapixels = (grid.width() * grid.height()) as f64 / 1_000_000.0;
            println!("Megapixels:  {:.1}", megapixels);
        }
        println!();
    }

    Ok(())
}
