use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use macrostack_core::io::collect_inputs;
use macrostack_core::io::decode::FileDecoder;
use macrostack_core::io::image_io::save_result;
use macrostack_core::pipeline::config::{default_threads, OutputFormat, StackAlgorithm, StackConfig};
use macrostack_core::pipeline::{run_stack_reported, ChannelReporter};
use tracing::warn;

use crate::summary::print_stack_summary;

#[derive(Clone, Copy, ValueEnum)]
pub enum AlgorithmArg {
    WeightedAverage,
    DepthMap,
    Pyramid,
    MaxContrast,
    Laplacian,
}

impl From<AlgorithmArg> for StackAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::WeightedAverage => Self::WeightedAverage,
            AlgorithmArg::DepthMap => Self::DepthMap,
            AlgorithmArg::Pyramid => Self::Pyramid,
            AlgorithmArg::MaxContrast => Self::MaxContrast,
            AlgorithmArg::Laplacian => Self::Laplacian,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Fits,
    Png,
    Jpeg,
    Tiff,
    Cr2,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Fits => Self::Fits,
            FormatArg::Png => Self::Png,
            FormatArg::Jpeg => Self::Jpeg,
            FormatArg::Tiff => Self::Tiff,
            FormatArg::Cr2 => Self::Cr2,
        }
    }
}

#[derive(Args)]
pub struct StackArgs {
    /// Input images or directories, in focus order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Stacking algorithm
    #[arg(short, long, value_enum)]
    pub algorithm: Option<AlgorithmArg>,

    /// Skip automatic alignment
    #[arg(long)]
    pub no_align: bool,

    /// Worker threads (defaults to the CPU count)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Stacking config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file path; the format extension is appended if missing
    #[arg(short, long, default_value = "stacked")]
    pub output: PathBuf,
}

pub fn run(args: &StackArgs) -> Result<()> {
    let config = build_config(args)?;
    let inputs = collect_inputs(&args.inputs)?;
    if inputs.is_empty() {
        bail!("No supported images found in the given inputs");
    }

    print_stack_summary(&config, inputs.len(), &args.output);

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}%")?
            .progress_chars("=> "),
    );

    let (reporter, rx) = ChannelReporter::channel();
    let bar = pb.clone();
    let reader = thread::spawn(move || {
        for event in rx {
            bar.set_message(event.message);
            bar.set_position(event.percent as u64);
        }
    });

    let decoder = FileDecoder::default();
    let result = run_stack_reported(&inputs, &config, &decoder, &reporter);
    // Closing the channel ends the reader loop.
    drop(reporter);
    join_progress_reader(reader);

    let result = match result {
        Ok(result) => {
            pb.finish_with_message("Done");
            result
        }
        Err(e) => {
            pb.abandon_with_message("Failed");
            return Err(e).context("Stacking failed");
        }
    };

    let written = save_result(&result, &args.output, config.output_format)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    println!(
        "\nSaved {}x{} result to {}",
        result.width(),
        result.height(),
        written.display()
    );
    Ok(())
}

/// Config file values, overridden by any flags given on the command line.
fn build_config(args: &StackArgs) -> Result<StackConfig> {
    let mut config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid stacking config")?
    } else {
        StackConfig::default()
    };

    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm.into();
    }
    if args.no_align {
        config.auto_align = false;
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(format) = args.format {
        config.output_format = format.into();
    }

    let max_threads = default_threads() * 2;
    if config.threads > max_threads {
        warn!(
            requested = config.threads,
            max = max_threads,
            "Thread count exceeds twice the CPU count, clamping"
        );
        config.threads = max_threads;
    }
    config.threads = config.effective_threads();

    Ok(config)
}

/// Wait for the progress reader; `false` if it panicked.
fn join_progress_reader(reader: JoinHandle<()>) -> bool {
    let joined = reader.join().is_ok();
    if !joined {
        warn!("Progress display thread panicked");
    }
    joined
}
