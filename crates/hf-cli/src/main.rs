//! Huffman file compressor.
//!
//! ## Usage
//!
//! ```bash
//! # Writes book_compressed.txt
//! huffman compress book.txt
//!
//! # Writes book_compressed_uncompressed.txt
//! huffman decompress book_compressed.txt
//!
//! # Custom suffixes from a JSON config, verbose logging
//! huffman compress book.txt --config huff.json --log-level debug
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use hf_codec::{HuffConfig, HuffmanPipeline};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const USAGE: &str = "Invalid action. Should be compress or decompress\n\
usage: huffman <compress|decompress> <file> [--config <path>] [--log-level <level>]";

#[derive(Parser, Debug)]
#[command(name = "huffman")]
#[command(version)]
#[command(about = "Compress and decompress text files with Huffman coding", long_about = None)]
struct Args {
    /// compress or decompress (case-insensitive)
    action: String,

    /// File to perform the action on
    file: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Compress,
    Decompress,
}

impl Action {
    fn parse(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "compress" => Some(Self::Compress),
            "decompress" | "uncompress" => Some(Self::Decompress),
            _ => None,
        }
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<HuffConfig> {
    match path {
        Some(p) => HuffConfig::from_json_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(HuffConfig::default()),
    }
}

fn run(action: Action, file: &Path, config: HuffConfig) -> anyhow::Result<PathBuf> {
    let pipeline = HuffmanPipeline::new(config);
    match action {
        Action::Compress => {
            let original = std::fs::metadata(file)
                .with_context(|| format!("cannot read {}", file.display()))?
                .len();
            let (dst, stats) = pipeline
                .compress_file(file)
                .with_context(|| format!("failed to compress {}", file.display()))?;
            info!(
                distinct = stats.distinct_symbols,
                header_bytes = stats.header_bytes,
                body_units = stats.body_units,
                ratio = stats.ratio(original),
                "compression finished"
            );
            Ok(dst)
        }
        Action::Decompress => {
            let (dst, symbols) = pipeline
                .decompress_file(file)
                .with_context(|| format!("failed to decompress {}", file.display()))?;
            info!(symbols, "decompression finished");
            Ok(dst)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    try_main(Args::parse())
}

fn try_main(args: Args) -> anyhow::Result<ExitCode> {
    // reject the action before touching any file
    let Some(action) = Action::parse(&args.action) else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::from(2));
    };

    let config = load_config(args.config.as_ref())?;
    let level = parse_level(args.log_level.as_deref().unwrap_or(&config.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    let dst = run(action, &args.file, config)?;
    println!("{}", dst.display());
    Ok(ExitCode::SUCCESS)
}
