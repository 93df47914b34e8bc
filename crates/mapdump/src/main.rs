//! mapdump - dump calibration map records as CSV, raw text or XDF definitions
//!
//! The input is the sequence of map records produced by the container
//! reader, stored back to back.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use mappack_core::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "mapdump", version, about = "Dump calibration map records")]
struct Cli {
    /// Annotate CSV rows with names of matching maps in these map records.
    /// Takes one or more files; end the list with `--` before the input.
    #[arg(short = 'r', value_name = "MAPS", num_args = 1..)]
    refs: Vec<PathBuf>,

    /// Generate min/max columns from this image
    #[arg(short = 'i', value_name = "IMAGE")]
    image: Option<PathBuf>,

    /// Generate raw dump
    #[arg(short = 'd')]
    dump: bool,

    /// Generate old XDF (requires -i IMAGE)
    #[arg(short = 'o')]
    old_xdf: bool,

    /// Generate XML XDF (requires -i IMAGE)
    #[arg(short = 'x')]
    xdf: bool,

    /// Map records to dump
    input: PathBuf,

    /// Output file (stdout when omitted)
    output: Option<PathBuf>,
}

fn load_container(path: &Path) -> Result<Container> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Can't read '{}'", path.display()))?;
    Container::decode_stream(&bytes).with_context(|| format!("Can't decode '{}'", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mapdump=info,mappack_core=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let format = OutputFormat::from_flags(cli.dump, cli.old_xdf, cli.xdf)?;
    let mut config = ExportConfig::new(format);

    if let Some(path) = &cli.image {
        let image = MemoryImage::open(path)
            .with_context(|| format!("Can't read image '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = image.len(), "loaded image");
        config = config.with_image(image);
    }
    config.validate()?;

    let maps = load_container(&cli.input)?;
    tracing::info!(path = %cli.input.display(), maps = maps.len(), "decoded input");

    for path in &cli.refs {
        let container = load_container(path)?;
        config = config.with_reference(Reference::new(path.display().to_string(), container));
    }

    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Can't open '{}' for writing", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    write_dump(BufWriter::new(sink), &maps, &config)?;
    Ok(())
}
