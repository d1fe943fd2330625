//! lutio - inspect and convert LUT files
//!
//! Thin command-line front end over the `lutio` dispatch layer.

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use lutio::{DEFAULT_DECIMALS, Method};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lutio")]
#[command(author, version, about = "Inspect and convert LUT files")]
#[command(long_about = "
Reads and writes the common LUT interchange formats: Iridas and Resolve
.cube, Sony .spi1d/.spi3d/.spimtx and Cinespace .csp.

Examples:
  lutio info grade.cube                       # Show LUT summary
  lutio info a.spi3d b.spi1d                  # Several files at once
  lutio convert grade.cube grade.spi3d        # Convert by extension
  lutio convert in.cube out.cube --to 'Resolve Cube' -d 10
  lutio formats                               # List supported formats
  RUST_LOG=lutio=trace lutio info grade.csp   # Parser tracing
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Display LUT information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Convert a LUT to another format
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// List supported formats and extensions
    Formats,
}

/// Arguments for the `info` command.
#[derive(Args)]
struct InfoArgs {
    /// Input LUT(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Reader: "auto" or a format name (e.g. "Resolve Cube")
    #[arg(short, long, default_value = "auto")]
    method: Method,
}

/// Arguments for the `convert` command.
#[derive(Args)]
struct ConvertArgs {
    /// Input LUT
    input: PathBuf,

    /// Output LUT
    output: PathBuf,

    /// Reader: "auto" or a format name
    #[arg(long, default_value = "auto")]
    from: Method,

    /// Writer: "auto" or a format name
    #[arg(long, default_value = "auto")]
    to: Method,

    /// Decimals written per value
    #[arg(short = 'd', long, default_value_t = DEFAULT_DECIMALS)]
    decimals: usize,
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Convert(args) => commands::convert::run(args),
        Commands::Formats => commands::formats::run(),
    }
}
