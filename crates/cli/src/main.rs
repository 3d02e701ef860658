mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use weave_lib::consts::CONFIG_FILENAME;

use crate::cmd::{cmd_info, cmd_lookup, cmd_plan};
use crate::output::OutputFormat;

/// weave - composite build participant manager
#[derive(Parser)]
#[command(name = "weave")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Path to the composite configuration file
  #[arg(short, long, global = true, default_value = CONFIG_FILENAME)]
  config: PathBuf,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve every participant's connection settings (dry run)
  Plan {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Per-participant connect timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Maximum number of participants connecting at once
    #[arg(long)]
    parallelism: Option<usize>,
  },

  /// Find the participant project publishing a module coordinate
  Lookup {
    /// Coordinate in group:name:version form
    coordinate: String,
  },

  /// List participants and their publications
  Info,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  debug!(config = %cli.config.display(), "using composite config");

  match cli.command {
    Commands::Plan {
      format,
      timeout,
      parallelism,
    } => cmd_plan(&cli.config, format, timeout, parallelism),
    Commands::Lookup { coordinate } => cmd_lookup(&cli.config, &coordinate),
    Commands::Info => cmd_info(&cli.config),
  }
}
