use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::load_config;
use crate::error::{Error, Result};
use crate::models::SimConfig;

#[derive(Parser, Debug)]
#[command(name = "desk-sim", about = "Service desk queue simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one simulation and report statistics
    Run(RunArgs),
    /// Run every box count from 1 up and rank configurations by cost
    Compare(CompareArgs),
    /// Print the parsed configuration without running
    ShowConfig(RunArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[arg(long)]
    pub boxes: Option<u32>,
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        help = "Seed the random source for reproducible runs; omit for a fresh draw"
    )]
    pub seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[arg(long, default_value_t = 10)]
    pub max_boxes: u32,
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Human,
    Summary,
    Json,
}

pub fn parse_args() -> Result<Cli> {
    Cli::try_parse().map_err(|e| Error::Cli(e.to_string()))
}

/// Builds the simulation config for `run`/`show-config`: config file first
/// (when given), then flag overrides on top.
pub fn build_config(args: &RunArgs) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let boxes = args.boxes.ok_or_else(|| {
                Error::Cli("either --boxes or --config is required".to_string())
            })?;
            SimConfig::with_boxes(boxes)
        }
    };
    if let Some(boxes) = args.boxes {
        config.boxes = boxes;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

/// Base config for `compare`; the box count is overwritten per run.
pub fn build_compare_config(args: &CompareArgs) -> Result<SimConfig> {
    if args.max_boxes == 0 {
        return Err(Error::InvalidCompareRange);
    }
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimConfig::with_boxes(1),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}
