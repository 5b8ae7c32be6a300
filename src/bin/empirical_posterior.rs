use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use ftail::Ftail;
use log::LevelFilter;

use midedge::config::Config;
use midedge::posterior;

/// Sweeps one pendant branch length over a fixed grid and records the
/// unnormalised log-posterior curve.
#[derive(Parser)]
#[command(name = "empirical-posterior")]
#[command(about = "Empirical posterior sweep of a pendant branch length", long_about = None)]
struct Cli {
    /// Parameter file with one key = value pair per line
    #[arg(short, long, value_name = "PARAM_FILE")]
    params: PathBuf,

    /// key=value overrides applied on top of the parameter file
    #[arg(value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_sources(&cli.params, &cli.overrides)?;
    let level = if config.bool_param_or("quiet", false)? {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    Ftail::new()
        .console(level)
        .init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))?;
    posterior::run(&config)
}
