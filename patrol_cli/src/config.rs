use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use patrol_optimizer::json::types::JsonPatrolConfig;
use tracing::debug;

/// Options shared by every subcommand.
#[derive(Args)]
pub struct ConfigArgs {
    /// JSON run configuration
    #[arg(short, long)]
    pub config: PathBuf,

    /// Overrides the configured random seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Prints the schedule as a table
    #[arg(long)]
    pub table: bool,

    /// Prints the routes as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn load_config(path: &Path) -> Result<JsonPatrolConfig, anyhow::Error> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = JsonPatrolConfig::from_json_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;

    debug!("Loaded config {:?}", config);

    Ok(config)
}

pub fn load_with_overrides(args: &ConfigArgs) -> Result<JsonPatrolConfig, anyhow::Error> {
    let mut config = load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.random_seed = seed;
    }
    Ok(config)
}
