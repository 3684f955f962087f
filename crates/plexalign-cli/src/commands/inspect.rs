use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use plexalign_core::pipeline::config::RegistrationConfig;
use plexalign_core::pipeline::plan_batch;

use crate::summary::print_plan;

use super::load_config;

#[derive(Args)]
pub struct InspectArgs {
    /// Input directory of frame files
    pub input: PathBuf,

    /// Registration config file (TOML); flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Marker of the reference channel, overriding the config
    #[arg(long)]
    pub reference_marker: Option<String>,

    /// Ignore the crop manifest
    #[arg(long)]
    pub no_roi: bool,
}

pub fn run(args: &InspectArgs) -> Result<()> {
    let config = build_config(args)?;
    let plan = plan_batch(&config)
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;
    print_plan(&config, &plan);

    Ok(())
}

fn build_config(args: &InspectArgs) -> Result<RegistrationConfig> {
    // Output is never touched by planning.
    let mut config = load_config(
        args.config.as_deref(),
        &args.input,
        args.input.join("registered"),
    )?;
    if let Some(ref marker) = args.reference_marker {
        config.naming.reference_marker = marker.clone();
    }
    if args.no_roi {
        config.roi.enabled = false;
    }
    Ok(config)
}
