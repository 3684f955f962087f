use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use plexalign_core::pipeline::config::{AnchorSelection, BorderMode, RegistrationConfig};
use plexalign_core::pipeline::run_registration_reported;

use crate::progress::BarReporter;
use crate::summary::{print_registration_summary, print_report};

use super::load_config;

#[derive(Args)]
pub struct RegisterArgs {
    /// Input directory of frame files
    pub input: PathBuf,

    /// Output directory for registered frames and the log
    pub output: PathBuf,

    /// Registration config file (TOML); flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Marker of the reference channel
    #[arg(long)]
    pub reference_marker: Option<String>,

    /// Anchor round: lowest, highest, random or a round id
    #[arg(long, value_parser = parse_anchor)]
    pub anchor: Option<AnchorArg>,

    /// Seed for --anchor random
    #[arg(long)]
    pub seed: Option<u64>,

    /// Required distance in pixels between the crop box and the frame edges
    #[arg(long)]
    pub margin: Option<usize>,

    /// Ignore the crop manifest
    #[arg(long)]
    pub no_roi: bool,

    /// Wrap content around the edges instead of zero filling
    #[arg(long)]
    pub wrap: bool,

    /// Apply a Hann window before correlation
    #[arg(long)]
    pub hann: bool,

    /// Subsample frames larger than this before correlation
    #[arg(long)]
    pub max_correlation_dim: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorArg {
    Lowest,
    Highest,
    Random,
    Round(u32),
}

fn parse_anchor(s: &str) -> Result<AnchorArg, String> {
    match s.to_ascii_lowercase().as_str() {
        "lowest" => Ok(AnchorArg::Lowest),
        "highest" => Ok(AnchorArg::Highest),
        "random" => Ok(AnchorArg::Random),
        other => other.parse().map(AnchorArg::Round).map_err(|_| {
            format!("invalid anchor '{s}': expected lowest, highest, random or a round id")
        }),
    }
}

pub fn run(args: &RegisterArgs) -> Result<()> {
    let config = build_config(args)?;
    print_registration_summary(&config);

    let reporter = Arc::new(BarReporter::new());
    let report = run_registration_reported(&config, reporter.clone())
        .context("Registration failed")?;
    reporter.finish();

    print_report(&report);
    Ok(())
}

fn build_config(args: &RegisterArgs) -> Result<RegistrationConfig> {
    let mut config = load_config(args.config.as_deref(), &args.input, args.output.clone())?;

    if let Some(ref marker) = args.reference_marker {
        config.naming.reference_marker = marker.clone();
    }
    match args.anchor {
        Some(AnchorArg::Lowest) => config.anchor = AnchorSelection::Lowest,
        Some(AnchorArg::Highest) => config.anchor = AnchorSelection::Highest,
        Some(AnchorArg::Round(id)) => config.anchor = AnchorSelection::Round(id),
        Some(AnchorArg::Random) => config.anchor = AnchorSelection::Random { seed: args.seed },
        None => {
            if let (Some(seed), AnchorSelection::Random { .. }) = (args.seed, &config.anchor) {
                config.anchor = AnchorSelection::Random { seed: Some(seed) };
            }
        }
    }
    if let Some(margin) = args.margin {
        config.roi.margin = margin;
    }
    if args.no_roi {
        config.roi.enabled = false;
    }
    if args.wrap {
        config.border = BorderMode::Wrap;
    }
    if args.hann {
        config.alignment.hann_window = true;
    }
    if let Some(dim) = args.max_correlation_dim {
        config.alignment.max_correlation_dim = dim;
    }

    Ok(config)
}
