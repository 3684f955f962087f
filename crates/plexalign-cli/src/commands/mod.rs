pub mod config;
pub mod inspect;
pub mod register;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plexalign_core::pipeline::config::RegistrationConfig;
use tracing::info;

/// Load the TOML config at `path`, or the defaults, then point it at
/// `input` and `output`.
pub(crate) fn load_config(
    path: Option<&Path>,
    input: &Path,
    output: PathBuf,
) -> Result<RegistrationConfig> {
    let Some(path) = path else {
        return Ok(RegistrationConfig::new(input, output));
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let mut config: RegistrationConfig =
        toml::from_str(&contents).context("Invalid registration config")?;
    info!(config = %path.display(), "Loaded registration config");
    config.input = input.to_path_buf();
    config.output = output;
    Ok(config)
}
