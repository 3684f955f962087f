use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_ERROR_DESCENT_STEPS, DEFAULT_FRAME_EXTENSIONS, DEFAULT_LOG_FILE, DEFAULT_MANIFEST_NAME,
    DEFAULT_MAX_CORRELATION_DIM, DEFAULT_MEMORY_FRACTION, DEFAULT_REFERENCE_MARKER,
    DEFAULT_ROI_MARGIN,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrationConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub anchor: AnchorSelection,
    #[serde(default)]
    pub border: BorderMode,
    /// Registration log file name, written inside `output`.
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub roi: RoiConfig,
    #[serde(default)]
    pub alignment: AlignmentConfig,
    #[serde(default)]
    pub resources: ResourceConfig,
}

impl RegistrationConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            anchor: AnchorSelection::default(),
            border: BorderMode::default(),
            log_file: default_log_file(),
            naming: NamingConfig::default(),
            roi: RoiConfig::default(),
            alignment: AlignmentConfig::default(),
            resources: ResourceConfig::default(),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.output.join(&self.log_file)
    }
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

/// How frame files are recognized.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Marker of the reference channel, compared case-insensitively.
    pub reference_marker: String,
    /// File extensions treated as frames.
    pub extensions: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            reference_marker: DEFAULT_REFERENCE_MARKER.to_string(),
            extensions: DEFAULT_FRAME_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Which round's reference frame every other round is aligned to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum AnchorSelection {
    /// Lowest round identifier.
    #[default]
    Lowest,
    /// Highest round identifier.
    Highest,
    /// A specific round identifier.
    Round(u32),
    /// Uniformly random round; reproducible when seeded.
    Random { seed: Option<u64> },
}

impl std::fmt::Display for AnchorSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lowest => write!(f, "Lowest round"),
            Self::Highest => write!(f, "Highest round"),
            Self::Round(id) => write!(f, "Round {id}"),
            Self::Random { seed: Some(seed) } => write!(f, "Random (seed {seed})"),
            Self::Random { seed: None } => write!(f, "Random"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoiConfig {
    /// Honor the manifest at all.
    pub enabled: bool,
    /// Manifest file name inside the input directory.
    pub manifest: String,
    /// Required distance between the box and every frame edge.
    pub margin: usize,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            manifest: DEFAULT_MANIFEST_NAME.to_string(),
            margin: DEFAULT_ROI_MARGIN,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Frames larger than this (in either dimension) are subsampled before
    /// correlation.
    pub max_correlation_dim: usize,
    /// Apply a Hann window before the FFT.
    pub hann_window: bool,
    /// Maximum neighbour steps walked downhill on the alignment error after
    /// the correlation peak. 0 keeps the peak as is.
    #[serde(default = "default_descent_steps")]
    pub descent_steps: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            max_correlation_dim: DEFAULT_MAX_CORRELATION_DIM,
            hann_window: false,
            descent_steps: DEFAULT_ERROR_DESCENT_STEPS,
        }
    }
}

fn default_descent_steps() -> usize {
    DEFAULT_ERROR_DESCENT_STEPS
}

/// Host memory preflight.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Refuse batches whose working set cannot fit and cap frame
    /// parallelism to what does.
    pub check_memory: bool,
    /// Share of the available memory the batch may use.
    pub memory_fraction: f64,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            check_memory: true,
            memory_fraction: DEFAULT_MEMORY_FRACTION,
        }
    }
}

/// Fill rule for pixels exposed by a translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderMode {
    #[default]
    Zero,
    /// Circular shift: content leaving one edge re-enters at the other.
    Wrap,
}

impl std::fmt::Display for BorderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zero => write!(f, "Zero fill"),
            Self::Wrap => write!(f, "Wrap around"),
        }
    }
}
