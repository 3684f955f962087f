use std::path::PathBuf;

use crate::frame::{AlignmentEstimate, FrameSize};
use crate::roi::RoiDescriptor;
use crate::rounds::RoundGrouping;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Scanning,
    Decoding,
    Grouping,
    ResolvingRoi,
    Normalizing,
    SelectingAnchor,
    Estimating,
    /// Translate and write every frame.
    Applying,
    Logging,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scanning => write!(f, "Scanning input"),
            Self::Decoding => write!(f, "Decoding file names"),
            Self::Grouping => write!(f, "Grouping rounds"),
            Self::ResolvingRoi => write!(f, "Resolving ROI"),
            Self::Normalizing => write!(f, "Normalizing sizes"),
            Self::SelectingAnchor => write!(f, "Selecting anchor"),
            Self::Estimating => write!(f, "Estimating drift"),
            Self::Applying => write!(f, "Writing frames"),
            Self::Logging => write!(f, "Writing log"),
        }
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frame count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_registration` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// A file skipped because its name could not be decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct MalformedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Translation and error for one registered non-anchor round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundRecord {
    pub round: u32,
    pub estimate: AlignmentEstimate,
}

/// Everything known about a batch before any pixel data is loaded.
#[derive(Clone, Debug)]
pub struct BatchPlan {
    pub grouping: RoundGrouping,
    pub malformed: Vec<MalformedFile>,
    pub roi: Option<RoiDescriptor>,
    /// Common output size (after crop).
    pub canvas: FrameSize,
    /// Smallest effective frame size, for reporting.
    pub smallest: FrameSize,
}

impl BatchPlan {
    pub fn frame_count(&self) -> usize {
        self.grouping.all_frames().count()
    }
}

/// Outcome of a completed registration run.
#[derive(Clone, Debug)]
pub struct RegistrationReport {
    pub anchor: u32,
    pub canvas: FrameSize,
    pub roi: Option<RoiDescriptor>,
    pub downsample_factor: usize,
    /// One record per registered non-anchor round, ascending round id.
    pub records: Vec<RoundRecord>,
    /// Rounds excluded from registration: (round, reference frame count).
    pub skipped_rounds: Vec<(u32, usize)>,
    pub malformed: Vec<MalformedFile>,
    pub written: Vec<PathBuf>,
    pub log_path: PathBuf,
}

impl RegistrationReport {
    pub fn record(&self, round: u32) -> Option<&RoundRecord> {
        self.records.iter().find(|r| r.round == round)
    }
}
