use std::path::PathBuf;

use thiserror::Error;

use crate::frame::FrameSize;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read frame {}: {source}", path.display())]
    ReadFrame {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write frame {}: {source}", path.display())]
    WriteFrame {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Malformed frame file name '{name}': {reason}")]
    MalformedFilename { name: String, reason: String },

    #[error("Round {round} has {reference_count} reference frames (expected exactly one)")]
    RoundIntegrity { round: u32, reference_count: usize },

    #[error("Frame '{file_name}' in round {round} is {found}, expected {expected}")]
    FrameSizeMismatch {
        round: u32,
        file_name: String,
        expected: FrameSize,
        found: FrameSize,
    },

    #[error("Frame of size {frame} does not fit the {canvas} canvas")]
    FrameExceedsCanvas { frame: FrameSize, canvas: FrameSize },

    #[error("Array size mismatch: {left} vs {right}")]
    ArrayShapeMismatch { left: FrameSize, right: FrameSize },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Unsupported pixel layout: {0}")]
    UnsupportedLayout(String),

    #[error("No frames found in input")]
    EmptyBatch,

    #[error("At least two registrable rounds are needed, found {found}")]
    InsufficientRounds { found: usize },

    #[error("Anchor round {round} is not a registrable round")]
    AnchorUnavailable { round: u32 },

    #[error(
        "Not enough memory: {} MiB needed, {} MiB available",
        .required >> 20,
        .available >> 20
    )]
    InsufficientMemory { required: u64, available: u64 },

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RegistrationError>;
