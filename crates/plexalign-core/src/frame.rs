use std::fmt;

use ndarray::{Array2, Array3, Axis};
use serde::{Deserialize, Serialize};

/// A single channel frame, possibly multi-channel (RGB/RGBA).
/// Pixel values are f32 in [0.0, 1.0].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, planar, shape = (channels, height, width)
    pub data: Array3<f32>,
    /// Original bit depth before conversion (8 or 16)
    pub original_bit_depth: u8,
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(data: Array3<f32>, bit_depth: u8) -> Self {
        let (_, h, w) = data.dim();
        Self {
            data,
            original_bit_depth: bit_depth,
            metadata: FrameMetadata {
                original_size: FrameSize::new(h, w),
                ..Default::default()
            },
        }
    }

    /// Wrap a single plane as a one-channel frame.
    pub fn from_plane(plane: Array2<f32>, bit_depth: u8) -> Self {
        Self::new(plane.insert_axis(Axis(0)), bit_depth)
    }

    /// Build a frame with new pixel data, keeping bit depth and metadata.
    pub fn with_data(&self, data: Array3<f32>) -> Self {
        Self {
            data,
            original_bit_depth: self.original_bit_depth,
            metadata: self.metadata.clone(),
        }
    }

    pub fn channels(&self) -> usize {
        self.data.dim().0
    }

    pub fn height(&self) -> usize {
        self.data.dim().1
    }

    pub fn width(&self) -> usize {
        self.data.dim().2
    }

    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.height(), self.width())
    }

    pub fn is_color(&self) -> bool {
        self.channels() >= 3
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    /// Source file name, reused verbatim for the output file.
    pub file_name: String,
    pub round: u32,
    pub marker: String,
    /// Size as loaded, before any crop or padding.
    pub original_size: FrameSize,
}

/// Height and width of a frame in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub height: usize,
    pub width: usize,
}

impl FrameSize {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// True if `other` fits inside `self` in both dimensions.
    pub fn contains(&self, other: &FrameSize) -> bool {
        other.height <= self.height && other.width <= self.width
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Sub-pixel offset reported by phase correlation.
#[derive(Clone, Debug, Default)]
pub struct AlignmentOffset {
    pub dx: f64,
    pub dy: f64,
}

/// Integer translation: content at (y, x) moves to (y + dy, x + dx).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Translation {
    pub dy: i64,
    pub dx: i64,
}

impl Translation {
    pub fn new(dy: i64, dx: i64) -> Self {
        Self { dy, dx }
    }

    pub fn is_zero(&self) -> bool {
        self.dy == 0 && self.dx == 0
    }

    /// Round a sub-pixel offset to the nearest integer translation.
    pub fn from_offset(offset: &AlignmentOffset) -> Self {
        Self {
            dy: offset.dy.round() as i64,
            dx: offset.dx.round() as i64,
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dy, self.dx)
    }
}

/// Translation for one round together with its alignment error.
///
/// The error is non-negative; 0.0 means the translated frame matches the
/// anchor perfectly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentEstimate {
    pub translation: Translation,
    pub error: f64,
}
