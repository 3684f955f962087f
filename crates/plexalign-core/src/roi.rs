use std::fmt;

use ndarray::s;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::frame::{Frame, FrameSize};
use crate::io::manifest::{BoundingBox, Manifest};

/// A validated crop rectangle in frame coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiDescriptor {
    pub top: usize,
    pub left: usize,
    pub height: usize,
    pub width: usize,
}

impl RoiDescriptor {
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.height, self.width)
    }

    /// Check that the box lies at least `margin` pixels inside every frame.
    pub fn validate(&self, sizes: &[FrameSize], margin: usize) -> Result<(), RoiRejection> {
        if self.height == 0 || self.width == 0 {
            return Err(RoiRejection::EmptyBox);
        }
        if self.top < margin || self.left < margin {
            return Err(RoiRejection::InsideMargin);
        }
        if sizes.is_empty() {
            return Err(RoiRejection::NoFrames);
        }
        let far_edge = |start: usize, extent: usize| {
            start
                .checked_add(extent)
                .and_then(|end| end.checked_add(margin))
                .ok_or(RoiRejection::Overflow)
        };
        let bottom = far_edge(self.top, self.height)?;
        let right = far_edge(self.left, self.width)?;
        match sizes
            .iter()
            .find(|size| bottom > size.height || right > size.width)
        {
            Some(size) => Err(RoiRejection::OutsideFrame { frame: *size }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for RoiDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "top={} left={} height={} width={}",
            self.top, self.left, self.height, self.width
        )
    }
}

/// Why a manifest box was not used. Never surfaced as an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoiRejection {
    NoManifest,
    NoBox,
    /// A field is missing or negative.
    InvalidField(&'static str),
    EmptyBox,
    InsideMargin,
    NoFrames,
    /// Box plus margin does not fit in the address space.
    Overflow,
    OutsideFrame { frame: FrameSize },
}

impl fmt::Display for RoiRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoManifest => write!(f, "no manifest"),
            Self::NoBox => write!(f, "manifest has no bounding box"),
            Self::InvalidField(name) => write!(f, "field '{name}' missing or negative"),
            Self::EmptyBox => write!(f, "box has zero height or width"),
            Self::InsideMargin => write!(f, "box starts inside the top/left margin"),
            Self::NoFrames => write!(f, "no frames to validate against"),
            Self::Overflow => write!(f, "box coordinates overflow"),
            Self::OutsideFrame { frame } => {
                write!(f, "box plus margin exceeds a {frame} frame")
            }
        }
    }
}

impl TryFrom<&BoundingBox> for RoiDescriptor {
    type Error = RoiRejection;

    fn try_from(bbox: &BoundingBox) -> Result<Self, Self::Error> {
        let field = |value: Option<i64>, name: &'static str| {
            value
                .and_then(|v| usize::try_from(v).ok())
                .ok_or(RoiRejection::InvalidField(name))
        };
        Ok(Self {
            top: field(bbox.top, "top")?,
            left: field(bbox.left, "left")?,
            height: field(bbox.height, "height")?,
            width: field(bbox.width, "width")?,
        })
    }
}

/// Resolve the crop to use for this batch.
///
/// Only the first manifest box is honored. Any problem falls back to
/// full-frame processing (`None`).
pub fn resolve_roi(
    manifest: Option<&Manifest>,
    sizes: &[FrameSize],
    margin: usize,
) -> Option<RoiDescriptor> {
    match try_resolve(manifest, sizes, margin) {
        Ok(roi) => {
            info!(%roi, "Using ROI from manifest");
            Some(roi)
        }
        Err(reason) => {
            debug!(%reason, "Full-frame registration");
            None
        }
    }
}

fn try_resolve(
    manifest: Option<&Manifest>,
    sizes: &[FrameSize],
    margin: usize,
) -> Result<RoiDescriptor, RoiRejection> {
    let manifest = manifest.ok_or(RoiRejection::NoManifest)?;
    let bbox = manifest.bounding_box.first().ok_or(RoiRejection::NoBox)?;
    let roi = RoiDescriptor::try_from(bbox)?;
    roi.validate(sizes, margin)?;
    Ok(roi)
}

/// Size of a frame after the optional crop.
pub fn effective_size(size: FrameSize, roi: Option<&RoiDescriptor>) -> FrameSize {
    roi.map_or(size, RoiDescriptor::size)
}

/// Extract the ROI from every channel of a frame.
///
/// The ROI must already be validated against the frame's size.
pub fn crop_frame(frame: &Frame, roi: &RoiDescriptor) -> Frame {
    let cropped = frame
        .data
        .slice(s![
            ..,
            roi.top..roi.top + roi.height,
            roi.left..roi.left + roi.width
        ])
        .to_owned();
    frame.with_data(cropped)
}
