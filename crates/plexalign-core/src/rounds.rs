use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::warn;

use crate::error::RegistrationError;
use crate::frame::FrameSize;
use crate::io::filename::FrameName;

/// A decoded frame that has not been loaded yet.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameEntry {
    pub name: FrameName,
    pub path: PathBuf,
    /// Size from the file header.
    pub size: FrameSize,
}

impl FrameEntry {
    pub fn new(name: FrameName, path: PathBuf, size: FrameSize) -> Self {
        Self { name, path, size }
    }

    pub fn file_name(&self) -> &str {
        &self.name.file_name
    }
}

/// All frames of one imaging round, with its single reference frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Round {
    pub id: u32,
    pub reference: FrameEntry,
    /// Non-reference channels, sorted by file name.
    pub markers: Vec<FrameEntry>,
}

impl Round {
    /// Reference frame first, then markers.
    pub fn frames(&self) -> impl Iterator<Item = &FrameEntry> {
        std::iter::once(&self.reference).chain(self.markers.iter())
    }

    pub fn frame_count(&self) -> usize {
        1 + self.markers.len()
    }
}

/// A round excluded from registration because it does not have exactly one
/// reference frame. Its frames are still written, untranslated.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedRound {
    pub id: u32,
    pub reference_count: usize,
    pub frames: Vec<FrameEntry>,
}

impl RejectedRound {
    pub fn error(&self) -> RegistrationError {
        RegistrationError::RoundIntegrity {
            round: self.id,
            reference_count: self.reference_count,
        }
    }
}

/// Result of grouping a batch by round, both lists ordered by round id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoundGrouping {
    pub rounds: Vec<Round>,
    pub rejected: Vec<RejectedRound>,
}

impl RoundGrouping {
    pub fn round_ids(&self) -> Vec<u32> {
        self.rounds.iter().map(|r| r.id).collect()
    }

    pub fn round(&self, id: u32) -> Option<&Round> {
        self.rounds.iter().find(|r| r.id == id)
    }

    /// Every frame in the batch, registrable or not.
    pub fn all_frames(&self) -> impl Iterator<Item = &FrameEntry> {
        self.rounds
            .iter()
            .flat_map(Round::frames)
            .chain(self.rejected.iter().flat_map(|r| r.frames.iter()))
    }
}

/// Group decoded frames by round and split out each round's reference frame.
pub fn group_rounds(entries: Vec<FrameEntry>, reference_marker: &str) -> RoundGrouping {
    let mut by_round: BTreeMap<u32, Vec<FrameEntry>> = BTreeMap::new();
    for entry in entries {
        by_round.entry(entry.name.round).or_default().push(entry);
    }

    let mut grouping = RoundGrouping::default();
    for (id, mut frames) in by_round {
        frames.sort_by(|a, b| a.file_name().cmp(b.file_name()));
        let (mut references, markers): (Vec<_>, Vec<_>) = frames
            .into_iter()
            .partition(|f| f.name.is_reference(reference_marker));

        if references.len() == 1 {
            let reference = references.remove(0);
            grouping.rounds.push(Round {
                id,
                reference,
                markers,
            });
        } else {
            let rejected = RejectedRound {
                id,
                reference_count: references.len(),
                frames: references.into_iter().chain(markers).collect(),
            };
            warn!(error = %rejected.error(), "Round excluded from registration");
            grouping.rejected.push(rejected);
        }
    }

    grouping
}
