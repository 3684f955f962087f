use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Optional ROI manifest placed next to the input frames.
///
/// ```json
/// {"bounding_box": [{"top": 120, "left": 140, "height": 800, "width": 600}]}
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub bounding_box: Vec<BoundingBox>,
}

/// One bounding box as written in the manifest. Every field is optional
/// here; validation happens in the ROI resolver.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: Option<i64>,
    pub left: Option<i64>,
    pub height: Option<i64>,
    pub width: Option<i64>,
}

impl Manifest {
    pub fn from_json(text: &str) -> Option<Self> {
        match serde_json::from_str(text) {
            Ok(manifest) => Some(manifest),
            Err(err) => {
                debug!(%err, "Ignoring unparsable manifest");
                None
            }
        }
    }
}

/// Load the manifest at `path`. A missing, unreadable or unparsable
/// manifest yields `None`.
pub fn load_manifest(path: &Path) -> Option<Manifest> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            debug!(path = %path.display(), %err, "No manifest");
            return None;
        }
    };
    Manifest::from_json(&text)
}
