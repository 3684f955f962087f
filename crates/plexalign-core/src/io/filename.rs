use std::fmt;

use crate::error::{RegistrationError, Result};

/// A frame file name decoded into its round, marker and type tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameName {
    /// Full file name (no directory), reused for the output file.
    pub file_name: String,
    pub round: u32,
    pub marker: String,
    /// Trailing type token, normally the file extension (`tif`).
    pub kind: String,
}

impl FrameName {
    /// Case-insensitive comparison against the reference marker name.
    pub fn is_reference(&self, reference_marker: &str) -> bool {
        self.marker.eq_ignore_ascii_case(reference_marker)
    }
}

impl fmt::Display for FrameName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (round {}, marker {})",
            self.file_name, self.round, self.marker
        )
    }
}

/// Decode `<free-text>.<round>.<marker>.<type>`.
///
/// Only the last three dot-separated tokens are interpreted; any text before
/// them is ignored.
pub fn decode_filename(name: &str) -> Result<FrameName> {
    let malformed = |reason: &str| RegistrationError::MalformedFilename {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let tokens: Vec<&str> = name.split('.').collect();
    if tokens.len() < 3 {
        return Err(malformed("expected <round>.<marker>.<type> tokens"));
    }

    let n = tokens.len();
    let (round_token, marker, kind) = (tokens[n - 3], tokens[n - 2], tokens[n - 1]);

    let round = round_token
        .parse::<u32>()
        .map_err(|_| malformed(&format!("round identifier '{round_token}' is not an integer")))?;

    if marker.is_empty() {
        return Err(malformed("empty marker token"));
    }
    if kind.is_empty() {
        return Err(malformed("empty type token"));
    }

    Ok(FrameName {
        file_name: name.to_string(),
        round,
        marker: marker.to_string(),
        kind: kind.to_string(),
    })
}
