use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{RegistrationError, Result};

use super::config::AnchorSelection;

/// Choose the anchor round among the registrable round ids.
///
/// Made once per run, before any estimation.
pub fn select_anchor(round_ids: &[u32], selection: &AnchorSelection) -> Result<u32> {
    let mut ids = round_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let (Some(&lowest), Some(&highest)) = (ids.first(), ids.last()) else {
        return Err(RegistrationError::InsufficientRounds { found: 0 });
    };

    match selection {
        AnchorSelection::Lowest => Ok(lowest),
        AnchorSelection::Highest => Ok(highest),
        AnchorSelection::Round(id) => {
            if ids.contains(id) {
                Ok(*id)
            } else {
                Err(RegistrationError::AnchorUnavailable { round: *id })
            }
        }
        AnchorSelection::Random { seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(*seed),
                None => StdRng::from_os_rng(),
            };
            Ok(ids[rng.random_range(0..ids.len())])
        }
    }
}
