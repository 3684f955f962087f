use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::Result;

use super::types::RegistrationReport;

/// The human-readable registration log.
impl fmt::Display for RegistrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# registration log")?;
        writeln!(f, "anchor round:      {}", self.anchor)?;
        writeln!(f, "canvas:            {}", self.canvas)?;
        match &self.roi {
            Some(roi) => writeln!(f, "crop:              {roi}")?,
            None => writeln!(f, "crop:              none")?,
        }
        writeln!(f, "downsample factor: {}", self.downsample_factor)?;
        writeln!(f)?;

        writeln!(f, "{:>6} {:>8} {:>8} {:>10}", "round", "dy", "dx", "error")?;
        for record in &self.records {
            let t = record.estimate.translation;
            writeln!(
                f,
                "{:>6} {:>8} {:>8} {:>10.4}",
                record.round, t.dy, t.dx, record.estimate.error
            )?;
        }

        if !self.skipped_rounds.is_empty() {
            writeln!(f)?;
            writeln!(f, "skipped rounds (written without translation):")?;
            for (round, count) in &self.skipped_rounds {
                writeln!(f, "  round {round}: {count} reference frames")?;
            }
        }

        if !self.malformed.is_empty() {
            writeln!(f)?;
            writeln!(f, "malformed file names (not written):")?;
            for file in &self.malformed {
                let name = file
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                writeln!(f, "  {name}: {}", file.reason)?;
            }
        }

        Ok(())
    }
}

/// Write the registration log to `path`, replacing any previous log.
pub fn write_log(path: &Path, report: &RegistrationReport) -> Result<()> {
    fs::write(path, report.to_string())?;
    Ok(())
}
