use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::align::{downsample_factor, estimate_translation, shift_frame};
use crate::color::luminance;
use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::{RegistrationError, Result};
use crate::frame::{Frame, FrameSize, Translation};
use crate::io::filename::decode_filename;
use crate::io::image_io::{list_frame_files, load_frame, read_dimensions, save_frame};
use crate::io::manifest::load_manifest;
use crate::normalize::{max_canvas, pad_frame};
use crate::roi::{crop_frame, effective_size, resolve_roi, RoiDescriptor};
use crate::rounds::{group_rounds, FrameEntry, Round};

use super::anchor::select_anchor;
use super::config::RegistrationConfig;
use super::log::write_log;
use super::resources::frame_parallelism;
use super::types::{
    BatchPlan, MalformedFile, NoOpReporter, PipelineStage, ProgressReporter, RegistrationReport,
    RoundRecord,
};

/// Scan, decode and group the input, resolve the ROI and the common canvas.
/// No pixel data is loaded.
pub fn plan_batch(config: &RegistrationConfig) -> Result<BatchPlan> {
    let reporter: Arc<dyn ProgressReporter> = Arc::new(NoOpReporter);
    plan_batch_reported(config, &reporter)
}

pub fn plan_batch_reported(
    config: &RegistrationConfig,
    reporter: &Arc<dyn ProgressReporter>,
) -> Result<BatchPlan> {
    // Scan
    reporter.begin_stage(PipelineStage::Scanning, None);
    let files = list_frame_files(&config.input, &config.naming.extensions)?;
    reporter.finish_stage();
    info!(
        files = files.len(),
        input = %config.input.display(),
        "Scanned input directory"
    );
    if files.is_empty() {
        return Err(RegistrationError::EmptyBatch);
    }

    // Decode
    reporter.begin_stage(PipelineStage::Decoding, Some(files.len()));
    let mut entries = Vec::with_capacity(files.len());
    let mut malformed = Vec::new();
    for (i, path) in files.iter().enumerate() {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match decode_filename(&file_name) {
            Ok(name) => {
                let size = read_dimensions(path)?;
                debug!(file = %file_name, %size, round = name.round, marker = %name.marker, "Decoded frame");
                entries.push(FrameEntry::new(name, path.clone(), size));
            }
            Err(err) => {
                warn!(%err, "Skipping frame");
                let reason = match err {
                    RegistrationError::MalformedFilename { reason, .. } => reason,
                    other => other.to_string(),
                };
                malformed.push(MalformedFile {
                    path: path.clone(),
                    reason,
                });
            }
        }
        reporter.advance(i + 1);
    }
    reporter.finish_stage();
    if entries.is_empty() {
        return Err(RegistrationError::EmptyBatch);
    }

    // Group
    reporter.begin_stage(PipelineStage::Grouping, None);
    let grouping = group_rounds(entries, &config.naming.reference_marker);
    info!(
        rounds = ?grouping.round_ids(),
        rejected = grouping.rejected.len(),
        "Grouped imaging rounds"
    );
    reporter.finish_stage();

    // ROI
    reporter.begin_stage(PipelineStage::ResolvingRoi, None);
    let roi = if config.roi.enabled {
        let manifest = load_manifest(&config.input.join(&config.roi.manifest));
        let sizes: Vec<FrameSize> = grouping.all_frames().map(|f| f.size).collect();
        resolve_roi(manifest.as_ref(), &sizes, config.roi.margin)
    } else {
        None
    };
    reporter.finish_stage();

    // Canvas
    reporter.begin_stage(PipelineStage::Normalizing, None);
    let effective: Vec<FrameSize> = grouping
        .all_frames()
        .map(|f| effective_size(f.size, roi.as_ref()))
        .collect();
    let canvas = max_canvas(effective.iter().copied()).ok_or(RegistrationError::EmptyBatch)?;
    let smallest = effective
        .iter()
        .copied()
        .reduce(|a, b| FrameSize::new(a.height.min(b.height), a.width.min(b.width)))
        .unwrap_or(canvas);
    info!(%canvas, %smallest, "Output frame size");
    reporter.finish_stage();

    Ok(BatchPlan {
        grouping,
        malformed,
        roi,
        canvas,
        smallest,
    })
}

/// Run the whole registration batch.
pub fn run_registration(config: &RegistrationConfig) -> Result<RegistrationReport> {
    run_registration_reported(config, Arc::new(NoOpReporter))
}

/// Run the whole registration batch with a thread-safe progress reporter.
pub fn run_registration_reported(
    config: &RegistrationConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<RegistrationReport> {
    ensure_distinct_dirs(&config.input, &config.output)?;

    let plan = plan_batch_reported(config, &reporter)?;
    let grouping = &plan.grouping;

    let reference_frames = grouping.rounds.len()
        + grouping
            .rejected
            .iter()
            .map(|r| r.reference_count)
            .sum::<usize>();
    let highest_round = grouping
        .rounds
        .iter()
        .map(|r| r.id)
        .chain(grouping.rejected.iter().map(|r| r.id))
        .max()
        .unwrap_or(0);
    if reference_frames != highest_round as usize {
        warn!(
            reference_frames,
            highest_round, "Reference frame count does not match the highest round id"
        );
    }

    let registrable = grouping.rounds.len();
    if registrable < 2 {
        return Err(RegistrationError::InsufficientRounds { found: registrable });
    }

    let parallel = frame_parallelism(plan.canvas, &config.resources)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallel)
        .build()?;

    // Anchor
    reporter.begin_stage(PipelineStage::SelectingAnchor, None);
    let anchor = select_anchor(&grouping.round_ids(), &config.anchor)?;
    info!(anchor, selection = %config.anchor, "Selected anchor round");
    reporter.finish_stage();

    fs::create_dir_all(&config.output)?;

    let records = pool.install(|| estimate_rounds(config, &plan, anchor, &reporter))?;
    let written = pool.install(|| write_frames(config, &plan, &records, &reporter))?;
    info!(frames = written.len(), output = %config.output.display(), "Frames written");

    // Log
    reporter.begin_stage(PipelineStage::Logging, None);
    let report = RegistrationReport {
        anchor,
        canvas: plan.canvas,
        roi: plan.roi,
        downsample_factor: downsample_factor(plan.canvas, config.alignment.max_correlation_dim),
        records,
        skipped_rounds: grouping
            .rejected
            .iter()
            .map(|r| (r.id, r.reference_count))
            .collect(),
        malformed: plan.malformed.clone(),
        written,
        log_path: config.log_path(),
    };
    write_log(&report.log_path, &report)?;
    reporter.finish_stage();
    info!(log = %report.log_path.display(), "Registration complete");

    Ok(report)
}

/// Estimate every non-anchor round against the anchor's reference frame.
fn estimate_rounds(
    config: &RegistrationConfig,
    plan: &BatchPlan,
    anchor: u32,
    reporter: &Arc<dyn ProgressReporter>,
) -> Result<Vec<RoundRecord>> {
    let anchor_round = plan
        .grouping
        .round(anchor)
        .ok_or(RegistrationError::AnchorUnavailable { round: anchor })?;
    let anchor_gray = load_reference_gray(anchor_round, plan)?;

    let moving: Vec<&Round> = plan
        .grouping
        .rounds
        .iter()
        .filter(|r| r.id != anchor)
        .collect();

    reporter.begin_stage(PipelineStage::Estimating, Some(moving.len()));
    let counter = AtomicUsize::new(0);
    let estimate_one = |round: &&Round| -> Result<RoundRecord> {
        let gray = load_reference_gray(round, plan)?;
        let estimate = estimate_translation(&gray, &anchor_gray, &config.alignment)?;
        info!(
            round = round.id,
            translation = %estimate.translation,
            error = estimate.error,
            "Registered round"
        );
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        reporter.advance(done);
        Ok(RoundRecord {
            round: round.id,
            estimate,
        })
    };
    let results: Vec<Result<RoundRecord>> = if moving.len() >= PARALLEL_FRAME_THRESHOLD {
        moving.par_iter().map(estimate_one).collect()
    } else {
        moving.iter().map(estimate_one).collect()
    };
    let records: Vec<RoundRecord> = results.into_iter().collect::<Result<_>>()?;
    reporter.finish_stage();

    let mut by_error: Vec<&RoundRecord> = records.iter().collect();
    by_error.sort_by(|a, b| b.estimate.error.total_cmp(&a.estimate.error));
    for record in by_error {
        debug!(
            round = record.round,
            error = record.estimate.error,
            "Alignment error"
        );
    }

    Ok(records)
}

/// Translate and write every frame. Rejected rounds are written untranslated.
fn write_frames(
    config: &RegistrationConfig,
    plan: &BatchPlan,
    records: &[RoundRecord],
    reporter: &Arc<dyn ProgressReporter>,
) -> Result<Vec<PathBuf>> {
    let grouping = &plan.grouping;
    let mut jobs: Vec<(&FrameEntry, Translation)> = Vec::with_capacity(plan.frame_count());
    for round in &grouping.rounds {
        let translation = records
            .iter()
            .find(|r| r.round == round.id)
            .map(|r| r.estimate.translation)
            .unwrap_or_default();
        jobs.extend(round.frames().map(|f| (f, translation)));
    }
    for rejected in &grouping.rejected {
        jobs.extend(rejected.frames.iter().map(|f| (f, Translation::default())));
    }

    reporter.begin_stage(PipelineStage::Applying, Some(jobs.len()));
    let counter = AtomicUsize::new(0);
    let write_one = |&(entry, translation): &(&FrameEntry, Translation)| -> Result<PathBuf> {
        let frame = prepare_frame(entry, plan.roi.as_ref(), plan.canvas)?;
        let shifted = shift_frame(&frame, translation, config.border);
        let out_path = config.output.join(entry.file_name());
        save_frame(&shifted, &out_path)?;
        debug!(file = %entry.file_name(), %translation, "Wrote frame");
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        reporter.advance(done);
        Ok(out_path)
    };
    let written: Vec<Result<PathBuf>> = if jobs.len() >= PARALLEL_FRAME_THRESHOLD {
        jobs.par_iter().map(write_one).collect()
    } else {
        jobs.iter().map(write_one).collect()
    };
    let written: Vec<PathBuf> = written.into_iter().collect::<Result<_>>()?;
    reporter.finish_stage();
    Ok(written)
}

/// Load, crop and pad a round's reference frame, then project it to gray.
fn load_reference_gray(round: &Round, plan: &BatchPlan) -> Result<Array2<f32>> {
    let frame = prepare_frame(&round.reference, plan.roi.as_ref(), plan.canvas)?;
    Ok(luminance(&frame))
}

/// Load a frame and bring it onto the common canvas: crop, then pad.
fn prepare_frame(
    entry: &FrameEntry,
    roi: Option<&RoiDescriptor>,
    canvas: FrameSize,
) -> Result<Frame> {
    let mut frame = load_frame(&entry.path)?;
    if frame.size() != entry.size {
        return Err(RegistrationError::FrameSizeMismatch {
            round: entry.name.round,
            file_name: entry.file_name().to_string(),
            expected: entry.size,
            found: frame.size(),
        });
    }
    frame.metadata.file_name = entry.file_name().to_string();
    frame.metadata.round = entry.name.round;
    frame.metadata.marker = entry.name.marker.clone();

    let frame = match roi {
        Some(roi) => crop_frame(&frame, roi),
        None => frame,
    };
    pad_frame(&frame, canvas)
}

fn ensure_distinct_dirs(input: &Path, output: &Path) -> Result<()> {
    let same = match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same {
        return Err(RegistrationError::Config(format!(
            "output directory {} must differ from the input directory",
            output.display()
        )));
    }
    Ok(())
}
