use ndarray::{s, Array2, ArrayView2, Zip};
use tracing::debug;

use crate::error::{RegistrationError, Result};
use crate::frame::{AlignmentEstimate, AlignmentOffset, FrameSize, Translation};
use crate::pipeline::config::AlignmentConfig;

use super::phase_correlation::phase_correlate;
use super::upsampled::refine_offset;

/// Stride used to subsample a frame before correlation: `max(h, w) / limit + 1`.
pub fn downsample_factor(size: FrameSize, max_correlation_dim: usize) -> usize {
    size.height.max(size.width) / max_correlation_dim.max(1) + 1
}

/// Estimate the integer translation that moves `moving` onto `anchor`.
///
/// Both arrays must share one shape (the padded canvas). Large arrays are
/// subsampled by [`downsample_factor`]; the coarse peak is then refined on a
/// `1/factor` grid. The rounded peak is finally walked downhill on
/// [`alignment_error`] at full resolution, so the reported vector is never
/// worse than any of its neighbours.
pub fn estimate_translation(
    moving: &Array2<f32>,
    anchor: &Array2<f32>,
    config: &AlignmentConfig,
) -> Result<AlignmentEstimate> {
    if moving.dim() != anchor.dim() {
        let (mh, mw) = moving.dim();
        let (ah, aw) = anchor.dim();
        return Err(RegistrationError::ArrayShapeMismatch {
            left: FrameSize::new(mh, mw),
            right: FrameSize::new(ah, aw),
        });
    }

    let (h, w) = anchor.dim();
    let factor = downsample_factor(FrameSize::new(h, w), config.max_correlation_dim);

    let corr = if factor > 1 {
        let anchor_small = subsample(anchor, factor);
        let moving_small = subsample(moving, factor);
        phase_correlate(&anchor_small, &moving_small, config.hann_window)?
    } else {
        phase_correlate(anchor, moving, config.hann_window)?
    };

    let refined = refine_offset(&corr.cross_power, &corr.offset, factor);
    let peak = Translation::from_offset(&AlignmentOffset {
        dy: refined.dy * factor as f64,
        dx: refined.dx * factor as f64,
    });
    let (translation, error) = descend_error(anchor, moving, peak, config.descent_steps);

    debug!(
        factor,
        peak_value = corr.peak_value,
        %peak,
        %translation,
        error,
        "Estimated translation"
    );

    Ok(AlignmentEstimate { translation, error })
}

/// Greedy descent over the 8-neighbourhood of `start`, moving only to a
/// strictly lower [`alignment_error`].
fn descend_error(
    anchor: &Array2<f32>,
    moving: &Array2<f32>,
    start: Translation,
    max_steps: usize,
) -> (Translation, f64) {
    let mut best = start;
    let mut best_error = alignment_error(anchor, moving, start);

    for _ in 0..max_steps {
        if best_error == 0.0 {
            break;
        }
        let mut step = None;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dy == 0 && dx == 0 {
                    continue;
                }
                let candidate = Translation::new(best.dy + dy, best.dx + dx);
                let error = alignment_error(anchor, moving, candidate);
                if error < step.map_or(best_error, |(_, e)| e) {
                    step = Some((candidate, error));
                }
            }
        }
        match step {
            Some((candidate, error)) => {
                best = candidate;
                best_error = error;
            }
            None => break,
        }
    }

    (best, best_error)
}

/// Residual misfit between `anchor` and `moving` translated by `translation`,
/// over their overlap: `sqrt(1 - C^2 / (Ea * Em))`.
///
/// 0.0 for a perfect match, up to 1.0 when there is no correlation or no
/// overlapping signal.
pub fn alignment_error(anchor: &Array2<f32>, moving: &Array2<f32>, translation: Translation) -> f64 {
    let Some((a, m)) = overlap(anchor.view(), moving.view(), translation) else {
        return 1.0;
    };

    let (cross, energy_a, energy_m) = Zip::from(&a).and(&m).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(c, ea, em), &av, &mv| {
            let (av, mv) = (av as f64, mv as f64);
            (c + av * mv, ea + av * av, em + mv * mv)
        },
    );

    if energy_a <= 0.0 || energy_m <= 0.0 {
        return 1.0;
    }
    (1.0 - cross * cross / (energy_a * energy_m)).max(0.0).sqrt()
}

/// Views of `anchor` and `moving` covering the pixels where the translated
/// moving frame overlaps the anchor.
fn overlap<'a>(
    anchor: ArrayView2<'a, f32>,
    moving: ArrayView2<'a, f32>,
    t: Translation,
) -> Option<(ArrayView2<'a, f32>, ArrayView2<'a, f32>)> {
    let (h, w) = anchor.dim();
    let (rows, src_rows) = overlap_range(h, t.dy)?;
    let (cols, src_cols) = overlap_range(w, t.dx)?;
    Some((
        anchor.slice_move(s![rows.0..rows.1, cols.0..cols.1]),
        moving.slice_move(s![src_rows.0..src_rows.1, src_cols.0..src_cols.1]),
    ))
}

/// Destination and source index ranges along one axis of length `n` for a
/// shift of `d`: `dst = src + d`.
pub(crate) fn overlap_range(n: usize, d: i64) -> Option<((usize, usize), (usize, usize))> {
    let n = n as i64;
    if d.abs() >= n {
        return None;
    }
    let (dst_start, dst_end) = (d.max(0), (n + d).min(n));
    Some((
        (dst_start as usize, dst_end as usize),
        ((dst_start - d) as usize, (dst_end - d) as usize),
    ))
}

fn subsample(data: &Array2<f32>, factor: usize) -> Array2<f32> {
    let step = factor as isize;
    data.slice(s![..;step, ..;step]).to_owned()
}
