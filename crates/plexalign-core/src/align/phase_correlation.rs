use ndarray::{Array2, Zip};
use num_complex::Complex;

use crate::consts::{CROSS_POWER_EPSILON, CROSS_POWER_RELATIVE_FLOOR};
use crate::error::{RegistrationError, Result};
use crate::frame::{AlignmentOffset, FrameSize};

use super::fft::{fft2d_forward, ifft2d_inverse};

/// Result of correlating two arrays: the normalized cross-power spectrum
/// (kept for refinement) and the integer-pixel offset of the peak.
pub struct Correlation {
    pub cross_power: Array2<Complex<f64>>,
    /// Shift to apply to the target so it matches the reference.
    pub offset: AlignmentOffset,
    pub peak_value: f64,
}

/// Phase-correlate `target` against `reference`.
///
/// `offset` is the translation that moves `target` onto `reference`.
pub fn phase_correlate(
    reference: &Array2<f32>,
    target: &Array2<f32>,
    hann_window: bool,
) -> Result<Correlation> {
    let (h, w) = reference.dim();
    let (th, tw) = target.dim();
    if h != th || w != tw {
        return Err(RegistrationError::ArrayShapeMismatch {
            left: FrameSize::new(h, w),
            right: FrameSize::new(th, tw),
        });
    }

    let (ref_fft, tgt_fft) = if hann_window {
        (
            fft2d_forward(&apply_hann(reference)),
            fft2d_forward(&apply_hann(target)),
        )
    } else {
        (fft2d_forward(reference), fft2d_forward(target))
    };

    let cross_power = normalized_cross_power(&ref_fft, &tgt_fft);
    let correlation = ifft2d_inverse(&cross_power);
    let (peak_row, peak_col, peak_value) = find_peak(&correlation);

    Ok(Correlation {
        cross_power,
        offset: AlignmentOffset {
            dy: signed_offset(peak_row, h),
            dx: signed_offset(peak_col, w),
        },
        peak_value,
    })
}

/// Map a peak index on a circular axis of length `n` to a signed offset.
pub(crate) fn signed_offset(index: usize, n: usize) -> f64 {
    if index > n / 2 {
        index as f64 - n as f64
    } else {
        index as f64
    }
}

pub(crate) fn apply_hann(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let mut result = Array2::<f32>::zeros((h, w));

    for row in 0..h {
        let wy = 0.5 * (1.0 - (std::f64::consts::TAU * row as f64 / h as f64).cos());
        for col in 0..w {
            let wx = 0.5 * (1.0 - (std::f64::consts::TAU * col as f64 / w as f64).cos());
            result[[row, col]] = data[[row, col]] * (wy * wx) as f32;
        }
    }

    result
}

/// Unit-magnitude cross-power spectrum. Bins below
/// [`CROSS_POWER_RELATIVE_FLOOR`] of the strongest bin are zeroed: smooth
/// frames have almost no energy at high frequencies and whitening that
/// residue would swamp the true peak.
pub(crate) fn normalized_cross_power(
    ref_fft: &Array2<Complex<f64>>,
    tgt_fft: &Array2<Complex<f64>>,
) -> Array2<Complex<f64>> {
    let mut result = Array2::<Complex<f64>>::zeros(ref_fft.dim());
    Zip::from(&mut result)
        .and(ref_fft)
        .and(tgt_fft)
        .for_each(|out, &r, &t| *out = r * t.conj());

    let strongest = result.iter().fold(0.0f64, |acc, c| acc.max(c.norm()));
    let floor = (strongest * CROSS_POWER_RELATIVE_FLOOR).max(CROSS_POWER_EPSILON);

    result.mapv_inplace(|cross| {
        let mag = cross.norm();
        if mag > floor {
            cross / mag
        } else {
            Complex::new(0.0, 0.0)
        }
    });

    result
}

/// First maximum in row-major order.
pub(crate) fn find_peak(data: &Array2<f64>) -> (usize, usize, f64) {
    let mut best = (0, 0, f64::NEG_INFINITY);
    for ((row, col), &val) in data.indexed_iter() {
        if val > best.2 {
            best = (row, col, val);
        }
    }
    best
}
