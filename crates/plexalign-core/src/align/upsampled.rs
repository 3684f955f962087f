//! Peak refinement by matrix-multiply DFT (Guizar-Sicairos et al., 2008).
//!
//! The cross-power spectrum is evaluated on a `1/upsample` grid in a small
//! window around the coarse peak instead of zero-padding the whole spectrum.
//!
//! Reference: "Efficient subpixel image registration algorithms",
//!            M. Guizar-Sicairos, S. T. Thurman, J. R. Fienup, Optics Letters 33(2), 2008.

use std::f64::consts::TAU;

use ndarray::Array2;
use num_complex::Complex;

use crate::consts::UPSAMPLE_SEARCH_WINDOW;
use crate::frame::AlignmentOffset;

/// Refine a coarse integer offset to `1/upsample` pixel precision.
///
/// `cross_power` is the normalized cross-power spectrum the coarse offset was
/// found in. Returns the coarse offset unchanged when `upsample <= 1`.
pub fn refine_offset(
    cross_power: &Array2<Complex<f64>>,
    coarse: &AlignmentOffset,
    upsample: usize,
) -> AlignmentOffset {
    if upsample <= 1 {
        return coarse.clone();
    }

    let (h, w) = cross_power.dim();
    let up = upsample as f64;
    let samples = (UPSAMPLE_SEARCH_WINDOW * up).ceil() as usize;

    let rows = grid_positions(coarse.dy, samples, up);
    let cols = grid_positions(coarse.dx, samples, up);

    // (samples, h) . (h, w) . (w, samples) -> (samples, samples)
    let row_kernel = dft_kernel(h, &rows).reversed_axes();
    let col_kernel = dft_kernel(w, &cols);
    let upsampled = row_kernel.dot(cross_power).dot(&col_kernel);

    let mut best = (0, 0, f64::NEG_INFINITY);
    for ((r, c), val) in upsampled.indexed_iter() {
        let mag = val.norm();
        if mag > best.2 {
            best = (r, c, mag);
        }
    }

    AlignmentOffset {
        dy: rows[best.0],
        dx: cols[best.1],
    }
}

/// `samples` positions spaced `1/up` apart, centered on `center`.
fn grid_positions(center: f64, samples: usize, up: f64) -> Vec<f64> {
    let start = center - (samples as f64 - 1.0) / (2.0 * up);
    (0..samples).map(|j| start + j as f64 / up).collect()
}

/// Inverse-DFT kernel of shape `(n, positions.len())`:
/// entry (k, j) = exp(+i * 2π * freq_k * pos_j / n),
/// with `freq_k` the signed frequency of bin k.
fn dft_kernel(n: usize, positions: &[f64]) -> Array2<Complex<f64>> {
    let half_n = n as f64 / 2.0;
    Array2::from_shape_fn((n, positions.len()), |(k, j)| {
        let freq = if (k as f64) <= half_n {
            k as f64
        } else {
            k as f64 - n as f64
        };
        let phase = TAU * freq * positions[j] / n as f64;
        Complex::new(phase.cos(), phase.sin())
    })
}
