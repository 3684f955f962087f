use std::sync::Arc;

use ndarray::{Array2, ArrayViewMut1, Axis};
use num_complex::Complex;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// 2D forward FFT: row-wise pass, then column-wise pass.
pub fn fft2d_forward(data: &Array2<f32>) -> Array2<Complex<f64>> {
    let (h, w) = data.dim();
    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft_forward(w);
    let fft_col = planner.plan_fft_forward(h);

    let mut result = data.mapv(|v| Complex::new(v as f64, 0.0));
    transform_lanes(&mut result, Axis(0), &fft_row);
    transform_lanes(&mut result, Axis(1), &fft_col);
    result
}

/// 2D inverse FFT, returning the real part normalized by `1/(h*w)`.
pub fn ifft2d_inverse(data: &Array2<Complex<f64>>) -> Array2<f64> {
    let (h, w) = data.dim();
    let mut planner = FftPlanner::new();
    let ifft_row = planner.plan_fft_inverse(w);
    let ifft_col = planner.plan_fft_inverse(h);

    let mut work = data.clone();
    transform_lanes(&mut work, Axis(1), &ifft_col);
    transform_lanes(&mut work, Axis(0), &ifft_row);

    let scale = 1.0 / (h * w) as f64;
    work.mapv(|v| v.re * scale)
}

/// Run `fft` over every lane obtained by iterating `axis`
/// (`Axis(0)` visits rows, `Axis(1)` visits columns).
fn transform_lanes(data: &mut Array2<Complex<f64>>, axis: Axis, fft: &Arc<dyn Fft<f64>>) {
    let process = |mut lane: ArrayViewMut1<'_, Complex<f64>>| {
        let mut buf = lane.to_vec();
        fft.process(&mut buf);
        for (dst, src) in lane.iter_mut().zip(buf) {
            *dst = src;
        }
    };

    if data.len() >= PARALLEL_PIXEL_THRESHOLD {
        data.axis_iter_mut(axis).into_par_iter().for_each(process);
    } else {
        data.axis_iter_mut(axis).for_each(process);
    }
}
