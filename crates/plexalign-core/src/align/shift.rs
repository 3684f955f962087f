use ndarray::{s, Array3};

use crate::frame::{Frame, Translation};
use crate::pipeline::config::BorderMode;

use super::estimator::overlap_range;

/// Shift every channel of a frame by an integer translation.
///
/// Pixel (y, x) of the result is pixel (y - dy, x - dx) of the input. With
/// [`BorderMode::Zero`] newly exposed pixels are 0; with [`BorderMode::Wrap`]
/// content leaving one edge re-enters at the opposite edge.
pub fn shift_frame(frame: &Frame, translation: Translation, border: BorderMode) -> Frame {
    if translation.is_zero() {
        return frame.clone();
    }
    let data = match border {
        BorderMode::Zero => shift_zero(&frame.data, translation),
        BorderMode::Wrap => shift_wrap(&frame.data, translation),
    };
    frame.with_data(data)
}

fn shift_zero(data: &Array3<f32>, t: Translation) -> Array3<f32> {
    let (_, h, w) = data.dim();
    let mut result = Array3::<f32>::zeros(data.dim());

    let (Some((rows, src_rows)), Some((cols, src_cols))) =
        (overlap_range(h, t.dy), overlap_range(w, t.dx))
    else {
        return result;
    };

    result
        .slice_mut(s![.., rows.0..rows.1, cols.0..cols.1])
        .assign(&data.slice(s![.., src_rows.0..src_rows.1, src_cols.0..src_cols.1]));
    result
}

fn shift_wrap(data: &Array3<f32>, t: Translation) -> Array3<f32> {
    let (_, h, w) = data.dim();
    let dy = t.dy.rem_euclid(h as i64) as usize;
    let dx = t.dx.rem_euclid(w as i64) as usize;

    Array3::from_shape_fn(data.dim(), |(c, row, col)| {
        data[[c, (row + h - dy) % h, (col + w - dx) % w]]
    })
}
