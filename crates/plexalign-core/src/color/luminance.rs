use ndarray::{Array2, Axis, Zip};

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::frame::Frame;

/// Project a frame to a single luminance plane for correlation.
///
/// - 1 channel: the plane itself.
/// - 2 channels (gray + alpha): the gray plane.
/// - 3+ channels: ITU-R BT.709 weights on the first three (R, G, B);
///   alpha and any further channels are ignored.
pub fn luminance(frame: &Frame) -> Array2<f32> {
    if !frame.is_color() {
        return frame.data.index_axis(Axis(0), 0).to_owned();
    }

    let red = frame.data.index_axis(Axis(0), 0);
    let green = frame.data.index_axis(Axis(0), 1);
    let blue = frame.data.index_axis(Axis(0), 2);

    let mut data = Array2::<f32>::zeros((frame.height(), frame.width()));
    Zip::from(&mut data)
        .and(&red)
        .and(&green)
        .and(&blue)
        .for_each(|out, &r, &g, &b| {
            *out = LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b;
        });

    data
}
