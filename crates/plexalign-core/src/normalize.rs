use ndarray::{s, Array3};

use crate::error::{RegistrationError, Result};
use crate::frame::{Frame, FrameSize};

/// Common canvas for a batch: the maximum height and maximum width over all
/// size records. `None` for an empty batch.
pub fn max_canvas<I>(sizes: I) -> Option<FrameSize>
where
    I: IntoIterator<Item = FrameSize>,
{
    sizes.into_iter().reduce(|acc, size| {
        FrameSize::new(acc.height.max(size.height), acc.width.max(size.width))
    })
}

/// Zero-pad a frame to `canvas`, keeping the original content anchored at
/// the top-left corner.
pub fn pad_frame(frame: &Frame, canvas: FrameSize) -> Result<Frame> {
    let size = frame.size();
    if !canvas.contains(&size) {
        return Err(RegistrationError::FrameExceedsCanvas {
            frame: size,
            canvas,
        });
    }
    if size == canvas {
        return Ok(frame.clone());
    }

    let mut padded = Array3::<f32>::zeros((frame.channels(), canvas.height, canvas.width));
    padded
        .slice_mut(s![.., ..size.height, ..size.width])
        .assign(&frame.data);
    Ok(frame.with_data(padded))
}
