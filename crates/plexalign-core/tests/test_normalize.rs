use ndarray::Array3;

use plexalign_core::error::RegistrationError;
use plexalign_core::frame::{Frame, FrameSize};
use plexalign_core::normalize::{max_canvas, pad_frame};

#[test]
fn test_max_canvas_takes_max_per_dimension() {
    let sizes = vec![
        FrameSize::new(100, 80),
        FrameSize::new(90, 120),
        FrameSize::new(95, 100),
    ];
    assert_eq!(max_canvas(sizes), Some(FrameSize::new(100, 120)));
}

#[test]
fn test_max_canvas_empty() {
    assert_eq!(max_canvas(Vec::<FrameSize>::new()), None);
}

#[test]
fn test_pad_preserves_content_top_left() {
    let data = Array3::from_shape_fn((2, 3, 4), |(c, r, col)| 0.1 + (c * 12 + r * 4 + col) as f32 / 100.0);
    let frame = Frame::new(data.clone(), 8);
    let padded = pad_frame(&frame, FrameSize::new(5, 7)).unwrap();

    assert_eq!(padded.size(), FrameSize::new(5, 7));
    assert_eq!(padded.channels(), 2);
    for c in 0..2 {
        for r in 0..5 {
            for col in 0..7 {
                let expected = if r < 3 && col < 4 { data[[c, r, col]] } else { 0.0 };
                assert_eq!(padded.data[[c, r, col]], expected);
            }
        }
    }
    assert_eq!(padded.metadata.original_size, FrameSize::new(3, 4));
}

#[test]
fn test_pad_same_size_is_identity() {
    let data = Array3::from_elem((1, 4, 4), 0.5f32);
    let frame = Frame::new(data.clone(), 8);
    let padded = pad_frame(&frame, FrameSize::new(4, 4)).unwrap();
    assert_eq!(padded.data, data);
}

#[test]
fn test_pad_rejects_larger_frame() {
    let frame = Frame::new(Array3::zeros((1, 10, 4)), 8);
    let err = pad_frame(&frame, FrameSize::new(8, 8)).unwrap_err();
    assert!(matches!(err, RegistrationError::FrameExceedsCanvas { .. }));
}
