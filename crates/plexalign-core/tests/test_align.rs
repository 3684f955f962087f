#[allow(dead_code)]
mod common;

use approx::assert_abs_diff_eq;
use ndarray::Array2;

use plexalign_core::align::phase_correlation::phase_correlate;
use plexalign_core::align::{alignment_error, downsample_factor, estimate_translation};
use plexalign_core::error::RegistrationError;
use plexalign_core::frame::{FrameSize, Translation};
use plexalign_core::pipeline::config::AlignmentConfig;

#[test]
fn test_zero_offset_for_identical_arrays() {
    let data = common::patch_plane(64, 64, 20, 20, 16, 16);
    let corr = phase_correlate(&data, &data, false).unwrap();
    assert_eq!(corr.offset.dy, 0.0);
    assert_eq!(corr.offset.dx, 0.0);
}

#[test]
fn test_offset_moves_target_onto_reference() {
    let reference = common::square_plane(64, 64, 20, 20, 10);
    // Target content sits 3 rows lower and 5 columns right.
    let target = common::square_plane(64, 64, 23, 25, 10);
    let corr = phase_correlate(&reference, &target, false).unwrap();
    assert_eq!(corr.offset.dy, -3.0);
    assert_eq!(corr.offset.dx, -5.0);
    assert!(corr.peak_value > 0.5);
}

#[test]
fn test_estimate_known_translation() {
    let anchor = common::patch_plane(64, 70, 20, 24, 16, 16);
    let moving = common::patch_plane(64, 70, 23, 20, 16, 16);
    let estimate = estimate_translation(&moving, &anchor, &AlignmentConfig::default()).unwrap();

    assert_eq!(estimate.translation, Translation::new(-3, 4));
    assert_abs_diff_eq!(estimate.error, 0.0, epsilon = 1e-9);
}

#[test]
fn test_anchor_against_itself_is_identity() {
    let anchor = common::patch_plane(48, 48, 10, 12, 20, 18);
    let estimate = estimate_translation(&anchor, &anchor, &AlignmentConfig::default()).unwrap();
    assert!(estimate.translation.is_zero());
    assert_eq!(estimate.error, 0.0);
}

#[test]
fn test_estimate_with_hann_window() {
    let anchor = common::patch_plane(64, 64, 24, 24, 16, 16);
    let moving = common::patch_plane(64, 64, 26, 21, 16, 16);
    let config = AlignmentConfig {
        hann_window: true,
        ..AlignmentConfig::default()
    };
    let estimate = estimate_translation(&moving, &anchor, &config).unwrap();
    assert_eq!(estimate.translation, Translation::new(-2, 3));
}

#[test]
fn test_estimate_with_downsampling() {
    // 128 / 60 + 1 = 3
    let config = AlignmentConfig {
        max_correlation_dim: 60,
        ..AlignmentConfig::default()
    };
    let anchor = common::square_plane(128, 128, 40, 40, 30);
    let moving = common::square_plane(128, 128, 46, 31, 30);
    let estimate = estimate_translation(&moving, &anchor, &config).unwrap();

    assert_eq!(estimate.translation, Translation::new(-6, 9));
    assert_abs_diff_eq!(estimate.error, 0.0, epsilon = 1e-6);
}

#[test]
fn test_estimate_smooth_blob_translations() {
    let anchor = common::gaussian_plane(128, 128, 64, 64, 6.0);
    let config = AlignmentConfig::default();

    for dy in (-8..=8).step_by(2) {
        for dx in (-8..=8).step_by(2) {
            let moving = common::gaussian_plane(128, 128, 64 + dy, 64 + dx, 6.0);
            let estimate = estimate_translation(&moving, &anchor, &config).unwrap();
            assert_eq!(
                estimate.translation,
                Translation::new(-dy, -dx),
                "shift ({dy}, {dx})"
            );
            assert!(estimate.error < 1e-3, "shift ({dy}, {dx}): error {}", estimate.error);
        }
    }
}

#[test]
fn test_descent_never_leaves_a_lower_error_neighbour() {
    let anchor = common::gaussian_plane(96, 96, 48, 48, 9.0);
    let moving = common::gaussian_plane(96, 96, 53, 45, 9.0);
    let estimate = estimate_translation(&moving, &anchor, &AlignmentConfig::default()).unwrap();

    for dy in -1..=1 {
        for dx in -1..=1 {
            let t = Translation::new(estimate.translation.dy + dy, estimate.translation.dx + dx);
            assert!(alignment_error(&anchor, &moving, t) >= estimate.error);
        }
    }
    assert_eq!(estimate.translation, Translation::new(-5, 3));
}

#[test]
fn test_descent_disabled_keeps_correlation_peak() {
    let anchor = common::patch_plane(64, 70, 20, 24, 16, 16);
    let moving = common::patch_plane(64, 70, 23, 20, 16, 16);
    let config = AlignmentConfig {
        descent_steps: 0,
        ..AlignmentConfig::default()
    };
    let estimate = estimate_translation(&moving, &anchor, &config).unwrap();
    assert_eq!(estimate.translation, Translation::new(-3, 4));
}

#[test]
fn test_estimate_shape_mismatch() {
    let a = Array2::<f32>::zeros((32, 32));
    let b = Array2::<f32>::zeros((32, 30));
    let err = estimate_translation(&a, &b, &AlignmentConfig::default()).unwrap_err();
    assert!(matches!(err, RegistrationError::ArrayShapeMismatch { .. }));
}

#[test]
fn test_downsample_factor() {
    assert_eq!(downsample_factor(FrameSize::new(512, 512), 10_000), 1);
    assert_eq!(downsample_factor(FrameSize::new(9_999, 100), 10_000), 1);
    assert_eq!(downsample_factor(FrameSize::new(10_000, 100), 10_000), 2);
    assert_eq!(downsample_factor(FrameSize::new(100, 25_000), 10_000), 3);
}

#[test]
fn test_alignment_error_range() {
    let anchor = common::patch_plane(32, 32, 8, 8, 12, 12);
    assert_eq!(alignment_error(&anchor, &anchor, Translation::default()), 0.0);

    let other = common::square_plane(32, 32, 0, 0, 4);
    let err = alignment_error(&anchor, &other, Translation::default());
    assert!((0.0..=1.0).contains(&err));
    assert_abs_diff_eq!(err, 1.0, epsilon = 1e-9);

    // Translation larger than the frame: no overlap.
    assert_eq!(alignment_error(&anchor, &anchor, Translation::new(40, 0)), 1.0);

    let zeros = Array2::<f32>::zeros((32, 32));
    assert_eq!(alignment_error(&anchor, &zeros, Translation::default()), 1.0);
}

#[test]
fn test_alignment_error_is_worse_when_misaligned() {
    let anchor = common::patch_plane(64, 64, 20, 20, 16, 16);
    let moving = common::patch_plane(64, 64, 22, 23, 16, 16);
    let aligned = alignment_error(&anchor, &moving, Translation::new(-2, -3));
    let misaligned = alignment_error(&anchor, &moving, Translation::default());
    assert_abs_diff_eq!(aligned, 0.0, epsilon = 1e-9);
    assert!(misaligned > aligned);
}
