use ndarray::Array3;

use plexalign_core::frame::{Frame, FrameSize};
use plexalign_core::io::manifest::{BoundingBox, Manifest};
use plexalign_core::roi::{crop_frame, effective_size, resolve_roi, RoiDescriptor, RoiRejection};

fn manifest(top: i64, left: i64, height: i64, width: i64) -> Manifest {
    Manifest {
        bounding_box: vec![BoundingBox {
            top: Some(top),
            left: Some(left),
            height: Some(height),
            width: Some(width),
        }],
    }
}

#[test]
fn test_valid_box_is_used() {
    let sizes = [FrameSize::new(1000, 1200), FrameSize::new(1100, 1000)];
    let roi = resolve_roi(Some(&manifest(120, 140, 700, 600)), &sizes, 100).unwrap();
    assert_eq!(
        roi,
        RoiDescriptor {
            top: 120,
            left: 140,
            height: 700,
            width: 600
        }
    );
}

#[test]
fn test_box_touching_margin_exactly_is_valid() {
    // 100 + 800 + 100 == 1000
    let sizes = [FrameSize::new(1000, 1000)];
    assert!(resolve_roi(Some(&manifest(100, 100, 800, 800)), &sizes, 100).is_some());
}

#[test]
fn test_box_inside_margin_falls_back() {
    let sizes = [FrameSize::new(1000, 1000)];
    assert!(resolve_roi(Some(&manifest(99, 200, 100, 100)), &sizes, 100).is_none());
    assert!(resolve_roi(Some(&manifest(200, 200, 750, 100)), &sizes, 100).is_none());
}

#[test]
fn test_box_must_fit_every_frame() {
    let sizes = [FrameSize::new(1000, 1000), FrameSize::new(500, 1000)];
    let roi = RoiDescriptor {
        top: 150,
        left: 150,
        height: 300,
        width: 300,
    };
    assert_eq!(
        roi.validate(&sizes, 100),
        Err(RoiRejection::OutsideFrame {
            frame: FrameSize::new(500, 1000)
        })
    );
    assert!(resolve_roi(Some(&manifest(150, 150, 300, 300)), &sizes, 100).is_none());
}

#[test]
fn test_huge_box_falls_back_without_overflow() {
    let sizes = [FrameSize::new(1000, 1000)];
    let json = r#"{"bounding_box":[{"top":9223372036854775807,"left":200,"height":9223372036854775807,"width":10}]}"#;
    let parsed = Manifest::from_json(json).unwrap();
    assert!(resolve_roi(Some(&parsed), &sizes, 100).is_none());

    let roi = RoiDescriptor {
        top: usize::MAX - 10,
        left: 200,
        height: 5,
        width: 10,
    };
    assert_eq!(roi.validate(&sizes, 100), Err(RoiRejection::Overflow));
}

#[test]
fn test_missing_or_degenerate_box_falls_back() {
    let sizes = [FrameSize::new(1000, 1000)];
    assert!(resolve_roi(None, &sizes, 100).is_none());
    assert!(resolve_roi(Some(&Manifest::default()), &sizes, 100).is_none());
    assert!(resolve_roi(Some(&manifest(200, 200, 0, 100)), &sizes, 100).is_none());
    assert!(resolve_roi(Some(&manifest(-5, 200, 100, 100)), &sizes, 100).is_none());

    let partial = Manifest {
        bounding_box: vec![BoundingBox {
            top: Some(200),
            left: Some(200),
            height: None,
            width: Some(100),
        }],
    };
    assert!(resolve_roi(Some(&partial), &sizes, 100).is_none());
}

#[test]
fn test_only_first_box_is_honored() {
    let mut m = manifest(10, 10, 10, 10);
    m.bounding_box.push(BoundingBox {
        top: Some(200),
        left: Some(200),
        height: Some(100),
        width: Some(100),
    });
    let sizes = [FrameSize::new(1000, 1000)];
    assert!(resolve_roi(Some(&m), &sizes, 100).is_none());
}

#[test]
fn test_manifest_from_json() {
    let json = r#"{"bounding_box": [{"top": 120, "left": 140, "height": 800, "width": 600}]}"#;
    let m = Manifest::from_json(json).unwrap();
    assert_eq!(m, manifest(120, 140, 800, 600));

    assert!(Manifest::from_json("not json").is_none());
    assert_eq!(Manifest::from_json("{}").unwrap().bounding_box.len(), 0);
}

#[test]
fn test_crop_frame_all_channels() {
    let data = Array3::from_shape_fn((3, 20, 30), |(c, r, col)| (c * 1000 + r * 30 + col) as f32);
    let frame = Frame::new(data, 16);
    let roi = RoiDescriptor {
        top: 5,
        left: 7,
        height: 4,
        width: 6,
    };
    let cropped = crop_frame(&frame, &roi);

    assert_eq!(cropped.channels(), 3);
    assert_eq!(cropped.size(), FrameSize::new(4, 6));
    for c in 0..3 {
        assert_eq!(cropped.data[[c, 0, 0]], frame.data[[c, 5, 7]]);
        assert_eq!(cropped.data[[c, 3, 5]], frame.data[[c, 8, 12]]);
    }
    assert_eq!(cropped.original_bit_depth, 16);
}

#[test]
fn test_effective_size() {
    let size = FrameSize::new(800, 900);
    assert_eq!(effective_size(size, None), size);
    let roi = RoiDescriptor {
        top: 100,
        left: 100,
        height: 300,
        width: 200,
    };
    assert_eq!(effective_size(size, Some(&roi)), FrameSize::new(300, 200));
}
