use std::path::PathBuf;

use plexalign_core::error::RegistrationError;
use plexalign_core::frame::FrameSize;
use plexalign_core::io::filename::decode_filename;
use plexalign_core::rounds::{group_rounds, FrameEntry};

fn entry(name: &str) -> FrameEntry {
    FrameEntry::new(
        decode_filename(name).unwrap(),
        PathBuf::from(name),
        FrameSize::new(32, 32),
    )
}

#[test]
fn test_group_by_round_with_single_reference() {
    let entries = vec![
        entry("s.2.CD3.tif"),
        entry("s.1.DAPI.tif"),
        entry("s.2.DAPI.tif"),
        entry("s.1.CD8.tif"),
        entry("s.1.CD20.tif"),
    ];
    let grouping = group_rounds(entries, "DAPI");

    assert_eq!(grouping.round_ids(), vec![1, 2]);
    assert!(grouping.rejected.is_empty());

    let round1 = grouping.round(1).unwrap();
    assert_eq!(round1.reference.file_name(), "s.1.DAPI.tif");
    let markers: Vec<&str> = round1.markers.iter().map(|f| f.file_name()).collect();
    assert_eq!(markers, vec!["s.1.CD20.tif", "s.1.CD8.tif"]);
    assert_eq!(round1.frame_count(), 3);

    let frames: Vec<&str> = round1.frames().map(|f| f.file_name()).collect();
    assert_eq!(frames[0], "s.1.DAPI.tif");
}

#[test]
fn test_round_without_reference_is_rejected() {
    let entries = vec![
        entry("s.1.DAPI.tif"),
        entry("s.2.CD3.tif"),
        entry("s.3.DAPI.tif"),
    ];
    let grouping = group_rounds(entries, "DAPI");

    assert_eq!(grouping.round_ids(), vec![1, 3]);
    assert_eq!(grouping.rejected.len(), 1);
    let rejected = &grouping.rejected[0];
    assert_eq!(rejected.id, 2);
    assert_eq!(rejected.reference_count, 0);
    assert_eq!(rejected.frames.len(), 1);
    assert!(matches!(
        rejected.error(),
        RegistrationError::RoundIntegrity {
            round: 2,
            reference_count: 0
        }
    ));
}

#[test]
fn test_round_with_two_references_is_rejected() {
    let entries = vec![
        entry("a.1.DAPI.tif"),
        entry("b.1.dapi.tif"),
        entry("a.1.CD3.tif"),
        entry("a.2.DAPI.tif"),
    ];
    let grouping = group_rounds(entries, "DAPI");

    assert_eq!(grouping.round_ids(), vec![2]);
    let rejected = &grouping.rejected[0];
    assert_eq!(rejected.reference_count, 2);
    assert_eq!(rejected.frames.len(), 3);
    assert_eq!(grouping.all_frames().count(), 4);
}

#[test]
fn test_custom_reference_marker() {
    let entries = vec![entry("s.1.Hoechst.tif"), entry("s.1.DAPI.tif")];
    let grouping = group_rounds(entries, "hoechst");
    let round = grouping.round(1).unwrap();
    assert_eq!(round.reference.name.marker, "Hoechst");
    assert_eq!(round.markers[0].name.marker, "DAPI");
}
