use plexalign_core::error::RegistrationError;
use plexalign_core::pipeline::config::AnchorSelection;
use plexalign_core::pipeline::select_anchor;

#[test]
fn test_lowest_and_highest() {
    let ids = [4, 2, 7, 3];
    assert_eq!(select_anchor(&ids, &AnchorSelection::Lowest).unwrap(), 2);
    assert_eq!(select_anchor(&ids, &AnchorSelection::Highest).unwrap(), 7);
}

#[test]
fn test_explicit_round() {
    let ids = [1, 2, 3];
    assert_eq!(select_anchor(&ids, &AnchorSelection::Round(2)).unwrap(), 2);
    let err = select_anchor(&ids, &AnchorSelection::Round(9)).unwrap_err();
    assert!(matches!(err, RegistrationError::AnchorUnavailable { round: 9 }));
}

#[test]
fn test_seeded_random_is_reproducible() {
    let ids: Vec<u32> = (1..=20).collect();
    let selection = AnchorSelection::Random { seed: Some(42) };
    let first = select_anchor(&ids, &selection).unwrap();
    for _ in 0..5 {
        assert_eq!(select_anchor(&ids, &selection).unwrap(), first);
    }
    assert!(ids.contains(&first));
}

#[test]
fn test_seeded_random_ignores_input_order() {
    let ascending: Vec<u32> = (1..=10).collect();
    let descending: Vec<u32> = (1..=10).rev().collect();
    let selection = AnchorSelection::Random { seed: Some(7) };
    assert_eq!(
        select_anchor(&ascending, &selection).unwrap(),
        select_anchor(&descending, &selection).unwrap()
    );
}

#[test]
fn test_unseeded_random_picks_a_member() {
    let ids = [5, 6, 9];
    let anchor = select_anchor(&ids, &AnchorSelection::Random { seed: None }).unwrap();
    assert!(ids.contains(&anchor));
}

#[test]
fn test_empty_ids() {
    let err = select_anchor(&[], &AnchorSelection::Lowest).unwrap_err();
    assert!(matches!(err, RegistrationError::InsufficientRounds { found: 0 }));
}
