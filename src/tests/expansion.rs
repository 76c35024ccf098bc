use super::ExpansionState;
use crate::section::SectionId;

#[test]
fn test_seed_contains_only_root() {
    let state = ExpansionState::seed(SectionId::ROOT);

    assert_eq!(state.len(), 1);
    assert!(state.is_expanded(SectionId::ROOT));
    assert!(!state.is_expanded(SectionId(1)));
}

#[test]
fn test_toggle_is_its_own_inverse() {
    let seeded = ExpansionState::seed(SectionId::ROOT);

    let collapsed = seeded.toggle(SectionId::ROOT);
    assert!(!collapsed.is_expanded(SectionId::ROOT));
    assert!(collapsed.is_empty());

    assert_eq!(collapsed.toggle(SectionId::ROOT), seeded);
}

#[test]
fn test_toggle_leaves_original_snapshot_untouched() {
    let seeded = ExpansionState::seed(SectionId::ROOT);
    let toggled = seeded.toggle(SectionId(4));

    assert!(toggled.is_expanded(SectionId(4)));
    assert!(!seeded.is_expanded(SectionId(4)));
    assert_ne!(seeded, toggled);
}

#[test]
fn test_toggle_unknown_id_is_harmless() {
    // Ids are not checked against any tree.
    let state = ExpansionState::seed(SectionId::ROOT).toggle(SectionId(999));
    assert!(state.is_expanded(SectionId(999)));
    assert!(state.is_expanded(SectionId::ROOT));
}

#[test]
fn test_expand_and_collapse_are_idempotent() {
    let state = ExpansionState::seed(SectionId::ROOT);

    assert_eq!(state.expand(SectionId::ROOT), state);
    let expanded = state.expand(SectionId(2));
    assert_eq!(expanded.expand(SectionId(2)), expanded);

    let collapsed = expanded.collapse(SectionId(2));
    assert_eq!(collapsed, state);
    assert_eq!(collapsed.collapse(SectionId(2)), state);
}

#[test]
fn test_reseed_discards_previous_state() {
    let used = ExpansionState::seed(SectionId::ROOT)
        .toggle(SectionId(1))
        .toggle(SectionId(5))
        .toggle(SectionId::ROOT);

    let reseeded = ExpansionState::seed(SectionId::ROOT);
    assert!(!reseeded.is_expanded(SectionId(1)));
    assert!(!reseeded.is_expanded(SectionId(5)));
    assert_eq!(reseeded.len(), 1);
    assert_ne!(used, reseeded);
}
