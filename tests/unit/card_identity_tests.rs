/*!
 * Tests for stable note and card identifiers
 */

use std::collections::HashSet;

use lingodeck::deck::card::ID_MASK;
use lingodeck::deck::{card_id, note_guid, note_id};

#[test]
fn test_note_id_withSameInputs_shouldBeStable() {
    assert_eq!(note_id(42, 1), note_id(42, 1));
    assert_eq!(note_guid(42, 1), "42_1");
}

#[test]
fn test_note_id_withDifferentDecks_shouldDiffer() {
    assert_ne!(note_id(42, 1), note_id(43, 1));
    assert_ne!(note_id(42, 1), note_id(42, 2));
}

#[test]
fn test_note_id_shouldFitInFiftyTwoBits() {
    for entry_id in 1..500u64 {
        let id = note_id(7, entry_id);
        assert!(id > 0);
        assert!((id as u64) <= ID_MASK);
    }
}

#[test]
fn test_note_id_withManyEntries_shouldNotCollide() {
    let ids: HashSet<i64> = (1..5000u64).map(|entry_id| note_id(1, entry_id)).collect();
    assert_eq!(ids.len(), 4999);
}

#[test]
fn test_card_id_shouldDependOnTemplate() {
    let note = note_id(42, 1);
    assert_ne!(card_id(note, 0), card_id(note, 1));
    assert_eq!(card_id(note, 1), card_id(note, 1));
    assert_ne!(card_id(note, 0), note);
}
