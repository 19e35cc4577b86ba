/*!
 * Tests for the Anki note type
 */

use bytes::Bytes;
use lingodeck::deck::model::{field_checksum, strip_html, FIELD_SEPARATOR};
use lingodeck::deck::{note_guid, note_id, Card, Deck, NoteModel};

use crate::common;

fn sample_card(with_source_audio: bool) -> Card {
    Card {
        entry_id: 1,
        source_phrase: "Hello".to_string(),
        translated_phrase: "Γεια σου".to_string(),
        verification_phrase: "Hello".to_string(),
        target_audio: Some(Bytes::from_static(b"ID3 target")),
        source_audio: with_source_audio.then(|| Bytes::from_static(b"ID3 source")),
        tags: vec!["greeting".to_string()],
        note_id: note_id(42, 1),
        guid: note_guid(42, 1),
    }
}

#[test]
fn test_new_withBidirectional_shouldHaveTwoTemplates() {
    let model = NoteModel::new(42, &common::english_greek(), true);

    assert_eq!(model.id, 42);
    assert_eq!(model.name, "English<->Greek Translated Vocab Flashcards");
    assert_eq!(
        model.fields,
        vec!["English", "Greek", "English (back-translation)", "SoundFile", "SourceSoundFile"]
    );
    assert_eq!(model.templates.len(), 2);
    assert_eq!(model.templates[0].question, "{{English}}<br/>({{English (back-translation)}})");
    assert_eq!(
        model.templates[0].answer,
        "{{FrontSide}}<hr id=\"answer\">{{Greek}}<br/>{{SoundFile}}"
    );
    assert_eq!(model.templates[1].question, "{{Greek}}<br/>{{SoundFile}}");
}

#[test]
fn test_new_withoutBidirectional_shouldHaveForwardTemplateOnly() {
    let model = NoteModel::new(42, &common::english_greek(), false);
    assert_eq!(model.templates.len(), 1);
    assert_eq!(model.templates[0].name, "English -> Greek");
}

#[test]
fn test_required_fields_shouldFollowQuestionReferences() {
    let model = NoteModel::new(42, &common::english_greek(), true);

    assert_eq!(model.required_fields(&model.templates[0]), vec![0, 2]);
    assert_eq!(model.required_fields(&model.templates[1]), vec![1, 3]);

    let json = model.to_json(42, 1_700_000_000);
    assert_eq!(json["req"][1], serde_json::json!([1, "any", [1, 3]]));
    assert_eq!(json["did"], 42);
}

#[test]
fn test_new_withTemplateCharactersInNames_shouldSanitizeFields() {
    let mut languages = common::english_greek();
    languages.target_name = "Greek {modern}: \"el\"".to_string();

    let model = NoteModel::new(42, &languages, true);

    assert_eq!(model.fields[1], "Greek modern el");
}

#[test]
fn test_note_fields_shouldReferenceSoundFiles() {
    let model = NoteModel::new(42, &common::english_greek(), true);

    let fields = model.note_fields(&sample_card(true));
    assert_eq!(fields[3], "[sound:1.mp3]");
    assert_eq!(fields[4], "[sound:1_source.mp3]");

    let fields = model.note_fields(&sample_card(false));
    assert_eq!(fields[4], "");

    let joined = model.joined_fields(&sample_card(false));
    assert_eq!(joined.split(FIELD_SEPARATOR).count(), 5);
    assert!(joined.starts_with("Hello\u{1f}Γεια σου\u{1f}"));
}

#[test]
fn test_strip_html_shouldRemoveTags() {
    assert_eq!(strip_html(" <b>Hello</b><br/> "), "Hello");
    assert_eq!(strip_html("plain"), "plain");
}

#[test]
fn test_field_checksum_shouldIgnoreHtml() {
    assert_eq!(field_checksum("<i>Hello</i>"), field_checksum("Hello"));
    assert_ne!(field_checksum("Hello"), field_checksum("Goodbye"));
    // First 8 hex digits of sha1("Hello"), f7ff9e8b...
    assert_eq!(field_checksum("Hello"), 0xf7ff9e8b);
}

#[test]
fn test_card_media_shouldListTargetThenSource() {
    let card = sample_card(true);
    let names: Vec<String> = card.media().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["1.mp3", "1_source.mp3"]);
}

#[test]
fn test_deck_describe_shouldNameProviders() {
    let languages = common::english_greek();
    assert_eq!(Deck::default_name(&languages), "Translated Greek vocabulary");
    assert_eq!(
        Deck::describe(&languages, &["DeepL", "Google Translate"]),
        "Automatically translated English <-> Greek vocabulary using DeepL and Google Translate."
    );
    assert_eq!(
        Deck::describe(&languages, &["DeepL"]),
        "Automatically translated English <-> Greek vocabulary using DeepL."
    );
}
