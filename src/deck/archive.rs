/*!
 * Plain deck archive for consumers other than Anki.
 *
 * Contents:
 * - `data.json`: one record per card, with the audio file names
 * - `info.json`: deck metadata
 * - `vocab.csv`: the input vocabulary, unchanged
 * - one MP3 per audio payload
 */

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::deck::card::{Card, Deck};
use crate::errors::DeckError;

/// Card record of `data.json`
#[derive(Debug, Serialize, PartialEq)]
pub struct CardRecord {
    pub id: u64,
    pub note_id: i64,
    pub guid: String,
    pub source: String,
    pub target: String,
    pub verification: String,
    pub tags: Vec<String>,
    pub audio: Option<String>,
    pub source_audio: Option<String>,
}

impl From<&Card> for CardRecord {
    fn from(card: &Card) -> Self {
        Self {
            id: card.entry_id,
            note_id: card.note_id,
            guid: card.guid.clone(),
            source: card.source_phrase.clone(),
            target: card.translated_phrase.clone(),
            verification: card.verification_phrase.clone(),
            tags: card.tags.clone(),
            audio: card.target_audio_file(),
            source_audio: card.source_audio_file(),
        }
    }
}

/// Deck metadata of `info.json`
#[derive(Debug, Serialize, PartialEq)]
pub struct DeckInfo {
    pub deck_id: i64,
    pub deck_name: String,
    pub description: String,
    pub source_language: String,
    pub target_language: String,
    pub verification_language: String,
    pub bidirectional: bool,
    pub card_count: usize,
}

impl From<&Deck> for DeckInfo {
    fn from(deck: &Deck) -> Self {
        Self {
            deck_id: deck.deck_id,
            deck_name: deck.name.clone(),
            description: deck.description.clone(),
            source_language: deck.languages.source_language.clone(),
            target_language: deck.languages.target_language.clone(),
            verification_language: deck.languages.verification_language.clone(),
            bidirectional: deck.bidirectional,
            card_count: deck.cards.len(),
        }
    }
}

/// Write the archive of `deck` to `path`
pub fn write_archive(path: &Path, deck: &Deck, vocabulary: &str) -> Result<(), DeckError> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let records: Vec<CardRecord> = deck.cards.iter().map(CardRecord::from).collect();
    zip.start_file("data.json", deflated)?;
    zip.write_all(serde_json::to_string_pretty(&records)?.as_bytes())?;

    zip.start_file("info.json", deflated)?;
    zip.write_all(serde_json::to_string_pretty(&DeckInfo::from(deck))?.as_bytes())?;

    zip.start_file("vocab.csv", deflated)?;
    zip.write_all(vocabulary.as_bytes())?;

    for card in &deck.cards {
        for (name, audio) in card.media() {
            zip.start_file(name, stored)?;
            zip.write_all(audio)?;
        }
    }

    zip.finish()?;
    Ok(())
}
