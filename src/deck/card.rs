/*!
 * Card records and their stable identifiers.
 *
 * Anki deduplicates imports by note GUID and id. Both are pure functions of
 * `(deck_id, entry_id)`, so regenerating a deck updates existing notes
 * instead of adding duplicates.
 */

use bytes::Bytes;
use sha2::{Digest, Sha256};

use crate::language_resolver::LanguageConfig;

// @const: Ids fit in 52 bits so they survive a round trip through JSON doubles
pub const ID_MASK: u64 = (1 << 52) - 1;

/// Note GUID of a vocabulary entry
pub fn note_guid(deck_id: i64, entry_id: u64) -> String {
    format!("{}_{}", deck_id, entry_id)
}

/// Integer note id of a vocabulary entry
pub fn note_id(deck_id: i64, entry_id: u64) -> i64 {
    hash_to_id(note_guid(deck_id, entry_id).as_bytes())
}

/// Integer card id of template `ord` of a note
pub fn card_id(note_id: i64, ord: u32) -> i64 {
    hash_to_id(format!("{}_{}", note_id, ord).as_bytes())
}

/// First 8 bytes of SHA-256, masked to a positive non-zero 52-bit integer
fn hash_to_id(data: &[u8]) -> i64 {
    let digest = Sha256::digest(data);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let id = u64::from_be_bytes(prefix) & ID_MASK;
    id.max(1) as i64
}

// @struct: One vocabulary entry with its translation, verification and audio
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    // @field: Vocabulary id
    pub entry_id: u64,

    // @field: Phrase in the source language
    pub source_phrase: String,

    // @field: Phrase in the target language
    pub translated_phrase: String,

    // @field: Back-translation into the verification language
    pub verification_phrase: String,

    // @field: MP3 of the translated phrase
    pub target_audio: Option<Bytes>,

    // @field: MP3 of the source phrase, bidirectional decks only
    pub source_audio: Option<Bytes>,

    // @field: Anki tags
    pub tags: Vec<String>,

    // @field: Stable note id
    pub note_id: i64,

    // @field: Stable note GUID
    pub guid: String,
}

impl Card {
    /// Media file name of the target audio
    pub fn target_audio_file(&self) -> Option<String> {
        self.target_audio.as_ref().map(|_| format!("{}.mp3", self.entry_id))
    }

    /// Media file name of the source audio
    pub fn source_audio_file(&self) -> Option<String> {
        self.source_audio.as_ref().map(|_| format!("{}_source.mp3", self.entry_id))
    }

    /// Media files of this card, name and content
    pub fn media(&self) -> Vec<(String, &Bytes)> {
        let mut media = Vec::new();
        if let (Some(name), Some(audio)) = (self.target_audio_file(), &self.target_audio) {
            media.push((name, audio));
        }
        if let (Some(name), Some(audio)) = (self.source_audio_file(), &self.source_audio) {
            media.push((name, audio));
        }
        media
    }
}

/// Complete set of cards of one run
#[derive(Debug, Clone)]
pub struct Deck {
    /// Caller supplied id, stable across regenerations
    pub deck_id: i64,
    pub name: String,
    pub description: String,
    pub languages: LanguageConfig,
    /// Cards in vocabulary file order
    pub cards: Vec<Card>,
    /// Whether reverse cards are generated
    pub bidirectional: bool,
}

impl Deck {
    /// Default deck name for a target language
    pub fn default_name(languages: &LanguageConfig) -> String {
        format!("Translated {} vocabulary", languages.target_name)
    }

    /// Deck description naming the providers used
    pub fn describe(languages: &LanguageConfig, providers: &[&str]) -> String {
        let providers = match providers {
            [] => "machine translation".to_string(),
            [only] => only.to_string(),
            [rest @ .., last] => format!("{} and {}", rest.join(", "), last),
        };
        format!(
            "Automatically translated {} <-> {} vocabulary using {}.",
            languages.source_name, languages.target_name, providers
        )
    }
}
