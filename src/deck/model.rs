/*!
 * Anki note type (model) of a translated vocabulary deck.
 *
 * One note per vocabulary entry with the fields
 * `[source, target, verification, SoundFile, SourceSoundFile]`, rendered by a
 * forward template and, for bidirectional decks, a reverse template.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use crate::deck::card::Card;
use crate::language_resolver::LanguageConfig;

// @const: Separator between note fields in the collection
pub const FIELD_SEPARATOR: char = '\x1f';

// @const: Field name of the target audio
pub const SOUND_FIELD: &str = "SoundFile";

// @const: Field name of the source audio
pub const SOURCE_SOUND_FIELD: &str = "SourceSoundFile";

// @const: Card styling shared by all templates
pub const CARD_CSS: &str = ".card {\n font-family: arial;\n font-size: 24px;\n text-align: center;\n color: black;\n background-color: white;\n}\n";

// @const: Field references inside a template
static FIELD_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([^}#/^]+)\}\}").expect("field reference pattern is valid")
});

// @const: HTML tags, removed from the sort field
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("html tag pattern is valid"));

/// Card template
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub question: String,
    pub answer: String,
}

/// Note type of one deck
#[derive(Debug, Clone, PartialEq)]
pub struct NoteModel {
    /// Model id, equal to the deck id so every deck has its own model
    pub id: i64,
    pub name: String,
    pub fields: Vec<String>,
    pub templates: Vec<Template>,
    pub css: String,
}

impl NoteModel {
    pub fn new(deck_id: i64, languages: &LanguageConfig, bidirectional: bool) -> Self {
        let source = field_name(&languages.source_name);
        let target = field_name(&languages.target_name);
        let verification = field_name(&format!("{} (back-translation)", languages.verification_name));

        let mut templates = vec![Template {
            name: format!("{} -> {}", source, target),
            question: format!("{{{{{}}}}}<br/>({{{{{}}}}})", source, verification),
            answer: format!(
                "{{{{FrontSide}}}}<hr id=\"answer\">{{{{{}}}}}<br/>{{{{{}}}}}",
                target, SOUND_FIELD
            ),
        }];

        if bidirectional {
            templates.push(Template {
                name: format!("{} -> {}", target, source),
                question: format!("{{{{{}}}}}<br/>{{{{{}}}}}", target, SOUND_FIELD),
                answer: format!(
                    "{{{{FrontSide}}}}<hr id=\"answer\">{{{{{}}}}}<br/>({{{{{}}}}})<br/>{{{{{}}}}}",
                    source, verification, SOURCE_SOUND_FIELD
                ),
            });
        }

        Self {
            id: deck_id,
            name: format!(
                "{}<->{} Translated Vocab Flashcards",
                languages.source_name, languages.target_name
            ),
            fields: vec![
                source,
                target,
                verification,
                SOUND_FIELD.to_string(),
                SOURCE_SOUND_FIELD.to_string(),
            ],
            templates,
            css: CARD_CSS.to_string(),
        }
    }

    /// Field values of a card's note, in field order
    pub fn note_fields(&self, card: &Card) -> Vec<String> {
        let sound = |name: Option<String>| name.map(|n| format!("[sound:{}]", n)).unwrap_or_default();
        vec![
            card.source_phrase.clone(),
            card.translated_phrase.clone(),
            card.verification_phrase.clone(),
            sound(card.target_audio_file()),
            sound(card.source_audio_file()),
        ]
    }

    /// Fields joined with the collection separator
    pub fn joined_fields(&self, card: &Card) -> String {
        self.note_fields(card).join(&FIELD_SEPARATOR.to_string())
    }

    /// Indices of the fields a template's question refers to
    pub fn required_fields(&self, template: &Template) -> Vec<usize> {
        let mut required: Vec<usize> = FIELD_REFERENCE
            .captures_iter(&template.question)
            .filter_map(|c| c.get(1))
            .filter_map(|name| self.fields.iter().position(|f| f == name.as_str().trim()))
            .collect();
        required.sort_unstable();
        required.dedup();
        required
    }

    /// Model entry of the collection's `models` JSON
    pub fn to_json(&self, deck_id: i64, modified: i64) -> Value {
        let fields: Vec<Value> = self
            .fields
            .iter()
            .enumerate()
            .map(|(ord, name)| {
                json!({
                    "name": name,
                    "ord": ord,
                    "font": "Arial",
                    "media": [],
                    "rtl": false,
                    "size": 20,
                    "sticky": false,
                })
            })
            .collect();

        let templates: Vec<Value> = self
            .templates
            .iter()
            .enumerate()
            .map(|(ord, t)| {
                json!({
                    "name": t.name,
                    "ord": ord,
                    "qfmt": t.question,
                    "afmt": t.answer,
                    "bqfmt": "",
                    "bafmt": "",
                    "did": null,
                    "bfont": "",
                    "bsize": 0,
                })
            })
            .collect();

        let requirements: Vec<Value> = self
            .templates
            .iter()
            .enumerate()
            .map(|(ord, t)| json!([ord, "any", self.required_fields(t)]))
            .collect();

        json!({
            "id": self.id,
            "name": self.name,
            "type": 0,
            "mod": modified,
            "usn": -1,
            "sortf": 0,
            "did": deck_id,
            "tmpls": templates,
            "flds": fields,
            "css": self.css,
            "latexPre": "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n",
            "latexPost": "\\end{document}",
            "tags": [],
            "vers": [],
            "req": requirements,
        })
    }
}

/// Field names may not contain characters used by the template syntax
fn field_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ':' | '{' | '}' | '"' | '#' | '/' | '^'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Sort field text: HTML removed and whitespace trimmed
pub fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").trim().to_string()
}

/// Anki checksum of a note: first 8 hex digits of SHA-1 of the stripped sort field
pub fn field_checksum(sort_field: &str) -> i64 {
    use sha1::{Digest, Sha1};

    let digest = Sha1::digest(strip_html(sort_field).as_bytes());
    let mut prefix = [0u8; 4];
    prefix.copy_from_slice(&digest[..4]);
    u32::from_be_bytes(prefix) as i64
}
