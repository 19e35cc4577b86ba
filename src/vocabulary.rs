use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::VocabularyError;

// @module: Vocabulary file loading

// @const: Column separator of vocabulary files
const COLUMN_SEPARATOR: char = '\t';

// @const: Prefix of comment lines
const COMMENT_PREFIX: char = '#';

// @struct: Single vocabulary entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    // @field: Stable positive identifier, unique within the file
    pub id: u64,

    // @field: Phrase in the source language
    pub phrase: String,

    // @field: Anki tags, in file order
    pub tags: Vec<String>,
}

impl VocabularyEntry {
    pub fn new(id: u64, phrase: impl Into<String>, tags: Vec<String>) -> Self {
        VocabularyEntry {
            id,
            phrase: phrase.into(),
            tags,
        }
    }
}

impl fmt::Display for VocabularyEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.phrase)
    }
}

// @struct: Parsed vocabulary file
#[derive(Debug, Clone)]
pub struct Vocabulary {
    // @field: File the vocabulary was read from
    pub source_file: PathBuf,

    // @field: Entries in file order
    pub entries: Vec<VocabularyEntry>,

    // @field: Unmodified file content, copied into the archive
    pub raw_content: String,
}

impl Vocabulary {
    /// Read and parse a vocabulary file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let raw_content = fs::read_to_string(path).map_err(|e| VocabularyError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let entries = parse_vocabulary(&raw_content)?;
        debug!("Loaded {} vocabulary entries from {}", entries.len(), path.display());

        Ok(Vocabulary {
            source_file: path.to_path_buf(),
            entries,
            raw_content,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse tab-separated vocabulary content
///
/// Each non-empty line not starting with `#` holds `id<TAB>phrase[<TAB>tag]*`.
/// Entries are returned in file order.
pub fn parse_vocabulary(content: &str) -> Result<Vec<VocabularyEntry>, VocabularyError> {
    let mut entries = Vec::new();
    // id -> (line, phrase) of the first occurrence
    let mut seen: HashMap<u64, (usize, String)> = HashMap::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim_end();

        if line.trim().is_empty() || line.trim_start().starts_with(COMMENT_PREFIX) {
            continue;
        }

        let entry = parse_line(line, line_number)?;

        if let Some((first_line, first_phrase)) = seen.get(&entry.id) {
            return Err(VocabularyError::DuplicateId {
                id: entry.id,
                line: line_number,
                first_line: *first_line,
                first_phrase: first_phrase.clone(),
            });
        }
        seen.insert(entry.id, (line_number, entry.phrase.clone()));
        entries.push(entry);
    }

    Ok(entries)
}

// @parses: One non-comment line
fn parse_line(line: &str, line_number: usize) -> Result<VocabularyEntry, VocabularyError> {
    let columns: Vec<&str> = line.split(COLUMN_SEPARATOR).collect();
    if columns.len() < 2 {
        return Err(VocabularyError::MissingColumns {
            line: line_number,
            columns: columns.len(),
        });
    }

    let id_column = columns[0].trim();
    let id = match id_column.parse::<u64>() {
        Ok(id) if id > 0 => id,
        _ => {
            return Err(VocabularyError::InvalidId {
                line: line_number,
                value: id_column.to_string(),
            });
        }
    };

    let phrase = columns[1].trim();
    if phrase.is_empty() {
        return Err(VocabularyError::EmptyPhrase { line: line_number, id });
    }

    let mut tags = Vec::new();
    for column in &columns[2..] {
        let tag = column.trim();
        if tag.is_empty() {
            continue;
        }
        if tag.contains(char::is_whitespace) {
            return Err(VocabularyError::InvalidTag {
                line: line_number,
                id,
                tag: tag.to_string(),
            });
        }
        tags.push(tag.to_string());
    }

    Ok(VocabularyEntry::new(id, phrase, tags))
}
