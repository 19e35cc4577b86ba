/*!
 * Tests for vocabulary file loading
 */

use anyhow::Result;
use lingodeck::errors::VocabularyError;
use lingodeck::vocabulary::{parse_vocabulary, Vocabulary, VocabularyEntry};

use crate::common;

#[test]
fn test_parse_vocabulary_withWellFormedLines_shouldKeepFileOrder() {
    let content = "3\tthree\n1\tone\n2\ttwo\n";
    let entries = parse_vocabulary(content).unwrap();

    let ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(entries[1].phrase, "one");
}

#[test]
fn test_parse_vocabulary_withCommentsAndBlankLines_shouldYieldOneEntryPerPhraseLine() {
    let content = "# header\n1\tHello\n\n# section two\n2\tGoodbye\n   \n";
    let entries = parse_vocabulary(content).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], VocabularyEntry::new(1, "Hello", vec![]));
    assert_eq!(entries[1], VocabularyEntry::new(2, "Goodbye", vec![]));
}

#[test]
fn test_parse_vocabulary_withTags_shouldCollectRemainingColumns() {
    let entries = parse_vocabulary("7\tgood morning\tgreeting\tA1\t\n").unwrap();
    assert_eq!(entries[0].tags, vec!["greeting".to_string(), "A1".to_string()]);
}

#[test]
fn test_parse_vocabulary_withWindowsLineEndings_shouldTrimCarriageReturns() {
    let entries = parse_vocabulary("1\tHello\tgreeting\r\n2\tGoodbye\r\n").unwrap();
    assert_eq!(entries[0].tags, vec!["greeting".to_string()]);
    assert_eq!(entries[1].phrase, "Goodbye");
}

#[test]
fn test_parse_vocabulary_withDuplicateId_shouldNameTheId() {
    let result = parse_vocabulary("1\tHello\n2\tGoodbye\n1\tHi\n");

    let error = result.unwrap_err();
    assert_eq!(
        error,
        VocabularyError::DuplicateId {
            id: 1,
            line: 3,
            first_line: 1,
            first_phrase: "Hello".to_string(),
        }
    );
    assert_eq!(error.entry_id(), Some(1));
    assert!(error.to_string().contains("id 1"));
}

#[test]
fn test_parse_vocabulary_withSingleColumn_shouldFail() {
    let error = parse_vocabulary("1\tHello\n2 Goodbye\n").unwrap_err();
    assert_eq!(error, VocabularyError::MissingColumns { line: 2, columns: 1 });
}

#[test]
fn test_parse_vocabulary_withNonIntegerId_shouldFail() {
    let error = parse_vocabulary("one\tHello\n").unwrap_err();
    assert_eq!(
        error,
        VocabularyError::InvalidId {
            line: 1,
            value: "one".to_string()
        }
    );
}

#[test]
fn test_parse_vocabulary_withZeroOrNegativeId_shouldFail() {
    assert!(matches!(parse_vocabulary("0\tHello\n"), Err(VocabularyError::InvalidId { .. })));
    assert!(matches!(parse_vocabulary("-4\tHello\n"), Err(VocabularyError::InvalidId { .. })));
}

#[test]
fn test_parse_vocabulary_withEmptyPhrase_shouldFail() {
    let error = parse_vocabulary("5\t  \ttag\n").unwrap_err();
    assert_eq!(error, VocabularyError::EmptyPhrase { line: 1, id: 5 });
}

#[test]
fn test_parse_vocabulary_withSpaceInTag_shouldFail() {
    let error = parse_vocabulary("5\tHello\tbad tag\n").unwrap_err();
    assert_eq!(
        error,
        VocabularyError::InvalidTag {
            line: 1,
            id: 5,
            tag: "bad tag".to_string()
        }
    );
}

#[test]
fn test_parse_vocabulary_withOnlyComments_shouldBeEmpty() {
    assert!(parse_vocabulary("# nothing here\n").unwrap().is_empty());
}

#[test]
fn test_load_withFile_shouldKeepRawContent() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_vocabulary(dir.path())?;

    let vocabulary = Vocabulary::load(&path)?;

    assert_eq!(vocabulary.len(), 2);
    assert_eq!(vocabulary.raw_content, common::HELLO_GOODBYE_VOCAB);
    assert_eq!(vocabulary.source_file, path);
    Ok(())
}

#[test]
fn test_load_withMissingFile_shouldReturnUnreadable() {
    let result = Vocabulary::load("/definitely/not/here.tsv");
    assert!(matches!(result, Err(VocabularyError::Unreadable { .. })));
}
