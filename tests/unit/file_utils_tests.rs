/*!
 * Tests for file utility functions
 */

use std::fs;

use anyhow::Result;
use lingodeck::deck::{BuildStage, EntryFailure};
use lingodeck::file_utils::{FileManager, FAILURE_LOG_FILE};

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "vocab.tsv", "1\tHello\n")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tsv"));
}

#[test]
fn test_ensure_dir_withNestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;
    assert!(nested.is_dir());

    // Idempotent
    FileManager::ensure_dir(&nested)?;
    Ok(())
}

#[test]
fn test_ensure_dir_withExistingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "Output", "")?;

    assert!(FileManager::ensure_dir(&file).is_err());
    Ok(())
}

#[test]
fn test_deck_file_stem_shouldReplaceUnsafeCharacters() {
    assert_eq!(FileManager::deck_file_stem("en", "el", 42), "en_el_42");
    assert_eq!(FileManager::deck_file_stem("en", "pt-br", 7), "en_pt-br_7");
    assert_eq!(FileManager::deck_file_stem("en", "../x", 7), "en____x_7");
}

#[test]
fn test_write_to_file_shouldCreateParentDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("out.txt");

    FileManager::write_to_file(&path, "content")?;

    assert_eq!(FileManager::read_to_string(&path)?, "content");
    Ok(())
}

/// Test that failure logs list every failed entry and append across runs
#[test]
fn test_write_failure_log_shouldAppendEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let failures = vec![EntryFailure {
        entry_id: 3,
        phrase: "phrase 3".to_string(),
        stage: BuildStage::TargetAudio,
        message: "Connection error: reset".to_string(),
    }];

    let path = FileManager::write_failure_log(temp_dir.path(), 42, &failures)?;
    FileManager::write_failure_log(temp_dir.path(), 42, &failures)?;

    assert_eq!(path, temp_dir.path().join(FAILURE_LOG_FILE));
    let content = fs::read_to_string(&path)?;
    assert_eq!(content.matches("Deck 42: 1 entries failed").count(), 2);
    assert!(content.contains("3\tphrase 3\ttarget audio\tConnection error: reset"));
    Ok(())
}
