use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::deck::EntryFailure;

// @module: File and directory utilities

// @const: Failure log written next to the outputs
pub const FAILURE_LOG_FILE: &str = "lingodeck.failures.log";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        if !path.is_dir() {
            return Err(anyhow::anyhow!("Output path is not a directory: {:?}", path));
        }
        Ok(())
    }

    // @generates: Output file stem of a deck
    // @params: source_language, target_language, deck_id
    pub fn deck_file_stem(source_language: &str, target_language: &str, deck_id: i64) -> String {
        format!(
            "{}_{}_{}",
            sanitize_component(source_language),
            sanitize_component(target_language),
            deck_id
        )
    }

    // @generates: Failure log path inside the output directory
    pub fn failure_log_path<P: AsRef<Path>>(output_dir: P) -> PathBuf {
        output_dir.as_ref().join(FAILURE_LOG_FILE)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        // Open file in append mode, create if it doesn't exist
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Append the failed entries of a run to the failure log
    pub fn write_failure_log<P: AsRef<Path>>(
        output_dir: P,
        deck_id: i64,
        failures: &[EntryFailure],
    ) -> Result<PathBuf> {
        let path = Self::failure_log_path(output_dir);

        let mut content = format!("Deck {}: {} entries failed", deck_id, failures.len());
        for failure in failures {
            content.push_str(&format!(
                "\n    {}\t{}\t{}\t{}",
                failure.entry_id, failure.phrase, failure.stage, failure.message
            ));
        }

        Self::append_to_log_file(&path, &content)?;
        Ok(path)
    }
}

/// Keep file names portable
fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
