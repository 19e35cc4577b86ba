/*!
 * Common test utilities for the lingodeck test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use lingodeck::app_config::Config;
use lingodeck::app_controller::Backends;
use lingodeck::language_resolver::LanguageConfig;
use lingodeck::providers::mock::{MockSpeech, MockTranslator};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Vocabulary with the two phrases of the reference scenario
pub const HELLO_GOODBYE_VOCAB: &str = "# id\tphrase\ttags\n1\tHello\tgreeting\n2\tGoodbye\tgreeting\tfarewell\n";

/// Creates the reference vocabulary file
pub fn create_test_vocabulary(dir: &Path) -> Result<PathBuf> {
    create_test_file(dir, "vocab.tsv", HELLO_GOODBYE_VOCAB)
}

/// Creates a vocabulary file with `count` numbered phrases
pub fn create_numbered_vocabulary(dir: &Path, count: u64) -> Result<PathBuf> {
    let content: String = (1..=count).map(|i| format!("{}\tphrase {}\n", i, i)).collect();
    create_test_file(dir, "numbered.tsv", &content)
}

/// English -> Greek languages with English verification
pub fn english_greek() -> LanguageConfig {
    LanguageConfig {
        source_language: "en".to_string(),
        target_language: "el".to_string(),
        verification_language: "en".to_string(),
        source_name: "English".to_string(),
        target_name: "Greek".to_string(),
        verification_name: "English".to_string(),
    }
}

/// Configuration writing into `output_dir`, without retries or waiting
pub fn test_config(output_dir: &Path, deck_id: i64, bidirectional: bool) -> Config {
    let mut config = Config::default();
    config.source_language = "en".to_string();
    config.target_language = "el".to_string();
    config.verification_language = Some("en".to_string());
    config.deck.deck_id = Some(deck_id);
    config.deck.bidirectional = bidirectional;
    config.deck.output_dir = output_dir.to_string_lossy().to_string();
    config.translation.common.retry_count = 0;
    config.translation.common.retry_backoff_ms = 0;
    config
}

/// Back-ends made of mocks
pub fn mock_backends(translator: &MockTranslator, speech: &MockSpeech) -> Backends {
    Backends {
        translator: Arc::new(translator.clone()),
        alternative: None,
        speech: Arc::new(speech.clone()),
    }
}
