/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use lingodeck::app_config::{Config, TranslationProvider};
use lingodeck::app_controller::Controller;
use lingodeck::providers::mock::{MockSpeech, MockTranslator};

use crate::common;

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    assert_eq!(controller.config().target_language, "el");
    Ok(())
}

/// Test that invalid configuration is rejected before any work starts
#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.source_language = "xx".to_string();
    assert!(Controller::with_config(config).is_err());
}

/// Test that a missing deck id stops the run before the vocabulary is read
#[test]
fn test_run_withoutDeckId_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let vocab = common::create_test_vocabulary(temp_dir.path())?;
    let translator = MockTranslator::working();
    let speech = MockSpeech::working();

    let mut config = common::test_config(temp_dir.path(), 42, true);
    config.deck.deck_id = None;
    let controller = Controller::with_config(config)?.with_progress(false);

    let result = tokio_test::block_on(async {
        controller
            .run_with_backends(&vocab, common::mock_backends(&translator, &speech))
            .await
    });

    assert!(result.is_err());
    assert_eq!(translator.listing_count(), 0);
    Ok(())
}

/// Test that an empty vocabulary file is an error
#[test]
fn test_run_withEmptyVocabulary_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let vocab = common::create_test_file(temp_dir.path(), "empty.tsv", "# only a comment\n")?;
    let translator = MockTranslator::working();
    let speech = MockSpeech::working();

    let controller = Controller::with_config(common::test_config(temp_dir.path(), 42, true))?.with_progress(false);
    let result = tokio_test::block_on(async {
        controller
            .run_with_backends(&vocab, common::mock_backends(&translator, &speech))
            .await
    });

    assert!(result.unwrap_err().to_string().contains("no entries"));
    Ok(())
}

/// Test the language listing of the configured back-ends
#[test]
fn test_describe_languages_withMocks_shouldListEveryBackend() -> Result<()> {
    let translator = MockTranslator::working();
    let speech = MockSpeech::working();
    let controller = Controller::with_config(Config::default())?;

    let listing = tokio_test::block_on(controller.describe_languages(&common::mock_backends(&translator, &speech)))?;

    assert!(listing.contains("Mock source languages:\n    de: German"));
    assert!(listing.contains("Mock target languages:"));
    assert!(listing.contains("Mock TTS languages:\n    de: German"));
    Ok(())
}

/// Test that Google-only configurations need no credential file
#[test]
fn test_create_backends_withGoogle_shouldNotReadCredentials() -> Result<()> {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Google;
    config.auth_file = Some("/no/such/dir/deepl_key".to_string());

    let backends = Controller::with_config(config)?.create_backends()?;

    assert_eq!(backends.translator.name(), "Google Translate");
    assert!(backends.alternative.is_none());
    Ok(())
}

/// Test that a missing DeepL key is fatal at startup
#[test]
fn test_create_backends_withDeepLAndMissingKey_shouldFail() -> Result<()> {
    let mut config = Config::default();
    config.auth_file = Some("/no/such/dir/deepl_key".to_string());

    let result = Controller::with_config(config)?.create_backends();

    assert!(result.is_err());
    Ok(())
}
