/*!
 * Tests for application configuration
 */

use std::str::FromStr;

use anyhow::Result;
use lingodeck::app_config::{Config, TranslationProvider, DEFAULT_AUTH_FILE};
use lingodeck::errors::ConfigError;

use crate::common;

#[test]
fn test_default_config_shouldBeValid() {
    let config = Config::default();

    assert!(config.validate().is_ok());
    assert_eq!(config.source_language, "en");
    assert_eq!(config.translation.provider, TranslationProvider::DeepL);
    assert!(config.deck.bidirectional);
    assert_eq!(config.deck.output_dir, "Output");
    assert_eq!(config.translation.common.retry_count, 3);
}

#[test]
fn test_verification_language_withoutOverride_shouldFallBackToSource() {
    let mut config = Config::default();
    config.source_language = "de".to_string();
    assert_eq!(config.verification_language(), "de");

    config.verification_language = Some("fr".to_string());
    assert_eq!(config.verification_language(), "fr");
}

#[test]
fn test_validate_withInvalidLanguageCode_shouldFail() {
    let mut config = Config::default();
    config.target_language = "xx".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withRegionalTarget_shouldPass() {
    let mut config = Config::default();
    config.target_language = "pt-br".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withNonPositiveDeckId_shouldFail() {
    let mut config = Config::default();
    config.deck.deck_id = Some(0);
    assert!(config.validate().is_err());

    config.deck.deck_id = Some(-3);
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withSameAlternativeAndPrimary_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Google;
    config.translation.alternative_provider = Some(TranslationProvider::Google);
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroConcurrency_shouldFail() {
    let mut config = Config::default();
    config.translation.common.concurrent_requests = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_requires_auth_withGoogleOnly_shouldBeFalse() {
    let mut config = Config::default();
    assert!(config.requires_auth());

    config.translation.provider = TranslationProvider::Google;
    assert!(!config.requires_auth());

    config.translation.alternative_provider = Some(TranslationProvider::DeepL);
    assert!(config.requires_auth());
}

#[test]
fn test_get_endpoint_withDefaults_shouldUseProviderDefaults() {
    let config = Config::default();
    assert_eq!(config.translation.get_endpoint(&TranslationProvider::DeepL), "");
    assert_eq!(
        config.translation.get_endpoint(&TranslationProvider::Google),
        "https://translate.googleapis.com"
    );
}

#[test]
fn test_provider_from_str_shouldIgnoreCase() {
    assert_eq!(TranslationProvider::from_str("DeepL").unwrap(), TranslationProvider::DeepL);
    assert_eq!(TranslationProvider::from_str("google").unwrap(), TranslationProvider::Google);
    assert!(TranslationProvider::from_str("bing").is_err());
}

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.target_language, "el");
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.deck.output_dir, config.deck.output_dir);
    Ok(())
}

#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{
            "source_language": "de",
            "target_language": "es",
            "translation": { "provider": "google" }
        }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.common.concurrent_requests, 4);
    assert!(config.translation.common.cache_enabled);
    assert!(config.deck.bidirectional);
    assert_eq!(config.deck.deck_id, None);
    Ok(())
}

#[test]
fn test_load_auth_key_withExplicitFile_shouldTrimKey() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "key", "  abc:fx\n")?;

    let mut config = Config::default();
    config.auth_file = Some(path.to_string_lossy().to_string());

    assert_eq!(config.load_auth_key()?, "abc:fx");
    Ok(())
}

#[test]
fn test_load_auth_key_withEmptyFile_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "key", "\n")?;

    let mut config = Config::default();
    config.auth_file = Some(path.to_string_lossy().to_string());

    assert!(matches!(config.load_auth_key(), Err(ConfigError::MissingCredential { .. })));
    Ok(())
}

#[test]
fn test_load_auth_key_withMissingFile_shouldNameTheLocation() {
    let mut config = Config::default();
    config.auth_file = Some("/no/such/dir/deepl_key".to_string());

    let error = config.load_auth_key().unwrap_err();
    assert!(error.to_string().contains("/no/such/dir/deepl_key"));
}

#[test]
fn test_auth_file_candidates_withoutExplicitFile_shouldStartWithDefault() {
    let config = Config::default();
    let candidates = config.auth_file_candidates();
    assert_eq!(candidates[0].to_string_lossy(), DEFAULT_AUTH_FILE);
}
