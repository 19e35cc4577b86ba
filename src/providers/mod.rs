/*!
 * Provider implementations for the external translation and speech services.
 *
 * This module contains client implementations for the supported back-ends:
 * - DeepL: DeepL API (requires an authentication key)
 * - Google: Google Translate web endpoint
 * - gTTS: Google text-to-speech web endpoint
 * - Mock: in-process providers used by the test suite
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, TranslationProvider};
use crate::errors::ProviderError;
use crate::language_utils;

pub mod deepl;
pub mod google;
pub mod gtts;
pub mod mock;
pub mod retry;

pub use self::retry::RetryPolicy;

/// Supported language codes mapped to their display names
pub type LanguageListing = BTreeMap<String, String>;

/// Languages a translator accepts as input and produces as output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupportedLanguages {
    /// Codes accepted as source language
    pub sources: LanguageListing,

    /// Codes accepted as target language
    pub targets: LanguageListing,
}

impl SupportedLanguages {
    /// Same listing for both directions
    pub fn symmetric(languages: LanguageListing) -> Self {
        Self {
            sources: languages.clone(),
            targets: languages,
        }
    }
}

/// Common trait for all translation back-ends
///
/// Implementations are selected once at startup and shared behind an `Arc`,
/// allowing them to be used interchangeably by the card builder.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Human readable provider name
    fn name(&self) -> &str;

    /// Query the languages this provider supports
    async fn supported_languages(&self) -> Result<SupportedLanguages, ProviderError>;

    /// Translate a single text
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `source_language` - Canonical code of the text's language
    /// * `target_language` - Canonical code of the wanted language
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translation, never empty
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Map a user supplied code to the form used in this provider's listing
    fn canonical_code(&self, code: &str) -> String {
        language_utils::normalize_code(code)
    }
}

/// Common trait for text-to-speech back-ends
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// Human readable provider name
    fn name(&self) -> &str;

    /// Query the languages this provider can speak
    async fn supported_languages(&self) -> Result<LanguageListing, ProviderError>;

    /// Synthesize `text` as MP3 audio, never empty
    async fn synthesize(&self, text: &str, language: &str) -> Result<Bytes, ProviderError>;

    /// Map a user supplied code to the form used in this provider's listing
    fn canonical_code(&self, code: &str) -> String {
        language_utils::normalize_code(code)
    }
}

/// Build the HTTP client shared by the requests of one provider
pub(crate) fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("lingodeck/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))
}

/// Turn a non-success response into the matching provider error
pub(crate) async fn error_from_response(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    ProviderError::from_status(status, body)
}

/// Canonical code for providers that key their listing by bare ISO 639-1
/// codes plus a few regional entries (`zh-cn`, `zh-tw`)
pub(crate) fn listing_code(code: &str, listing: &LanguageListing) -> String {
    let normalized = language_utils::normalize_code(code);
    if listing.contains_key(&normalized) {
        return normalized;
    }

    let base = language_utils::base_language(&normalized);
    match base.as_str() {
        // Google keys Hebrew and Javanese by their withdrawn codes
        "he" if !listing.contains_key("he") => "iw".to_string(),
        "jv" if !listing.contains_key("jv") => "jw".to_string(),
        _ => base,
    }
}

/// Create the translator for a configured provider
///
/// # Arguments
/// * `provider` - Which back-end to build
/// * `config` - Application configuration
/// * `auth_key` - DeepL authentication key, required for DeepL
pub fn create_translator(
    provider: TranslationProvider,
    config: &Config,
    auth_key: Option<&str>,
) -> Result<Arc<dyn Translator>, ProviderError> {
    let common = &config.translation.common;
    let retry = RetryPolicy::new(common.retry_count, common.retry_backoff_ms);
    let endpoint = config.translation.get_endpoint(&provider);

    match provider {
        TranslationProvider::DeepL => {
            let key = auth_key.ok_or_else(|| {
                ProviderError::AuthenticationError("DeepL requires an authentication key".to_string())
            })?;
            let client = deepl::DeepL::new(key, &endpoint, common.timeout_secs, retry)?;
            Ok(Arc::new(client))
        }
        TranslationProvider::Google => {
            let client = google::GoogleTranslate::new(&endpoint, common.timeout_secs, retry)?;
            Ok(Arc::new(client))
        }
    }
}

/// Create the speech synthesizer from configuration
pub fn create_speech_synthesizer(config: &Config) -> Result<Arc<dyn SpeechSynthesizer>, ProviderError> {
    let common = &config.translation.common;
    let retry = RetryPolicy::new(common.retry_count, common.retry_backoff_ms);
    let client = gtts::GoogleTts::new(
        &config.speech.endpoint,
        config.speech.slow,
        common.timeout_secs,
        retry,
    )?;
    Ok(Arc::new(client))
}
