/*!
 * Mock provider implementations for testing.
 *
 * This module provides in-process back-ends that simulate different behaviors:
 * - `MockTranslator::working()` - Always succeeds with a tagged translation
 * - `MockTranslator::failing()` - Always fails with an error
 * - `MockTranslator::intermittent(n)` - Fails every Nth request
 * - `empty()` - Succeeds with a blank payload
 * - `failing_on(text)` - Fails only for a given input text
 *
 * Every mock counts the requests it receives so tests can assert how many
 * network calls a code path would have made.
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{LanguageListing, SpeechSynthesizer, SupportedLanguages, Translator};

/// Behavior mode for the mock providers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Succeeds with a blank payload
    Empty,
}

/// Languages known to the mocks by default
pub fn default_languages() -> LanguageListing {
    [
        ("de", "German"),
        ("el", "Greek"),
        ("en", "English"),
        ("es", "Spanish"),
        ("fr", "French"),
    ]
    .iter()
    .map(|(code, name)| (code.to_string(), name.to_string()))
    .collect()
}

/// Shared failure decision of both mocks
fn check_failure(
    behavior: MockBehavior,
    count: usize,
    text: &str,
    failing_texts: &HashSet<String>,
) -> Result<(), ProviderError> {
    if failing_texts.contains(text) {
        return Err(ProviderError::ApiError {
            status_code: 400,
            message: format!("Simulated failure for '{}'", text),
        });
    }

    match behavior {
        MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated connection failure".to_string())),
        MockBehavior::Intermittent { fail_every } if fail_every > 0 && count % fail_every == fail_every - 1 => {
            Err(ProviderError::ApiError {
                status_code: 500,
                message: format!("Simulated intermittent failure on request {}", count + 1),
            })
        }
        _ => Ok(()),
    }
}

/// Mock translation back-end
#[derive(Debug, Clone)]
pub struct MockTranslator {
    /// Provider name
    name: String,
    /// Behavior mode
    behavior: MockBehavior,
    /// Translate request counter
    request_count: Arc<AtomicUsize>,
    /// Language listing request counter
    listing_count: Arc<AtomicUsize>,
    /// Input texts that always fail
    failing_texts: HashSet<String>,
    /// Advertised languages
    languages: SupportedLanguages,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            name: "Mock".to_string(),
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            listing_count: Arc::new(AtomicUsize::new(0)),
            failing_texts: HashSet::new(),
            languages: SupportedLanguages::symmetric(default_languages()),
        }
    }

    /// Create a working mock translator that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock translator that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create an intermittently failing mock translator
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a mock translator that returns empty translations
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Set the provider name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Fail every request whose input is `text`
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing_texts.insert(text.to_string());
        self
    }

    /// Replace the advertised languages
    pub fn with_languages(mut self, languages: SupportedLanguages) -> Self {
        self.languages = languages;
        self
    }

    /// The translation produced for `text`
    pub fn expected_translation(text: &str, target_language: &str) -> String {
        format!("[{}] {}", target_language, text)
    }

    /// Number of translate requests received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Number of language listing requests received
    pub fn listing_count(&self) -> usize {
        self.listing_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn supported_languages(&self) -> Result<SupportedLanguages, ProviderError> {
        self.listing_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.languages.clone())
    }

    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        check_failure(self.behavior, count, text, &self.failing_texts)?;

        if self.behavior == MockBehavior::Empty {
            return Ok("  ".to_string());
        }
        Ok(Self::expected_translation(text, target_language))
    }
}

/// Mock speech back-end
#[derive(Debug, Clone)]
pub struct MockSpeech {
    /// Behavior mode
    behavior: MockBehavior,
    /// Synthesis request counter
    request_count: Arc<AtomicUsize>,
    /// Input texts that always fail
    failing_texts: HashSet<String>,
    /// Advertised languages
    languages: LanguageListing,
}

impl MockSpeech {
    /// Create a new mock synthesizer with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            failing_texts: HashSet::new(),
            languages: default_languages(),
        }
    }

    /// Create a working mock synthesizer
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock synthesizer
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock synthesizer that returns no audio
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Fail every request whose input is `text`
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing_texts.insert(text.to_string());
        self
    }

    /// Replace the advertised languages
    pub fn with_languages(mut self, languages: LanguageListing) -> Self {
        self.languages = languages;
        self
    }

    /// The audio produced for `text`
    pub fn expected_audio(text: &str, language: &str) -> Bytes {
        Bytes::from(format!("ID3 mock {} audio: {}", language, text))
    }

    /// Number of synthesis requests received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    fn name(&self) -> &str {
        "Mock TTS"
    }

    async fn supported_languages(&self) -> Result<LanguageListing, ProviderError> {
        Ok(self.languages.clone())
    }

    async fn synthesize(&self, text: &str, language: &str) -> Result<Bytes, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        check_failure(self.behavior, count, text, &self.failing_texts)?;

        if self.behavior == MockBehavior::Empty {
            return Ok(Bytes::new());
        }
        Ok(Self::expected_audio(text, language))
    }
}
