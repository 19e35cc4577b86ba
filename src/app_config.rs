use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language of the vocabulary file (ISO)
    pub source_language: String,

    /// Language to translate the vocabulary to (ISO, regional variants allowed)
    pub target_language: String,

    /// Language used for back-translation, defaults to the source language
    #[serde(default)]
    pub verification_language: Option<String>,

    /// Deck packaging settings
    #[serde(default)]
    pub deck: DeckConfig,

    /// Translation config
    pub translation: TranslationConfig,

    /// Speech synthesis config
    #[serde(default)]
    pub speech: SpeechConfig,

    /// File holding the DeepL authentication key
    #[serde(default)]
    pub auth_file: Option<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: DeepL API
    #[default]
    DeepL,
    // @provider: Google Translate web endpoint
    Google,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::DeepL => "DeepL",
            Self::Google => "Google Translate",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::DeepL => "deepl".to_string(),
            Self::Google => "google".to_string(),
        }
    }

    // @returns: Whether the provider needs an authentication key
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::DeepL)
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deepl" => Ok(Self::DeepL),
            "google" => Ok(Self::Google),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Service URL, empty for the provider default
    #[serde(default = "String::new")]
    pub endpoint: String,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::DeepL => Self {
                provider_type: "deepl".to_string(),
                // Chosen from the key: free keys end in ":fx"
                endpoint: String::new(),
            },
            TranslationProvider::Google => Self {
                provider_type: "google".to_string(),
                endpoint: default_google_endpoint(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider used for translation and back-translation
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Second provider whose translations are merged in as alternatives
    #[serde(default)]
    pub alternative_provider: Option<TranslationProvider>,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common settings applicable to all network back-ends
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Timeout seconds per network request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Max vocabulary entries processed concurrently
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Whether identical translation requests are answered from memory
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            timeout_secs: default_timeout_secs(),
            concurrent_requests: default_concurrent_requests(),
            cache_enabled: true,
        }
    }
}

/// Speech synthesis configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeechConfig {
    /// Google TTS service URL
    #[serde(default = "default_speech_endpoint")]
    pub endpoint: String,

    /// Request slower speech
    #[serde(default)]
    pub slow: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: default_speech_endpoint(),
            slow: false,
        }
    }
}

/// Deck packaging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeckConfig {
    /// Stable identifier of the deck across regenerations
    #[serde(default)]
    pub deck_id: Option<i64>,

    /// Deck name shown in Anki, derived from the target language when absent
    #[serde(default)]
    pub deck_name: Option<String>,

    /// Add target -> source cards next to the source -> target cards
    #[serde(default = "default_true")]
    pub bidirectional: bool,

    /// Directory receiving the .apkg and .zip outputs
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            deck_id: None,
            deck_name: None,
            bidirectional: true,
            output_dir: default_output_dir(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Default credential file, looked up in the working directory
pub const DEFAULT_AUTH_FILE: &str = ".deepl_auth";

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> String {
    "Output".to_string()
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_speech_endpoint() -> String {
    "https://translate.google.com".to_string()
}

impl Config {
    /// Load the configuration file, creating it with defaults when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.source_language)
            .context("Invalid source language")?;
        language_utils::validate_language_code(&self.target_language)
            .context("Invalid target language")?;
        if let Some(verification) = &self.verification_language {
            language_utils::validate_language_code(verification)
                .context("Invalid verification language")?;
        }

        if let Some(deck_id) = self.deck.deck_id {
            if deck_id <= 0 {
                return Err(anyhow!("Deck id must be a positive integer, got {}", deck_id));
            }
        }

        if self.deck.output_dir.trim().is_empty() {
            return Err(anyhow!("Output directory cannot be empty"));
        }

        if self.translation.common.concurrent_requests == 0 {
            return Err(anyhow!("Concurrent requests must be at least 1"));
        }

        if self.translation.common.timeout_secs == 0 {
            return Err(anyhow!("Request timeout must be at least 1 second"));
        }

        if self.speech.endpoint.trim().is_empty() {
            return Err(anyhow!("Speech endpoint cannot be empty"));
        }

        if self.translation.alternative_provider == Some(self.translation.provider) {
            return Err(anyhow!(
                "Alternative provider must differ from the primary provider ({})",
                self.translation.provider
            ));
        }

        Ok(())
    }

    /// Verification language, falling back to the source language
    pub fn verification_language(&self) -> String {
        self.verification_language
            .clone()
            .unwrap_or_else(|| self.source_language.clone())
    }

    /// Whether any active translation provider needs the credential file
    pub fn requires_auth(&self) -> bool {
        self.translation.active_providers().iter().any(|p| p.requires_auth())
    }

    /// Candidate locations of the credential file, in lookup order
    pub fn auth_file_candidates(&self) -> Vec<PathBuf> {
        if let Some(explicit) = &self.auth_file {
            return vec![PathBuf::from(explicit)];
        }

        let mut candidates = vec![PathBuf::from(DEFAULT_AUTH_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("lingodeck").join("deepl_auth"));
        }
        candidates
    }

    /// Read the DeepL authentication key from the first existing candidate file
    pub fn load_auth_key(&self) -> Result<String, ConfigError> {
        let candidates = self.auth_file_candidates();

        let path = candidates.iter().find(|p| p.is_file()).ok_or_else(|| {
            ConfigError::MissingCredential {
                provider: TranslationProvider::DeepL.display_name().to_string(),
                message: format!(
                    "no authentication key file found (looked in {})",
                    candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }
        })?;

        let key = std::fs::read_to_string(path).map_err(|e| ConfigError::MissingCredential {
            provider: TranslationProvider::DeepL.display_name().to_string(),
            message: format!("failed to read {}: {}", path.display(), e),
        })?;

        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(ConfigError::MissingCredential {
                provider: TranslationProvider::DeepL.display_name().to_string(),
                message: format!("authentication key file {} is empty", path.display()),
            });
        }

        Ok(key)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "el".to_string(),
            verification_language: None,
            deck: DeckConfig::default(),
            translation: TranslationConfig::default(),
            speech: SpeechConfig::default(),
            auth_file: None,
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Primary provider followed by the alternative provider, if any
    pub fn active_providers(&self) -> Vec<TranslationProvider> {
        let mut providers = vec![self.provider];
        if let Some(alternative) = self.alternative_provider {
            providers.push(alternative);
        }
        providers
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the endpoint for a provider, empty meaning the provider default
    pub fn get_endpoint(&self, provider_type: &TranslationProvider) -> String {
        if let Some(provider_config) = self.get_provider_config(provider_type) {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match provider_type {
            TranslationProvider::DeepL => String::new(),
            TranslationProvider::Google => default_google_endpoint(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: TranslationProvider::default(),
            alternative_provider: None,
            available_providers: Vec::new(),
            common: TranslationCommonConfig::default(),
        };

        // Add default providers
        config.available_providers.push(ProviderConfig::new(TranslationProvider::DeepL));
        config.available_providers.push(ProviderConfig::new(TranslationProvider::Google));

        config
    }
}
