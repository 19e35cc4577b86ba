/*!
 * Error types for the lingodeck application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::fmt;

use thiserror::Error;

/// Errors that can occur when working with translation and speech back-ends
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider answered successfully but with nothing usable
    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl ProviderError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::Timeout(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }

    /// Classify a reqwest transport error
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() || error.is_request() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

/// Errors raised while loading a vocabulary file
#[derive(Error, Debug, PartialEq)]
pub enum VocabularyError {
    /// The file could not be read
    #[error("Failed to read vocabulary file '{path}': {message}")]
    Unreadable { path: String, message: String },

    /// A line did not contain an id column and a phrase column
    #[error("Line {line}: expected at least two tab-separated columns (id and phrase), found {columns}")]
    MissingColumns { line: usize, columns: usize },

    /// The id column is not a positive integer
    #[error("Line {line}: '{value}' is not a valid positive integer id")]
    InvalidId { line: usize, value: String },

    /// The same id occurs twice
    #[error("Line {line}: id {id} is used twice, first occurrence on line {first_line}: '{first_phrase}'")]
    DuplicateId {
        id: u64,
        line: usize,
        first_line: usize,
        first_phrase: String,
    },

    /// The phrase column is empty
    #[error("Line {line}: phrase of id {id} is empty")]
    EmptyPhrase { line: usize, id: u64 },

    /// A tag contains a space, which Anki does not support
    #[error("Line {line}: tag '{tag}' of phrase with id {id} contains a space, Anki does not support this")]
    InvalidTag { line: usize, id: u64, tag: String },
}

impl VocabularyError {
    /// The vocabulary id the error refers to, when known
    pub fn entry_id(&self) -> Option<u64> {
        match self {
            Self::DuplicateId { id, .. } | Self::EmptyPhrase { id, .. } | Self::InvalidTag { id, .. } => {
                Some(*id)
            }
            _ => None,
        }
    }
}

/// Which step of language resolution rejected a code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageRole {
    Source,
    Target,
    Verification,
}

impl fmt::Display for LanguageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
            Self::Verification => write!(f, "verification"),
        }
    }
}

/// Errors raised while resolving the requested languages
#[derive(Error, Debug)]
pub enum LanguageError {
    /// A requested code is not supported by one of the back-ends
    #[error(
        "'{code}' is not a valid {role} language for {provider}! Available options:\n{}",
        format_options(.available)
    )]
    Unsupported {
        code: String,
        role: LanguageRole,
        provider: String,
        /// Supported (code, name) pairs, sorted by code
        available: Vec<(String, String)>,
    },

    /// Source and target are the same language
    #[error("Target language '{0}' is the same as the source language")]
    SameAsSource(String),

    /// The supported-language listing could not be fetched
    #[error("Failed to list languages supported by {provider}: {source}")]
    Listing {
        provider: String,
        #[source]
        source: ProviderError,
    },
}

fn format_options(available: &[(String, String)]) -> String {
    available
        .iter()
        .map(|(code, name)| format!("    {}: {}", code, name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors raised while packaging the deck
#[derive(Error, Debug)]
pub enum DeckError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error writing the Anki collection database
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Error writing a zip container
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Error serializing JSON metadata
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// There is nothing to package
    #[error("Deck {0} has no cards")]
    Empty(i64),
}

/// Configuration errors detected at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The credential file is missing or empty
    #[error("Missing credential for {provider}: {message}")]
    MissingCredential { provider: String, message: String },

    /// A configuration value is invalid
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error loading the vocabulary
    #[error("Vocabulary error: {0}")]
    Vocabulary(#[from] VocabularyError),

    /// Error resolving languages
    #[error("Language error: {0}")]
    Language(#[from] LanguageError),

    /// Error packaging the deck
    #[error("Deck error: {0}")]
    Deck(#[from] DeckError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
