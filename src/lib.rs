/*!
 * # lingodeck - translated vocabulary flashcards
 *
 * A Rust library that turns a tagged vocabulary list into an Anki deck.
 *
 * ## Features
 *
 * - Tab-separated vocabulary files with stable ids and Anki tags
 * - Translation through interchangeable providers:
 *   - DeepL API
 *   - Google Translate
 * - Optional merging of a second provider's translations as alternatives
 * - Back-translation into a verification language for human review
 * - Pronunciations through Google text-to-speech
 * - Deterministic note ids, so regenerated decks update instead of duplicate
 * - Output as an importable .apkg plus a plain .zip archive
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `vocabulary`: Vocabulary file loading
 * - `language_resolver`: Validation of requested languages against the back-ends
 * - `providers`: Clients for the translation and speech back-ends
 * - `translation`: Translation cache and alternative merging
 * - `deck`: Card building and deck packaging
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod deck;
pub mod errors;
pub mod file_utils;
pub mod language_resolver;
pub mod language_utils;
pub mod providers;
pub mod translation;
pub mod vocabulary;

// Re-export main types for easier usage
pub use app_config::Config;
pub use deck::{BuildReport, Card, CardBuilder, Deck, DeckAssembler, EntryFailure};
pub use errors::{AppError, ConfigError, DeckError, LanguageError, ProviderError, VocabularyError};
pub use language_resolver::{LanguageConfig, LanguageRequest, LanguageResolver};
pub use vocabulary::{Vocabulary, VocabularyEntry};
