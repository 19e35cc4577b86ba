/*!
 * Card building.
 *
 * For every vocabulary entry the builder translates the phrase, back-translates
 * the result into the verification language, synthesizes audio and derives
 * the note identifiers. Entries run concurrently on a bounded pool and fail
 * independently: a failed entry is reported and left out of the deck while
 * the others continue.
 */

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use log::debug;

use crate::deck::card::{note_guid, note_id, Card};
use crate::errors::ProviderError;
use crate::language_resolver::LanguageConfig;
use crate::providers::{SpeechSynthesizer, Translator};
use crate::translation::{dedup_alternatives, merge_alternatives};
use crate::vocabulary::VocabularyEntry;

// @const: Default number of entries processed at once
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 4;

/// Step of the per-entry pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Translation,
    BackTranslation,
    TargetAudio,
    SourceAudio,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translation => write!(f, "translation"),
            Self::BackTranslation => write!(f, "back-translation"),
            Self::TargetAudio => write!(f, "target audio"),
            Self::SourceAudio => write!(f, "source audio"),
        }
    }
}

/// An entry left out of the deck
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFailure {
    pub entry_id: u64,
    pub phrase: String,
    pub stage: BuildStage,
    pub message: String,
}

impl EntryFailure {
    fn new(entry: &VocabularyEntry, stage: BuildStage, error: ProviderError) -> Self {
        Self {
            entry_id: entry.id,
            phrase: entry.phrase.clone(),
            stage,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' failed at {}: {}", self.entry_id, self.phrase, self.stage, self.message)
    }
}

/// Outcome of building all entries
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Built cards in vocabulary order
    pub cards: Vec<Card>,
    /// Failed entries in vocabulary order
    pub failures: Vec<EntryFailure>,
}

impl BuildReport {
    pub fn total(&self) -> usize {
        self.cards.len() + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builds cards from vocabulary entries
#[derive(Debug, Clone)]
pub struct CardBuilder {
    /// Translator for translation and back-translation
    translator: Arc<dyn Translator>,
    /// Translator whose output is merged as alternatives
    alternative: Option<Arc<dyn Translator>>,
    /// Speech back-end
    speech: Arc<dyn SpeechSynthesizer>,
    /// Resolved languages
    languages: LanguageConfig,
    /// Deck the note ids are derived for
    deck_id: i64,
    /// Whether source audio is synthesized
    bidirectional: bool,
    /// Max entries in flight
    concurrent_requests: usize,
}

impl CardBuilder {
    pub fn new(
        translator: Arc<dyn Translator>,
        speech: Arc<dyn SpeechSynthesizer>,
        languages: LanguageConfig,
        deck_id: i64,
    ) -> Self {
        Self {
            translator,
            alternative: None,
            speech,
            languages,
            deck_id,
            bidirectional: true,
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
        }
    }

    /// Merge translations of a second provider into every card
    pub fn with_alternative(mut self, alternative: Option<Arc<dyn Translator>>) -> Self {
        self.alternative = alternative;
        self
    }

    pub fn with_bidirectional(mut self, bidirectional: bool) -> Self {
        self.bidirectional = bidirectional;
        self
    }

    pub fn with_concurrency(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests.max(1);
        self
    }

    /// Build the cards of all entries
    ///
    /// `progress_callback` is called with `(completed, total)` after each entry.
    pub async fn build_all<F>(&self, entries: &[VocabularyEntry], progress_callback: F) -> BuildReport
    where
        F: Fn(usize, usize) + Clone + Send + 'static,
    {
        let total = entries.len();
        let completed = Arc::new(AtomicUsize::new(0));

        let mut results = stream::iter(entries.iter().enumerate())
            .map(|(index, entry)| {
                let completed = Arc::clone(&completed);
                let progress_callback = progress_callback.clone();
                async move {
                    let result = self.build_card(entry).await;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(done, total);
                    (index, result)
                }
            })
            .buffer_unordered(self.concurrent_requests)
            .collect::<Vec<_>>()
            .await;

        // Sort results by entry index to maintain file order
        results.sort_by_key(|(index, _)| *index);

        let mut report = BuildReport::default();
        for (_, result) in results {
            match result {
                Ok(card) => report.cards.push(card),
                Err(failure) => report.failures.push(failure),
            }
        }

        debug!("Built {} of {} cards", report.cards.len(), total);
        report
    }

    /// Run the pipeline for one entry
    pub async fn build_card(&self, entry: &VocabularyEntry) -> Result<Card, EntryFailure> {
        let languages = &self.languages;

        let primary = self
            .translate(self.translator.as_ref(), &entry.phrase, &languages.source_language, &languages.target_language)
            .await
            .map_err(|e| EntryFailure::new(entry, BuildStage::Translation, e))?;

        let translated_phrase = match &self.alternative {
            Some(alternative) => {
                let extra = self
                    .translate(alternative.as_ref(), &entry.phrase, &languages.source_language, &languages.target_language)
                    .await
                    .map_err(|e| EntryFailure::new(entry, BuildStage::Translation, e))?;
                merge_alternatives(&[primary.as_str(), extra.as_str()])
            }
            None => dedup_alternatives(&primary),
        };

        // Back-translation is a reading aid only, its content is never judged
        let verification = self
            .translate(self.translator.as_ref(), &primary, &languages.target_language, &languages.verification_language)
            .await
            .map_err(|e| EntryFailure::new(entry, BuildStage::BackTranslation, e))?;
        let verification_phrase = dedup_alternatives(&verification);

        let target_audio = self
            .synthesize(&translated_phrase, &languages.target_language)
            .await
            .map_err(|e| EntryFailure::new(entry, BuildStage::TargetAudio, e))?;

        let source_audio = if self.bidirectional {
            let audio = self
                .synthesize(&entry.phrase, &languages.source_language)
                .await
                .map_err(|e| EntryFailure::new(entry, BuildStage::SourceAudio, e))?;
            Some(audio)
        } else {
            None
        };

        Ok(Card {
            entry_id: entry.id,
            source_phrase: entry.phrase.clone(),
            translated_phrase,
            verification_phrase,
            target_audio: Some(target_audio),
            source_audio,
            tags: entry.tags.clone(),
            note_id: note_id(self.deck_id, entry.id),
            guid: note_guid(self.deck_id, entry.id),
        })
    }

    async fn translate(
        &self,
        translator: &dyn Translator,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let source = translator.canonical_code(source_language);
        let target = translator.canonical_code(target_language);

        let translation = translator.translate(text, &source, &target).await?;
        if translation.trim().is_empty() {
            debug!("{} returned an empty translation for '{}'", translator.name(), text);
            return Err(ProviderError::EmptyResponse(format!(
                "{} returned an empty translation",
                translator.name()
            )));
        }
        Ok(translation.trim().to_string())
    }

    async fn synthesize(&self, text: &str, language: &str) -> Result<Bytes, ProviderError> {
        let language = self.speech.canonical_code(language);
        let audio = self.speech.synthesize(text, &language).await?;
        if audio.is_empty() {
            return Err(ProviderError::EmptyResponse(format!(
                "{} returned no audio",
                self.speech.name()
            )));
        }
        Ok(audio)
    }
}
