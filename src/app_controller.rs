use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::deck::{AssembledDeck, CardBuilder, Deck, DeckAssembler, EntryFailure};
use crate::errors::ConfigError;
use crate::file_utils::FileManager;
use crate::language_resolver::{LanguageConfig, LanguageRequest, LanguageResolver};
use crate::providers::{self, SpeechSynthesizer, Translator};
use crate::translation::{CacheStats, CachedTranslator, TranslationCache};
use crate::vocabulary::Vocabulary;

// @module: Application controller for deck creation

/// Back-ends used by a run, selected once from configuration
#[derive(Debug, Clone)]
pub struct Backends {
    /// Translator for translation and back-translation
    pub translator: Arc<dyn Translator>,
    /// Translator whose output is merged as alternatives
    pub alternative: Option<Arc<dyn Translator>>,
    /// Speech back-end
    pub speech: Arc<dyn SpeechSynthesizer>,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Written artifacts
    pub deck: AssembledDeck,
    /// Resolved languages
    pub languages: LanguageConfig,
    /// Entries left out of the deck
    pub failures: Vec<EntryFailure>,
    /// Failure log, written when entries failed
    pub failure_log: Option<PathBuf>,
    /// Translation cache statistics of the primary translator
    pub cache_stats: CacheStats,
}

/// Main application controller for deck creation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Whether a progress bar is drawn
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            show_progress: true,
        })
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create the configured back-ends
    ///
    /// Reads the DeepL key when DeepL is active; a missing key is fatal.
    pub fn create_backends(&self) -> Result<Backends> {
        let auth_key = if self.config.requires_auth() {
            Some(self.config.load_auth_key()?)
        } else {
            None
        };

        let translation = &self.config.translation;
        let translator = providers::create_translator(translation.provider, &self.config, auth_key.as_deref())
            .with_context(|| format!("Failed to create {} client", translation.provider.display_name()))?;

        let alternative = match translation.alternative_provider {
            Some(provider) => Some(
                providers::create_translator(provider, &self.config, auth_key.as_deref())
                    .with_context(|| format!("Failed to create {} client", provider.display_name()))?,
            ),
            None => None,
        };

        let speech = providers::create_speech_synthesizer(&self.config)
            .context("Failed to create speech client")?;

        Ok(Backends {
            translator,
            alternative,
            speech,
        })
    }

    /// Run the whole workflow against the configured back-ends
    pub async fn run(&self, vocab_path: &Path) -> Result<RunOutcome> {
        let backends = self.create_backends()?;
        self.run_with_backends(vocab_path, backends).await
    }

    /// Load, resolve, build and assemble a deck
    pub async fn run_with_backends(&self, vocab_path: &Path, backends: Backends) -> Result<RunOutcome> {
        let start_time = std::time::Instant::now();

        let deck_id = self.config.deck.deck_id.ok_or_else(|| {
            ConfigError::Invalid("a deck id is required to create a deck".to_string())
        })?;

        let vocabulary = Vocabulary::load(vocab_path)?;
        if vocabulary.is_empty() {
            return Err(anyhow!("Vocabulary file contains no entries: {:?}", vocab_path));
        }
        info!("Loaded {} phrases from {}", vocabulary.len(), vocab_path.display());

        let bidirectional = self.config.deck.bidirectional;
        let resolver = LanguageResolver::new(
            Arc::clone(&backends.translator),
            backends.alternative.clone(),
            Arc::clone(&backends.speech),
        );
        let languages = resolver
            .resolve(&LanguageRequest {
                source: self.config.source_language.clone(),
                target: self.config.target_language.clone(),
                verification: self.config.verification_language.clone(),
                bidirectional,
            })
            .await?;

        let output_dir = PathBuf::from(&self.config.deck.output_dir);
        FileManager::ensure_dir(&output_dir)?;

        // Separate caches, providers answer the same request differently
        let cache_enabled = self.config.translation.common.cache_enabled;
        let primary_cache = TranslationCache::new(cache_enabled);
        let translator: Arc<dyn Translator> = Arc::new(CachedTranslator::new(
            Arc::clone(&backends.translator),
            primary_cache.clone(),
        ));
        let alternative = backends.alternative.as_ref().map(|alternative| {
            Arc::new(CachedTranslator::new(Arc::clone(alternative), TranslationCache::new(cache_enabled)))
                as Arc<dyn Translator>
        });

        let mut provider_names = vec![backends.translator.name().to_string()];
        if let Some(alternative) = &backends.alternative {
            provider_names.push(alternative.name().to_string());
        }
        info!(
            "Translating {} -> {} (verification: {}) using {}",
            languages.source_name,
            languages.target_name,
            languages.verification_name,
            provider_names.join(" + ")
        );

        let builder = CardBuilder::new(translator, Arc::clone(&backends.speech), languages.clone(), deck_id)
            .with_alternative(alternative)
            .with_bidirectional(bidirectional)
            .with_concurrency(self.config.translation.common.concurrent_requests);

        let progress_bar = self.create_progress_bar(vocabulary.len() as u64);
        let pb = progress_bar.clone();
        let report = builder
            .build_all(&vocabulary.entries, move |completed, _total| {
                pb.set_position(completed as u64);
            })
            .await;
        progress_bar.finish_and_clear();

        let cache_stats = primary_cache.stats();
        debug!(
            "Translation cache: {} hits, {} misses ({:.0}% hit rate)",
            cache_stats.hits,
            cache_stats.misses,
            cache_stats.hit_rate() * 100.0
        );

        // Now that the progress bar is gone, report what failed
        let failure_log = if report.failures.is_empty() {
            None
        } else {
            warn!("{} of {} phrases failed and were left out of the deck:", report.failures.len(), report.total());
            for failure in &report.failures {
                error!("  {}", failure);
            }
            match FileManager::write_failure_log(&output_dir, deck_id, &report.failures) {
                Ok(path) => {
                    info!("Failures written to {}", path.display());
                    Some(path)
                }
                Err(e) => {
                    warn!("Failed to write failure log: {}", e);
                    None
                }
            }
        };

        if report.cards.is_empty() {
            return Err(anyhow!("All {} phrases failed, no deck was written", report.total()));
        }

        let provider_refs: Vec<&str> = provider_names.iter().map(String::as_str).collect();
        let deck = Deck {
            deck_id,
            name: self
                .config
                .deck
                .deck_name
                .clone()
                .unwrap_or_else(|| Deck::default_name(&languages)),
            description: Deck::describe(&languages, &provider_refs),
            languages: languages.clone(),
            cards: report.cards,
            bidirectional,
        };

        let assembled = DeckAssembler::new(&output_dir)
            .assemble(deck, vocabulary.raw_content)
            .await
            .context("Failed to write deck")?;

        info!("Success: {}", assembled.apkg_path.display());
        info!("Archive: {}", assembled.archive_path.display());
        info!("Total processing time: {}", Self::format_duration(start_time.elapsed()));

        Ok(RunOutcome {
            deck: assembled,
            languages,
            failures: report.failures,
            failure_log,
            cache_stats,
        })
    }

    /// Describe the languages every configured back-end supports
    pub async fn describe_languages(&self, backends: &Backends) -> Result<String> {
        let mut out = String::new();

        let mut translators = vec![&backends.translator];
        if let Some(alternative) = &backends.alternative {
            translators.push(alternative);
        }

        for translator in translators {
            let languages = translator
                .supported_languages()
                .await
                .with_context(|| format!("Failed to list {} languages", translator.name()))?;
            writeln!(out, "{} source languages:", translator.name())?;
            for (code, name) in &languages.sources {
                writeln!(out, "    {}: {}", code, name)?;
            }
            writeln!(out, "{} target languages:", translator.name())?;
            for (code, name) in &languages.targets {
                writeln!(out, "    {}: {}", code, name)?;
            }
        }

        let speech = backends
            .speech
            .supported_languages()
            .await
            .with_context(|| format!("Failed to list {} languages", backends.speech.name()))?;
        writeln!(out, "{} languages:", backends.speech.name())?;
        for (code, name) in &speech {
            writeln!(out, "    {}: {}", code, name)?;
        }

        Ok(out)
    }

    fn create_progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} phrases ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");
        progress_bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
