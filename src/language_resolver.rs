/*!
 * Language resolution.
 *
 * Validates the requested source, target and verification languages against
 * what every active back-end supports, once per run and before any
 * per-entry work starts.
 */

use std::sync::Arc;

use log::debug;

use crate::errors::{LanguageError, LanguageRole};
use crate::language_utils;
use crate::providers::{LanguageListing, SpeechSynthesizer, Translator};

/// Languages requested by the user
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRequest {
    pub source: String,
    pub target: String,
    /// Defaults to the source language
    pub verification: Option<String>,
    /// Whether source-language audio will be synthesized
    pub bidirectional: bool,
}

/// Resolved and validated languages of a run
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageConfig {
    pub source_language: String,
    pub target_language: String,
    pub verification_language: String,
    pub source_name: String,
    pub target_name: String,
    pub verification_name: String,
}

/// Checks requested languages against the active back-ends
#[derive(Debug, Clone)]
pub struct LanguageResolver {
    /// Translator used for translation and back-translation
    primary: Arc<dyn Translator>,
    /// Translator whose output is merged as alternatives
    alternative: Option<Arc<dyn Translator>>,
    /// Speech back-end
    speech: Arc<dyn SpeechSynthesizer>,
}

impl LanguageResolver {
    pub fn new(
        primary: Arc<dyn Translator>,
        alternative: Option<Arc<dyn Translator>>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            primary,
            alternative,
            speech,
        }
    }

    /// Validate the request and attach display names
    pub async fn resolve(&self, request: &LanguageRequest) -> Result<LanguageConfig, LanguageError> {
        let source = language_utils::normalize_code(&request.source);
        let target = language_utils::normalize_code(&request.target);
        let verification = request
            .verification
            .as_deref()
            .map(language_utils::normalize_code)
            .unwrap_or_else(|| source.clone());

        // Also catches regional variants a provider folds onto the source
        let primary = self.primary.as_ref();
        if source == target || primary.canonical_code(&source) == primary.canonical_code(&target) {
            return Err(LanguageError::SameAsSource(target));
        }

        let primary_languages = self
            .primary
            .supported_languages()
            .await
            .map_err(|e| LanguageError::Listing {
                provider: self.primary.name().to_string(),
                source: e,
            })?;

        let source_name = check(primary.name(), &primary.canonical_code(&source), &source, LanguageRole::Source, &primary_languages.sources)?;
        let target_name = check(primary.name(), &primary.canonical_code(&target), &target, LanguageRole::Target, &primary_languages.targets)?;
        // Back-translation goes through the primary translator only
        let verification_name = check(
            primary.name(),
            &primary.canonical_code(&verification),
            &verification,
            LanguageRole::Verification,
            &primary_languages.targets,
        )?;

        if let Some(alternative) = &self.alternative {
            let languages = alternative
                .supported_languages()
                .await
                .map_err(|e| LanguageError::Listing {
                    provider: alternative.name().to_string(),
                    source: e,
                })?;
            check(alternative.name(), &alternative.canonical_code(&source), &source, LanguageRole::Source, &languages.sources)?;
            check(alternative.name(), &alternative.canonical_code(&target), &target, LanguageRole::Target, &languages.targets)?;
        }

        let speech_languages = self
            .speech
            .supported_languages()
            .await
            .map_err(|e| LanguageError::Listing {
                provider: self.speech.name().to_string(),
                source: e,
            })?;
        check(self.speech.name(), &self.speech.canonical_code(&target), &target, LanguageRole::Target, &speech_languages)?;
        if request.bidirectional {
            check(self.speech.name(), &self.speech.canonical_code(&source), &source, LanguageRole::Source, &speech_languages)?;
        }

        let resolved = LanguageConfig {
            source_name: display_name(source_name, &source),
            target_name: display_name(target_name, &target),
            verification_name: display_name(verification_name, &verification),
            source_language: source,
            target_language: target,
            verification_language: verification,
        };

        debug!(
            "Resolved languages: {} ({}) -> {} ({}), verification {} ({})",
            resolved.source_name,
            resolved.source_language,
            resolved.target_name,
            resolved.target_language,
            resolved.verification_name,
            resolved.verification_language
        );

        Ok(resolved)
    }
}

/// Look up `canonical` in `listing`, returning its name or the unsupported error
fn check(
    provider: &str,
    canonical: &str,
    requested: &str,
    role: LanguageRole,
    listing: &LanguageListing,
) -> Result<Option<String>, LanguageError> {
    match listed_code(canonical, listing).and_then(|code| listing.get(&code)) {
        Some(name) => Ok(Some(name.clone()).filter(|n| !n.trim().is_empty())),
        None => Err(LanguageError::Unsupported {
            code: requested.to_string(),
            role,
            provider: provider.to_string(),
            available: listing.iter().map(|(c, n)| (c.clone(), n.clone())).collect(),
        }),
    }
}

/// Listing key serving `canonical`
///
/// A bare code missing from the listing falls back to its only regional
/// variant, or to the default region when several are listed.
fn listed_code(canonical: &str, listing: &LanguageListing) -> Option<String> {
    if listing.contains_key(canonical) {
        return Some(canonical.to_string());
    }

    let prefix = format!("{}-", canonical);
    let variants: Vec<&String> = listing.keys().filter(|code| code.starts_with(&prefix)).collect();
    match variants.as_slice() {
        [] => None,
        [only] => Some((*only).clone()),
        _ => language_utils::default_region(canonical)
            .filter(|code| listing.contains_key(*code))
            .map(str::to_string),
    }
}

/// Listing name, then the ISO 639 name, then the upper-cased code
fn display_name(listed: Option<String>, code: &str) -> String {
    listed
        .or_else(|| language_utils::get_language_name(code).ok())
        .unwrap_or_else(|| code.to_uppercase())
}
