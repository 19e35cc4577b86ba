/*!
 * DeepL API client.
 *
 * Free-tier keys (ending in `:fx`) are served by `api-free.deepl.com`,
 * paid keys by `api.deepl.com`.
 */

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{
    build_http_client, error_from_response, LanguageListing, RetryPolicy, SupportedLanguages,
    Translator,
};

// @const: Endpoint for free-tier keys
const FREE_ENDPOINT: &str = "https://api-free.deepl.com";

// @const: Endpoint for paid keys
const PRO_ENDPOINT: &str = "https://api.deepl.com";

/// DeepL client
#[derive(Debug)]
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// API base URL
    endpoint: String,
    /// Authentication key
    auth_key: String,
    /// Retry settings
    retry: RetryPolicy,
}

/// DeepL translation request body
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: Vec<&'a str>,
    source_lang: String,
    target_lang: String,
    /// "0" keeps multi-sentence phrases as one unit
    split_sentences: &'static str,
}

/// DeepL translation response
#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    pub translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub detected_source_language: Option<String>,
    pub text: String,
}

/// Entry of a `/v2/languages` listing
#[derive(Debug, Deserialize)]
pub struct LanguageInfo {
    pub language: String,
    pub name: String,
}

impl DeepL {
    /// Create a new DeepL client
    ///
    /// An empty `endpoint` selects the free or paid API from the key.
    pub fn new(
        auth_key: impl Into<String>,
        endpoint: &str,
        timeout_secs: u64,
        retry: RetryPolicy,
    ) -> Result<Self, ProviderError> {
        let auth_key = auth_key.into();
        let endpoint = if endpoint.is_empty() {
            Self::default_endpoint(&auth_key).to_string()
        } else {
            endpoint.trim_end_matches('/').to_string()
        };

        Ok(Self {
            client: build_http_client(timeout_secs)?,
            endpoint,
            auth_key,
            retry,
        })
    }

    /// API base URL matching the kind of key
    pub fn default_endpoint(auth_key: &str) -> &'static str {
        if auth_key.trim().ends_with(":fx") {
            FREE_ENDPOINT
        } else {
            PRO_ENDPOINT
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Target code as sent to `/v2/translate`
    ///
    /// English and Portuguese are only served in a regional form.
    pub fn target_code(target_language: &str) -> String {
        let code = language_utils::normalize_code(target_language);
        match language_utils::default_region(&code) {
            Some(regional) => regional.to_uppercase(),
            None => code.to_uppercase(),
        }
    }

    fn authorization(&self) -> String {
        format!("DeepL-Auth-Key {}", self.auth_key)
    }

    /// Parse a `/v2/languages` body into a lowercase code listing
    pub fn parse_languages(body: &str) -> Result<LanguageListing, ProviderError> {
        let languages: Vec<LanguageInfo> = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("Invalid DeepL language listing: {}", e)))?;

        Ok(languages
            .into_iter()
            .map(|l| (language_utils::normalize_code(&l.language), l.name))
            .collect())
    }

    /// Extract the translated text from a `/v2/translate` body
    pub fn parse_translation(body: &str) -> Result<String, ProviderError> {
        let response: TranslateResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("Invalid DeepL translation: {}", e)))?;

        let text = response
            .translations
            .into_iter()
            .next()
            .map(|t| t.text.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::EmptyResponse("DeepL returned no translation".to_string()));
        }
        Ok(text)
    }

    async fn list_languages(&self, kind: &str) -> Result<LanguageListing, ProviderError> {
        let url = format!("{}/v2/languages", self.endpoint);
        let body = self
            .retry
            .run("DeepL language listing", || async {
                let response = self
                    .client
                    .get(&url)
                    .header("Authorization", self.authorization())
                    .query(&[("type", kind)])
                    .send()
                    .await
                    .map_err(ProviderError::from_reqwest)?;

                if !response.status().is_success() {
                    return Err(error_from_response(response).await);
                }
                response.text().await.map_err(ProviderError::from_reqwest)
            })
            .await?;

        Self::parse_languages(&body)
    }
}

#[async_trait]
impl Translator for DeepL {
    fn name(&self) -> &str {
        "DeepL"
    }

    async fn supported_languages(&self) -> Result<SupportedLanguages, ProviderError> {
        let sources = self.list_languages("source").await?;
        let targets = self.list_languages("target").await?;
        debug!("DeepL supports {} source and {} target languages", sources.len(), targets.len());
        Ok(SupportedLanguages { sources, targets })
    }

    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/v2/translate", self.endpoint);
        let request = TranslateRequest {
            text: vec![text],
            // Source languages are never regional
            source_lang: language_utils::base_language(source_language).to_uppercase(),
            target_lang: Self::target_code(target_language),
            split_sentences: "0",
        };

        let body = self
            .retry
            .run("DeepL translation", || async {
                let response = self
                    .client
                    .post(&url)
                    .header("Authorization", self.authorization())
                    .json(&request)
                    .send()
                    .await
                    .map_err(ProviderError::from_reqwest)?;

                if !response.status().is_success() {
                    return Err(error_from_response(response).await);
                }
                response.text().await.map_err(ProviderError::from_reqwest)
            })
            .await?;

        Self::parse_translation(&body)
    }
}
