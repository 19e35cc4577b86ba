/*!
 * Google Translate client using the public web endpoint.
 */

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::errors::ProviderError;
use crate::providers::{
    build_http_client, error_from_response, listing_code, LanguageListing, RetryPolicy,
    SupportedLanguages, Translator,
};

/// Languages accepted by Google Translate, keyed by the codes it expects
pub const GOOGLE_LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("az", "Azerbaijani"),
    ("be", "Belarusian"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("ceb", "Cebuano"),
    ("co", "Corsican"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("eo", "Esperanto"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("eu", "Basque"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("fy", "Frisian"),
    ("ga", "Irish"),
    ("gd", "Scots Gaelic"),
    ("gl", "Galician"),
    ("gu", "Gujarati"),
    ("ha", "Hausa"),
    ("haw", "Hawaiian"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hmn", "Hmong"),
    ("hr", "Croatian"),
    ("ht", "Haitian Creole"),
    ("hu", "Hungarian"),
    ("hy", "Armenian"),
    ("id", "Indonesian"),
    ("ig", "Igbo"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("iw", "Hebrew"),
    ("ja", "Japanese"),
    ("jw", "Javanese"),
    ("ka", "Georgian"),
    ("kk", "Kazakh"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("ku", "Kurdish (Kurmanji)"),
    ("ky", "Kyrgyz"),
    ("la", "Latin"),
    ("lb", "Luxembourgish"),
    ("lo", "Lao"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("mg", "Malagasy"),
    ("mi", "Maori"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mn", "Mongolian"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("mt", "Maltese"),
    ("my", "Myanmar (Burmese)"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("ny", "Chichewa"),
    ("pa", "Punjabi"),
    ("pl", "Polish"),
    ("ps", "Pashto"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sd", "Sindhi"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sm", "Samoan"),
    ("sn", "Shona"),
    ("so", "Somali"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("st", "Sesotho"),
    ("su", "Sundanese"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("tg", "Tajik"),
    ("th", "Thai"),
    ("tl", "Filipino"),
    ("tr", "Turkish"),
    ("ug", "Uyghur"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("uz", "Uzbek"),
    ("vi", "Vietnamese"),
    ("xh", "Xhosa"),
    ("yi", "Yiddish"),
    ("yo", "Yoruba"),
    ("zh-cn", "Chinese (Simplified)"),
    ("zh-tw", "Chinese (Traditional)"),
    ("zu", "Zulu"),
];

/// Google Translate client
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Service base URL
    endpoint: String,
    /// Retry settings
    retry: RetryPolicy,
    /// Static language listing
    languages: LanguageListing,
}

impl GoogleTranslate {
    /// Create a new Google Translate client
    pub fn new(endpoint: &str, timeout_secs: u64, retry: RetryPolicy) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            retry,
            languages: Self::languages(),
        })
    }

    /// Languages accepted as source and target
    pub fn languages() -> LanguageListing {
        GOOGLE_LANGUAGES
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect()
    }

    /// Concatenate the translated segments of a `translate_a/single` body
    ///
    /// The body is a nested array whose first element lists
    /// `[translated, original, ...]` segments.
    pub fn parse_translation(body: &str) -> Result<String, ProviderError> {
        let data: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("Invalid Google response: {}", e)))?;

        let segments = data
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("Google response has no segments".to_string()))?;

        let text: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse("Google returned no translation".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    fn name(&self) -> &str {
        "Google Translate"
    }

    async fn supported_languages(&self) -> Result<SupportedLanguages, ProviderError> {
        Ok(SupportedLanguages::symmetric(self.languages.clone()))
    }

    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/translate_a/single", self.endpoint);

        let body = self
            .retry
            .run("Google translation", || async {
                let response = self
                    .client
                    .get(&url)
                    .query(&[
                        ("client", "gtx"),
                        ("sl", source_language),
                        ("tl", target_language),
                        ("dt", "t"),
                        ("q", text),
                    ])
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

    fn canonical_code(&self, code: &str) -> String {
        listing_code(code, &self.languages)
    }
}
