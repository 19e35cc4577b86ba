/*!
 * Google text-to-speech client.
 *
 * The endpoint accepts at most 100 characters per request, so longer
 * texts are split on whitespace and the MP3 fragments concatenated.
 */

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use log::debug;
use reqwest::Client;

use crate::errors::ProviderError;
use crate::providers::{
    build_http_client, error_from_response, listing_code, LanguageListing, RetryPolicy,
    SpeechSynthesizer,
};

// @const: Max characters per TTS request
pub const MAX_CHUNK_CHARS: usize = 100;

/// Languages the TTS endpoint can speak
pub const TTS_LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("ar", "Arabic"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("gu", "Gujarati"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("iw", "Hebrew"),
    ("ja", "Japanese"),
    ("jw", "Javanese"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("la", "Latin"),
    ("lv", "Latvian"),
    ("ml", "Malayalam"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("my", "Myanmar (Burmese)"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("su", "Sundanese"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("th", "Thai"),
    ("tl", "Filipino"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese (Mandarin)"),
    ("zh-cn", "Chinese (Simplified)"),
    ("zh-tw", "Chinese (Traditional)"),
];

/// Google TTS client
#[derive(Debug)]
pub struct GoogleTts {
    /// HTTP client for API requests
    client: Client,
    /// Service base URL
    endpoint: String,
    /// Request slower speech
    slow: bool,
    /// Retry settings
    retry: RetryPolicy,
    /// Static language listing
    languages: LanguageListing,
}

impl GoogleTts {
    /// Create a new TTS client
    pub fn new(
        endpoint: &str,
        slow: bool,
        timeout_secs: u64,
        retry: RetryPolicy,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            slow,
            retry,
            languages: Self::languages(),
        })
    }

    /// Languages the endpoint can speak
    pub fn languages() -> LanguageListing {
        TTS_LANGUAGES
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect()
    }

    async fn synthesize_chunk(
        &self,
        chunk: &str,
        language: &str,
        index: usize,
        total: usize,
    ) -> Result<Bytes, ProviderError> {
        let url = format!("{}/translate_tts", self.endpoint);
        let speed = if self.slow { "0.3" } else { "1" };
        let index = index.to_string();
        let total = total.to_string();
        let text_len = chunk.chars().count().to_string();

        self.retry
            .run("Speech synthesis", || async {
                let response = self
                    .client
                    .get(&url)
                    .query(&[
                        ("ie", "UTF-8"),
                        ("q", chunk),
                        ("tl", language),
                        ("client", "tw-ob"),
                        ("ttsspeed", speed),
                        ("total", total.as_str()),
                        ("idx", index.as_str()),
                        ("textlen", text_len.as_str()),
                    ])
                    .send()
                    .await
                    .map_err(ProviderError::from_reqwest)?;

                if !response.status().is_success() {
                    return Err(error_from_response(response).await);
                }
                response.bytes().await.map_err(ProviderError::from_reqwest)
            })
            .await
    }
}

/// Split text into chunks of at most `max_chars` characters
///
/// Chunks break on whitespace. A single word longer than `max_chars` is
/// split at character boundaries.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    fn name(&self) -> &str {
        "Google TTS"
    }

    async fn supported_languages(&self) -> Result<LanguageListing, ProviderError> {
        Ok(self.languages.clone())
    }

    async fn synthesize(&self, text: &str, language: &str) -> Result<Bytes, ProviderError> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(ProviderError::EmptyResponse("Nothing to synthesize".to_string()));
        }

        let mut audio = BytesMut::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let part = self.synthesize_chunk(chunk, language, index, chunks.len()).await?;
            audio.extend_from_slice(&part);
        }

        if audio.is_empty() {
            return Err(ProviderError::EmptyResponse(format!(
                "No audio returned for '{}' ({})",
                text, language
            )));
        }

        debug!("Synthesized {} bytes of {} audio in {} request(s)", audio.len(), language, chunks.len());
        Ok(audio.freeze())
    }

    fn canonical_code(&self, code: &str) -> String {
        listing_code(code, &self.languages)
    }
}
