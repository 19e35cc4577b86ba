use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Provider codes are ISO 639-1 codes, optionally followed by a regional
/// variant (`en-gb`, `pt-br`, `zh-cn`). These helpers split, validate and
/// name such codes.
/// Language code type
#[derive(Debug, PartialEq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-3 (3-letter) code, used by a few providers (e.g. `ceb`, `haw`)
    Part3,
}

/// Lowercase and trim a code as entered by a user
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}

/// Split a code into its base language and optional regional variant
pub fn split_region(code: &str) -> (&str, Option<&str>) {
    match code.split_once('-') {
        Some((base, region)) => (base, Some(region)),
        None => (code, None),
    }
}

/// Strip the regional variant of a code (`en-gb` becomes `en`)
pub fn base_language(code: &str) -> String {
    let normalized = normalize_code(code);
    split_region(&normalized).0.to_string()
}

/// Variant used when a provider only lists regional forms of a language
pub fn default_region(base: &str) -> Option<&'static str> {
    match base {
        "en" => Some("en-us"),
        "pt" => Some("pt-pt"),
        _ => None,
    }
}

/// Validate that the base language of a code is a known ISO 639 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let base = base_language(code);

    if base.len() == 2 && Language::from_639_1(&base).is_some() {
        return Ok(LanguageCodeType::Part1);
    }
    if base.len() == 3 && Language::from_639_3(&base).is_some() {
        return Ok(LanguageCodeType::Part3);
    }
    // Google still uses the withdrawn codes for Hebrew and Javanese
    if matches!(base.as_str(), "iw" | "jw") {
        return Ok(LanguageCodeType::Part1);
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Get the English language name for a code, ignoring any regional variant
pub fn get_language_name(code: &str) -> Result<String> {
    let base = match base_language(code).as_str() {
        "iw" => "he".to_string(),
        "jw" => "jv".to_string(),
        other => other.to_string(),
    };

    let lang = match base.len() {
        2 => Language::from_639_1(&base),
        3 => Language::from_639_3(&base),
        _ => None,
    }
    .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}
