/*!
 * Tests for ISO language code utilities
 */

use lingodeck::language_utils::{
    base_language, default_region, get_language_name, normalize_code, split_region, validate_language_code,
    LanguageCodeType,
};

#[test]
fn test_normalize_code_withMixedCase_shouldLowercaseAndTrim() {
    assert_eq!(normalize_code(" EN-GB "), "en-gb");
}

#[test]
fn test_split_region_withRegionalCode_shouldSeparateParts() {
    assert_eq!(split_region("pt-br"), ("pt", Some("br")));
    assert_eq!(split_region("el"), ("el", None));
}

#[test]
fn test_base_language_withRegionalCode_shouldStripRegion() {
    assert_eq!(base_language("ZH-TW"), "zh");
    assert_eq!(base_language("de"), "de");
}

#[test]
fn test_default_region_shouldOnlyCoverRegionOnlyLanguages() {
    assert_eq!(default_region("en"), Some("en-us"));
    assert_eq!(default_region("pt"), Some("pt-pt"));
    assert_eq!(default_region("el"), None);
}

#[test]
fn test_validate_language_code_withKnownCodes_shouldReturnType() {
    assert_eq!(validate_language_code("el").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("en-gb").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("haw").unwrap(), LanguageCodeType::Part3);
    assert_eq!(validate_language_code("iw").unwrap(), LanguageCodeType::Part1);
}

#[test]
fn test_validate_language_code_withUnknownCodes_shouldFail() {
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("english").is_err());
}

#[test]
fn test_get_language_name_withCodes_shouldReturnEnglishName() {
    assert!(get_language_name("el").unwrap().contains("Greek"));
    assert_eq!(get_language_name("en-us").unwrap(), "English");
    assert_eq!(get_language_name("iw").unwrap(), "Hebrew");
}

#[test]
fn test_get_language_name_withUnknownCode_shouldFail() {
    assert!(get_language_name("qq").is_err());
}
