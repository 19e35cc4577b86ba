/*!
 * Tests for language resolution against the back-ends
 */

use std::sync::Arc;

use anyhow::Result;
use lingodeck::errors::{LanguageError, LanguageRole};
use lingodeck::language_resolver::{LanguageRequest, LanguageResolver};
use lingodeck::providers::mock::{default_languages, MockSpeech, MockTranslator};
use lingodeck::providers::{LanguageListing, SupportedLanguages};

fn request(source: &str, target: &str, verification: Option<&str>, bidirectional: bool) -> LanguageRequest {
    LanguageRequest {
        source: source.to_string(),
        target: target.to_string(),
        verification: verification.map(str::to_string),
        bidirectional,
    }
}

fn resolver(translator: &MockTranslator, speech: &MockSpeech) -> LanguageResolver {
    LanguageResolver::new(Arc::new(translator.clone()), None, Arc::new(speech.clone()))
}

fn listing(codes: &[(&str, &str)]) -> LanguageListing {
    codes.iter().map(|(c, n)| (c.to_string(), n.to_string())).collect()
}

#[tokio::test]
async fn test_resolve_withSupportedLanguages_shouldAttachNames() -> Result<()> {
    let translator = MockTranslator::working();
    let speech = MockSpeech::working();

    let languages = resolver(&translator, &speech)
        .resolve(&request("EN", "el", None, true))
        .await?;

    assert_eq!(languages.source_language, "en");
    assert_eq!(languages.target_language, "el");
    assert_eq!(languages.verification_language, "en");
    assert_eq!(languages.target_name, "Greek");
    assert_eq!(languages.verification_name, "English");
    Ok(())
}

#[tokio::test]
async fn test_resolve_withUnsupportedTarget_shouldFailBeforeAnyTranslation() {
    let translator = MockTranslator::working();
    let speech = MockSpeech::working();

    let result = resolver(&translator, &speech)
        .resolve(&request("en", "xx", None, true))
        .await;

    match result {
        Err(LanguageError::Unsupported { code, role, provider, available }) => {
            assert_eq!(code, "xx");
            assert_eq!(role, LanguageRole::Target);
            assert_eq!(provider, "Mock");
            assert_eq!(available.len(), default_languages().len());
            assert_eq!(available[0].0, "de");
        }
        other => panic!("Expected unsupported target, got {:?}", other),
    }
    assert_eq!(translator.request_count(), 0);
    assert_eq!(speech.request_count(), 0);
}

#[tokio::test]
async fn test_resolve_withSameSourceAndTarget_shouldFail() {
    let translator = MockTranslator::working();
    let speech = MockSpeech::working();

    let result = resolver(&translator, &speech)
        .resolve(&request("en", " EN ", None, true))
        .await;

    assert!(matches!(result, Err(LanguageError::SameAsSource(code)) if code == "en"));
    assert_eq!(translator.listing_count(), 0);
}

#[tokio::test]
async fn test_resolve_withUnsupportedVerification_shouldNameTheRole() {
    let translator = MockTranslator::working();
    let speech = MockSpeech::working();

    let result = resolver(&translator, &speech)
        .resolve(&request("en", "el", Some("ja"), true))
        .await;

    assert!(matches!(
        result,
        Err(LanguageError::Unsupported { role: LanguageRole::Verification, .. })
    ));
}

#[tokio::test]
async fn test_resolve_withSpeechMissingSource_shouldOnlyFailWhenBidirectional() -> Result<()> {
    let translator = MockTranslator::working();
    let speech = MockSpeech::working().with_languages(listing(&[("el", "Greek")]));

    let bidirectional = resolver(&translator, &speech)
        .resolve(&request("en", "el", None, true))
        .await;
    assert!(matches!(
        bidirectional,
        Err(LanguageError::Unsupported { role: LanguageRole::Source, ref provider, .. }) if provider == "Mock TTS"
    ));

    let forward_only = resolver(&translator, &speech)
        .resolve(&request("en", "el", None, false))
        .await?;
    assert_eq!(forward_only.target_language, "el");
    Ok(())
}

#[tokio::test]
async fn test_resolve_withAlternativeMissingTarget_shouldFail() {
    let primary = MockTranslator::working();
    let alternative = MockTranslator::working()
        .with_name("Other")
        .with_languages(SupportedLanguages::symmetric(listing(&[("en", "English"), ("de", "German")])));
    let speech = MockSpeech::working();

    let resolver = LanguageResolver::new(
        Arc::new(primary),
        Some(Arc::new(alternative)),
        Arc::new(speech),
    );
    let result = resolver.resolve(&request("en", "el", None, true)).await;

    assert!(matches!(
        result,
        Err(LanguageError::Unsupported { role: LanguageRole::Target, ref provider, .. }) if provider == "Other"
    ));
}

#[tokio::test]
async fn test_resolve_withRegionalTargetListed_shouldKeepVariant() -> Result<()> {
    let mut languages = default_languages();
    languages.insert("pt-br".to_string(), "Portuguese (Brazilian)".to_string());
    let translator = MockTranslator::working().with_languages(SupportedLanguages::symmetric(languages.clone()));
    let speech = MockSpeech::working().with_languages(languages);

    let resolved = resolver(&translator, &speech)
        .resolve(&request("en", "PT-BR", None, false))
        .await?;

    assert_eq!(resolved.target_language, "pt-br");
    assert_eq!(resolved.target_name, "Portuguese (Brazilian)");
    Ok(())
}

#[tokio::test]
async fn test_resolve_withEmptyListedName_shouldFallBackToIsoName() -> Result<()> {
    let languages = listing(&[("en", "English"), ("el", "")]);
    let translator = MockTranslator::working().with_languages(SupportedLanguages::symmetric(languages.clone()));
    let speech = MockSpeech::working().with_languages(languages);

    let resolved = resolver(&translator, &speech)
        .resolve(&request("en", "el", None, true))
        .await?;

    assert!(resolved.target_name.contains("Greek"));
    Ok(())
}

#[tokio::test]
async fn test_resolve_withOnlyRegionalEnglishTargets_shouldAcceptDefaultVerification() -> Result<()> {
    let translator = MockTranslator::working().with_name("DeepL").with_languages(SupportedLanguages {
        sources: listing(&[("el", "Greek"), ("en", "English")]),
        targets: listing(&[
            ("el", "Greek"),
            ("en-gb", "English (British)"),
            ("en-us", "English (American)"),
        ]),
    });
    let speech = MockSpeech::working();

    let resolved = resolver(&translator, &speech)
        .resolve(&request("en", "el", None, true))
        .await?;

    assert_eq!(resolved.verification_language, "en");
    assert_eq!(resolved.verification_name, "English (American)");
    assert_eq!(resolved.source_name, "English");
    assert_eq!(translator.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_resolve_withSingleRegionalVariant_shouldUseIt() -> Result<()> {
    let mut targets = default_languages();
    targets.insert("pt-br".to_string(), "Portuguese (Brazilian)".to_string());
    let translator = MockTranslator::working().with_languages(SupportedLanguages {
        sources: default_languages(),
        targets,
    });
    let mut spoken = default_languages();
    spoken.insert("pt".to_string(), "Portuguese".to_string());
    let speech = MockSpeech::working().with_languages(spoken);

    let resolved = resolver(&translator, &speech)
        .resolve(&request("en", "pt", None, false))
        .await?;

    assert_eq!(resolved.target_language, "pt");
    assert_eq!(resolved.target_name, "Portuguese (Brazilian)");
    Ok(())
}

#[tokio::test]
async fn test_resolve_withSeveralVariantsAndNoDefault_shouldFail() {
    let mut targets = default_languages();
    targets.insert("zh-hans".to_string(), "Chinese (simplified)".to_string());
    targets.insert("zh-hant".to_string(), "Chinese (traditional)".to_string());
    let translator = MockTranslator::working().with_languages(SupportedLanguages {
        sources: default_languages(),
        targets,
    });
    let speech = MockSpeech::working();

    let result = resolver(&translator, &speech)
        .resolve(&request("en", "zh", None, false))
        .await;

    assert!(matches!(
        result,
        Err(LanguageError::Unsupported { role: LanguageRole::Target, ref code, .. }) if code == "zh"
    ));
}
