/*!
 * Tests for language code utilities
 */

use doctra::language_utils::{
    get_language_name, language_codes_match, native_language_name, normalize_to_part2t,
    prompt_language_name, validate_language_code,
};

/// Test that language codes in both formats validate
#[test]
fn test_validate_language_code_withValidCodes_shouldSucceed() {
    for code in ["en", "fr", "zh", "eng", "fra", "fre", "ger", "chi"] {
        assert!(validate_language_code(code).is_ok(), "{} should be valid", code);
    }
}

/// Test that invalid codes are rejected
#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    for code in ["", "e", "xx", "xyz", "english"] {
        assert!(validate_language_code(code).is_err(), "{} should be invalid", code);
    }
}

/// Test normalization to ISO 639-2/T
#[test]
fn test_normalize_to_part2t_shouldMapBibliographicCodes() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("chi").unwrap(), "zho");
    assert!(normalize_to_part2t("xx").is_err());
}

/// Test code matching across formats
#[test]
fn test_language_codes_match_acrossFormats_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("zh", "chi"));
    assert!(language_codes_match("DE", "ger"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("xx", "xx"));
}

/// Test English and native names
#[test]
fn test_language_names_shouldResolveForPrompts() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(native_language_name("zh"), "中文");
    assert_eq!(native_language_name("deu"), "Deutsch");
    assert_eq!(native_language_name("qq"), "qq");
    assert_eq!(prompt_language_name("en"), "English");
    assert_eq!(prompt_language_name("qq"), "qq");
}
