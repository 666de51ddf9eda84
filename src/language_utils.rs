use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating, normalizing, and
/// naming ISO 639-1 (2-letter) and ISO 639-2 (3-letter) language codes.
/// Language names feed both request validation and prompt construction.

/// Map an ISO 639-2/B code to its ISO 639-2/T equivalent, if it differs
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    let part2t = match code {
        "fre" => "fra", // French
        "ger" => "deu", // German
        "dut" => "nld", // Dutch
        "gre" => "ell", // Greek
        "chi" => "zho", // Chinese
        "cze" => "ces", // Czech
        "ice" => "isl", // Icelandic
        "alb" => "sqi", // Albanian
        "arm" => "hye", // Armenian
        "baq" => "eus", // Basque
        "bur" => "mya", // Burmese
        "per" => "fas", // Persian
        "geo" => "kat", // Georgian
        "may" => "msa", // Malay
        "mac" => "mkd", // Macedonian
        "rum" => "ron", // Romanian
        "slo" => "slk", // Slovak
        "wel" => "cym", // Welsh
        _ => return None,
    };
    Some(part2t)
}

/// Resolve a 2- or 3-letter code to an isolang language
fn lookup_language(code: &str) -> Option<Language> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => {
            let part2t = bibliographic_to_terminology(&normalized_code).unwrap_or(&normalized_code);
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<()> {
    lookup_language(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    lookup_language(code)
        .map(|lang| lang.to_639_3().to_string())
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (lookup_language(code1), lookup_language(code2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let lang = lookup_language(code)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}

/// Name of the language in the language itself, used as the answer cue in prompts.
///
/// Languages the product ships prompts for use a fixed short form; anything
/// else falls back to the isolang autonym and finally the English name.
pub fn native_language_name(code: &str) -> String {
    let Some(lang) = lookup_language(code) else {
        return code.to_string();
    };

    let fixed = match lang.to_639_3() {
        "eng" => Some("English"),
        "zho" => Some("中文"),
        "jpn" => Some("日本語"),
        "kor" => Some("한국어"),
        "fra" => Some("Français"),
        "deu" => Some("Deutsch"),
        _ => None,
    };

    fixed
        .or_else(|| lang.to_autonym())
        .unwrap_or_else(|| lang.to_name())
        .to_string()
}

/// English name for prompts, falling back to the raw code for unknown input
pub fn prompt_language_name(code: &str) -> String {
    get_language_name(code).unwrap_or_else(|_| code.to_string())
}
