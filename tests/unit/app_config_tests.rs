/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::fs;
use tempfile::TempDir;

use doctra::app_config::{
    is_placeholder_key, resolve_api_key, Config, DispatchMode, ProviderConfig, TranslationMode,
    TranslationProvider,
};

/// Test default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "zh");
    assert_eq!(config.translation.provider, TranslationProvider::Gemini);
    assert_eq!(config.translation.available_providers.len(), 4);
    assert_eq!(config.translation.common.mode, TranslationMode::Professional);
    assert_eq!(config.translation.common.max_paragraphs_per_request, 30);

    let batch = &config.translation.common.batch;
    assert_eq!(batch.batch_size, 10);
    assert_eq!(batch.batch_delay_ms, 500);
    assert_eq!(batch.mode, DispatchMode::Combined);
    assert!(batch.fallback_to_offline);

    assert!(config.validate().is_ok());
}

/// Test saving and loading a configuration file
#[test]
fn test_save_and_load_withModifiedConfig_shouldRoundTrip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.target_language = "ja".to_string();
    config.translation.provider = TranslationProvider::Claude;
    config.translation.common.batch.mode = DispatchMode::PerParagraph;
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.target_language, "ja");
    assert_eq!(loaded.translation.provider, TranslationProvider::Claude);
    assert_eq!(loaded.translation.common.batch.mode, DispatchMode::PerParagraph);

    Ok(())
}

/// Test that missing fields fall back to defaults when loading
#[test]
fn test_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("partial.json");
    fs::write(
        &path,
        r#"{"target_language": "fr", "translation": {"provider": "openai", "common": {"batch": {"batch_size": 4}}}}"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.translation.provider, TranslationProvider::OpenAI);
    assert_eq!(config.translation.common.batch.batch_size, 4);
    assert_eq!(config.translation.common.batch.batch_timeout_secs, 60);
    assert_eq!(config.translation.get_model(TranslationProvider::OpenAI), "gpt-4");

    Ok(())
}

/// Test loading an unreadable file
#[test]
fn test_from_file_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{ not json")?;

    assert!(Config::from_file(&path).is_err());
    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());
    Ok(())
}

/// Test validation of out-of-range values
#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.source_language = "xx".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.common.temperature = 2.5;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.common.batch.batch_size = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.available_providers.push(ProviderConfig {
        provider_type: "ollama".to_string(),
        ..ProviderConfig::new(TranslationProvider::Groq)
    });
    assert!(config.validate().is_err());
}

/// Test provider lookups and defaults
#[test]
fn test_provider_config_lookups_shouldUseDefaultsWhenBlank() {
    let mut config = Config::default();
    config.translation.available_providers[0].model = String::new();
    config.translation.available_providers[0].endpoint = String::new();
    config.translation.available_providers[0].timeout_secs = 0;

    let translation = &config.translation;
    assert_eq!(translation.get_model(TranslationProvider::Groq), "llama-3.3-70b-versatile");
    assert_eq!(translation.get_endpoint(TranslationProvider::Groq), "https://api.groq.com/openai/v1");
    assert_eq!(translation.get_timeout_secs(TranslationProvider::Groq), 30);
    assert_eq!(
        translation.get_provider_config(&translation.provider).map(|p| p.provider_type.as_str()),
        Some("gemini")
    );
}

/// Test provider name parsing
#[test]
fn test_translation_provider_from_str_shouldAcceptAliases() {
    assert_eq!("Gemini".parse::<TranslationProvider>().unwrap(), TranslationProvider::Gemini);
    assert_eq!("anthropic".parse::<TranslationProvider>().unwrap(), TranslationProvider::Claude);
    assert_eq!(" openai ".parse::<TranslationProvider>().unwrap(), TranslationProvider::OpenAI);
    assert!("ollama".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Groq.to_string(), "groq");
    assert_eq!("summary".parse::<TranslationMode>().unwrap(), TranslationMode::Summary);
}

/// Test API key resolution
#[test]
fn test_resolve_api_key_shouldIgnorePlaceholders() {
    assert!(is_placeholder_key(""));
    assert!(is_placeholder_key("your-gemini-api-key"));
    assert!(!is_placeholder_key("sk-live"));

    assert_eq!(resolve_api_key("sk-config", Some("sk-env".to_string())), Some("sk-config".to_string()));
    assert_eq!(resolve_api_key("your-key", Some(" sk-env ".to_string())), Some("sk-env".to_string()));
    assert_eq!(resolve_api_key("", Some("your-key".to_string())), None);
    assert_eq!(resolve_api_key("", None), None);
}
