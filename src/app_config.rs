use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Optional JSON glossary replacing the bundled one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glossary_path: Option<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Groq (OpenAI-compatible API)
    Groq,
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Anthropic Claude
    Claude,
    // @provider: OpenAI
    OpenAI,
}

impl TranslationProvider {
    pub const ALL: [TranslationProvider; 4] = [Self::Groq, Self::Gemini, Self::Claude, Self::OpenAI];

    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Groq => "Groq",
            Self::Gemini => "Gemini",
            Self::Claude => "Claude",
            Self::OpenAI => "OpenAI",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Groq => "groq".to_string(),
            Self::Gemini => "gemini".to_string(),
            Self::Claude => "claude".to_string(),
            Self::OpenAI => "openai".to_string(),
        }
    }

    // @returns: Environment variable holding the API key
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
            Self::Claude => "CLAUDE_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }

    // @returns: Confidence reported for translations from this provider
    pub fn confidence(&self) -> f32 {
        match self {
            Self::Groq => 0.95,
            Self::Gemini => 0.95,
            Self::Claude => 0.96,
            Self::OpenAI => 0.97,
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "gemini" => Ok(Self::Gemini),
            "claude" | "anthropic" => Ok(Self::Claude),
            "openai" => Ok(Self::OpenAI),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Style of translation requested from the provider
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    /// Precise, keeps technical terms
    #[default]
    Professional,
    /// Plain language for beginners
    Casual,
    /// Key points only
    Summary,
}

impl std::fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Summary => "summary",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for TranslationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "professional" => Ok(Self::Professional),
            "casual" => Ok(Self::Casual),
            "summary" => Ok(Self::Summary),
            _ => Err(anyhow!("Invalid translation mode: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key, falls back to the provider's environment variable
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model: default_model(provider_type),
            api_key: String::new(),
            endpoint: default_endpoint(provider_type),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// How paragraphs of one batch are sent to the provider
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// One numbered prompt per batch, split back into paragraphs afterwards
    #[default]
    Combined,
    /// One prompt per paragraph, sent concurrently within the batch
    PerParagraph,
}

/// Batching behaviour of the paragraph translator
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BatchOptions {
    /// Paragraphs per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Delay between batch dispatches in milliseconds
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    /// Upper bound for one batch, provider calls included
    #[serde(default = "default_batch_timeout_secs")]
    pub batch_timeout_secs: u64,

    /// Combined prompt or one call per paragraph
    #[serde(default)]
    pub mode: DispatchMode,

    /// Use the offline translator when the provider fails
    #[serde(default = "default_true")]
    pub fallback_to_offline: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
            batch_timeout_secs: default_batch_timeout_secs(),
            mode: DispatchMode::default(),
            fallback_to_offline: true,
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens a provider may generate per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Default translation style
    #[serde(default)]
    pub mode: TranslationMode,

    /// Paragraphs translated per document, 0 for no limit
    #[serde(default = "default_max_paragraphs_per_request")]
    pub max_paragraphs_per_request: usize,

    /// Batch settings
    #[serde(default)]
    pub batch: BatchOptions,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            mode: TranslationMode::default(),
            max_paragraphs_per_request: default_max_paragraphs_per_request(),
            batch: BatchOptions::default(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "zh".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    10
}

fn default_batch_delay_ms() -> u64 {
    500 // 500ms default delay between batches
}

fn default_batch_timeout_secs() -> u64 {
    60
}

fn default_max_paragraphs_per_request() -> usize {
    30
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_true() -> bool {
    true
}

fn default_model(provider: TranslationProvider) -> String {
    match provider {
        TranslationProvider::Groq => "llama-3.3-70b-versatile",
        TranslationProvider::Gemini => "gemini-2.0-flash",
        TranslationProvider::Claude => "claude-3-5-sonnet-20241022",
        TranslationProvider::OpenAI => "gpt-4",
    }
    .to_string()
}

fn default_endpoint(provider: TranslationProvider) -> String {
    match provider {
        TranslationProvider::Groq => "https://api.groq.com/openai/v1",
        TranslationProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        TranslationProvider::Claude => "https://api.anthropic.com",
        TranslationProvider::OpenAI => "https://api.openai.com/v1",
    }
    .to_string()
}

/// Keys that are empty or still hold a `your-...` template value count as absent.
pub fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || key.starts_with("your-")
}

/// Pick the configured key, else the environment value, ignoring placeholders.
pub fn resolve_api_key(configured: &str, from_env: Option<String>) -> Option<String> {
    if !is_placeholder_key(configured) {
        return Some(configured.trim().to_string());
    }
    from_env
        .filter(|key| !is_placeholder_key(key))
        .map(|key| key.trim().to_string())
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .context(format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        let common = &self.translation.common;
        if !(0.0..=2.0).contains(&common.temperature) {
            return Err(anyhow!(
                "Temperature must be between 0.0 and 2.0, got {}",
                common.temperature
            ));
        }

        if common.max_tokens == 0 {
            return Err(anyhow!("max_tokens must be greater than 0"));
        }

        if common.batch.batch_size == 0 {
            return Err(anyhow!("batch_size must be greater than 0"));
        }

        if common.batch.batch_timeout_secs == 0 {
            return Err(anyhow!("batch_timeout_secs must be greater than 0"));
        }

        // API keys are optional: a missing key routes translation to the offline fallback
        for provider_config in &self.translation.available_providers {
            provider_config
                .provider_type
                .parse::<TranslationProvider>()
                .context("Invalid entry in available_providers")?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            glossary_path: None,
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type.eq_ignore_ascii_case(&provider_str))
    }

    /// Get the model for a provider
    pub fn get_model(&self, provider: TranslationProvider) -> String {
        self.get_provider_config(&provider)
            .map(|p| p.model.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| default_model(provider))
    }

    /// Get the endpoint for a provider
    pub fn get_endpoint(&self, provider: TranslationProvider) -> String {
        self.get_provider_config(&provider)
            .map(|p| p.endpoint.clone())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| default_endpoint(provider))
    }

    /// Get the request timeout for a provider
    pub fn get_timeout_secs(&self, provider: TranslationProvider) -> u64 {
        self.get_provider_config(&provider)
            .map(|p| p.timeout_secs)
            .filter(|t| *t > 0)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Get a usable API key for a provider, from the config or the environment
    pub fn get_api_key(&self, provider: TranslationProvider) -> Option<String> {
        let configured = self
            .get_provider_config(&provider)
            .map(|p| p.api_key.as_str())
            .unwrap_or_default();
        resolve_api_key(configured, std::env::var(provider.api_key_env_var()).ok())
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: TranslationProvider::ALL
                .iter()
                .map(|p| ProviderConfig::new(*p))
                .collect(),
            common: TranslationCommonConfig::default(),
        }
    }
}
