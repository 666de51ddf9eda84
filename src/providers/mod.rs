/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported LLM providers:
 * - Gemini: Google Generative Language API
 * - Anthropic: Claude messages API
 * - OpenAI: OpenAI chat completions, also used for Groq's compatible API
 *
 * The pipeline only sees the `Provider` trait: a prompt goes in, plain text
 * comes out, and any failure is a `ProviderError`.
 */

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

pub mod anthropic;
pub mod gemini;
pub mod mock;
pub mod openai;

pub use anthropic::Anthropic;
pub use gemini::Gemini;
pub use openai::OpenAI;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Identifier used in logs and translation outcomes
    fn name(&self) -> &str;

    /// Send a prompt and return the provider's plain-text answer
    ///
    /// # Arguments
    /// * `prompt` - The complete prompt, instructions included
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The trimmed, non-empty answer or an error
    async fn translate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Generation parameters shared by every provider call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// HTTP timeout for one call
    pub timeout_secs: u64,
}

impl GenerationSettings {
    /// Settings for `provider` taken from the translation config
    pub fn from_config(provider: TranslationProvider, config: &TranslationConfig) -> Self {
        Self {
            model: config.get_model(provider),
            temperature: config.common.temperature,
            max_tokens: config.common.max_tokens,
            timeout_secs: config.get_timeout_secs(provider),
        }
    }
}

/// Build the provider selected by `provider`.
///
/// Fails with `AuthenticationError` when no usable API key exists, which the
/// translation service treats like any other provider failure.
pub fn create_provider(
    provider: TranslationProvider,
    config: &TranslationConfig,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config.get_api_key(provider).ok_or_else(|| {
        ProviderError::AuthenticationError(format!(
            "No API key configured for {} (set {} or the config api_key)",
            provider.display_name(),
            provider.api_key_env_var()
        ))
    })?;

    let endpoint = config.get_endpoint(provider);
    let settings = GenerationSettings::from_config(provider, config);

    let client: Arc<dyn Provider> = match provider {
        TranslationProvider::Gemini => Arc::new(Gemini::new(api_key, endpoint, settings)),
        TranslationProvider::Claude => Arc::new(Anthropic::new(api_key, endpoint, settings)),
        TranslationProvider::OpenAI => Arc::new(OpenAI::new("openai", api_key, endpoint, settings)),
        TranslationProvider::Groq => Arc::new(OpenAI::new("groq", api_key, endpoint, settings)),
    };
    Ok(client)
}

/// HTTP client with the per-call timeout applied
pub(crate) fn http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

/// Map a transport failure to a provider error
pub(crate) fn request_error(provider: &str, error: reqwest::Error, timeout_secs: u64) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout(timeout_secs)
    } else if error.is_connect() {
        ProviderError::ConnectionError(format!("{}: {}", provider, error))
    } else {
        ProviderError::RequestFailed(format!("Failed to send request to {}: {}", provider, error))
    }
}

/// Turn a non-2xx response into the matching provider error
pub(crate) async fn check_status(provider: &str, response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    log::error!("{} API error ({}): {}", provider, status, error_text);

    Err(match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(error_text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(error_text),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message: error_text,
        },
    })
}

/// Trim the answer, rejecting an empty one
pub(crate) fn non_empty_text(provider: &str, text: &str) -> Result<String, ProviderError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ProviderError::EmptyResponse(provider.to_string()));
    }
    Ok(text.to_string())
}
