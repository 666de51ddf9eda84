/*!
 * OpenAI chat completions client.
 *
 * Groq exposes the same API under a different base URL, so one client
 * serves both; only the reported name and endpoint differ.
 */

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{check_status, http_client, non_empty_text, request_error, GenerationSettings, Provider};

const SYSTEM_PROMPT: &str = "You are a professional technical translator. Translate accurately and preserve formatting.";

/// OpenAI-compatible client
#[derive(Debug)]
pub struct OpenAI {
    /// Name reported to the pipeline (`openai` or `groq`)
    name: String,
    /// HTTP client for API requests
    client: Client,
    /// API key for bearer authentication
    api_key: String,
    /// Base URL up to and including the API version
    endpoint: String,
    /// Model and sampling parameters
    settings: GenerationSettings,
}

/// Chat completions request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

/// Chat completions response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,
    pub usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl OpenAIRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

impl OpenAI {
    pub fn new(
        name: impl Into<String>,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            name: name.into(),
            client: http_client(settings.timeout_secs),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            settings,
        }
    }

    /// Complete a chat request
    pub async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let base = if self.endpoint.is_empty() {
            "https://api.openai.com/v1"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        let api_url = format!("{}/chat/completions", base);

        let response = self.client.post(&api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| request_error(&self.name, e, self.settings.timeout_secs))?;

        let response = check_status(&self.name, response).await?;

        response.json::<OpenAIResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse {} response: {}", self.name, e)))
    }

    /// Text of the first choice, if any
    pub fn extract_text_from_response(response: &OpenAIResponse) -> String {
        response.choices.first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Provider for OpenAI {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = OpenAIRequest::new(&self.settings.model)
            .add_message("system", SYSTEM_PROMPT)
            .add_message("user", prompt)
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens);

        let response = self.complete(request).await?;
        if let Some(usage) = &response.usage {
            debug!("{} usage: {} prompt / {} completion tokens", self.name, usage.prompt_tokens, usage.completion_tokens);
        }
        non_empty_text(&self.name, &Self::extract_text_from_response(&response))
    }
}
