/*!
 * Google Gemini `generateContent` client.
 */

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{check_status, http_client, non_empty_text, request_error, GenerationSettings, Provider};

/// Harm categories sent with `BLOCK_NONE` so technical text is never filtered
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Gemini client
#[derive(Debug)]
pub struct Gemini {
    client: Client,
    api_key: String,
    /// Base URL up to the API version, e.g. `.../v1beta`
    endpoint: String,
    settings: GenerationSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
}

impl GeminiRequest {
    /// Single-turn request for `prompt`
    pub fn new(prompt: impl Into<String>, temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt.into() }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens,
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: category.to_string(),
                    threshold: "BLOCK_NONE".to_string(),
                })
                .collect(),
        }
    }
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, settings: GenerationSettings) -> Self {
        Self {
            client: http_client(settings.timeout_secs),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            settings,
        }
    }

    /// Run a `generateContent` call
    pub async fn complete(&self, request: GeminiRequest) -> Result<GeminiResponse, ProviderError> {
        let base = if self.endpoint.is_empty() {
            "https://generativelanguage.googleapis.com/v1beta"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        let api_url = format!("{}/models/{}:generateContent", base, self.settings.model);

        let response = self.client.post(&api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| request_error("Gemini", e, self.settings.timeout_secs))?;

        let response = check_status("Gemini", response).await?;

        response.json::<GeminiResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Gemini response: {}", e)))
    }

    /// Text of the first part of the first candidate
    pub fn extract_text_from_response(response: &GeminiResponse) -> String {
        response.candidates.first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.first())
            .map(|part| part.text.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Provider for Gemini {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn translate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GeminiRequest::new(prompt, self.settings.temperature, self.settings.max_tokens);
        let response = self.complete(request).await?;
        non_empty_text(self.name(), &Self::extract_text_from_response(&response))
    }
}
