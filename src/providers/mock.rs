/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds, answering every numbered paragraph
 * - `MockProvider::partial_markers()` - Answers without the `[n]` markers
 * - `MockProvider::failing()` - Always fails with an error
 *
 * The mock reads the paragraphs back out of the prompt it receives, so it
 * exercises the same prompt layout the real providers get.
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::translation::reassembly::parse_batch_response;

static MARKER_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\[\d+\] ").expect("Invalid marker line regex"));

/// Prompt as seen by the mock
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// The full prompt
    pub prompt: String,
    /// Everything between `Text:` and the closing language cue
    pub text: String,
    /// Numbered paragraphs, empty for single-text prompts
    pub entries: Vec<String>,
}

impl MockRequest {
    /// Parse the text section and numbered entries out of a prompt
    pub fn from_prompt(prompt: &str) -> Self {
        let text = prompt
            .find("Text:\n")
            .map(|start| {
                let body = &prompt[start + "Text:\n".len()..];
                let end = body.rfind("\n\n").unwrap_or(body.len());
                body[..end].to_string()
            })
            .unwrap_or_else(|| prompt.to_string());

        let count = MARKER_LINE_REGEX.find_iter(&text).count();
        let entries = if count > 0 {
            parse_batch_response(&text, count)
        } else {
            Vec::new()
        };

        Self {
            prompt: prompt.to_string(),
            text,
            entries,
        }
    }
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Succeeds but drops the numbered markers
    PartialMarkers,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Answers only the first numbered paragraph
    Truncated,
    /// Returns an empty answer, which counts as a failure
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&MockRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that answers without markers
    pub fn partial_markers() -> Self {
        Self::new(MockBehavior::PartialMarkers)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that answers only the first paragraph
    pub fn truncated() -> Self {
        Self::new(MockBehavior::Truncated)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that sleeps before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far, clones included
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Generate a properly numbered batch response
    pub fn generate_batch_response<S: AsRef<str>>(entries: &[S]) -> String {
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("[{}] [TRANSLATED] {}", i + 1, entry.as_ref()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Generate a response with every marker missing
    pub fn generate_partial_response<S: AsRef<str>>(entries: &[S]) -> String {
        entries
            .iter()
            .map(|entry| format!("[TRANSLATED] {}", entry.as_ref()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn translated(&self, request: &MockRequest) -> String {
        if let Some(generator) = self.custom_response {
            return generator(request);
        }
        if request.entries.is_empty() {
            format!("[TRANSLATED] {}", request.text)
        } else {
            Self::generate_batch_response(&request.entries)
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate(&self, prompt: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        let request = MockRequest::from_prompt(prompt);

        match self.behavior {
            MockBehavior::Working => Ok(self.translated(&request)),

            MockBehavior::PartialMarkers => {
                if request.entries.is_empty() {
                    Ok(format!("[TRANSLATED] {}", request.text))
                } else {
                    Ok(Self::generate_partial_response(&request.entries))
                }
            }

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.translated(&request))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Truncated => {
                let first = request.entries.first().cloned().unwrap_or(request.text);
                Ok(format!("[1] [TRANSLATED] {}", first))
            }

            MockBehavior::Empty => Err(ProviderError::EmptyResponse(self.name().to_string())),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.translated(&request))
            }
        }
    }
}
