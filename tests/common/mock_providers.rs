/*!
 * Mock provider implementations for testing
 *
 * These providers never touch the network. `ScriptedProvider` answers with
 * a queue of predetermined results and records every prompt it receives, so
 * tests can assert both on what was sent and on how responses were used.
 */

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use doctra::errors::ProviderError;
use doctra::providers::Provider;

/// Tracks API calls to ensure no actual external requests are made
#[derive(Debug, Default)]
pub struct ApiCallTracker {
    /// Count of mock API calls made
    pub call_count: usize,
    /// Every prompt received, in order
    pub prompts: Vec<String>,
}

/// Type of error to simulate
#[derive(Debug, Clone, Copy, Default)]
pub enum MockErrorType {
    /// Authentication error (invalid API key)
    #[default]
    Auth,
    /// Connection error
    Connection,
    /// Rate limit error
    RateLimit,
    /// API error
    Api,
}

impl MockErrorType {
    pub fn to_error(self) -> ProviderError {
        match self {
            MockErrorType::Auth => ProviderError::AuthenticationError("Invalid API key".to_string()),
            MockErrorType::Connection => ProviderError::ConnectionError("Connection refused".to_string()),
            MockErrorType::RateLimit => ProviderError::RateLimitExceeded("Too many requests".to_string()),
            MockErrorType::Api => ProviderError::ApiError {
                status_code: 500,
                message: "Internal server error".to_string(),
            },
        }
    }
}

/// Provider answering from a queue of scripted results
#[derive(Debug)]
pub struct ScriptedProvider {
    name: String,
    responses: Mutex<VecDeque<Result<String, MockErrorType>>>,
    tracker: Arc<Mutex<ApiCallTracker>>,
}

impl ScriptedProvider {
    /// Create a provider that answers `responses` in order, then fails
    pub fn new(name: &str, responses: Vec<Result<String, MockErrorType>>) -> Self {
        ScriptedProvider {
            name: name.to_string(),
            responses: Mutex::new(responses.into_iter().collect()),
            tracker: Arc::new(Mutex::new(ApiCallTracker::default())),
        }
    }

    /// Provider answering every call with the same text
    pub fn answering(name: &str, response: &str, calls: usize) -> Self {
        Self::new(name, vec![Ok(response.to_string()); calls])
    }

    /// Get the API call tracker
    pub fn tracker(&self) -> Arc<Mutex<ApiCallTracker>> {
        self.tracker.clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, prompt: &str) -> Result<String, ProviderError> {
        {
            let mut tracker = self.tracker.lock().unwrap();
            tracker.call_count += 1;
            tracker.prompts.push(prompt.to_string());
        }

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(error_type)) => Err(error_type.to_error()),
            None => Err(ProviderError::RequestFailed("No scripted response left".to_string())),
        }
    }
}
