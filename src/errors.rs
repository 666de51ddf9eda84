/*!
 * Error types for the doctra pipeline.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Fetch and parse errors abort a request before any translation starts.
 * Provider errors are always recovered inside the translation layer.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Missing or placeholder credential
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider answered, but with nothing usable
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// The call did not finish within the allotted time
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors raised while retrieving a remote document
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request never produced a response
    #[error("Failed to fetch URL {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// The server answered with a non-2xx status
    #[error("Failed to fetch URL {url}: {status} {status_text}")]
    Status {
        url: String,
        status: u16,
        status_text: String,
    },
}

/// Errors raised while turning raw input into paragraphs
#[derive(Error, Debug)]
pub enum ParseError {
    /// The input parsed, but produced no usable paragraph
    #[error("No translatable content found in the document. Try a specific documentation page instead of the homepage.")]
    NoContent,

    /// The input was empty before parsing
    #[error("Content is required")]
    EmptyInput,
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The request was rejected before reaching the pipeline
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Work stopped because the caller cancelled it
    #[error("Translation cancelled")]
    Cancelled,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error while fetching a document
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error while parsing a document
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
