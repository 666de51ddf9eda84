/*!
 * Tests for error types and conversions
 */

use doctra::errors::{AppError, FetchError, ParseError, ProviderError, TranslationError};

/// Test provider error messages
#[test]
fn test_provider_error_display_shouldIncludeDetails() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "overloaded".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 503 - overloaded");
    assert_eq!(ProviderError::Timeout(60).to_string(), "Request timed out after 60 seconds");
}

/// Test fetch error messages
#[test]
fn test_fetch_error_display_shouldNameUrlAndStatus() {
    let error = FetchError::Status {
        url: "https://example.com/missing".to_string(),
        status: 404,
        status_text: "Not Found".to_string(),
    };
    assert_eq!(error.to_string(), "Failed to fetch URL https://example.com/missing: 404 Not Found");
}

/// Test conversion into the application error
#[test]
fn test_app_error_from_shouldWrapEachLayer() {
    let app: AppError = ParseError::NoContent.into();
    assert!(matches!(app, AppError::Parse(ParseError::NoContent)));
    assert!(app.to_string().starts_with("Parse error: No translatable content found"));

    let app: AppError = TranslationError::from(ProviderError::EmptyResponse("gemini".to_string())).into();
    assert!(matches!(app, AppError::Translation(TranslationError::Provider(_))));

    let app: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(app, AppError::File(_)));

    let app: AppError = anyhow::anyhow!("boom").into();
    assert_eq!(app.to_string(), "Unknown error: boom");
}
