/*!
 * End-to-end tests for the document pipeline
 */

use std::sync::{Arc, Mutex};

use doctra::document::{ParagraphKind, TranslationStatus};
use doctra::errors::{AppError, FetchError, ParseError, TranslationError};
use doctra::pipeline::{DocumentPipeline, RequestInput, TranslationRequest};
use doctra::providers::mock::MockProvider;
use doctra::translation::{CancellationFlag, Glossary};

use crate::common::{self, StaticFetcher, SAMPLE_HTML, SAMPLE_MARKDOWN};

const GUIDE_URL: &str = "https://docs.example.com/guide";

fn guide_fetcher() -> Arc<StaticFetcher> {
    Arc::new(StaticFetcher::with_page(GUIDE_URL, SAMPLE_HTML))
}

/// Test translating uploaded Markdown
#[tokio::test]
async fn test_translate_withMarkdownContent_shouldCompleteEveryParagraph() {
    let pipeline = common::pipeline_with(Arc::new(MockProvider::working()), guide_fetcher());
    let request = TranslationRequest::from_content(SAMPLE_MARKDOWN, "en", "zh");

    let (translated, summary) = pipeline
        .translate(&request, &CancellationFlag::new(), |_| {})
        .await
        .unwrap();

    let document = &translated.document;
    assert_eq!(document.title, "Title");
    assert_eq!(document.metadata.source, "upload");
    assert_eq!(document.paragraphs.len(), 3);
    assert_eq!(document.paragraphs[0].translated.as_deref(), Some("[TRANSLATED] Title"));
    assert_eq!(document.paragraphs[1].translated.as_deref(), Some("[TRANSLATED] Hello world."));
    assert_eq!(document.paragraphs[2].translated.as_deref(), Some("[TRANSLATED] • a\n• b"));
    assert!(document.is_fully_processed());

    assert_eq!(summary.batches, 1);
    assert_eq!(summary.translated, 3);
    assert_eq!(translated.status_counts(), (3, 0));
    assert_eq!(translated.source_language, "en");
    assert_eq!(translated.target_language, "zh");
}

/// Test a URL whose fragment scopes the page
#[tokio::test]
async fn test_translate_withAnchoredUrl_shouldFetchPageWithoutFragment() {
    let fetcher = guide_fetcher();
    let pipeline = common::pipeline_with(Arc::new(MockProvider::working()), fetcher.clone());
    let request = TranslationRequest::from_url("https://docs.example.com/guide#install", "en", "zh");

    let (translated, summary) = pipeline
        .translate(&request, &CancellationFlag::new(), |_| {})
        .await
        .unwrap();

    assert_eq!(fetcher.requested(), vec![GUIDE_URL.to_string()]);
    assert_eq!(translated.document.metadata.source, GUIDE_URL);
    assert_eq!(translated.document.paragraphs.len(), 6);
    assert_eq!(translated.document.paragraphs[0].original, "Install");

    // The shell snippet is returned untouched
    let code = translated
        .document
        .paragraphs
        .iter()
        .find(|p| p.kind == ParagraphKind::Code)
        .unwrap();
    assert_eq!(code.translated.as_deref(), Some(code.original.as_str()));
    assert_eq!(code.translation_status, TranslationStatus::Completed);

    assert_eq!(summary.passthrough, 1);
    assert_eq!(summary.translated, 5);
}

/// Test that translation never renumbers paragraphs
#[tokio::test]
async fn test_translate_shouldKeepParsedIdsAndOrder() {
    let pipeline = common::pipeline_with(Arc::new(MockProvider::partial_markers()), guide_fetcher());
    let parsed = pipeline.parse(&RequestInput::Url(GUIDE_URL.to_string())).await.unwrap();

    let request = TranslationRequest::from_url(GUIDE_URL, "en", "zh");
    let (translated, _) = pipeline
        .translate(&request, &CancellationFlag::new(), |_| {})
        .await
        .unwrap();

    let before: Vec<(&str, usize, &str)> = parsed
        .paragraphs
        .iter()
        .map(|p| (p.id.as_str(), p.order, p.original.as_str()))
        .collect();
    let after: Vec<(&str, usize, &str)> = translated
        .document
        .paragraphs
        .iter()
        .map(|p| (p.id.as_str(), p.order, p.original.as_str()))
        .collect();
    assert_eq!(before, after);
}

/// Test the offline-only path with a custom glossary
#[tokio::test]
async fn test_translate_offlineOnly_shouldUseGlossaryAndDictionary() {
    let glossary = Arc::new(Glossary::from_pairs(&[("VPC", "虚拟私有云")]));
    let pipeline = DocumentPipeline::new(common::test_config(), glossary).offline_only();
    let request = TranslationRequest::from_content("Hello\n\nVPC config", "en", "zh");

    let (translated, summary) = pipeline
        .translate(&request, &CancellationFlag::new(), |_| {})
        .await
        .unwrap();

    let texts: Vec<Option<&str>> = translated
        .document
        .paragraphs
        .iter()
        .map(|p| p.translated.as_deref())
        .collect();
    assert_eq!(texts, vec![Some("你好"), Some("虚拟私有云 (VPC) config")]);
    assert_eq!(summary.fallback, 2);
    assert_eq!(summary.failed, 0);
}

/// Test a page the server does not have
#[tokio::test]
async fn test_translate_withMissingPage_shouldReturnFetchError() {
    let pipeline = common::pipeline_with(Arc::new(MockProvider::working()), guide_fetcher());
    let request = TranslationRequest::from_url("https://docs.example.com/missing", "en", "zh");

    let result = pipeline.translate(&request, &CancellationFlag::new(), |_| {}).await;
    match result {
        Err(AppError::Fetch(FetchError::Status { status, .. })) => assert_eq!(status, 404),
        other => panic!("Expected fetch error, got {:?}", other.err()),
    }
}

/// Test content that yields no paragraphs
#[tokio::test]
async fn test_translate_withTooShortContent_shouldReturnNoContent() {
    let pipeline = common::pipeline_with(Arc::new(MockProvider::working()), guide_fetcher());
    let request = TranslationRequest::from_content("ok", "en", "zh");

    let result = pipeline.translate(&request, &CancellationFlag::new(), |_| {}).await;
    assert!(matches!(result, Err(AppError::Parse(ParseError::NoContent))));
}

/// Test request validation ahead of any work
#[tokio::test]
async fn test_translate_withInvalidLanguage_shouldRejectRequest() {
    let fetcher = guide_fetcher();
    let pipeline = common::pipeline_with(Arc::new(MockProvider::working()), fetcher.clone());
    let request = TranslationRequest::from_url(GUIDE_URL, "en", "klingon");

    let result = pipeline.translate(&request, &CancellationFlag::new(), |_| {}).await;
    assert!(matches!(result, Err(AppError::Translation(TranslationError::InvalidRequest(_)))));
    assert!(fetcher.requested().is_empty());
}

/// Test the per-request paragraph limit
#[tokio::test]
async fn test_translate_withParagraphLimit_shouldTruncateDocument() {
    let mut config = common::test_config();
    config.translation.common.max_paragraphs_per_request = 2;
    let provider = Arc::new(MockProvider::working());
    let pipeline = DocumentPipeline::new(config, Arc::new(Glossary::bundled()))
        .with_fetcher(guide_fetcher())
        .with_provider(provider.clone());

    let request = TranslationRequest::from_content(SAMPLE_MARKDOWN, "en", "zh");
    let (translated, summary) = pipeline
        .translate(&request, &CancellationFlag::new(), |_| {})
        .await
        .unwrap();

    assert_eq!(translated.document.paragraphs.len(), 2);
    assert_eq!(translated.document.metadata.total_paragraphs, 3);
    assert_eq!(summary.translated, 2);
    assert_eq!(provider.request_count(), 1);
}

/// Test a request cancelled before the first batch
#[tokio::test]
async fn test_translate_whenCancelled_shouldLeaveParagraphsPending() {
    let provider = Arc::new(MockProvider::working());
    let pipeline = common::pipeline_with(provider.clone(), guide_fetcher());
    let cancel = CancellationFlag::new();
    cancel.cancel();

    let request = TranslationRequest::from_content(SAMPLE_MARKDOWN, "en", "zh");
    let (translated, summary) = pipeline.translate(&request, &cancel, |_| {}).await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.pending, 3);
    assert_eq!(provider.request_count(), 0);
    assert!(translated
        .document
        .paragraphs
        .iter()
        .all(|p| p.translation_status == TranslationStatus::Pending && p.translated.is_none()));
}

/// Test progress reporting through the pipeline
#[tokio::test]
async fn test_translate_withSmallBatches_shouldReportEachBatch() {
    let mut config = common::test_config();
    config.translation.common.batch.batch_size = 3;
    let pipeline = DocumentPipeline::new(config, Arc::new(Glossary::bundled()))
        .with_fetcher(guide_fetcher())
        .with_provider(Arc::new(MockProvider::working()));

    let seen = Mutex::new(Vec::new());
    let request = TranslationRequest::from_url(GUIDE_URL, "en", "zh");
    let (_, summary) = pipeline
        .translate(&request, &CancellationFlag::new(), |progress| {
            seen.lock().unwrap().push((progress.batch, progress.paragraphs_done, progress.paragraphs_total));
        })
        .await
        .unwrap();

    // 8 paragraphs with code fifth, so the second batch sends only two
    assert_eq!(*seen.lock().unwrap(), vec![(1, 3, 7), (2, 5, 7), (3, 7, 7)]);
    assert_eq!(summary.batches, 3);
}

/// Test the JSON shape of the final document
#[tokio::test]
async fn test_translated_document_json_shouldUseCamelCaseFields() {
    let pipeline = common::pipeline_with(Arc::new(MockProvider::working()), guide_fetcher());
    let request = TranslationRequest::from_content(SAMPLE_MARKDOWN, "en", "zh");
    let (translated, _) = pipeline
        .translate(&request, &CancellationFlag::new(), |_| {})
        .await
        .unwrap();

    let json = serde_json::to_value(&translated).unwrap();
    assert_eq!(json["title"], "Title");
    assert_eq!(json["sourceLanguage"], "en");
    assert_eq!(json["metadata"]["format"], "markdown");
    assert_eq!(json["paragraphs"][0]["type"], "heading");
    assert_eq!(json["paragraphs"][0]["translationStatus"], "completed");
    assert_eq!(json["paragraphs"][0]["metadata"]["headingLevel"], 1);
    assert!(json["id"].as_str().is_some_and(|id| !id.is_empty()));
}
