/*!
 * Tests for batch translation against scripted providers
 */

use std::sync::{Arc, Mutex};

use doctra::app_config::{BatchOptions, DispatchMode};
use doctra::document::{ParagraphKind, ParsedParagraph, TranslationStatus};
use doctra::providers::mock::MockProvider;
use doctra::providers::Provider;
use doctra::translation::{
    BatchContext, BatchSummary, BatchTranslator, CancellationFlag, Glossary, TranslationService,
};

use crate::common::mock_providers::{MockErrorType, ScriptedProvider};

fn options(batch_size: usize) -> BatchOptions {
    BatchOptions {
        batch_size,
        batch_delay_ms: 0,
        ..BatchOptions::default()
    }
}

fn translator(provider: Arc<dyn Provider>, options: BatchOptions) -> BatchTranslator {
    let service = TranslationService::with_provider(Some(provider), Arc::new(Glossary::default()));
    BatchTranslator::new(service, options)
}

fn prose(texts: &[&str]) -> Vec<ParsedParagraph> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| ParsedParagraph::new(i + 1, ParagraphKind::Paragraph, *text, None))
        .collect()
}

async fn run(translator: &BatchTranslator, paragraphs: &mut [ParsedParagraph]) -> BatchSummary {
    translator
        .translate_document(paragraphs, &BatchContext::new("en", "zh"), &CancellationFlag::new(), |_| {})
        .await
}

/// Test that a response missing its last marker only loses that slot
#[tokio::test]
async fn test_translate_document_withMissingLastMarker_shouldFallBackForThatSlot() {
    let provider = Arc::new(ScriptedProvider::answering("scripted", "[1] 一\n\n[2] 二", 1));
    let translator = translator(provider, options(10));
    let mut paragraphs = prose(&["One thing", "Two things", "Hello"]);

    let summary = run(&translator, &mut paragraphs).await;

    assert_eq!(paragraphs[0].translated.as_deref(), Some("一"));
    assert_eq!(paragraphs[1].translated.as_deref(), Some("二"));
    assert_eq!(paragraphs[2].translated.as_deref(), Some("你好"));
    assert!(paragraphs.iter().all(|p| p.translation_status == TranslationStatus::Completed));
    assert_eq!(summary.translated, 2);
    assert_eq!(summary.fallback, 1);
}

/// Test a response without any markers
#[tokio::test]
async fn test_translate_document_withUnnumberedResponse_shouldUseBlockOrder() {
    let provider = Arc::new(ScriptedProvider::answering("scripted", "第一段\n\n第二段\n", 1));
    let translator = translator(provider, options(10));
    let mut paragraphs = prose(&["First paragraph", "Second paragraph"]);

    let summary = run(&translator, &mut paragraphs).await;

    assert_eq!(paragraphs[0].translated.as_deref(), Some("第一段"));
    assert_eq!(paragraphs[1].translated.as_deref(), Some("第二段"));
    assert_eq!(summary.translated, 2);
}

/// Test that batches are dispatched in order with their own numbering
#[tokio::test]
async fn test_translate_document_withSeveralBatches_shouldNumberEachBatchFromOne() {
    let provider = Arc::new(ScriptedProvider::new(
        "scripted",
        vec![
            Ok("[1] a1\n\n[2] a2".to_string()),
            Ok("[1] b1\n\n[2] b2".to_string()),
            Ok("[1] c1".to_string()),
        ],
    ));
    let tracker = provider.tracker();
    let translator = translator(provider, options(2));
    let mut paragraphs = prose(&["p one", "p two", "p three", "p four", "p five"]);

    let summary = run(&translator, &mut paragraphs).await;

    let translated: Vec<&str> = paragraphs.iter().filter_map(|p| p.translated.as_deref()).collect();
    assert_eq!(translated, vec!["a1", "a2", "b1", "b2", "c1"]);
    assert_eq!(summary.batches, 3);

    let tracker = tracker.lock().unwrap();
    assert_eq!(tracker.call_count, 3);
    assert!(tracker.prompts[1].contains("[1] p three\n\n[2] p four"));
    assert!(tracker.prompts[2].contains("The text contains 1 numbered paragraphs"));
}

/// Test that code and table paragraphs are never sent out
#[tokio::test]
async fn test_translate_document_withCodeAndTable_shouldPassThem() {
    let provider = Arc::new(ScriptedProvider::answering("scripted", "[1] 翻译", 1));
    let tracker = provider.tracker();
    let translator = translator(provider, options(10));
    let mut paragraphs = vec![
        ParsedParagraph::new(1, ParagraphKind::Code, "let x = 1;", None),
        ParsedParagraph::new(2, ParagraphKind::Paragraph, "Translate me", None),
        ParsedParagraph::new(3, ParagraphKind::Table, "a | b", None),
    ];

    let summary = run(&translator, &mut paragraphs).await;

    assert_eq!(paragraphs[0].translated.as_deref(), Some("let x = 1;"));
    assert_eq!(paragraphs[1].translated.as_deref(), Some("翻译"));
    assert_eq!(paragraphs[2].translated.as_deref(), Some("a | b"));
    assert_eq!(summary.passthrough, 2);

    let tracker = tracker.lock().unwrap();
    assert!(!tracker.prompts[0].contains("let x = 1;"));
    assert!(!tracker.prompts[0].contains("a | b"));
}

/// Test the document title as prompt context
#[tokio::test]
async fn test_translate_document_withTitle_shouldSendContext() {
    let provider = Arc::new(ScriptedProvider::answering("scripted", "[1] 你好", 1));
    let tracker = provider.tracker();
    let translator = translator(provider, options(10));
    let mut paragraphs = prose(&["Hello"]);
    let context = BatchContext::new("en", "zh").with_document_title("Service Guide");

    translator
        .translate_document(&mut paragraphs, &context, &CancellationFlag::new(), |_| {})
        .await;

    let tracker = tracker.lock().unwrap();
    assert!(tracker.prompts[0].contains("Context:\nThese paragraphs belong to the document \"Service Guide\"."));
}

/// Test failures without the offline fallback
#[tokio::test]
async fn test_translate_document_withErrorsAndNoFallback_shouldMarkFailed() {
    let provider = Arc::new(ScriptedProvider::new("scripted", vec![Err(MockErrorType::RateLimit)]));
    let translator = translator(
        provider,
        BatchOptions {
            fallback_to_offline: false,
            ..options(10)
        },
    );
    let mut paragraphs = prose(&["Hello", "World wide"]);

    let summary = run(&translator, &mut paragraphs).await;

    assert_eq!(paragraphs[0].translated.as_deref(), Some("[Translation failed] Hello"));
    assert!(paragraphs.iter().all(|p| p.translation_status == TranslationStatus::Error));
    assert_eq!(summary.failed, 2);
}

/// Test per-paragraph dispatch with intermittent failures
#[tokio::test]
async fn test_translate_document_perParagraphWithIntermittentProvider_shouldRecoverFailures() {
    let provider = Arc::new(MockProvider::intermittent(2));
    let translator = translator(
        provider.clone(),
        BatchOptions {
            mode: DispatchMode::PerParagraph,
            ..options(1)
        },
    );
    let mut paragraphs = prose(&["alpha one", "beta two", "gamma three", "delta four"]);

    let summary = run(&translator, &mut paragraphs).await;

    assert_eq!(provider.request_count(), 4);
    assert_eq!(summary.translated, 2);
    assert_eq!(summary.fallback, 2);
    assert_eq!(paragraphs[0].translated.as_deref(), Some("[TRANSLATED] alpha one"));
    assert_eq!(paragraphs[1].translated.as_deref(), Some("betatwo"));
}

/// Test cancelling from the progress callback
#[test]
fn test_translate_document_cancelledAfterFirstBatch_shouldStopDispatching() {
    let provider = Arc::new(MockProvider::working());
    let translator = translator(provider.clone(), options(1));
    let mut paragraphs = prose(&["first one", "second one", "third one"]);
    let cancel = CancellationFlag::new();
    let batches_seen = Mutex::new(0);

    let summary = tokio_test::block_on(translator.translate_document(
        &mut paragraphs,
        &BatchContext::new("en", "zh"),
        &cancel,
        |_| {
            *batches_seen.lock().unwrap() += 1;
            cancel.cancel();
        },
    ));

    assert_eq!(*batches_seen.lock().unwrap(), 1);
    assert_eq!(provider.request_count(), 1);
    assert!(summary.cancelled);
    assert_eq!(summary.pending, 2);
    assert_eq!(paragraphs[0].translation_status, TranslationStatus::Completed);
    assert_eq!(paragraphs[1].translation_status, TranslationStatus::Pending);
}
