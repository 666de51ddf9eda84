/*!
 * Tests for translation prompt building
 */

use doctra::app_config::TranslationMode;
use doctra::translation::{GlossaryTerm, PromptTemplate, TranslationPromptBuilder};

/// Test the batch prompt layout
#[test]
fn test_build_batch_shouldNumberParagraphsInOrder() {
    let prompt = TranslationPromptBuilder::new("en", "zh").build_batch(&["First", "Second", "Third"]);

    assert!(prompt.starts_with(&PromptTemplate::for_mode(TranslationMode::Professional).render("English", "Chinese")));
    assert!(prompt.contains("The text contains 3 numbered paragraphs."));
    assert!(prompt.contains("Text:\n[1] First\n\n[2] Second\n\n[3] Third\n\n中文:"));
    assert!(prompt.ends_with("中文:"));
}

/// Test glossary and context hints
#[test]
fn test_build_single_withHints_shouldPlaceThemBeforeText() {
    let prompt = TranslationPromptBuilder::new("en", "ja")
        .with_mode(TranslationMode::Casual)
        .with_glossary_terms(&[GlossaryTerm::new("CloudWatch", "CloudWatch")])
        .with_context("These paragraphs belong to the document \"Monitoring\".")
        .build_single("Open CloudWatch.");

    assert!(prompt.starts_with("Translate from English to Japanese in a simple, easy-to-understand way."));
    let glossary_at = prompt.find("Glossary Terms (Must use these translations):\n- CloudWatch: CloudWatch\n").unwrap();
    let context_at = prompt.find("Context:\nThese paragraphs belong").unwrap();
    let text_at = prompt.find("Text:\nOpen CloudWatch.").unwrap();
    assert!(glossary_at < context_at && context_at < text_at);
    assert!(prompt.ends_with("日本語:"));
}

/// Test that blank context is dropped
#[test]
fn test_with_context_withBlankText_shouldOmitContextBlock() {
    let prompt = TranslationPromptBuilder::new("en", "zh")
        .with_mode(TranslationMode::Summary)
        .with_context("   ")
        .build_single("Hello");

    assert!(!prompt.contains("Context:"));
    assert!(prompt.starts_with("Summarize and translate from English to Chinese."));
}
