/*!
 * Paragraph translation with provider fallback.
 *
 * This module contains the translation layer of the pipeline. It is split
 * into several submodules:
 *
 * - `core`: Translation service, provider selection and the fallback policy
 * - `batch`: Sequential batch processing of document paragraphs
 * - `glossary`: Glossary terms and longest-match substitution
 * - `offline`: Network-free dictionary translator
 * - `prompts`: Prompt templates and builders for translation
 * - `reassembly`: Splitting numbered batch responses back into paragraphs
 */

// Re-export main types for easier usage
pub use self::batch::{BatchContext, BatchProgress, BatchSummary, BatchTranslator, CancellationFlag};
pub use self::core::{TranslationOutcome, TranslationService};
pub use self::glossary::{Glossary, GlossaryMatcher, GlossaryTerm};
pub use self::offline::{OfflineDictionary, OfflineTranslator};
pub use self::reassembly::parse_batch_response;

// Re-export prompt types
pub use self::prompts::{PromptTemplate, TranslationPromptBuilder};

// Submodules
pub mod batch;
pub mod core;
pub mod glossary;
pub mod offline;
pub mod prompts;
pub mod reassembly;
