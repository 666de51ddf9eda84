/*!
 * Prompt construction for document translation.
 *
 * This module provides:
 * - Instruction templates for each translation mode
 * - Glossary and context blocks injected ahead of the text
 * - Numbered batch prompts whose markers restart at `[1]` for every batch
 */

pub mod templates;

// Re-export main types
pub use templates::{PromptTemplate, TranslationPromptBuilder};
