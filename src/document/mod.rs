/*!
 * Document model for paragraph translation.
 *
 * This module provides the document model shared by the parsers and the
 * translation layer:
 * - Typed paragraph units with stable ids and reading order
 * - Per-paragraph translation state
 * - Document metadata and the final translated document envelope
 */

pub mod model;

// Re-export types used by other modules
pub use model::{
    normalize_title, DocumentMetadata, ParagraphKind, ParagraphMetadata, ParsedDocument,
    ParsedParagraph, SourceFormat, TranslatedDocument, TranslationStatus, DEFAULT_TITLE,
    MAX_PARAGRAPHS, MAX_TITLE_CHARS,
};
