/*!
 * Core document model types for paragraph translation.
 *
 * These types provide a JSON-serializable representation of a parsed
 * document that preserves reading order, block structure, and per-paragraph
 * translation state.
 */

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of paragraphs a parser returns for one document.
pub const MAX_PARAGRAPHS: usize = 100;

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// Title used when nothing better can be extracted.
pub const DEFAULT_TITLE: &str = "Untitled Document";

/// Structural type of a paragraph unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphKind {
    Heading,
    Paragraph,
    Code,
    List,
    Table,
}

impl ParagraphKind {
    /// Whether paragraphs of this kind are sent to a translator.
    ///
    /// Code and tables pass through untouched.
    pub fn is_translatable(&self) -> bool {
        !matches!(self, Self::Code | Self::Table)
    }
}

/// Translation lifecycle of a single paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    #[default]
    Pending,
    Translating,
    Completed,
    Error,
}

impl TranslationStatus {
    /// Completed and error are terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// Where a parsed document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Url,
    Html,
    Markdown,
    Text,
}

/// Optional per-paragraph metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphMetadata {
    /// Heading level 1-6, headings only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_level: Option<u8>,

    /// Code fence or class language tag, code only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ParagraphMetadata {
    pub fn heading(level: u8) -> Self {
        Self {
            heading_level: Some(level),
            language: None,
        }
    }

    pub fn code(language: Option<String>) -> Option<Self> {
        language.filter(|l| !l.is_empty()).map(|language| Self {
            heading_level: None,
            language: Some(language),
        })
    }
}

/// A single translatable (or intentionally untranslatable) block.
///
/// `id` and `order` are fixed at creation. Only the translation fields
/// change afterwards, and only through the batch translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedParagraph {
    /// Stable identifier, `p-<order>`
    pub id: String,

    /// 1-based reading position
    pub order: usize,

    /// Structural type
    #[serde(rename = "type")]
    pub kind: ParagraphKind,

    /// Extracted source text
    pub original: String,

    /// Translated text, once available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,

    /// Current translation state
    #[serde(default)]
    pub translation_status: TranslationStatus,

    /// Heading level or code language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ParagraphMetadata>,
}

impl ParsedParagraph {
    /// Create a pending paragraph at the given 1-based position.
    pub fn new(
        order: usize,
        kind: ParagraphKind,
        original: impl Into<String>,
        metadata: Option<ParagraphMetadata>,
    ) -> Self {
        Self {
            id: format!("p-{}", order),
            order,
            kind,
            original: original.into(),
            translated: None,
            translation_status: TranslationStatus::Pending,
            metadata,
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        self.metadata.as_ref().and_then(|m| m.heading_level)
    }

    pub fn language(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.language.as_deref())
    }

    pub(crate) fn mark_translating(&mut self) {
        self.translation_status = TranslationStatus::Translating;
    }

    pub(crate) fn mark_completed(&mut self, translated: impl Into<String>) {
        self.translated = Some(translated.into());
        self.translation_status = TranslationStatus::Completed;
    }

    pub(crate) fn mark_failed(&mut self) {
        self.translated = Some(format!("[Translation failed] {}", self.original));
        self.translation_status = TranslationStatus::Error;
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Source URL or an upload marker
    pub source: String,

    /// Input format the document was parsed from
    pub format: SourceFormat,

    /// RFC 3339 timestamp of the parse
    pub extracted_at: String,

    /// Paragraph count before the cap was applied
    pub total_paragraphs: usize,
}

/// Result of parsing one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Best-effort title
    pub title: String,

    /// Ordered paragraph units, at most `MAX_PARAGRAPHS`
    pub paragraphs: Vec<ParsedParagraph>,

    /// Parse metadata
    pub metadata: DocumentMetadata,
}

impl ParsedDocument {
    /// Assemble a document, applying the paragraph cap and title rules.
    pub fn new(
        title: &str,
        mut paragraphs: Vec<ParsedParagraph>,
        source: &str,
        format: SourceFormat,
    ) -> Self {
        let total_paragraphs = paragraphs.len();
        paragraphs.truncate(MAX_PARAGRAPHS);

        Self {
            title: normalize_title(title),
            paragraphs,
            metadata: DocumentMetadata {
                source: source.to_string(),
                format,
                extracted_at: now_rfc3339(),
                total_paragraphs,
            },
        }
    }

    /// Paragraphs the translator will actually send out.
    pub fn translatable_paragraphs(&self) -> impl Iterator<Item = &ParsedParagraph> {
        self.paragraphs.iter().filter(|p| p.kind.is_translatable())
    }

    /// Check if every paragraph reached a terminal status.
    pub fn is_fully_processed(&self) -> bool {
        self.paragraphs
            .iter()
            .all(|p| p.translation_status.is_terminal())
    }
}

/// Final output of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedDocument {
    pub id: String,

    #[serde(flatten)]
    pub document: ParsedDocument,

    pub source_language: String,
    pub target_language: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TranslatedDocument {
    pub fn new(document: ParsedDocument, source_language: &str, target_language: &str) -> Self {
        let now = now_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            document,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Count paragraphs per terminal status: (completed, errored).
    pub fn status_counts(&self) -> (usize, usize) {
        self.document
            .paragraphs
            .iter()
            .fold((0, 0), |(done, failed), p| match p.translation_status {
                TranslationStatus::Completed => (done + 1, failed),
                TranslationStatus::Error => (done, failed + 1),
                _ => (done, failed),
            })
    }
}

/// Collapse whitespace runs and cut to `MAX_TITLE_CHARS` characters.
pub fn normalize_title(title: &str) -> String {
    let collapsed = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    collapsed.chars().take(MAX_TITLE_CHARS).collect()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
