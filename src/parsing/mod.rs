/*!
 * Content parsers that turn raw input into ordered paragraph units.
 *
 * - `detect`: cheap format classification (HTML, Markdown, plain text)
 * - `html`: DOM-based extraction with anchor scoping
 * - `markdown`: line-oriented block state machine
 * - `text`: blank-line block splitting
 *
 * Every parser is a pure function of its input and returns a `ParsedDocument`
 * whose paragraphs are numbered contiguously from 1 and capped at
 * `MAX_PARAGRAPHS`.
 */

pub mod detect;
pub mod html;
pub mod markdown;
pub mod text;

pub use detect::{detect_format, ContentFormat};
pub use html::HtmlParser;
pub use markdown::MarkdownParser;
pub use text::PlainTextParser;

use log::debug;

use crate::document::{
    ParagraphKind, ParagraphMetadata, ParsedDocument, ParsedParagraph, SourceFormat,
};

/// Blocks whose trimmed text is shorter than this are dropped.
pub const MIN_BLOCK_CHARS: usize = 3;

/// Detect the format of `content` and run the matching parser.
pub fn parse_content(content: &str, source: &str) -> ParsedDocument {
    let format = detect_format(content);
    debug!("Detected {:?} content ({} bytes)", format, content.len());
    parse_with_format(content, source, format)
}

/// Run the parser for an already known `format`.
pub fn parse_with_format(content: &str, source: &str, format: ContentFormat) -> ParsedDocument {
    match format {
        ContentFormat::Html => HtmlParser::new().parse(content, source, SourceFormat::Html, None),
        ContentFormat::Markdown => MarkdownParser::parse(content, source),
        ContentFormat::Text => PlainTextParser::parse(content, source),
    }
}

/// Collects paragraphs and hands out `order`/`id` pairs in sequence.
#[derive(Debug, Default)]
pub(crate) struct ParagraphSink {
    paragraphs: Vec<ParsedParagraph>,
}

impl ParagraphSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a paragraph unless it is shorter than `MIN_BLOCK_CHARS`.
    pub(crate) fn push(
        &mut self,
        kind: ParagraphKind,
        text: impl Into<String>,
        metadata: Option<ParagraphMetadata>,
    ) -> bool {
        let text = text.into();
        if char_len(text.trim()) < MIN_BLOCK_CHARS {
            return false;
        }
        self.append(kind, text, metadata);
        true
    }

    /// Append a paragraph without the length check.
    pub(crate) fn append(
        &mut self,
        kind: ParagraphKind,
        text: impl Into<String>,
        metadata: Option<ParagraphMetadata>,
    ) {
        let order = self.paragraphs.len() + 1;
        self.paragraphs
            .push(ParsedParagraph::new(order, kind, text, metadata));
    }

    pub(crate) fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub(crate) fn into_paragraphs(self) -> Vec<ParsedParagraph> {
        self.paragraphs
    }
}

/// Length in characters, not bytes.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Normalize Windows line endings so line-based parsers see `\n` only.
pub(crate) fn normalize_newlines(content: &str) -> String {
    content.replace("\r\n", "\n")
}
