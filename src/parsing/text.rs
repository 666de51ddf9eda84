//! Plain-text parser: every blank-line separated block is one paragraph.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{ParagraphKind, ParsedDocument, SourceFormat, DEFAULT_TITLE};
use crate::parsing::{char_len, normalize_newlines, ParagraphSink};

/// First blocks shorter than this double as the title.
const MAX_TITLE_BLOCK_CHARS: usize = 100;

static BLOCK_SEPARATOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\n+").expect("Invalid block separator regex"));

/// Plain-text parser
pub struct PlainTextParser;

impl PlainTextParser {
    pub fn parse(text: &str, source: &str) -> ParsedDocument {
        let content = normalize_newlines(text);

        let mut sink = ParagraphSink::new();
        for block in BLOCK_SEPARATOR_REGEX.split(&content) {
            sink.push(ParagraphKind::Paragraph, block.trim(), None);
        }
        let paragraphs = sink.into_paragraphs();

        let title = paragraphs
            .first()
            .map(|p| p.original.as_str())
            .filter(|first| char_len(first) < MAX_TITLE_BLOCK_CHARS)
            .unwrap_or(DEFAULT_TITLE)
            .to_string();

        ParsedDocument::new(&title, paragraphs, source, SourceFormat::Text)
    }
}
