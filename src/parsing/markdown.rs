/*!
 * Line-oriented Markdown parser.
 *
 * A single pass over the input with an explicit block state. Fenced code is
 * accumulated verbatim; headings are emitted immediately; list items and
 * prose accumulate until a blank line or a block change flushes them.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{
    ParagraphKind, ParagraphMetadata, ParsedDocument, SourceFormat, DEFAULT_TITLE,
};
use crate::parsing::{normalize_newlines, ParagraphSink};

const CODE_FENCE: &str = "```";

static HEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("Invalid heading regex"));

static LIST_MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*+]|\d+\.)\s+").expect("Invalid list marker regex"));

/// What the pending lines belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BlockState {
    Normal,
    Paragraph,
    List,
    Code { language: Option<String> },
}

/// Accumulates pending lines and flushes them into the sink.
struct BlockBuilder {
    state: BlockState,
    lines: Vec<String>,
    sink: ParagraphSink,
}

impl BlockBuilder {
    fn new() -> Self {
        Self {
            state: BlockState::Normal,
            lines: Vec::new(),
            sink: ParagraphSink::new(),
        }
    }

    /// Emit the pending block and return to the normal state.
    fn flush(&mut self) {
        let state = std::mem::replace(&mut self.state, BlockState::Normal);
        let lines = std::mem::take(&mut self.lines);
        if lines.is_empty() {
            return;
        }

        match state {
            BlockState::Code { language } => {
                self.sink.push(
                    ParagraphKind::Code,
                    strip_blank_edges(&lines),
                    ParagraphMetadata::code(language),
                );
            }
            BlockState::List => {
                self.sink
                    .push(ParagraphKind::List, lines.join("\n").trim(), None);
            }
            BlockState::Normal | BlockState::Paragraph => {
                self.sink
                    .push(ParagraphKind::Paragraph, lines.join("\n").trim(), None);
            }
        }
    }

    fn accumulate(&mut self, state: BlockState, line: String) {
        if self.state != state {
            self.flush();
            self.state = state;
        }
        self.lines.push(line);
    }
}

/// Markdown parser
pub struct MarkdownParser;

impl MarkdownParser {
    pub fn parse(markdown: &str, source: &str) -> ParsedDocument {
        let content = normalize_newlines(markdown);
        let mut builder = BlockBuilder::new();
        let mut title: Option<String> = None;

        for line in content.split('\n') {
            if let Some(rest) = line.strip_prefix(CODE_FENCE) {
                if matches!(builder.state, BlockState::Code { .. }) {
                    builder.flush();
                } else {
                    builder.flush();
                    let language = rest.trim();
                    builder.state = BlockState::Code {
                        language: (!language.is_empty()).then(|| language.to_string()),
                    };
                }
                continue;
            }

            if matches!(builder.state, BlockState::Code { .. }) {
                builder.lines.push(line.to_string());
                continue;
            }

            if let Some(caps) = HEADING_REGEX.captures(line) {
                builder.flush();
                let level = caps[1].len() as u8;
                let text = caps[2].trim();
                if level == 1 && title.is_none() {
                    title = Some(text.to_string());
                }
                if !text.is_empty() {
                    builder.sink.append(
                        ParagraphKind::Heading,
                        text,
                        Some(ParagraphMetadata::heading(level)),
                    );
                }
                continue;
            }

            if LIST_MARKER_REGEX.is_match(line) {
                let item = LIST_MARKER_REGEX.replace(line, "• ").into_owned();
                builder.accumulate(BlockState::List, item);
                continue;
            }

            if line.trim().is_empty() {
                builder.flush();
                continue;
            }

            builder.accumulate(BlockState::Paragraph, line.to_string());
        }
        builder.flush();

        ParsedDocument::new(
            title.as_deref().unwrap_or(DEFAULT_TITLE),
            builder.sink.into_paragraphs(),
            source,
            SourceFormat::Markdown,
        )
    }
}

/// Join code lines, dropping blank lines at either end but keeping indentation.
fn strip_blank_edges(lines: &[String]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n").trim_end().to_string(),
        _ => String::new(),
    }
}
