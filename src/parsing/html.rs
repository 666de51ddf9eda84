/*!
 * HTML content extraction.
 *
 * Non-content elements are detached from the DOM first, then a content root is
 * chosen (optionally narrowed to a URL anchor) and block-level elements are
 * walked in document order. Pages whose markup yields almost nothing
 * structural fall back to sentence splitting.
 */

use log::{debug, info};
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::document::{
    ParagraphKind, ParagraphMetadata, ParsedDocument, SourceFormat, DEFAULT_TITLE,
};
use crate::parsing::{char_len, ParagraphSink, MIN_BLOCK_CHARS};

const REMOVED_ELEMENTS: &str = "script, style, nav, footer, header, aside, .sidebar, .navigation, \
     .menu, .ads, .advertisement, .cookie-banner, .popup, img, figure, picture, video, iframe, svg";

const MAIN_CONTENT_CANDIDATES: &str = "main, article, .content, .main-content, #content, #main, \
     .documentation, .doc-content, .markdown-body, .prose";

const BLOCK_ELEMENTS: &str = "h1, h2, h3, h4, h5, h6, p, pre, code, ul, ol, blockquote, table";

/// Blocks whose descendants are already covered by their own extraction.
const CONTAINER_BLOCKS: [&str; 5] = ["pre", "code", "ul", "ol", "table"];

/// Below this many structural paragraphs the sentence fallback takes over.
const MIN_STRUCTURAL_PARAGRAPHS: usize = 3;

/// Fallback sentences must be longer than this.
const MIN_SENTENCE_CHARS: usize = 10;

/// Maximum number of fallback sentences.
const MAX_FALLBACK_SENTENCES: usize = 50;

static IMAGE_ARTIFACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(image|photo|picture|figure|diagram|screenshot|icon|logo|illustration)(\s|:|\.|$)",
        r"(?i)\.(jpg|jpeg|png|gif|svg|webp|bmp)$",
        r"(?i)click to (enlarge|expand|view)",
        r"(?i)thumbnail",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid image artifact regex"))
    .collect()
});

static CODE_LANGUAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"language-(\w+)|lang-(\w+)|(\w+)-code|highlight-(\w+)")
        .expect("Invalid code language regex")
});

static SENTENCE_BREAK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?。！？]\s+").expect("Invalid sentence break regex"));

/// One element the block walk starts from.
struct ScopeRoot<'a> {
    element: ElementRef<'a>,
    /// Whether the root itself is a candidate block
    include_self: bool,
}

/// HTML parser holding its compiled selectors
pub struct HtmlParser {
    removed: Selector,
    main_content: Selector,
    body: Selector,
    blocks: Selector,
    title: Selector,
    h1: Selector,
    table_rows: Selector,
    table_cells: Selector,
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlParser {
    pub fn new() -> Self {
        Self {
            removed: Selector::parse(REMOVED_ELEMENTS).expect("Invalid removal selector"),
            main_content: Selector::parse(MAIN_CONTENT_CANDIDATES)
                .expect("Invalid main content selector"),
            body: Selector::parse("body").expect("Invalid body selector"),
            blocks: Selector::parse(BLOCK_ELEMENTS).expect("Invalid block selector"),
            title: Selector::parse("title").expect("Invalid title selector"),
            h1: Selector::parse("h1").expect("Invalid h1 selector"),
            table_rows: Selector::parse("tr").expect("Invalid row selector"),
            table_cells: Selector::parse("th, td").expect("Invalid cell selector"),
        }
    }

    /// Parse an HTML string into a document.
    ///
    /// `format` is `Url` for fetched pages and `Html` for uploads. When
    /// `anchor_id` names an element, extraction starts at that element and
    /// covers its following siblings only.
    pub fn parse(
        &self,
        html: &str,
        source: &str,
        format: SourceFormat,
        anchor_id: Option<&str>,
    ) -> ParsedDocument {
        let mut document = Html::parse_document(html);
        self.strip_non_content(&mut document);

        let title = self.extract_title(&document);
        let main_root = self.main_content_root(&document);

        let scope = match anchor_id.filter(|a| !a.is_empty()) {
            Some(anchor) => match find_anchor(&document, anchor) {
                Some(target) => {
                    info!("Found anchor element: {}", anchor);
                    std::iter::once(target)
                        .chain(target.next_siblings().filter_map(ElementRef::wrap))
                        .map(|element| ScopeRoot {
                            element,
                            include_self: true,
                        })
                        .collect()
                }
                None => {
                    info!("Anchor not found: {}, parsing from beginning", anchor);
                    vec![main_root]
                }
            },
            None => vec![main_root],
        };

        let mut sink = ParagraphSink::new();
        for root in &scope {
            self.walk_blocks(root, &mut sink);
        }

        let paragraphs = if sink.len() < MIN_STRUCTURAL_PARAGRAPHS {
            debug!(
                "Only {} structural paragraphs found, falling back to sentence split",
                sink.len()
            );
            sentence_fallback(&scope)
        } else {
            sink
        };

        ParsedDocument::new(&title, paragraphs.into_paragraphs(), source, format)
    }

    fn strip_non_content(&self, document: &mut Html) {
        let ids: Vec<_> = document.select(&self.removed).map(|el| el.id()).collect();
        debug!("Removing {} non-content elements", ids.len());
        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    fn extract_title(&self, document: &Html) -> String {
        let from = |selector: &Selector| {
            document
                .select(selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .filter(|t| !t.is_empty())
        };

        from(&self.title)
            .or_else(|| from(&self.h1))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    fn main_content_root<'a>(&self, document: &'a Html) -> ScopeRoot<'a> {
        let element = document
            .select(&self.main_content)
            .next()
            .or_else(|| document.select(&self.body).next())
            .unwrap_or_else(|| document.root_element());

        ScopeRoot {
            element,
            include_self: false,
        }
    }

    fn walk_blocks(&self, root: &ScopeRoot<'_>, sink: &mut ParagraphSink) {
        if root.include_self && self.blocks.matches(&root.element) {
            self.emit_block(root.element, sink);
        }

        for element in root.element.select(&self.blocks) {
            if is_nested_in_container(&element, &root.element) {
                continue;
            }
            self.emit_block(element, sink);
        }
    }

    fn emit_block(&self, element: ElementRef<'_>, sink: &mut ParagraphSink) {
        let raw = element.text().collect::<String>();
        let trimmed = raw.trim();
        if char_len(trimmed) < MIN_BLOCK_CHARS || is_image_artifact(trimmed) {
            return;
        }

        let tag = element.value().name();
        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<u8>().unwrap_or(1);
                sink.push(
                    ParagraphKind::Heading,
                    trimmed,
                    Some(ParagraphMetadata::heading(level)),
                );
            }
            "pre" | "code" => {
                // Code keeps its exact whitespace
                sink.push(
                    ParagraphKind::Code,
                    raw.as_str(),
                    ParagraphMetadata::code(detect_code_language(&element)),
                );
            }
            "ul" | "ol" => {
                let items = element
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|child| child.value().name() == "li")
                    .map(|li| li.text().collect::<String>().trim().to_string())
                    .filter(|item| !item.is_empty())
                    .map(|item| format!("• {}", item))
                    .collect::<Vec<_>>();
                sink.push(ParagraphKind::List, items.join("\n"), None);
            }
            "blockquote" => {
                sink.push(ParagraphKind::Paragraph, format!("> {}", trimmed), None);
            }
            "table" => {
                sink.push(ParagraphKind::Paragraph, self.table_text(&element), None);
            }
            _ => {
                sink.push(ParagraphKind::Paragraph, trimmed, None);
            }
        }
    }

    fn table_text(&self, table: &ElementRef<'_>) -> String {
        table
            .select(&self.table_rows)
            .filter_map(|row| {
                let cells = row
                    .select(&self.table_cells)
                    .map(|cell| cell.text().collect::<String>().trim().to_string())
                    .collect::<Vec<_>>();
                (!cells.is_empty()).then(|| cells.join(" | "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Locate the anchor target anywhere in the document.
///
/// Every spelling of the anchor is tried against `id` first, then `name`,
/// then `data-id` / `data-anchor`.
fn find_anchor<'a>(document: &'a Html, anchor: &str) -> Option<ElementRef<'a>> {
    let candidates = anchor_candidates(anchor);
    let elements: Vec<ElementRef<'a>> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .collect();

    let tiers: [&[&str]; 3] = [&["id"], &["name"], &["data-id", "data-anchor"]];
    tiers.iter().find_map(|attributes| {
        candidates.iter().find_map(|candidate| {
            elements.iter().copied().find(|element| {
                attributes
                    .iter()
                    .any(|attr| element.value().attr(attr) == Some(candidate.as_str()))
            })
        })
    })
}

/// Spellings of an anchor id in lookup order, without duplicates.
pub(crate) fn anchor_candidates(anchor: &str) -> Vec<String> {
    let mut candidates = vec![
        anchor.to_string(),
        anchor.replace('_', "-"),
        anchor.replace('-', "_"),
    ];
    if let Ok(decoded) = percent_decode_str(anchor).decode_utf8() {
        candidates.push(decoded.into_owned());
    }

    let mut unique = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// True when an ancestor below or at `root` is a container block.
fn is_nested_in_container(element: &ElementRef<'_>, root: &ElementRef<'_>) -> bool {
    if element.id() == root.id() {
        return false;
    }

    for ancestor in element.ancestors() {
        if let Some(ancestor_el) = ElementRef::wrap(ancestor) {
            if CONTAINER_BLOCKS.contains(&ancestor_el.value().name()) {
                return true;
            }
        }
        if ancestor.id() == root.id() {
            break;
        }
    }
    false
}

fn is_image_artifact(text: &str) -> bool {
    IMAGE_ARTIFACT_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Language from the element class, the parent class, or a direct `<code>` child.
fn detect_code_language(element: &ElementRef<'_>) -> Option<String> {
    let parent = element.parent().and_then(ElementRef::wrap);
    let code_child = element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "code");

    [Some(*element), parent, code_child]
        .into_iter()
        .flatten()
        .filter_map(|el| el.value().attr("class"))
        .find_map(language_from_class)
}

fn language_from_class(class: &str) -> Option<String> {
    let caps = CODE_LANGUAGE_REGEX.captures(class)?;
    (1..=4)
        .find_map(|i| caps.get(i))
        .map(|m| m.as_str().to_string())
}

fn sentence_fallback(scope: &[ScopeRoot<'_>]) -> ParagraphSink {
    let full_text = scope
        .iter()
        .map(|root| root.element.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");

    let mut sink = ParagraphSink::new();
    SENTENCE_BREAK_REGEX
        .split(&full_text)
        .map(str::trim)
        .filter(|sentence| char_len(sentence) > MIN_SENTENCE_CHARS)
        .take(MAX_FALLBACK_SENTENCES)
        .for_each(|sentence| {
            sink.push(ParagraphKind::Paragraph, sentence, None);
        });
    sink
}
