//! Input format classification.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKDOWN_HEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("Invalid markdown heading regex"));

static MARKDOWN_LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.+\]\(.+\)").expect("Invalid markdown link regex"));

/// Format of a raw content string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Html,
    Markdown,
    Text,
}

/// Classify raw content. First matching rule wins.
pub fn detect_format(content: &str) -> ContentFormat {
    let trimmed = content.trim_start();
    if starts_with_ignore_case(trimmed, "<!doctype")
        || starts_with_ignore_case(trimmed, "<html")
        || content.contains("<body")
    {
        return ContentFormat::Html;
    }

    if MARKDOWN_HEADING_REGEX.is_match(content)
        || content.contains("```")
        || MARKDOWN_LINK_REGEX.is_match(content)
    {
        return ContentFormat::Markdown;
    }

    ContentFormat::Text
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
