/*!
 * Splits a numbered batch response back into per-paragraph translations.
 *
 * The result always has exactly one slot per paragraph of the batch. A slot
 * the response does not account for is left empty for the caller to handle.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_LINES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("Invalid blank line regex"));

static LEADING_MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\d+\]\s*").expect("Invalid marker regex"));

/// Split `response` into exactly `expected` translations.
///
/// Slot `i` is the text between the `[i]` marker and the following `[i+1]`
/// marker (or the end of the response). When slot `i` has no marker, the
/// `i`-th blank-line separated block is used instead, stripped of a leading
/// marker. Anything still unresolved is an empty string.
pub fn parse_batch_response(response: &str, expected: usize) -> Vec<String> {
    let response = response.replace("\r\n", "\n");
    let mut blocks: Option<Vec<&str>> = None;

    (1..=expected)
        .map(|index| {
            if let Some(text) = numbered_region(&response, index) {
                return text;
            }

            debug!("Marker [{}] missing from batch response, using block split", index);
            let blocks = blocks.get_or_insert_with(|| {
                BLANK_LINES_REGEX
                    .split(&response)
                    .map(str::trim)
                    .filter(|b| !b.is_empty())
                    .collect()
            });

            blocks
                .get(index - 1)
                .map(|block| LEADING_MARKER_REGEX.replace(block, "").trim().to_string())
                .unwrap_or_default()
        })
        .collect()
}

/// Trimmed text after `[index]` up to `[index + 1]` or the end, if non-empty.
fn numbered_region(response: &str, index: usize) -> Option<String> {
    let marker = format!("[{}]", index);
    let start = response.find(&marker)? + marker.len();
    let rest = &response[start..];

    let next_marker = format!("[{}]", index + 1);
    let end = rest.find(&next_marker).unwrap_or(rest.len());

    let text = rest[..end].trim();
    (!text.is_empty()).then(|| text.to_string())
}
