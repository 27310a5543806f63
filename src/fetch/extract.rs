// src/fetch/extract.rs
// =============================================================================
// Title and link extraction from a (possibly truncated) page body.
//
// Links are found by pattern, not by parsing <a href>: any absolute http or
// https URL made of [A-Za-z0-9./?=_-] counts, wherever it appears in the
// body. Relative links are never resolved, and URLs are compared by exact
// string equality later on, so no normalisation happens here either.
//
// The title comes from the first <title> element, found with `scraper`.
// html5ever matches tag names case-insensitively and copes with a body that
// was cut off in the middle of the document.
// =============================================================================

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use super::PageResult;

pub const UNKNOWN_TITLE: &str = "Unknown Page Title";

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Constant pattern, checked by the tests below
    Regex::new(r"https?://[a-zA-Z0-9./?=_-]+").expect("link pattern is a valid regex")
});

// Returns every absolute http(s) URL in the body, in order of appearance.
// Duplicates are kept; deduplication is the registry's job.
pub fn find_links(body: &str) -> Vec<String> {
    LINK_PATTERN
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .collect()
}

// Returns the text of the first <title> element, trimmed, or the
// placeholder when there is none (or it is empty).
pub fn find_title(body: &str) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return UNKNOWN_TITLE.to_string();
    };

    let document = Html::parse_document(body);
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

// Builds the PageResult for a body the fetcher has already read.
// Invalid UTF-8 (including a multi-byte character cut by the byte limit)
// is replaced rather than rejected.
pub fn build_page(url: &str, raw_body: &[u8]) -> PageResult {
    let body = String::from_utf8_lossy(raw_body).into_owned();
    let found_links = find_links(&body);
    let title = find_title(&body);

    PageResult {
        url: url.to_string(),
        title,
        body,
        found_links,
    }
}
