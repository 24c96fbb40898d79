//! Bullet Normalizer: turns free-form or list-shaped input into clean, single-idea bullets.
//!
//! # Text heuristics
//! 1. Repair `.,` and "comma + whitespace" into `. `.
//! 2. Split on newlines, runs of `•` / `;`, and a period followed by whitespace.
//! 3. If that yields at most one fragment and a comma survives, split again on a
//!    comma followed by a capital letter or `(`.
//! 4. Clean every fragment and drop the empties.
//!
//! The heuristics are approximate on purpose. They are pinned by the tests below,
//! not by any grammar.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::TextOrList;

static MALFORMED_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.,|,\s+").expect("valid regex"));

static FRAGMENT_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n|[•;]+|\.\s+").expect("valid regex"));

static LEADING_GLYPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[•·‣◦▪\-–—*]\s*)+").expect("valid regex"));

static TRAILING_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,;:，；。.]+$").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid regex"));

static HIGHLIGHT_EDGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s•·‣◦▪\-–—*]+|[\s•·‣◦▪\-–—*]+$").expect("valid regex")
});

static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

static INLINE_WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("valid regex"));

/// Borrowed view of bullet input, so callers holding either shape avoid a clone.
#[derive(Debug, Clone, Copy)]
pub enum BulletInput<'a> {
    Text(&'a str),
    List(&'a [String]),
}

impl<'a> From<&'a TextOrList> for BulletInput<'a> {
    fn from(value: &'a TextOrList) -> Self {
        match value {
            TextOrList::Text(s) => BulletInput::Text(s),
            TextOrList::List(items) => BulletInput::List(items),
        }
    }
}

/// Normalizes raw bullet input into an ordered list of clean bullet strings.
///
/// Pure and order-preserving. `normalize_bullets(normalize_bullets(x)) == normalize_bullets(x)`.
pub fn normalize_bullets(input: BulletInput<'_>) -> Vec<String> {
    match input {
        BulletInput::List(items) => normalize_list(items),
        BulletInput::Text(text) => normalize_text(text),
    }
}

/// List shape: each element is cleaned on its own, never re-split.
pub fn normalize_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| clean_bullet(item.trim()))
        .filter(|b| !b.is_empty())
        .collect()
}

/// Free-text shape: repaired, split into fragments, then cleaned.
pub fn normalize_text(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let repaired = MALFORMED_COMMA_RE.replace_all(text, ". ");

    let mut fragments: Vec<&str> = FRAGMENT_SPLIT_RE
        .split(&repaired)
        .filter(|f| !f.trim().is_empty())
        .collect();

    if fragments.len() <= 1 && repaired.contains(',') {
        fragments = split_on_capitalized_commas(&repaired);
    }

    fragments
        .into_iter()
        .map(clean_bullet)
        .filter(|b| !b.is_empty())
        .collect()
}

/// Cleans a single bullet.
///
/// Strips leading bullet/dash/asterisk glyphs, trailing `,;:，；。.` runs, and
/// collapses internal whitespace. Returns an empty string when no letter or
/// digit survives.
pub fn clean_bullet(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_glyph = LEADING_GLYPH_RE.replace(trimmed, "");
    let without_tail = TRAILING_PUNCT_RE.replace(&without_glyph, "");
    let collapsed = WHITESPACE_RE.replace_all(&without_tail, " ");
    let cleaned = collapsed.trim();

    if !cleaned.chars().any(char::is_alphanumeric) {
        return String::new();
    }
    cleaned.to_string()
}

/// Splits a paragraph into sentence bullets on `. ! ?` runs that end a sentence.
///
/// Used for the professional summary when it arrives as a single string.
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_END_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Normalizes the personal-highlights field into one paragraph.
///
/// Lists are joined with single spaces. Edge glyph/dash runs are stripped, blank
/// lines collapse to one newline, and other whitespace runs collapse to a space.
pub fn normalize_highlights(input: BulletInput<'_>) -> String {
    let joined = match input {
        BulletInput::List(items) => items.join(" "),
        BulletInput::Text(text) => text.to_string(),
    };

    let stripped = HIGHLIGHT_EDGE_RE.replace_all(&joined, "");
    let single_newlines = BLANK_LINES_RE.replace_all(&stripped, "\n");
    let collapsed = INLINE_WHITESPACE_RE.replace_all(&single_newlines, " ");
    collapsed
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Splits on commas directly followed by an uppercase letter or `(`.
fn split_on_capitalized_commas(text: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if ch != ',' {
            continue;
        }
        let rest = &text[idx + 1..];
        let next = rest.trim_start().chars().next();
        if matches!(next, Some(c) if c.is_uppercase() || c == '(') {
            fragments.push(&text[start..idx]);
            start = idx + 1;
        }
    }
    fragments.push(&text[start..]);
    fragments
}
