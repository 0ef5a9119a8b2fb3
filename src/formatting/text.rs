// src/formatting/text.rs
//! Plain-text transforms applied to rendered Markdown.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("markdown link regex is valid"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

const FRONTMATTER_DELIMITER: &str = "---";

/// Normalizes blank lines.
///
/// A lone blank line is dropped, a run of two or more becomes exactly one,
/// and the blank line right after a `---` line is always kept. Whitespace-only
/// lines count as blank.
pub fn collapse_empty_lines(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut blank_run = 0usize;

    for (i, line) in lines.iter().enumerate() {
        if !line.trim().is_empty() {
            kept.push(line);
            blank_run = 0;
            continue;
        }

        blank_run += 1;
        match blank_run {
            1 if i > 0 && lines[i - 1].trim() == FRONTMATTER_DELIMITER => kept.push(line),
            2 => kept.push(line),
            _ => {}
        }
    }

    kept.join("\n")
}

/// Replaces every `[text](url)` with `text`.
pub fn strip_markdown_links(text: &str) -> String {
    MARKDOWN_LINK.replace_all(text, "$1").into_owned()
}

/// Turns every whitespace run, newlines included, into one space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Whitespace-normalizes `text` and keeps at most `max_chars` characters.
///
/// Counts Unicode scalar values, never bytes, so multi-byte scripts are never split.
pub fn truncate_to_char_count(text: &str, max_chars: usize) -> String {
    collapse_whitespace(text).chars().take(max_chars).collect()
}
