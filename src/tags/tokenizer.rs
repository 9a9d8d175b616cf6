//! Scanner for `--name value` / `—name value` tags in free-form prompt text.
//!
//! A tag is a marker (`--` or an em-dash) glued to a word-character name,
//! optionally followed by whitespace and a value. A value never contains a
//! hyphen or em-dash and ends right before the next marker (with or without
//! whitespace in between), or where only whitespace remains before the end of
//! the prompt. A candidate that satisfies neither the valued nor the bare form
//! is not a tag and stays in the prompt.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

static MARKER: OnceLock<Regex> = OnceLock::new();
static MARKER_AHEAD: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();

fn marker_regex() -> &'static Regex {
    MARKER.get_or_init(|| Regex::new(r"(?:--|—)(\w+)").expect("tag marker pattern is valid"))
}

/// Anchored: a marker followed by a name character starts here.
fn marker_ahead_regex() -> &'static Regex {
    MARKER_AHEAD.get_or_init(|| {
        Regex::new(r"^(?:--|—)\w").expect("marker lookahead pattern is valid")
    })
}

fn whitespace_regex() -> &'static Regex {
    WHITESPACE_RUN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// One tag occurrence in a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken<'a> {
    pub name: &'a str,
    /// Raw value, untrimmed. `None` for bare flags.
    pub value: Option<&'a str>,
    /// Byte range of the whole token in the prompt.
    pub span: Range<usize>,
}

fn is_dash(c: char) -> bool {
    c == '-' || c == '—'
}

/// Only whitespace (or nothing) remains after `at`.
fn at_end(prompt: &str, at: usize) -> bool {
    prompt[at..].chars().all(char::is_whitespace)
}

/// Index of the first non-whitespace char at or after `from`.
fn skip_whitespace(prompt: &str, from: usize) -> usize {
    prompt[from..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| from + i)
        .unwrap_or(prompt.len())
}

/// Whether a token may end at `at`: end of input, or a marker the scanner
/// would pick up, optionally after whitespace.
fn boundary_follows(prompt: &str, at: usize) -> bool {
    if at_end(prompt, at) {
        return true;
    }
    let next = skip_whitespace(prompt, at);
    marker_ahead_regex().is_match(&prompt[next..])
}

/// Shortest value span starting after `name_end` that ends on a boundary.
fn value_span(prompt: &str, name_end: usize) -> Option<Range<usize>> {
    let start = skip_whitespace(prompt, name_end);
    if start == name_end {
        return None;
    }
    let first = prompt[start..].chars().next()?;
    if is_dash(first) {
        return None;
    }

    let mut end = start + first.len_utf8();
    loop {
        if boundary_follows(prompt, end) {
            return Some(start..end);
        }
        let c = prompt[end..].chars().next()?;
        if is_dash(c) {
            return None;
        }
        end += c.len_utf8();
    }
}

/// Scan `prompt` left to right and return every tag token in order.
pub fn tokenize(prompt: &str) -> Vec<TagToken<'_>> {
    let marker = marker_regex();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < prompt.len() {
        let Some(caps) = marker.captures_at(prompt, pos) else {
            break;
        };
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };

        if let Some(value) = value_span(prompt, name.end()) {
            tokens.push(TagToken {
                name: name.as_str(),
                value: Some(&prompt[value.clone()]),
                span: whole.start()..value.end,
            });
            pos = value.end;
        } else if boundary_follows(prompt, name.end()) {
            tokens.push(TagToken {
                name: name.as_str(),
                value: None,
                span: whole.start()..name.end(),
            });
            pos = name.end();
        } else {
            // Not a tag here; retry one char past the candidate start.
            let skip = prompt[whole.start()..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(1);
            pos = whole.start() + skip;
        }
    }

    tokens
}

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    whitespace_regex().replace_all(text, " ").trim().to_string()
}

/// Remove every token span from `prompt`, then normalize whitespace.
pub fn strip_tokens(prompt: &str, tokens: &[TagToken<'_>]) -> String {
    let mut kept = String::with_capacity(prompt.len());
    let mut cursor = 0;
    for token in tokens {
        kept.push_str(&prompt[cursor..token.span.start]);
        cursor = token.span.end;
    }
    kept.push_str(&prompt[cursor..]);
    normalize_whitespace(&kept)
}
