//! Text scrubbing for prompt input and model output.
//!
//! Each function is a pure transform; the assembler composes them in a fixed order.

use crate::summary::FALLBACK_SUMMARY;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CAPTCHA_REGEX: Regex = Regex::new(r"(?i)captcha").unwrap();

    // IPv4 shape only, octet ranges are not checked
    static ref IPV4_REGEX: Regex = Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").unwrap();

    // Field names the model sometimes echoes at the start of a line ("Context: ...")
    static ref LABEL_REGEX: Regex = Regex::new(r"(?m)^\w+:\s+").unwrap();

    static ref BLANK_LINES_REGEX: Regex = Regex::new(r"\n\s*\n").unwrap();
}

/// Token substituted for every IPv4-shaped substring.
pub const REDACTED: &str = "REDACTED";

/// Escape `&`, `<` and `>` so untrusted text cannot open markup or tags inside a prompt.
pub fn sanitize_input(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Scrub generated output before it reaches the reader.
///
/// A captcha marker anywhere means the scraped page was a challenge, not an
/// article, so the whole text becomes [`FALLBACK_SUMMARY`]. Otherwise every
/// IPv4-shaped substring is replaced with [`REDACTED`].
pub fn sanitize_summary(text: &str) -> String {
    if contains_captcha(text) {
        return FALLBACK_SUMMARY.to_string();
    }
    IPV4_REGEX.replace_all(text, REDACTED).into_owned()
}

pub fn contains_captcha(text: &str) -> bool {
    CAPTCHA_REGEX.is_match(text)
}

/// Remove a leading `label: ` from each line.
pub fn strip_field_labels(text: &str) -> String {
    LABEL_REGEX.replace_all(text, "").into_owned()
}

/// Collapse every run of blank lines into a single newline.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_LINES_REGEX.replace_all(text, "\n").into_owned()
}
