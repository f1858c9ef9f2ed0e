//! Pure text extraction helpers for prompt lines and filenames.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Matches URL-like substrings: a recognized scheme followed by anything,
/// or any whitespace-delimited token with a path separator in it.
static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?|ftp|file)://\S+|\S+/\S+").expect("Failed to compile url regex")
});

static RE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("Failed to compile digit regex"));

/// Punctuation that commonly trails a URL pasted into free text.
const TRAILING_PUNCTUATION: [char; 8] = ['.', ',', ';', ':', '!', '?', ')', '\''];

/// Extract the first standalone numeric ID from the given text.
///
/// A digit run is standalone when it is not embedded in a longer
/// alphanumeric word, i.e. not immediately preceded or followed by an
/// ASCII letter: `cat_001` yields 1, `x264` and `photo2x` yield nothing.
/// Digits inside URL-like substrings belong to the URL and are skipped.
/// Runs too long for a `u64` are ignored in favor of the next candidate.
#[must_use]
pub fn extract_numeric_id(text: &str) -> Option<u64> {
    let without_urls: Cow<str> = RE_URL.replace_all(text, " ");
    for digits in RE_DIGITS.find_iter(&without_urls) {
        let before = without_urls[..digits.start()].chars().next_back();
        let after = without_urls[digits.end()..].chars().next();
        if before.is_some_and(|c| c.is_ascii_alphabetic()) || after.is_some_and(|c| c.is_ascii_alphabetic()) {
            continue;
        }
        if let Ok(id) = digits.as_str().parse::<u64>() {
            return Some(id);
        }
    }
    None
}

/// Extract the stem of the final path segment from the first URL-like
/// substring in the given text.
///
/// Query strings, fragments and trailing punctuation are stripped before
/// taking the last path segment, and the result is normalized with
/// [`normalize_stem`]: `http://x.test/dog-7.png` yields `dog-7`.
#[must_use]
pub fn extract_url_stem(text: &str) -> Option<String> {
    let url = RE_URL.find(text)?.as_str().trim_end_matches(TRAILING_PUNCTUATION);
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let segment = without_query.rsplit('/').find(|part| !part.is_empty())?;
    let stem = Path::new(segment)
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(segment);
    if stem.is_empty() { None } else { Some(normalize_stem(stem)) }
}

/// Normalize a filename or URL path stem for comparison.
///
/// Rust decomposes special characters like "å" to "a\u{30a}" by default
/// (Unicode NFD), so recompose to NFC and lowercase to get a stable,
/// case-insensitive key.
#[must_use]
pub fn normalize_stem(stem: &str) -> String {
    stem.nfc().collect::<String>().to_lowercase()
}
