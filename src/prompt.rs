//! Prompt source parsing.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::extract::{extract_numeric_id, extract_url_stem};

/// One prompt line with the keys extracted from it.
///
/// Immutable after parsing. The index is the 0-based position among the
/// non-blank lines and defines the canonical processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRecord {
    pub index: usize,
    pub raw_text: String,
    pub numeric_id: Option<u64>,
    pub url_stem: Option<String>,
}

impl PromptRecord {
    #[must_use]
    pub fn new(index: usize, line: &str) -> Self {
        let raw_text = line.trim().to_string();
        let numeric_id = extract_numeric_id(&raw_text);
        let url_stem = extract_url_stem(&raw_text);
        Self {
            index,
            raw_text,
            numeric_id,
            url_stem,
        }
    }
}

/// Parse prompt records from raw text, one prompt per line.
///
/// Blank lines are skipped and do not consume an index.
#[must_use]
pub fn parse_prompts(text: &str) -> Vec<PromptRecord> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| PromptRecord::new(index, line))
        .collect()
}

/// Read and parse the prompts file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid UTF-8.
/// This is fatal and aborts the run before any matching is attempted.
pub fn read_prompts(path: &Path) -> Result<Vec<PromptRecord>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read prompts file: {}", path.display()))?;
    Ok(parse_prompts(&text))
}
