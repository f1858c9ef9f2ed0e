//! Copy, move or simulate transfers for matched prompts and build the run report.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::matcher::MatchSet;
use crate::report::{RunReport, TransferAction, TransferOutcome};

/// Transfer configuration resolved from CLI args and user config.
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub output_dir: PathBuf,
    /// Prefix for destination filenames.
    pub prefix: String,
    /// Destination file extension, with or without a leading dot.
    pub extension: String,
    /// Move files instead of copying.
    pub move_files: bool,
    /// Only simulate: no per-item filesystem changes.
    pub dry_run: bool,
}

impl TransferOptions {
    /// Destination filename for the given 1-based sequence number.
    #[must_use]
    pub fn destination_name(&self, sequence: usize, width: usize) -> String {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() {
            format!("{}{:0width$}", self.prefix, sequence)
        } else {
            format!("{}{:0width$}.{extension}", self.prefix, sequence)
        }
    }
}

/// Zero-padding width for destination sequence numbers:
/// wide enough for the total matched count, minimum three digits.
#[must_use]
pub fn sequence_width(matched_count: usize) -> usize {
    let digits = if matched_count == 0 {
        1
    } else {
        matched_count.ilog10() as usize + 1
    };
    digits.max(3)
}

/// Process all match results in prompt order.
///
/// Matched prompts get consecutive sequence numbers starting at 1;
/// unmatched prompts do not consume a number. Per-item transfer failures
/// are recorded and the loop continues. The progress callback is invoked
/// with `(processed, total)` after every prompt, matched or not.
///
/// # Errors
/// Returns an error only if the output directory cannot be created.
/// Everything after that point is per-item and lands in the report.
pub fn run_transfers(
    set: &MatchSet,
    options: &TransferOptions,
    mut progress: impl FnMut(usize, usize),
) -> Result<RunReport> {
    fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("Failed to create output directory: {}", options.output_dir.display()))?;

    let width = sequence_width(set.matched_count());
    let total = set.results.len();
    let mut report = RunReport::default();
    let mut sequence = 0usize;

    for (processed, result) in set.results.iter().enumerate() {
        if let Some(ref matched) = result.matched {
            sequence += 1;
            let destination_name = options.destination_name(sequence, width);
            let destination = options.output_dir.join(&destination_name);

            let (action, error) = if options.dry_run {
                (TransferAction::Simulated, None)
            } else {
                match transfer_file(&matched.file.path, &destination, options.move_files) {
                    Ok(action) => (action, None),
                    Err(error) => (TransferAction::Failed, Some(error.to_string())),
                }
            };

            report.add_outcome(TransferOutcome {
                prompt_index: result.prompt.index,
                prompt_text: result.prompt.raw_text.clone(),
                source_name: matched.file.name.clone(),
                destination_name,
                action,
                error,
            });
        } else {
            report.add_missing(result.prompt.index, &result.prompt.raw_text);
        }
        progress(processed + 1, total);
    }

    for file in &set.unused {
        report.add_unused(&file.name);
    }

    Ok(report)
}

fn transfer_file(source: &Path, destination: &Path, move_files: bool) -> io::Result<TransferAction> {
    if move_files {
        move_file(source, destination)?;
        Ok(TransferAction::Moved)
    } else {
        fs::copy(source, destination)?;
        Ok(TransferAction::Copied)
    }
}

/// Move a file, falling back to copy + remove when rename fails
/// (rename does not work across filesystems).
fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(_) if source.is_file() => {
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
        Err(error) => Err(error),
    }
}
