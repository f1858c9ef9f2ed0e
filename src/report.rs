//! Run report: per-item outcomes, summary counts and the persisted text report.

use std::fmt;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;

/// Name of the report file written to the output directory.
/// The report format is a stable contract, keep it backwards compatible.
pub const REPORT_FILE_NAME: &str = "report.txt";

/// What happened to a single matched prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferAction {
    Copied,
    Moved,
    Simulated,
    Failed,
}

impl TransferAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copied => "copied",
            Self::Moved => "moved",
            Self::Simulated => "simulated",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TransferAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of transferring one matched prompt to its destination name.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub prompt_index: usize,
    pub prompt_text: String,
    pub source_name: String,
    pub destination_name: String,
    pub action: TransferAction,
    pub error: Option<String>,
}

/// A prompt that did not claim any source file.
#[derive(Debug, Clone)]
pub struct MissingPrompt {
    pub prompt_index: usize,
    pub prompt_text: String,
}

/// Summary counts for one run. Always reported in full, even when zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub matched: usize,
    pub missing: usize,
    pub unused: usize,
    pub failed: usize,
}

/// Accumulated outcomes of one run.
///
/// Built incrementally by the transfer engine, rendered and persisted once
/// after the last prompt has been processed.
#[derive(Debug, Default)]
pub struct RunReport {
    outcomes: Vec<TransferOutcome>,
    missing: Vec<MissingPrompt>,
    unused: Vec<String>,
}

impl RunReport {
    pub fn add_outcome(&mut self, outcome: TransferOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn add_missing(&mut self, prompt_index: usize, prompt_text: &str) {
        self.missing.push(MissingPrompt {
            prompt_index,
            prompt_text: prompt_text.to_string(),
        });
    }

    pub fn add_unused(&mut self, filename: &str) {
        self.unused.push(filename.to_string());
    }

    #[must_use]
    pub fn outcomes(&self) -> &[TransferOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn missing(&self) -> &[MissingPrompt] {
        &self.missing
    }

    #[must_use]
    pub fn unused(&self) -> &[String] {
        &self.unused
    }

    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let failed = self
            .outcomes
            .iter()
            .filter(|outcome| outcome.action == TransferAction::Failed)
            .count();
        RunSummary {
            matched: self.outcomes.len() - failed,
            missing: self.missing.len(),
            unused: self.unused.len(),
            failed,
        }
    }

    /// Render the full report as plain text.
    #[must_use]
    pub fn render(&self) -> String {
        let summary = self.summary();
        let mut text = String::new();

        let _ = writeln!(text, "Prompt match report");
        let _ = writeln!(text, "===================");
        let _ = writeln!(text, "Matched: {}", summary.matched);
        let _ = writeln!(text, "Missing: {}", summary.missing);
        let _ = writeln!(text, "Unused:  {}", summary.unused);
        let _ = writeln!(text, "Failed:  {}", summary.failed);

        let matched_lines = self
            .outcomes
            .iter()
            .filter(|outcome| outcome.action != TransferAction::Failed)
            .map(|outcome| {
                format!(
                    "{} -> {} | {}",
                    outcome.source_name, outcome.destination_name, outcome.prompt_text
                )
            })
            .join("\n");
        Self::write_section(&mut text, "Matched", &matched_lines);

        let missing_lines = self.missing.iter().map(|prompt| prompt.prompt_text.clone()).join("\n");
        Self::write_section(&mut text, "Missing", &missing_lines);

        let unused_lines = self.unused.iter().join("\n");
        Self::write_section(&mut text, "Unused", &unused_lines);

        let failed_lines = self
            .outcomes
            .iter()
            .filter(|outcome| outcome.action == TransferAction::Failed)
            .map(|outcome| {
                format!(
                    "{} -> {} | {} | error: {}",
                    outcome.source_name,
                    outcome.destination_name,
                    outcome.prompt_text,
                    outcome.error.as_deref().unwrap_or("unknown")
                )
            })
            .join("\n");
        Self::write_section(&mut text, "Failed", &failed_lines);

        text
    }

    /// Write the report to `report.txt` in the given directory.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written. Callers treat this as
    /// best-effort: completed transfers stay valid either way.
    pub fn save(&self, output_dir: &Path) -> Result<PathBuf> {
        let path = output_dir.join(REPORT_FILE_NAME);
        fs::write(&path, self.render()).with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(path)
    }

    fn write_section(text: &mut String, title: &str, body: &str) {
        let _ = writeln!(text);
        let _ = writeln!(text, "{title}");
        let _ = writeln!(text, "{}", "-".repeat(title.len()));
        if !body.is_empty() {
            let _ = writeln!(text, "{body}");
        }
    }
}
