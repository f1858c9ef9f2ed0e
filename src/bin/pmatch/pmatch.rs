use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use prompt_match::matcher;
use prompt_match::report::{RunReport, TransferAction};
use prompt_match::transfer::{self, TransferOptions};
use prompt_match::{print_error, print_warning, prompt};

use crate::Args;
use crate::config::Config;

const PROGRESS_BAR_CHARS: &str = "=>-";
const PROGRESS_BAR_TEMPLATE: &str = "[{elapsed_precise}] {bar:80.magenta/blue} {pos}/{len} {percent}%";

/// Default output directory name under the source directory.
const DEFAULT_OUTPUT_DIR: &str = "renamed";

#[derive(Debug)]
pub struct PromptMatch {
    prompts_file: PathBuf,
    source_dir: PathBuf,
    output_dir: PathBuf,
    config: Config,
}

impl PromptMatch {
    pub fn new(args: Args) -> Result<Self> {
        let Some(ref prompts) = args.prompts else {
            anyhow::bail!("A prompts file is required");
        };
        let prompts_file = prompt_match::resolve_input_path(Some(prompts))?;
        if !prompts_file.is_file() {
            anyhow::bail!("Prompts path is not a file: '{}'", prompts_file.display());
        }

        let source_dir = prompt_match::resolve_input_path(args.source.as_deref())?;
        if !source_dir.is_dir() {
            anyhow::bail!("Source path is not a directory: '{}'", source_dir.display());
        }

        let config = Config::from_args(&args)?;
        let output_dir = config
            .output_dir
            .clone()
            .unwrap_or_else(|| source_dir.join(DEFAULT_OUTPUT_DIR));

        if config.debug {
            eprintln!("Config: {config:#?}");
            eprintln!("Prompts: {}", prompts_file.display());
            eprintln!("Source: {}", source_dir.display());
            eprintln!("Output: {}", output_dir.display());
        }

        Ok(Self {
            prompts_file,
            source_dir,
            output_dir,
            config,
        })
    }

    pub fn run(&self) -> Result<()> {
        let prompts = prompt::read_prompts(&self.prompts_file)?;
        if prompts.is_empty() {
            println!("No prompts found in {}", self.prompts_file.display());
            return Ok(());
        }

        let files = matcher::list_source_files(&self.source_dir)?;
        let set = matcher::match_prompts(&prompts, files);

        let heading = if self.config.dryrun {
            "Dryrun:".cyan().bold()
        } else if self.config.move_files {
            "Move:".magenta().bold()
        } else {
            "Copy:".magenta().bold()
        };
        println!(
            "{heading} {} prompt(s) against {} file(s) -> {}",
            set.results.len(),
            set.matched_count() + set.unused.len(),
            self.output_dir.display()
        );

        let options = TransferOptions {
            output_dir: self.output_dir.clone(),
            prefix: self.config.prefix.clone(),
            extension: self.config.extension.clone(),
            move_files: self.config.move_files,
            dry_run: self.config.dryrun,
        };

        let progress_bar = Self::create_progress_bar(set.results.len() as u64);
        let report = transfer::run_transfers(&set, &options, |processed, _total| {
            progress_bar.set_position(processed as u64);
        })?;
        progress_bar.finish_and_clear();

        if self.config.verbose || self.config.dryrun {
            Self::print_items(&report);
        }
        Self::print_summary(&report);

        match report.save(&self.output_dir) {
            Ok(path) => {
                if self.config.verbose {
                    println!("Report written to {}", path.display());
                }
            }
            Err(error) => print_warning!("{error:#}"),
        }

        Ok(())
    }

    fn create_progress_bar(len: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template(PROGRESS_BAR_TEMPLATE)
                .expect("Failed to set progress bar template")
                .progress_chars(PROGRESS_BAR_CHARS),
        );
        progress_bar
    }

    fn print_items(report: &RunReport) {
        for outcome in report.outcomes() {
            let action = match outcome.action {
                TransferAction::Copied => "copy".green(),
                TransferAction::Moved => "move".magenta(),
                TransferAction::Simulated => "plan".cyan(),
                TransferAction::Failed => "fail".red(),
            };
            println!("  {action}  {} -> {}", outcome.source_name, outcome.destination_name);
            if let Some(ref error) = outcome.error {
                print_error!("{}: {error}", outcome.source_name);
            }
        }
        for missing in report.missing() {
            println!("  {}  {}", "miss".yellow(), missing.prompt_text);
        }
        for unused in report.unused() {
            println!("  {}  {unused}", "left".blue());
        }
    }

    fn print_summary(report: &RunReport) {
        let summary = report.summary();
        println!("{}", "Summary:".bold());
        println!("  Matched: {}", summary.matched.to_string().green());
        println!("  Missing: {}", summary.missing.to_string().yellow());
        println!("  Unused:  {}", summary.unused.to_string().blue());
        let failed = if summary.failed > 0 {
            summary.failed.to_string().red()
        } else {
            summary.failed.to_string().normal()
        };
        println!("  Failed:  {failed}");
    }
}
