mod config;
mod pmatch;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::pmatch::PromptMatch;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Match prompt lines to image files and copy them with sequential names"
)]
struct Args {
    /// Prompts text file with one prompt per line
    #[arg(value_hint = clap::ValueHint::FilePath)]
    prompts: Option<PathBuf>,

    /// Source directory containing the image files
    #[arg(value_hint = clap::ValueHint::DirPath)]
    source: Option<PathBuf>,

    /// Output directory for the renamed files
    #[arg(short, long, name = "OUTPUT", value_hint = clap::ValueHint::DirPath)]
    output: Option<PathBuf>,

    /// Prefix for the renamed files
    #[arg(short = 'x', long, name = "PREFIX")]
    prefix: Option<String>,

    /// File extension for the renamed files
    #[arg(short, long, name = "EXTENSION")]
    extension: Option<String>,

    /// Move files instead of copying
    #[arg(short, long = "move")]
    move_files: bool,

    /// Only print the transfer plan without touching files
    #[arg(short, long)]
    print: bool,

    /// Print debug information
    #[arg(short = 'D', long)]
    debug: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(shell) = args.completion {
        clap_complete::generate(
            shell,
            &mut Args::command(),
            env!("CARGO_BIN_NAME"),
            &mut std::io::stdout(),
        );
        Ok(())
    } else {
        PromptMatch::new(args)?.run()
    }
}
