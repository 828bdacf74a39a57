//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use lica_core::DEFAULT_MODEL;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lica")]
#[command(
    author,
    version,
    about = "LICA - your financial education assistant"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a question, optionally about a document
    Ask(AskArgs),

    /// List available models
    Models,

    /// Show effective configuration
    Config,
}

#[derive(Args)]
pub struct AskArgs {
    /// Question to ask
    pub query: Vec<String>,

    /// Document to analyze (PDF, PNG, JPG, JPEG)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Model to use
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Print the answer to stderr as it streams in
    #[arg(long)]
    pub stream: bool,
}

impl AskArgs {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
