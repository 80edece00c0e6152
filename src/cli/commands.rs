//! CLI command definitions using clap.
//!
//! - run: generate, review, refine and illustrate one piece of content
//! - kinds: list the task kinds

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quillr - social media content with an automated editor in the loop
#[derive(Parser, Debug)]
#[command(name = "quillr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one task through generate, review, refine and illustrate
    Run {
        /// Task kind (brief, cv, paper)
        #[arg(short = 't', long = "type")]
        task_kind: String,

        /// Topic, project name or paper reference
        #[arg(short, long, default_value = "")]
        input: String,

        /// Use mock services instead of the live APIs
        #[arg(long)]
        offline: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the supported task kinds
    Kinds,
}
