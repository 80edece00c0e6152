//! CLI module for quillr - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
