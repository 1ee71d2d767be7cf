//! Command-line argument parsing for llmi18n
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// llmi18n - Translate the quoted strings of i18n files with a local Ollama model
#[derive(Parser, Debug)]
#[command(name = "llmi18n")]
#[command(version)]
#[command(about = "Translate the quoted strings of i18n files with a local Ollama model", long_about = None)]
pub struct Args {
    /// File whose quoted strings are translated ("-" reads stdin)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Target language (overrides the configuration file)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Ollama model to use (overrides the configuration file)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Ollama base URL (overrides the configuration file)
    #[arg(long)]
    pub url: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except the translation)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check that the Ollama server is reachable and list its models
    Check,

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Check if input is required and provided
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_none() && self.input.is_none() {
            return Err(
                "Input file required. Use 'llmi18n <FILE>' or run a subcommand.".to_string(),
            );
        }

        if self.command.is_some() && self.input.is_some() {
            return Err("Cannot specify an input file with a subcommand.".to_string());
        }

        Ok(())
    }

    /// Whether the input is read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.input.as_deref().map_or(false, |p| p.as_os_str() == "-")
    }
}

impl Verbosity {
    /// Default `tracing` filter directive for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "llmi18n=info,warn",
            Verbosity::VeryVerbose => "llmi18n=trace,info",
        }
    }

    /// Check if should show the progress spinner
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show call statistics
    pub fn show_events(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }

    /// Check if should show per-chunk details
    pub fn show_tokens(&self) -> bool {
        matches!(self, Verbosity::VeryVerbose)
    }
}
