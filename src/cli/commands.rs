use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "skill-lint")]
#[command(author, version, about = "Structural linter for Markdown skill documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Path to skill-lint.toml (default: ./skill-lint.toml if present)
    #[arg(short, long, global = true, env = "SKILL_LINT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Output format for CLI results.
/// - Text: Human-readable text output (default)
/// - Json: Single JSON object at completion
/// - Stream: NDJSON streaming (one JSON object per line)
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Stream,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint skill documents in files and directories
    Check {
        /// Files or directories to lint
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Treat warnings as failures
        #[arg(long)]
        deny_warnings: bool,

        /// Disable a rule by code (repeatable)
        #[arg(long = "disable", value_name = "RULE")]
        disable: Vec<String>,

        /// Override the bundle separator line
        #[arg(long, value_name = "TOKEN")]
        separator: Option<String>,
    },

    /// List the skill documents found and their key metadata
    List {
        /// Files or directories to scan
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Override the bundle separator line
        #[arg(long, value_name = "TOKEN")]
        separator: Option<String>,
    },

    /// Split a bundled file into one file per document
    Split {
        /// Bundled source file
        file: PathBuf,

        /// Directory to write documents into (preview only when omitted)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Override the bundle separator line
        #[arg(long, value_name = "TOKEN")]
        separator: Option<String>,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Show all rules with their effective severity
    Rules,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a default skill-lint.toml into the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
