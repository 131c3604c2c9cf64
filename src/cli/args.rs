//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Rebuild forests from flat code/parent-code records
#[derive(Parser, Debug)]
#[command(name = "hierarchy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Settings file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the batch as a tree
    Tree {
        /// Record file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List records in pre-order with their breadcrumbs
    Flatten {
        /// Record file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List ancestors of a code, immediate parent first
    Ancestors {
        /// Record file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Code to resolve
        code: String,
    },

    /// List all descendants of a code
    Descendants {
        /// Record file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Code to resolve
        code: String,
    },

    /// Print the depth of a code (-1 if unknown)
    Depth {
        /// Record file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Code to resolve
        code: String,
    },

    /// Check the batch, or a candidate record, for parent cycles
    Check {
        /// Record file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Code of a record to test against the batch
        #[arg(long)]
        candidate: Option<String>,
        /// Parent code of the candidate (omit for a root)
        #[arg(long, requires = "candidate")]
        parent: Option<String>,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
