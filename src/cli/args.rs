//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Hierarchical tag picker: cascade selections through a taxonomy and keep badges in order
#[derive(Parser, Debug)]
#[command(name = "flavortree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more: -d -d -d)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding the local .flavortree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, env = "FLAVORTREE_PROJECT_DIR", value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a widget's taxonomy with selection marks and counters
    Tree {
        /// Widget name
        widget: String,
        /// Plain taxonomy without selection marks
        #[arg(long)]
        plain: bool,
    },

    /// Select a node with its ancestors, or deselect it with its subtree
    Toggle {
        /// Widget name
        widget: String,
        /// Root-to-node path, e.g. "Sweet > Chocolate"
        path: String,
    },

    /// Toggle several nodes as one group: all selected → deselect all, otherwise select all
    Group {
        /// Widget name
        widget: String,
        /// Root-to-node paths
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Replace the badge order
    Reorder {
        /// Widget name
        widget: String,
        /// Selected names in the wanted order
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Move one badge from a display position to another (0-based)
    Move {
        /// Widget name
        widget: String,
        from: usize,
        to: usize,
    },

    /// Drop stored names the taxonomy no longer knows
    Prune {
        /// Widget name
        widget: String,
    },

    /// Remove every selection of a widget
    Clear {
        /// Widget name
        widget: String,
    },

    /// List selected names in display order
    Badges {
        /// Widget name
        widget: String,
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// List configured widgets
    Widgets,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,

    /// Write a template config file
    Init {
        /// Write to the global config instead of the project directory
        #[arg(short, long)]
        global: bool,
    },

    /// Show config file locations
    Path,
}
