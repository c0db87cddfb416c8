//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;
use crate::domain::NodeId;

/// Catalog hierarchies: grouped and flattened views over self-referencing records
#[derive(Parser, Debug)]
#[command(name = "cattree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Catalog JSON file (overrides config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Acting user id (overrides config)
    #[arg(short, long, global = true)]
    pub user: Option<i64>,

    /// Directory holding a local .cattree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by the listing commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Include archived records
    #[arg(short, long)]
    pub all: bool,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show parents with their direct children
    Groups(ListArgs),

    /// Show the whole hierarchy as an indented list
    Flatten(ListArgs),

    /// Show the whole hierarchy as a tree
    Tree {
        /// Include archived records
        #[arg(short, long)]
        all: bool,
    },

    /// Show one record
    Show {
        id: NodeId,
    },

    /// Create a record
    Add {
        /// Display name
        #[arg(long)]
        name: String,
        /// Technical name
        #[arg(long)]
        technical_name: String,
        /// Characteristic type id
        #[arg(long)]
        kind: i64,
        /// Parent record id
        #[arg(long)]
        parent: Option<NodeId>,
        /// Allow subscriptions to set a limit
        #[arg(long)]
        limits: bool,
    },

    /// Update a record
    Edit {
        id: NodeId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        technical_name: Option<String>,
        #[arg(long)]
        kind: Option<i64>,
        /// New parent record id
        #[arg(long, conflicts_with = "no_parent")]
        parent: Option<NodeId>,
        /// Make the record a root
        #[arg(long)]
        no_parent: bool,
        /// Whether subscriptions may set a limit
        #[arg(long)]
        limits: Option<bool>,
    },

    /// Toggle a record between active and archived
    Toggle {
        id: NodeId,
    },

    /// List records that may become the parent of a record
    Parents {
        /// Record being edited (omit for a new record)
        id: Option<NodeId>,
    },

    /// Build subscription details from selected characteristics
    Subscription {
        /// Selected characteristic, optionally with a limit: ID or ID=LIMIT
        #[arg(short, long = "select", value_name = "ID[=LIMIT]", required = true)]
        selected: Vec<String>,
    },

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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented template
    Template,
    /// Print config file locations
    Path,
}
