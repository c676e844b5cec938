use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dolphinctl",
    version,
    about = "Dolphin host teardown and inventory fixture tooling"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Config file (default: $DOLPHINCTL_CONFIG or ~/.config/dolphinctl/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug)"
    )]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Terminate dolphin processes and remove its directories.
    Teardown {
        #[arg(long, default_value_t = false, help = "Report what would happen, change nothing")]
        dry_run: bool,
        #[arg(long, value_enum, help = "Signal sent to matching processes")]
        signal: Option<SignalKind>,
        #[arg(long = "marker", help = "Command-line fragment to match (repeatable)")]
        markers: Vec<String>,
        #[arg(long = "dir", help = "Directory to remove (repeatable)")]
        dirs: Vec<PathBuf>,
        #[arg(long, default_value_t = false, help = "Exit non-zero if any step failed")]
        strict: bool,
    },
    /// List processes teardown would signal.
    Processes {
        #[arg(long = "marker", help = "Command-line fragment to match (repeatable)")]
        markers: Vec<String>,
    },
    /// Inspect storage inventory fixtures.
    Fixture {
        #[command(subcommand)]
        command: FixtureCommands,
    },
    /// Inspect effective configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum FixtureCommands {
    /// Check schema conformance and identifier conventions.
    Validate {
        source: String,
        #[arg(long, default_value_t = false, help = "Treat warnings as failures")]
        strict: bool,
    },
    /// Record counts and capacity totals.
    Summary { source: String },
    /// Print the records of one section.
    List {
        source: String,
        #[arg(value_enum)]
        section: Section,
        #[arg(long)]
        storage_id: Option<String>,
    },
    /// Classify records as added/updated/unchanged/removed between two fixtures.
    Diff { old: String, new: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    Show,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Kill,
    Term,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum Section {
    StoragePools,
    Volumes,
    Controllers,
    Ports,
    Disks,
    Quotas,
    Filesystems,
    Qtrees,
    Shares,
}
