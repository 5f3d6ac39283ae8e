//! Command-line interface definitions using clap

use clap::{ArgGroup, Parser, Subcommand};

/// Viewcounter - URL view counter with per-client cooldown
#[derive(Parser, Debug)]
#[command(name = "viewcounter")]
#[command(version)]
#[command(about = "A URL view counter service", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Register a URL and print its new ID
    Register {
        /// URL to register
        url: String,
    },

    /// Count a view for a URL ID
    View {
        /// URL ID
        id: String,

        /// Client key used for cooldown deduplication
        #[arg(long, default_value = "cli")]
        client: String,
    },

    /// Show stats for a URL ID or a URL
    #[command(group(ArgGroup::new("target").required(true).args(["id", "url"])))]
    Stats {
        /// URL ID
        id: Option<String>,

        /// Look up (or create) the record for this URL instead
        #[arg(long)]
        url: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
