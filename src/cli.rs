//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// linkstat - URL shortener with click statistics
#[derive(Parser, Debug)]
#[command(name = "linkstat")]
#[command(version)]
#[command(about = "A small URL shortener with per-click statistics", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Print a sample configuration file, or write it to OUTPUT
    GenerateConfig {
        /// Output file path (default: stdout)
        output: Option<String>,
    },
}
