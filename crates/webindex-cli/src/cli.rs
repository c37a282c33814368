//! CLI argument parsing for webindex.
//!
//! CLI flags override all other config sources.

use clap::{Parser, Subcommand};

/// webindex search console
///
/// Checks for a saved search index on the server, reuses or rebuilds it,
/// then runs queries and charts the memory used while indexing.
#[derive(Parser, Debug)]
#[command(name = "webindex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/webindex/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Override the index service base URL
    #[arg(short, long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Console commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether the server has a saved index
    Status,

    /// Rebuild the index
    Rebuild,

    /// Run a single query and print the results
    Search {
        /// Query text
        query: String,

        /// Rebuild the index first even if a saved one exists
        #[arg(long)]
        rebuild: bool,
    },

    /// Print the memory usage series recorded while indexing
    Chart,

    /// Interactive session: choose reuse/rebuild, then query
    Console,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
