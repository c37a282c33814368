//! webindex console
//!
//! Checks for a saved search index on the server, reuses or rebuilds it,
//! runs queries, and charts the memory used while indexing.
//!
//! # Usage
//!
//! ```bash
//! webindex status
//! webindex rebuild
//! webindex search [--rebuild] QUERY
//! webindex chart
//! webindex console
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/webindex/config.toml)
//! 3. Environment variables (WEBINDEX_*)
//! 4. CLI flags

use anyhow::Result;

use webindex_cli::{
    handle_chart, handle_console, handle_rebuild, handle_search, init_logging, load_settings,
    show_status, Cli, Commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let settings = load_settings(
        cli.config.as_deref(),
        cli.base_url.as_deref(),
        cli.log_level.as_deref(),
    )?;
    init_logging(&settings)?;

    match cli.command {
        Commands::Status => {
            show_status(&settings).await?;
        }
        Commands::Rebuild => {
            handle_rebuild(&settings).await?;
        }
        Commands::Search { query, rebuild } => {
            handle_search(&settings, &query, rebuild).await?;
        }
        Commands::Chart => {
            handle_chart(&settings).await?;
        }
        Commands::Console => {
            handle_console(&settings).await?;
        }
    }

    Ok(())
}
