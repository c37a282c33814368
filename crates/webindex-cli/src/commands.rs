//! Command implementations for the webindex console.
//!
//! Handles:
//! - status: Ask the server whether a saved index exists
//! - rebuild: Rebuild the index
//! - search: Reuse or rebuild the index, then run one query
//! - chart: Print the memory samples series
//! - console: Interactive session

use anyhow::{bail, Context, Result};
use tokio::io::BufReader;
use tracing::info;

use webindex_client::{HttpIndexClient, RemoteIndexService};
use webindex_controller::SearchOutcome;
use webindex_types::{IndexState, Settings};

use crate::console::run_console;
use crate::session::Session;

/// Load settings and apply CLI overrides.
pub fn load_settings(
    config_path: Option<&str>,
    base_url: Option<&str>,
    log_level: Option<&str>,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(base_url) = base_url {
        settings.base_url = base_url.to_string();
    }
    if let Some(log_level) = log_level {
        settings.log_level = log_level.to_string();
    }
    settings
        .validate()
        .context("Invalid command line override")?;

    Ok(settings)
}

/// Install the tracing subscriber. Logs go to stderr so results stay on stdout.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Configuration:");
    info!("  Base URL: {}", settings.base_url);
    info!("  Log level: {}", settings.log_level);
    Ok(())
}

/// Report whether the server has a saved index.
pub async fn show_status(settings: &Settings) -> Result<()> {
    let client = HttpIndexClient::from_settings(settings).context("Failed to create index client")?;
    let exists = client
        .index_exists()
        .await
        .context("Could not check for a saved index")?;

    if exists {
        println!("A saved index exists at {}", settings.base_url);
    } else {
        println!("No saved index at {}", settings.base_url);
    }
    Ok(())
}

/// Rebuild the index whether or not a saved one exists.
pub async fn handle_rebuild(settings: &Settings) -> Result<()> {
    let session = Session::connect(settings)?;
    let mut state = session.lifecycle.on_startup().await?;
    if state == IndexState::AwaitingUserChoice {
        state = session.lifecycle.on_request_rebuild().await?;
    }
    ensure_ready(state)
}

/// Make the index ready, then run one query.
pub async fn handle_search(settings: &Settings, query: &str, rebuild: bool) -> Result<()> {
    let session = Session::connect(settings)?;
    prepare_index(&session, rebuild).await?;

    match session.search.on_submit(query).await? {
        SearchOutcome::Results(_) => Ok(()),
        SearchOutcome::Failed(message) => bail!(message),
    }
}

/// Fetch and print the memory samples series.
pub async fn handle_chart(settings: &Settings) -> Result<()> {
    let session = Session::connect(settings)?;
    let points = session.chart.on_show_requested().await?;
    info!(points, "Chart rendered");
    Ok(())
}

/// Interactive session on stdin.
pub async fn handle_console(settings: &Settings) -> Result<()> {
    let session = Session::connect(settings)?;
    run_console(&session, BufReader::new(tokio::io::stdin())).await
}

/// Startup check, then reuse or rebuild when the choice is offered.
async fn prepare_index(session: &Session, rebuild: bool) -> Result<()> {
    let mut state = session.lifecycle.on_startup().await?;
    if state == IndexState::AwaitingUserChoice {
        state = if rebuild {
            session.lifecycle.on_request_rebuild().await?
        } else {
            session.lifecycle.on_use_existing().await?
        };
    }
    ensure_ready(state)
}

fn ensure_ready(state: IndexState) -> Result<()> {
    match state {
        IndexState::Ready => Ok(()),
        other => bail!("Index is not ready: {other}"),
    }
}
