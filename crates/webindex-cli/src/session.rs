//! Wiring of the three controllers around one terminal view.

use std::sync::Arc;

use anyhow::{Context, Result};

use webindex_client::{HttpIndexClient, MetricsService, RemoteIndexService};
use webindex_controller::{ChartController, ChartGeometry, IndexLifecycleController, SearchController};
use webindex_types::Settings;

use crate::terminal::TerminalView;

/// One console session: lifecycle, search and chart sharing a view.
pub struct Session {
    pub lifecycle: IndexLifecycleController,
    pub search: SearchController,
    pub chart: ChartController,
    pub view: Arc<TerminalView>,
}

impl Session {
    pub fn new(
        service: Arc<dyn RemoteIndexService>,
        metrics: Arc<dyn MetricsService>,
        view: Arc<TerminalView>,
        settings: &Settings,
    ) -> Self {
        let lifecycle = IndexLifecycleController::new(service.clone(), view.clone());
        let search = SearchController::new(
            service,
            view.clone(),
            lifecycle.ready_signal(),
            settings.result_suffix_len,
        );
        let chart = ChartController::new(metrics, view.clone(), ChartGeometry::from(settings));
        Self {
            lifecycle,
            search,
            chart,
            view,
        }
    }

    /// Session talking to the configured index service, printing to stdout.
    pub fn connect(settings: &Settings) -> Result<Self> {
        let client = Arc::new(
            HttpIndexClient::from_settings(settings).context("Failed to create index client")?,
        );
        Ok(Self::new(
            client.clone(),
            client,
            Arc::new(TerminalView::stdout()),
            settings,
        ))
    }
}
