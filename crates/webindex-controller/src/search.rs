//! Query submission and result rendering.

use std::sync::Arc;

use tracing::{debug, info, warn};

use webindex_client::RemoteIndexService;
use webindex_types::SearchResultItem;

use crate::busy::BusyFlag;
use crate::error::SearchError;
use crate::readiness::ReadySignal;
use crate::view::ResultsView;

pub const NOTICE_EMPTY_QUERY: &str = "Enter a search query.";

/// What the results area ended up showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Rendered list, possibly empty
    Results(Vec<SearchResultItem>),
    /// Rendered error message
    Failed(String),
}

/// Runs queries once the index is ready.
pub struct SearchController {
    service: Arc<dyn RemoteIndexService>,
    view: Arc<dyn ResultsView>,
    ready: ReadySignal,
    busy: BusyFlag,
    suffix_len: usize,
}

impl SearchController {
    /// `suffix_len` is the length of the non-display suffix the index service
    /// appends to each URL.
    pub fn new(
        service: Arc<dyn RemoteIndexService>,
        view: Arc<dyn ResultsView>,
        ready: ReadySignal,
        suffix_len: usize,
    ) -> Self {
        Self {
            service,
            view,
            ready,
            busy: BusyFlag::new(),
            suffix_len,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Submit a query.
    pub async fn on_submit(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        if !self.ready.is_ready() {
            debug!("Search submitted before the index was ready");
            return Err(SearchError::NotReady);
        }
        let _guard = self.busy.try_acquire().ok_or(SearchError::Busy)?;

        let query = query.trim();
        if query.is_empty() {
            self.view.show_results_notice(NOTICE_EMPTY_QUERY);
            return Err(SearchError::EmptyQuery);
        }

        self.view.show_searching();
        match self.service.search(query).await {
            Ok(hits) => {
                let items = self.to_items(hits.iter().map(|(_, raw)| raw.as_str()));
                info!(query, results = items.len(), "Search completed");
                self.view.render_results(&items);
                Ok(SearchOutcome::Results(items))
            }
            Err(e) => {
                warn!(query, error = %e, "Search failed");
                let message = format!("Search failed: {e}");
                self.view.render_search_error(&message);
                Ok(SearchOutcome::Failed(message))
            }
        }
    }

    fn to_items<'a>(&self, raws: impl Iterator<Item = &'a str>) -> Vec<SearchResultItem> {
        raws.map(|raw| {
            let item = SearchResultItem::from_raw(raw, self.suffix_len);
            if item.is_truncated_away() {
                warn!(
                    raw,
                    suffix_len = self.suffix_len,
                    "Search result shorter than the service suffix"
                );
            }
            item
        })
        .collect()
    }
}
