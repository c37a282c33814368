//! Re-entrancy E2E tests for webindex.
//!
//! A second trigger while a remote call is in flight must be rejected, and
//! the first call must still complete normally.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::Notify;

use webindex_client::{MockIndexService, MockMetricsService};
use webindex_controller::{
    ChartController, ChartError, ChartGeometry, IndexLifecycleController, LifecycleError,
    RecordingView, SearchController, SearchError, SearchOutcome, ViewEvent,
};
use webindex_types::IndexState;

/// Yield until `done` holds, so a spawned task reaches its gate.
async fn settle(done: impl Fn() -> bool) {
    for _ in 0..100 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("task never reached the expected point");
}

#[tokio::test]
async fn test_second_build_rejected_while_building() {
    let gate = Arc::new(Notify::new());
    let service = Arc::new(
        MockIndexService::new()
            .with_existing_index(true)
            .with_build_gate(gate.clone()),
    );
    let view = Arc::new(RecordingView::new());
    let lifecycle = Arc::new(IndexLifecycleController::new(service.clone(), view.clone()));

    lifecycle.on_startup().await.unwrap();

    let first = tokio::spawn({
        let lifecycle = lifecycle.clone();
        async move { lifecycle.on_request_rebuild().await }
    });
    settle(|| service.build_calls() == 1).await;

    assert_eq!(lifecycle.state(), IndexState::Rebuilding);
    assert_eq!(
        lifecycle.on_request_rebuild().await.unwrap_err(),
        LifecycleError::Busy
    );
    assert_eq!(lifecycle.on_use_existing().await.unwrap_err(), LifecycleError::Busy);

    gate.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), IndexState::Ready);
    assert_eq!(service.build_calls(), 1);
    assert_eq!(view.count(|e| matches!(e, ViewEvent::SearchRevealed)), 1);
}

#[tokio::test]
async fn test_second_search_rejected_while_searching() {
    let gate = Arc::new(Notify::new());
    let service = Arc::new(
        MockIndexService::new()
            .with_existing_index(false)
            .with_search_results("foo", &[("a", "site.com/x0123456789")])
            .with_search_gate(gate.clone()),
    );
    let view = Arc::new(RecordingView::new());
    let lifecycle = IndexLifecycleController::new(service.clone(), view.clone());
    let search = Arc::new(SearchController::new(
        service.clone(),
        view.clone(),
        lifecycle.ready_signal(),
        10,
    ));

    lifecycle.on_startup().await.unwrap();

    let first = tokio::spawn({
        let search = search.clone();
        async move { search.on_submit("foo").await }
    });
    settle(|| service.search_calls() == 1).await;

    assert_eq!(search.on_submit("foo").await.unwrap_err(), SearchError::Busy);

    gate.notify_one();
    let outcome = first.await.unwrap().unwrap();
    assert!(matches!(outcome, SearchOutcome::Results(items) if items.len() == 1));
    assert_eq!(service.search_calls(), 1);
}

#[tokio::test]
async fn test_second_chart_fetch_rejected() {
    let gate = Arc::new(Notify::new());
    let metrics = Arc::new(
        MockMetricsService::new()
            .with_samples(&[("0", json!(1)), ("1", json!(2))])
            .with_gate(gate.clone()),
    );
    let view = Arc::new(RecordingView::new());
    let chart = Arc::new(ChartController::new(
        metrics.clone(),
        view.clone(),
        ChartGeometry::default(),
    ));

    let first = tokio::spawn({
        let chart = chart.clone();
        async move { chart.on_show_requested().await }
    });
    settle(|| metrics.calls() == 1).await;

    assert!(matches!(
        chart.on_show_requested().await.unwrap_err(),
        ChartError::Busy
    ));

    gate.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), 2);
    assert_eq!(metrics.calls(), 1);
    assert_eq!(
        view.count(|e| matches!(e, ViewEvent::ChartRendered { .. })),
        1
    );
}
