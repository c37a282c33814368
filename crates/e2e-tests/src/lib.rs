//! End-to-end test infrastructure for webindex.
//!
//! Provides a TestHarness that runs the three controllers against the real
//! HTTP client and a local mock of the CGI endpoints, plus helpers to mount
//! endpoint responses.

use std::sync::Arc;

use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use webindex_client::HttpIndexClient;
use webindex_controller::{
    ChartController, ChartGeometry, IndexLifecycleController, RecordingView, SearchController,
};
use webindex_types::Settings;

/// Path prefix the mock server serves the endpoints under.
pub const CGI_PREFIX: &str = "/cgi-bin/";

/// Shared test harness for E2E tests.
///
/// Owns the mock server; dropping the harness shuts it down and verifies any
/// `expect` counts on mounted mocks.
pub struct TestHarness {
    pub server: MockServer,
    pub settings: Settings,
    pub client: Arc<HttpIndexClient>,
    pub view: Arc<RecordingView>,
    pub lifecycle: IndexLifecycleController,
    pub search: SearchController,
    pub chart: ChartController,
}

impl TestHarness {
    /// Start a mock server and wire all controllers to it.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let settings = settings_for(&server);
        let client = Arc::new(HttpIndexClient::from_settings(&settings).expect("client"));
        let view = Arc::new(RecordingView::new());

        let lifecycle = IndexLifecycleController::new(client.clone(), view.clone());
        let search = SearchController::new(
            client.clone(),
            view.clone(),
            lifecycle.ready_signal(),
            settings.result_suffix_len,
        );
        let chart = ChartController::new(client.clone(), view.clone(), ChartGeometry::from(&settings));

        Self {
            server,
            settings,
            client,
            view,
            lifecycle,
            search,
            chart,
        }
    }

    /// Answer the existence check with `body`.
    pub async fn mount_index_exists(&self, body: &str) {
        mount_post(&self.server, "indexExists.cgi", ResponseTemplate::new(200).set_body_string(body))
            .await;
    }

    /// Answer builds with 200 and expect exactly `times` of them.
    pub async fn mount_build_index(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path(format!("{CGI_PREFIX}buildIndex.cgi")))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Answer `query` with the JSON object `hits`.
    pub async fn mount_search(&self, query: &str, hits: Value) {
        Mock::given(method("GET"))
            .and(path(format!("{CGI_PREFIX}search.cgi")))
            .and(query_param("searchQuery", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(hits))
            .mount(&self.server)
            .await;
    }

    /// Answer the samples endpoint with the JSON object `samples`.
    pub async fn mount_samples(&self, samples: Value) {
        Mock::given(method("GET"))
            .and(path(format!("{CGI_PREFIX}data.cgi")))
            .respond_with(ResponseTemplate::new(200).set_body_json(samples))
            .mount(&self.server)
            .await;
    }

    /// Fail `endpoint` with `status`, at most `times` times.
    pub async fn mount_failure(&self, http_method: &str, endpoint: &str, status: u16, times: u64) {
        Mock::given(method(http_method))
            .and(path(format!("{CGI_PREFIX}{endpoint}")))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(times)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server received for `endpoint`.
    pub async fn requests_to(&self, endpoint: &str) -> usize {
        let wanted = format!("{CGI_PREFIX}{endpoint}");
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == wanted)
            .count()
    }
}

/// Settings pointing every endpoint at `server`.
pub fn settings_for(server: &MockServer) -> Settings {
    Settings {
        base_url: format!("{}{CGI_PREFIX}", server.uri()),
        ..Settings::default()
    }
}

async fn mount_post(server: &MockServer, endpoint: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(format!("{CGI_PREFIX}{endpoint}")))
        .respond_with(response)
        .mount(server)
        .await;
}
