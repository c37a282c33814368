//! Console E2E tests: scripted input lines driven through the real HTTP
//! client against a mock CGI server.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::json;

use e2e_tests::TestHarness;
use webindex_cli::{run_console, Session, TerminalView};
use webindex_types::IndexState;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn console_session(harness: &TestHarness) -> (Session, Captured) {
    let out = Captured::default();
    let session = Session::new(
        harness.client.clone(),
        harness.client.clone(),
        Arc::new(TerminalView::new(out.clone())),
        &harness.settings,
    );
    (session, out)
}

#[tokio::test]
async fn test_console_build_search_and_chart() {
    let harness = TestHarness::start().await;
    harness.mount_index_exists("false").await;
    harness.mount_build_index(1).await;
    harness
        .mount_search("foo", json!({"a": "site.com/x0123456789"}))
        .await;
    harness.mount_samples(json!({"1": 75, "0": 50})).await;
    let (session, out) = console_session(&harness);

    run_console(&session, &b"foo\nchart\nq\n"[..]).await.unwrap();

    let text = out.text();
    assert!(text.contains("No saved index. Building it now..."));
    assert!(text.contains("  1. http://site.com/x\n"));
    assert!(text.contains("RSS/K (2 samples)"));
    assert_eq!(session.lifecycle.state(), IndexState::Ready);
}

#[tokio::test]
async fn test_console_reuse_choice() {
    let harness = TestHarness::start().await;
    harness.mount_index_exists("true").await;
    harness.mount_build_index(0).await;
    harness.mount_search("bar", json!({})).await;
    let (session, out) = console_session(&harness);

    run_console(&session, &b"u\nbar\n"[..]).await.unwrap();

    let text = out.text();
    assert!(text.contains("Found a saved index."));
    assert!(text.contains("Using the saved index."));
    assert!(text.ends_with("No results.\n"));
}

#[tokio::test]
async fn test_console_retries_failed_build() {
    let harness = TestHarness::start().await;
    harness.mount_index_exists("").await;
    harness.mount_failure("POST", "buildIndex.cgi", 500, 1).await;
    harness.mount_build_index(1).await;
    let (session, out) = console_session(&harness);

    run_console(&session, &b"r\n"[..]).await.unwrap();

    let text = out.text();
    assert!(text.contains("Could not build index, retry?"));
    assert!(text.contains("[r] build again   [q] quit"));
    assert!(text.contains("Done rebuilding the index"));
    assert_eq!(harness.requests_to("buildIndex.cgi").await, 2);
}
