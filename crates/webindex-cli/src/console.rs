//! Interactive console.
//!
//! Reads one command per line. What a line means depends on the index
//! state: the reuse/rebuild choice, a retry prompt, or once the index is
//! ready, queries and chart commands.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use webindex_controller::{ClickOutcome, HoverOutcome, Pointer};
use webindex_types::IndexState;

use crate::session::Session;

pub const HINT_EMPTY_LINE: &str = "Enter 'h' for help; 'q' to exit.";
pub const HINT_CHOICE: &str = "Enter 'u' to use the saved index or 'r' to rebuild it.";
pub const HINT_RETRY: &str = "Enter 'r' to retry or 'q' to exit.";
pub const HINT_NO_CHART: &str = "No chart shown; enter 'chart' first.";

const HELP: &[&str] = &[
    "Commands:",
    "  <query>        search the index",
    "  chart          show memory used while indexing",
    "  hover <x> <y>  move the pointer over the chart",
    "  click <x> <y>  highlight the chart point under the pointer",
    "  h              this help",
    "  q              exit",
];

/// Whether the console keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run the startup check, then read commands until `q` or end of input.
pub async fn run_console<R>(session: &Session, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    session.lifecycle.on_startup().await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if handle_line(session, line.trim()).await? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

/// Dispatch one trimmed input line.
pub async fn handle_line(session: &Session, line: &str) -> Result<Flow> {
    match session.lifecycle.state() {
        IndexState::AwaitingUserChoice => match line {
            "u" => {
                session.lifecycle.on_use_existing().await?;
            }
            "r" => {
                session.lifecycle.on_request_rebuild().await?;
            }
            "q" => return Ok(Flow::Quit),
            _ => session.view.line(HINT_CHOICE),
        },
        IndexState::Failed { .. } => match line {
            "r" => {
                session.lifecycle.on_retry().await?;
            }
            "q" => return Ok(Flow::Quit),
            _ => session.view.line(HINT_RETRY),
        },
        IndexState::Ready => return ready_command(session, line).await,
        other => {
            if line == "q" {
                return Ok(Flow::Quit);
            }
            session.view.line(&format!("Please wait, the index is {other}."));
        }
    }
    Ok(Flow::Continue)
}

async fn ready_command(session: &Session, line: &str) -> Result<Flow> {
    match line {
        "q" => return Ok(Flow::Quit),
        "h" => HELP.iter().for_each(|l| session.view.line(l)),
        "" => session.view.line(HINT_EMPTY_LINE),
        "chart" => {
            if let Err(e) = session.chart.on_show_requested().await {
                debug!(error = %e, "Chart not shown");
            }
        }
        _ => match pointer_command(line) {
            Some(("hover", pointer)) => {
                if session.chart.on_hover(pointer) == HoverOutcome::Ignored {
                    session.view.line(HINT_NO_CHART);
                }
            }
            Some((_, pointer)) => match session.chart.on_click(pointer) {
                ClickOutcome::Ignored => session.view.line(HINT_NO_CHART),
                ClickOutcome::Missed => session.view.line("No point there."),
                ClickOutcome::AlreadyHighlighted(index) => {
                    session.view.line(&format!("Point {index} is already highlighted."))
                }
                ClickOutcome::Highlighted(_) => {}
            },
            None => {
                if let Err(e) = session.search.on_submit(line).await {
                    session.view.line(&format!("error: {e}"));
                }
            }
        },
    }
    Ok(Flow::Continue)
}

/// Parse `hover <x> <y>` or `click <x> <y>`. Anything else is a query.
fn pointer_command(line: &str) -> Option<(&'static str, Pointer)> {
    let mut parts = line.split_whitespace();
    let verb = match parts.next()? {
        "hover" => "hover",
        "click" => "click",
        _ => return None,
    };
    let x = parts.next()?.parse::<f64>().ok()?;
    let y = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((verb, Pointer::at(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;
    use webindex_client::{MockIndexService, MockMetricsService};
    use webindex_types::Settings;

    use crate::terminal::tests::SharedBuffer;
    use crate::terminal::TerminalView;

    fn session(
        service: MockIndexService,
        metrics: MockMetricsService,
    ) -> (Session, Arc<MockIndexService>, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let service = Arc::new(service);
        let session = Session::new(
            service.clone(),
            Arc::new(metrics),
            Arc::new(TerminalView::new(buffer.clone())),
            &Settings::default(),
        );
        (session, service, buffer)
    }

    #[test]
    fn test_pointer_command_parsing() {
        assert_eq!(
            pointer_command("hover 10 20.5"),
            Some(("hover", Pointer::at(10.0, 20.5)))
        );
        assert_eq!(pointer_command("click 1 2"), Some(("click", Pointer::at(1.0, 2.0))));
        assert_eq!(pointer_command("click fraud"), None);
        assert_eq!(pointer_command("hover 1 2 3"), None);
        assert_eq!(pointer_command("wheat prices"), None);
    }

    #[tokio::test]
    async fn test_missing_index_is_built_then_searched() {
        let (session, service, buffer) = session(
            MockIndexService::new()
                .with_existing_index(false)
                .with_search_results("foo", &[("a", "site.com/x0123456789")]),
            MockMetricsService::new(),
        );

        run_console(&session, &b"foo\nq\n"[..]).await.unwrap();

        assert_eq!(service.build_calls(), 1);
        let out = buffer.contents();
        assert!(out.contains("No saved index. Building it now..."));
        assert!(out.contains("  1. http://site.com/x\n"));
    }

    #[tokio::test]
    async fn test_existing_index_waits_for_choice() {
        let (session, service, buffer) = session(
            MockIndexService::new().with_existing_index(true),
            MockMetricsService::new(),
        );

        run_console(&session, &b"foo\nu\n\n"[..]).await.unwrap();

        assert_eq!(service.build_calls(), 0);
        assert_eq!(service.search_calls(), 0);
        assert_eq!(session.lifecycle.state(), IndexState::Ready);
        let out = buffer.contents();
        assert!(out.contains(HINT_CHOICE));
        assert!(out.contains("Using the saved index."));
        assert!(out.ends_with(&format!("{HINT_EMPTY_LINE}\n")));
    }

    #[tokio::test]
    async fn test_rebuild_choice() {
        let (session, service, _buffer) = session(
            MockIndexService::new().with_existing_index(true),
            MockMetricsService::new(),
        );

        run_console(&session, &b"r\n"[..]).await.unwrap();

        assert_eq!(service.build_calls(), 1);
        assert_eq!(session.lifecycle.state(), IndexState::Ready);
    }

    #[tokio::test]
    async fn test_failed_check_offers_retry() {
        let (session, service, buffer) = session(
            MockIndexService::new()
                .with_existing_index(false)
                .with_exists_failures(1),
            MockMetricsService::new(),
        );

        run_console(&session, &b"x\nr\n"[..]).await.unwrap();

        assert_eq!(service.exists_calls(), 2);
        assert_eq!(service.build_calls(), 1);
        assert_eq!(session.lifecycle.state(), IndexState::Ready);
        let out = buffer.contents();
        assert!(out.contains("Could not check for a saved index, retry?"));
        assert!(out.contains(HINT_RETRY));
    }

    #[tokio::test]
    async fn test_quit_stops_reading() {
        let (session, service, _buffer) = session(
            MockIndexService::new().with_existing_index(false),
            MockMetricsService::new(),
        );

        run_console(&session, &b"q\nfoo\n"[..]).await.unwrap();

        assert_eq!(service.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_help_and_search_failure() {
        let (session, _service, buffer) = session(
            MockIndexService::new()
                .with_existing_index(false)
                .with_search_failure("oil", "connection reset"),
            MockMetricsService::new(),
        );

        run_console(&session, &b"h\noil\n"[..]).await.unwrap();

        let out = buffer.contents();
        assert!(out.contains("  chart          show memory used while indexing"));
        assert!(out.contains("error: Search failed:"));
        assert!(out.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_chart_hover_and_click() {
        let (session, _service, buffer) = session(
            MockIndexService::new().with_existing_index(false),
            MockMetricsService::new().with_samples(&[
                ("2", json!(100)),
                ("0", json!(50)),
                ("1", json!(75)),
            ]),
        );

        run_console(
            &session,
            &b"hover 400 200\nchart\nhover 400 200\nclick 400 200\nclick 400 200\nclick 600 10\n"[..],
        )
        .await
        .unwrap();

        let out = buffer.contents();
        assert!(out.contains(HINT_NO_CHART));
        assert!(out.contains("RSS/K (3 samples)"));
        assert!(out.contains("pointer x=1.00 y=75.00"));
        assert!(out.contains("tooltip: RSS/K at 1.00 = 75.00 (at 405, 205)"));
        assert!(out.contains("highlighted RSS/K point 1 (1.00, 75.00)"));
        assert!(out.contains("Point 1 is already highlighted."));
        assert!(out.contains("No point there."));
    }

    #[tokio::test]
    async fn test_chart_failure_keeps_console_running() {
        let (session, service, buffer) = session(
            MockIndexService::new()
                .with_existing_index(false)
                .with_search_results("foo", &[("a", "site.com/x0123456789")]),
            MockMetricsService::new().with_failure("metrics offline"),
        );

        run_console(&session, &b"chart\nfoo\n"[..]).await.unwrap();

        assert_eq!(service.search_calls(), 1);
        let out = buffer.contents();
        assert!(out.contains("error: Could not load memory samples"));
        assert!(out.contains("  1. http://site.com/x"));
    }
}
