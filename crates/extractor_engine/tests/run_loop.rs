use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use extractor_core::{CompanyRecord, RunConfiguration, RunItem, RunRequest};
use extractor_engine::{
    run_sequential, EngineEvent, EventSink, ExtractionError, ExtractionProvider, FailureKind,
};
use pretty_assertions::assert_eq;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Answers from a script keyed by URL; unknown URLs succeed.
#[derive(Default)]
struct ScriptedProvider {
    failures: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    cancel_on: Option<(String, CancellationToken)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ExtractionProvider for ScriptedProvider {
    async fn extract(
        &self,
        url: &str,
        _config: &RunConfiguration,
    ) -> Result<CompanyRecord, ExtractionError> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some((target, token)) = &self.cancel_on {
            if target == url {
                token.cancel();
            }
        }
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        match self.failures.get(url) {
            Some(message) => Err(ExtractionError::new(FailureKind::Blocked, message.clone())),
            None => Ok(CompanyRecord {
                company_name: format!("Company at {url}"),
                website_url: url.to_string(),
                ..CompanyRecord::default()
            }),
        }
    }
}

fn request(urls: &[&str], requests_per_second: f64) -> RunRequest {
    RunRequest {
        run_id: 7,
        items: urls
            .iter()
            .enumerate()
            .map(|(index, url)| RunItem {
                item_id: index as u64 + 1,
                url: url.to_string(),
            })
            .collect(),
        config: RunConfiguration {
            requests_per_second,
            ..RunConfiguration::default()
        },
    }
}

fn describe(events: &[EngineEvent]) -> Vec<String> {
    events
        .iter()
        .map(|event| match event {
            EngineEvent::ItemStarted { item_id, .. } => format!("start {item_id}"),
            EngineEvent::ItemCompleted {
                item_id, result, ..
            } => match result {
                Ok(_) => format!("ok {item_id}"),
                Err(err) => format!("err {item_id} {}", err.message),
            },
            EngineEvent::RunFinished(summary) => format!(
                "finished ok={} err={} cancelled={}",
                summary.succeeded, summary.failed, summary.cancelled
            ),
            EngineEvent::SearchCompleted { .. } => "search".to_string(),
        })
        .collect()
}

#[tokio::test]
async fn processes_every_item_in_order_and_isolates_failures() {
    let provider = ScriptedProvider {
        failures: HashMap::from([("https://b.test/".to_string(), "blocked".to_string())]),
        ..ScriptedProvider::default()
    };
    let sink = TestSink::default();
    let cancel = CancellationToken::new();

    let summary = run_sequential(
        &provider,
        request(&["https://a.test/", "https://b.test/", "https://c.test/"], 0.0),
        &cancel,
        &sink,
    )
    .await;

    assert_eq!(
        describe(&sink.take()),
        vec![
            "start 1",
            "ok 1",
            "start 2",
            "err 2 blocked",
            "start 3",
            "ok 3",
            "finished ok=2 err=1 cancelled=false",
        ]
    );
    assert_eq!(summary.run_id, 7);
    assert_eq!(summary.processed(), 3);
    assert!(!summary.cancelled);
}

#[tokio::test]
async fn cancellation_during_item_k_finishes_k_and_skips_the_rest() {
    let cancel = CancellationToken::new();
    let provider = ScriptedProvider {
        cancel_on: Some(("https://b.test/".to_string(), cancel.clone())),
        ..ScriptedProvider::default()
    };
    let sink = TestSink::default();

    let summary = run_sequential(
        &provider,
        request(
            &["https://a.test/", "https://b.test/", "https://c.test/", "https://d.test/"],
            0.0,
        ),
        &cancel,
        &sink,
    )
    .await;

    assert_eq!(
        describe(&sink.take()),
        vec![
            "start 1",
            "ok 1",
            "start 2",
            "ok 2",
            "finished ok=2 err=0 cancelled=true",
        ]
    );
    assert_eq!(provider.calls(), vec!["https://a.test/", "https://b.test/"]);
    assert!(summary.cancelled);
}

#[tokio::test]
async fn cancelled_before_start_processes_nothing() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let provider = ScriptedProvider::default();
    let sink = TestSink::default();

    let summary = run_sequential(&provider, request(&["https://a.test/"], 0.0), &cancel, &sink).await;

    assert_eq!(describe(&sink.take()), vec!["finished ok=0 err=0 cancelled=true"]);
    assert!(provider.calls().is_empty());
    assert!(summary.cancelled);
}

#[tokio::test(start_paused = true)]
async fn slow_extraction_fails_with_timeout() {
    let provider = ScriptedProvider {
        delays: HashMap::from([("https://slow.test/".to_string(), Duration::from_secs(120))]),
        ..ScriptedProvider::default()
    };
    let sink = TestSink::default();
    let cancel = CancellationToken::new();
    let mut req = request(&["https://slow.test/", "https://fast.test/"], 0.0);
    req.config.timeout_seconds = 5;

    run_sequential(&provider, req, &cancel, &sink).await;

    let events = sink.take();
    let failure = events
        .iter()
        .find_map(|event| match event {
            EngineEvent::ItemCompleted {
                item_id: 1,
                result: Err(err),
                ..
            } => Some(err.clone()),
            _ => None,
        })
        .expect("timeout failure");
    assert_eq!(failure.kind, FailureKind::Timeout { seconds: 5 });
    assert_eq!(
        describe(&events).last().map(String::as_str),
        Some("finished ok=1 err=1 cancelled=false")
    );
}

#[tokio::test(start_paused = true)]
async fn rate_limit_spaces_items_but_not_after_the_last() {
    let provider = ScriptedProvider::default();
    let sink = TestSink::default();
    let cancel = CancellationToken::new();
    let started = Instant::now();

    run_sequential(
        &provider,
        request(&["https://a.test/", "https://b.test/", "https://c.test/"], 2.0),
        &cancel,
        &sink,
    )
    .await;

    // Two gaps of 500ms between three items.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(1000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(1500), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn stop_during_rate_limit_delay_ends_run_early() {
    let provider = Arc::new(ScriptedProvider::default());
    let sink = Arc::new(TestSink::default());
    let cancel = CancellationToken::new();

    let task = {
        let provider = provider.clone();
        let sink = sink.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            run_sequential(
                provider.as_ref(),
                request(&["https://a.test/", "https://b.test/"], 0.1),
                &cancel,
                sink.as_ref(),
            )
            .await
        })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    cancel.cancel();
    let summary = task.await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(
        describe(&sink.take()),
        vec!["start 1", "ok 1", "finished ok=1 err=0 cancelled=true"]
    );
    assert_eq!(provider.calls(), vec!["https://a.test/"]);
}
