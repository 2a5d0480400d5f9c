use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use extractor_core::{update, AppState, Effect, ItemStatus, Msg, RunConfiguration};
use extractor_engine::{EngineEvent, EngineHandle, MockProvider, MockSettings};
use pretty_assertions::assert_eq;

fn to_msg(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::ItemStarted { run_id, item_id } => Some(Msg::ItemStarted { run_id, item_id }),
        EngineEvent::ItemCompleted {
            item_id,
            result,
            completed_at,
            ..
        } => Some(Msg::ItemFinished {
            item_id,
            result: result.map_err(|err| err.message),
            completed_at,
        }),
        EngineEvent::RunFinished(summary) => Some(Msg::RunFinished {
            run_id: summary.run_id,
        }),
        EngineEvent::SearchCompleted { query, result } => Some(Msg::SearchCompleted {
            query,
            result: result.map_err(|err| err.to_string()),
        }),
    }
}

fn apply_effects(engine: &EngineHandle, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::StartRun(request) => engine.start_run(request),
            Effect::StopRun { run_id } => engine.stop_run(run_id),
            Effect::Search { query } => engine.search(query),
            Effect::Export { .. } => {}
        }
    }
}

/// Pumps engine events into the state until `done` holds or time runs out.
fn pump_until(
    engine: &EngineHandle,
    mut state: AppState,
    done: impl Fn(&AppState) -> bool,
) -> AppState {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !done(&state) {
        assert!(Instant::now() < deadline, "timed out waiting for engine");
        match engine.try_recv().and_then(to_msg) {
            Some(msg) => {
                let (next, effects) = update(state, msg);
                apply_effects(engine, effects);
                state = next;
            }
            None => thread::sleep(Duration::from_millis(5)),
        }
    }
    state
}

fn instant_engine(failure_rate: f64) -> EngineHandle {
    let provider = Arc::new(MockProvider::new(MockSettings {
        failure_rate,
        ..MockSettings::instant()
    }));
    EngineHandle::new(provider.clone(), provider).expect("engine")
}

fn unthrottled() -> AppState {
    AppState::with_config(RunConfiguration {
        requests_per_second: 0.0,
        ..RunConfiguration::default()
    })
}

#[test]
fn full_run_leaves_no_pending_items() {
    let engine = instant_engine(0.0);
    let (state, _) = update(unthrottled(), Msg::UrlsSubmitted("a.com\nb.com\nc.com".into()));
    let (state, effects) = update(state, Msg::StartClicked);
    apply_effects(&engine, effects);

    let state = pump_until(&engine, state, |s| !s.is_running());

    let statuses: Vec<_> = state.items().map(|item| item.status()).collect();
    assert_eq!(statuses, vec![ItemStatus::Succeeded; 3]);
    assert!(state
        .items()
        .all(|item| item.record().is_some() && item.completed_at().is_some()));
    let record = state.item(2).and_then(|item| item.record()).expect("record");
    assert_eq!(record.website_url, "https://b.com/");
}

#[test]
fn failing_provider_marks_items_failed_without_halting() {
    let engine = instant_engine(1.0);
    let (state, _) = update(unthrottled(), Msg::UrlsSubmitted("a.com\nb.com".into()));
    let (state, effects) = update(state, Msg::StartClicked);
    apply_effects(&engine, effects);

    let state = pump_until(&engine, state, |s| !s.is_running());

    let stats = state.stats();
    assert_eq!((stats.total, stats.failed, stats.pending), (2, 2, 0));
    assert!(state.items().all(|item| item
        .error_message()
        .is_some_and(|message| message.starts_with("Failed to extract data"))));
}

#[test]
fn stop_leaves_unstarted_items_pending() {
    let engine = instant_engine(0.0);
    // 0.1 requests per second: a ten second gap after the first item.
    let state = AppState::with_config(RunConfiguration {
        requests_per_second: 0.1,
        ..RunConfiguration::default()
    });
    let (state, _) = update(state, Msg::UrlsSubmitted("a.com\nb.com\nc.com".into()));
    let (state, effects) = update(state, Msg::StartClicked);
    apply_effects(&engine, effects);

    let state = pump_until(&engine, state, |s| {
        s.item(1).is_some_and(|item| item.status().is_terminal())
    });
    let (state, effects) = update(state, Msg::StopClicked);
    apply_effects(&engine, effects);
    let state = pump_until(&engine, state, |s| !s.is_running());

    let statuses: Vec<_> = state.items().map(|item| item.status()).collect();
    assert_eq!(
        statuses,
        vec![ItemStatus::Succeeded, ItemStatus::Pending, ItemStatus::Pending]
    );
}

#[test]
fn search_results_are_enqueued() {
    let engine = instant_engine(0.0);
    let (state, effects) = update(AppState::new(), Msg::SearchSubmitted("fintech".into()));
    apply_effects(&engine, effects);

    let state = pump_until(&engine, state, |s| !s.view().search_in_flight);

    let total = state.stats().total;
    assert!((3..=5).contains(&total), "got {total}");
    assert!(state
        .items()
        .all(|item| item.source_url().ends_with("?q=fintech")));
}
