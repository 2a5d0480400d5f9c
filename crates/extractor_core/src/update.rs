use crate::view_model::ExportNotice;
use crate::{partition_urls, normalize_url, AppState, Effect, Msg, RunRequest};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlsSubmitted(raw) => {
            if raw.trim().is_empty() {
                return (state, Vec::new());
            }
            let (accepted, rejected) = partition_urls(&raw);
            state.set_rejections(rejected);
            state.enqueue(accepted);
            Vec::new()
        }
        Msg::SearchSubmitted(query) => {
            let query = query.trim();
            if query.is_empty() || state.search_in_flight() {
                return (state, Vec::new());
            }
            state.set_search_in_flight(true);
            vec![Effect::Search {
                query: query.to_string(),
            }]
        }
        Msg::SearchCompleted { query: _, result } => {
            state.set_search_in_flight(false);
            match result {
                Ok(urls) => {
                    state.set_search_error(None);
                    state.enqueue(urls.iter().map(|url| normalize_url(url)).collect());
                }
                Err(message) => state.set_search_error(Some(message)),
            }
            Vec::new()
        }
        Msg::StartClicked => {
            if state.is_running() {
                return (state, Vec::new());
            }
            let items = state.pending_snapshot();
            if items.is_empty() {
                return (state, Vec::new());
            }
            let run_id = state.begin_run();
            vec![Effect::StartRun(RunRequest {
                run_id,
                items,
                config: state.config().clone(),
            })]
        }
        Msg::StopClicked => match state.request_stop() {
            Some(run_id) => vec![Effect::StopRun { run_id }],
            None => Vec::new(),
        },
        Msg::ClearClicked => match state.clear() {
            Some(run_id) => vec![Effect::StopRun { run_id }],
            None => Vec::new(),
        },
        Msg::ConfigChanged(config) => {
            match config.validate() {
                Ok(()) => state.set_config(config),
                Err(err) => state.set_config_error(err.to_string()),
            }
            Vec::new()
        }
        Msg::ItemStarted { run_id, item_id } => {
            state.mark_in_progress(run_id, item_id);
            Vec::new()
        }
        Msg::ItemFinished {
            item_id,
            result,
            completed_at,
        } => {
            state.complete_item(item_id, result, completed_at);
            Vec::new()
        }
        Msg::RunFinished { run_id } => {
            state.finish_run(run_id);
            Vec::new()
        }
        Msg::ExportClicked(format) => {
            let items = state.succeeded_items();
            if items.is_empty() {
                return (state, Vec::new());
            }
            vec![Effect::Export { format, items }]
        }
        Msg::ExportFinished { format, result } => {
            state.set_export_notice(ExportNotice { format, result });
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}
