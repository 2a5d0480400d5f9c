use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use extractor_core::{RunId, RunRequest};
use extractor_logging::{extractor_debug, extractor_info, extractor_warn};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::run::run_sequential;
use crate::{ChannelEventSink, EngineEvent, EventSink, ExtractionProvider, SearchProvider};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build async runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(#[source] io::Error),
}

enum EngineCommand {
    StartRun(RunRequest),
    StopRun { run_id: RunId },
    Search { query: String },
}

struct ActiveRun {
    run_id: RunId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Owns the background runtime that executes runs and searches. Events are
/// pulled with [`EngineHandle::try_recv`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(
        extractor: Arc<dyn ExtractionProvider>,
        searcher: Arc<dyn SearchProvider>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = Runtime::new().map_err(EngineError::Runtime)?;

        thread::Builder::new()
            .name("extractor-engine".to_string())
            .spawn(move || command_loop(runtime, cmd_rx, event_tx, extractor, searcher))
            .map_err(EngineError::Thread)?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start_run(&self, request: RunRequest) {
        let _ = self.cmd_tx.send(EngineCommand::StartRun(request));
    }

    /// Requests cancellation of `run_id`; a run that already ended is ignored.
    pub fn stop_run(&self, run_id: RunId) {
        let _ = self.cmd_tx.send(EngineCommand::StopRun { run_id });
    }

    pub fn search(&self, query: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Search {
            query: query.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

fn command_loop(
    runtime: Runtime,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    extractor: Arc<dyn ExtractionProvider>,
    searcher: Arc<dyn SearchProvider>,
) {
    let mut active: Option<ActiveRun> = None;

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::StartRun(request) => {
                let run_id = request.run_id;
                let previous = active.take();
                let cancel = CancellationToken::new();
                let token = cancel.clone();
                let extractor = extractor.clone();
                let sink = ChannelEventSink::new(event_tx.clone());

                // One extraction in flight at a time: a new run waits for
                // the previous one to drain.
                let task = runtime.spawn(async move {
                    if let Some(previous) = previous {
                        previous.cancel.cancel();
                        let _ = previous.task.await;
                    }
                    run_sequential(extractor.as_ref(), request, &token, &sink).await;
                });
                active = Some(ActiveRun {
                    run_id,
                    cancel,
                    task,
                });
            }
            EngineCommand::StopRun { run_id } => match active.as_ref() {
                Some(run) if run.run_id == run_id => {
                    extractor_info!("stop requested for run {}", run_id);
                    run.cancel.cancel();
                }
                _ => extractor_debug!("stop for inactive run {} ignored", run_id),
            },
            EngineCommand::Search { query } => {
                let searcher = searcher.clone();
                let sink = ChannelEventSink::new(event_tx.clone());
                runtime.spawn(async move {
                    let result = searcher.search_companies(&query).await;
                    if let Err(err) = &result {
                        extractor_warn!("search {:?} failed: {}", query, err);
                    }
                    sink.emit(EngineEvent::SearchCompleted { query, result });
                });
            }
        }
    }

    if let Some(run) = active {
        run.cancel.cancel();
    }
}
