use std::path::PathBuf;

use extractor_core::{Effect, ExportFormat, Msg, QueueItem};
use extractor_engine::{write_export, EngineEvent, EngineHandle, ExportRecord};
use extractor_logging::{extractor_info, extractor_warn};

/// Executes core effects against the engine and the file system, and turns
/// engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    output_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, output_dir: PathBuf) -> Self {
        Self { engine, output_dir }
    }

    /// Returns follow-up messages for effects that complete synchronously.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartRun(request) => {
                    extractor_info!(
                        "StartRun run_id={} items={}",
                        request.run_id,
                        request.items.len()
                    );
                    self.engine.start_run(request);
                }
                Effect::StopRun { run_id } => self.engine.stop_run(run_id),
                Effect::Search { query } => self.engine.search(query),
                Effect::Export { format, items } => {
                    follow_ups.push(self.export(format, &items));
                }
            }
        }
        follow_ups
    }

    pub fn drain_events(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(map_event)
            .collect()
    }

    fn export(&self, format: ExportFormat, items: &[QueueItem]) -> Msg {
        let records: Vec<ExportRecord> = items.iter().filter_map(ExportRecord::from_item).collect();
        let result = match write_export(&self.output_dir, format, &records) {
            Ok(path) => {
                extractor_info!("exported {} records to {}", records.len(), path.display());
                Ok(path.display().to_string())
            }
            Err(err) => {
                extractor_warn!("export to {} failed: {}", self.output_dir.display(), err);
                Err(err.to_string())
            }
        };
        Msg::ExportFinished { format, result }
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ItemStarted { run_id, item_id } => Msg::ItemStarted { run_id, item_id },
        EngineEvent::ItemCompleted {
            item_id,
            result,
            completed_at,
            ..
        } => Msg::ItemFinished {
            item_id,
            result: result.map_err(|err| err.message),
            completed_at,
        },
        EngineEvent::RunFinished(summary) => {
            extractor_info!(
                "run {} finished: {} succeeded, {} failed{}",
                summary.run_id,
                summary.succeeded,
                summary.failed,
                if summary.cancelled { " (stopped)" } else { "" }
            );
            Msg::RunFinished {
                run_id: summary.run_id,
            }
        }
        EngineEvent::SearchCompleted { query, result } => Msg::SearchCompleted {
            query,
            result: result.map_err(|err| err.to_string()),
        },
    }
}
