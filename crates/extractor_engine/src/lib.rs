//! Extractor engine: providers, run loop and effect execution.
mod engine;
mod export;
mod mock;
mod provider;
mod run;
mod types;

pub use engine::{EngineError, EngineHandle};
pub use export::{to_csv, to_json, write_export, ExportError, ExportRecord, CSV_HEADERS};
pub use mock::{MockProvider, MockSettings};
pub use provider::{ChannelEventSink, EventSink, ExtractionProvider, SearchProvider};
pub use run::run_sequential;
pub use types::{EngineEvent, ExtractionError, FailureKind, RunSummary, SearchError};
