use std::fmt;

use chrono::{DateTime, Utc};
use extractor_core::{CompanyRecord, ItemId, RunId};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ItemStarted {
        run_id: RunId,
        item_id: ItemId,
    },
    ItemCompleted {
        run_id: RunId,
        item_id: ItemId,
        result: Result<CompanyRecord, ExtractionError>,
        completed_at: DateTime<Utc>,
    },
    RunFinished(RunSummary),
    SearchCompleted {
        query: String,
        result: Result<Vec<String>, SearchError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub run_id: RunId,
    pub succeeded: usize,
    pub failed: usize,
    /// The loop stopped before the snapshot was exhausted.
    pub cancelled: bool,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionError {
    pub kind: FailureKind,
    pub message: String,
}

impl ExtractionError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ExtractionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Blocked,
    Timeout { seconds: u32 },
    Provider,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Blocked => write!(f, "blocked"),
            FailureKind::Timeout { seconds } => write!(f, "timeout after {seconds}s"),
            FailureKind::Provider => write!(f, "provider error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search query cannot be empty")]
    EmptyQuery,
    #[error("search failed: {0}")]
    Provider(String),
}
