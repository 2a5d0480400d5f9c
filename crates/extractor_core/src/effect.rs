use crate::{ItemId, QueueItem, RunConfiguration, RunId};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartRun(RunRequest),
    StopRun { run_id: RunId },
    Search { query: String },
    Export {
        format: ExportFormat,
        items: Vec<QueueItem>,
    },
}

/// Snapshot of the pending items a run will process, in queue order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub run_id: RunId,
    pub items: Vec<RunItem>,
    pub config: RunConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunItem {
    pub item_id: ItemId,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "company-data.csv",
            ExportFormat::Json => "company-data.json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}
