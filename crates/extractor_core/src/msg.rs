use chrono::{DateTime, Utc};

use crate::{CompanyRecord, ExportFormat, ItemId, RunConfiguration, RunId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted free text containing one or more URLs.
    UrlsSubmitted(String),
    /// User submitted a search query.
    SearchSubmitted(String),
    /// Search provider answered; `Err` carries the failure message.
    SearchCompleted {
        query: String,
        result: Result<Vec<String>, String>,
    },
    /// User clicked Start.
    StartClicked,
    /// User clicked Stop.
    StopClicked,
    /// User clicked Clear All.
    ClearClicked,
    /// User edited the configuration.
    ConfigChanged(RunConfiguration),
    /// Engine began extracting an item.
    ItemStarted { run_id: RunId, item_id: ItemId },
    /// Engine finished extracting an item; `Err` carries the failure message.
    ItemFinished {
        item_id: ItemId,
        result: Result<CompanyRecord, String>,
        completed_at: DateTime<Utc>,
    },
    /// Engine left the run loop, either exhausted or cancelled.
    RunFinished { run_id: RunId },
    /// User asked for an export of the successful items.
    ExportClicked(ExportFormat),
    /// Export side effect completed; `Ok` carries the written file path.
    ExportFinished {
        format: ExportFormat,
        result: Result<String, String>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
}
