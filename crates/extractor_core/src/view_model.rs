use crate::{ExportFormat, ItemId, ItemStatus, RejectedUrl, RunConfiguration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Includes items currently in progress.
    pub pending: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportNotice {
    pub format: ExportFormat,
    pub result: Result<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub is_running: bool,
    pub stop_requested: bool,
    pub search_in_flight: bool,
    pub stats: QueueStats,
    pub items: Vec<ItemRowView>,
    pub config: RunConfiguration,
    pub last_rejections: Vec<RejectedUrl>,
    /// Changes whenever a submission produced rejections.
    pub rejection_report: u64,
    pub last_search_error: Option<String>,
    pub last_config_error: Option<String>,
    pub last_export: Option<ExportNotice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRowView {
    pub item_id: ItemId,
    pub url: String,
    pub status: ItemStatus,
    pub company_name: Option<String>,
    pub error: Option<String>,
}
