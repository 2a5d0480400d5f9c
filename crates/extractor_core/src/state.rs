use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::view_model::{AppViewModel, ExportNotice, ItemRowView, QueueStats};
use crate::{
    CompanyRecord, ItemId, ItemState, ItemStatus, QueueItem, RejectedUrl, RunConfiguration,
    RunItem,
};

pub type RunId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running {
        run_id: RunId,
        stop_requested: bool,
    },
}

/// Process-wide queue state. Every mutation goes through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    // Ids only grow, so key order is enqueue order.
    items: BTreeMap<ItemId, QueueItem>,
    next_item_id: ItemId,
    next_run_id: RunId,
    run: RunState,
    config: RunConfiguration,
    last_rejections: Vec<RejectedUrl>,
    // Bumped on every submission that had invalid input.
    rejection_report: u64,
    search_in_flight: bool,
    last_search_error: Option<String>,
    last_config_error: Option<String>,
    last_export: Option<ExportNotice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RunConfiguration) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run
    }

    pub fn is_running(&self) -> bool {
        matches!(self.run, RunState::Running { .. })
    }

    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    pub fn items(&self) -> impl Iterator<Item = &QueueItem> {
        self.items.values()
    }

    pub fn item(&self, item_id: ItemId) -> Option<&QueueItem> {
        self.items.get(&item_id)
    }

    pub fn stats(&self) -> QueueStats {
        let mut stats = QueueStats {
            total: self.items.len(),
            ..QueueStats::default()
        };
        for item in self.items.values() {
            match item.status() {
                ItemStatus::Succeeded => stats.succeeded += 1,
                ItemStatus::Failed => stats.failed += 1,
                ItemStatus::Pending | ItemStatus::InProgress => stats.pending += 1,
            }
        }
        stats
    }

    pub fn succeeded_items(&self) -> Vec<QueueItem> {
        self.items
            .values()
            .filter(|item| item.status() == ItemStatus::Succeeded)
            .cloned()
            .collect()
    }

    pub fn view(&self) -> AppViewModel {
        let (is_running, stop_requested) = match self.run {
            RunState::Idle => (false, false),
            RunState::Running { stop_requested, .. } => (true, stop_requested),
        };
        AppViewModel {
            is_running,
            stop_requested,
            search_in_flight: self.search_in_flight,
            stats: self.stats(),
            items: self
                .items
                .values()
                .map(|item| ItemRowView {
                    item_id: item.id(),
                    url: item.source_url().to_string(),
                    status: item.status(),
                    company_name: item.record().map(|r| r.company_name.clone()),
                    error: item.error_message().map(ToOwned::to_owned),
                })
                .collect(),
            config: self.config.clone(),
            last_rejections: self.last_rejections.clone(),
            rejection_report: self.rejection_report,
            last_search_error: self.last_search_error.clone(),
            last_config_error: self.last_config_error.clone(),
            last_export: self.last_export.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Appends one pending item per URL; duplicates are kept.
    pub(crate) fn enqueue(&mut self, urls: Vec<String>) -> Vec<ItemId> {
        let mut ids = Vec::with_capacity(urls.len());
        for url in urls {
            self.next_item_id += 1;
            let id = self.next_item_id;
            self.items.insert(id, QueueItem::pending(id, url));
            ids.push(id);
        }
        if !ids.is_empty() {
            self.mark_dirty();
        }
        ids
    }

    pub(crate) fn pending_snapshot(&self) -> Vec<RunItem> {
        self.items
            .values()
            .filter(|item| item.status() == ItemStatus::Pending)
            .map(|item| RunItem {
                item_id: item.id(),
                url: item.source_url().to_string(),
            })
            .collect()
    }

    pub(crate) fn begin_run(&mut self) -> RunId {
        self.next_run_id += 1;
        let run_id = self.next_run_id;
        self.run = RunState::Running {
            run_id,
            stop_requested: false,
        };
        self.mark_dirty();
        run_id
    }

    /// Marks the active run as stopping; returns its id the first time only.
    pub(crate) fn request_stop(&mut self) -> Option<RunId> {
        match &mut self.run {
            RunState::Running {
                run_id,
                stop_requested,
            } if !*stop_requested => {
                *stop_requested = true;
                let run_id = *run_id;
                self.mark_dirty();
                Some(run_id)
            }
            _ => None,
        }
    }

    pub(crate) fn finish_run(&mut self, run_id: RunId) {
        if matches!(self.run, RunState::Running { run_id: current, .. } if current == run_id) {
            self.run = RunState::Idle;
            self.mark_dirty();
        }
    }

    /// Drops every item and forces the idle state; returns the run that was
    /// active, if any.
    pub(crate) fn clear(&mut self) -> Option<RunId> {
        let active = match self.run {
            RunState::Running { run_id, .. } => Some(run_id),
            RunState::Idle => None,
        };
        self.items.clear();
        self.run = RunState::Idle;
        self.last_rejections.clear();
        self.mark_dirty();
        active
    }

    pub(crate) fn mark_in_progress(&mut self, run_id: RunId, item_id: ItemId) {
        let current = matches!(self.run, RunState::Running { run_id: active, .. } if active == run_id);
        if !current {
            return;
        }
        if let Some(item) = self.items.get_mut(&item_id) {
            if item.status() == ItemStatus::Pending {
                item.set_state(ItemState::InProgress);
                self.mark_dirty();
            }
        }
    }

    /// Late completions for cleared or already finished items are dropped.
    pub(crate) fn complete_item(
        &mut self,
        item_id: ItemId,
        result: Result<CompanyRecord, String>,
        completed_at: DateTime<Utc>,
    ) {
        let Some(item) = self.items.get_mut(&item_id) else {
            return;
        };
        if item.status() != ItemStatus::InProgress {
            return;
        }
        let next = match result {
            Ok(record) => ItemState::Succeeded {
                record,
                completed_at,
            },
            Err(message) => ItemState::Failed {
                message,
                completed_at,
            },
        };
        item.set_state(next);
        self.mark_dirty();
    }

    /// Records the invalid tokens of one submission. A non-empty list is
    /// reported even when it repeats the previous one.
    pub(crate) fn set_rejections(&mut self, rejections: Vec<RejectedUrl>) {
        if !rejections.is_empty() {
            self.rejection_report += 1;
            self.mark_dirty();
        } else if !self.last_rejections.is_empty() {
            self.mark_dirty();
        }
        self.last_rejections = rejections;
    }

    pub(crate) fn search_in_flight(&self) -> bool {
        self.search_in_flight
    }

    pub(crate) fn set_search_in_flight(&mut self, in_flight: bool) {
        self.search_in_flight = in_flight;
        self.mark_dirty();
    }

    pub(crate) fn set_search_error(&mut self, error: Option<String>) {
        self.last_search_error = error;
        self.mark_dirty();
    }

    pub(crate) fn set_config(&mut self, config: RunConfiguration) {
        self.config = config;
        self.last_config_error = None;
        self.mark_dirty();
    }

    pub(crate) fn set_config_error(&mut self, error: String) {
        self.last_config_error = Some(error);
        self.mark_dirty();
    }

    pub(crate) fn set_export_notice(&mut self, notice: ExportNotice) {
        self.last_export = Some(notice);
        self.mark_dirty();
    }
}
