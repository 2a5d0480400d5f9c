use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CompanyRecord;

pub type ItemId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    InProgress,
    Succeeded,
    Failed,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::InProgress => "in_progress",
            ItemStatus::Succeeded => "succeeded",
            ItemStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ItemStatus::Succeeded | ItemStatus::Failed)
    }
}

/// Lifecycle of one queued URL. A record only exists on success and a
/// message only on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    Pending,
    InProgress,
    Succeeded {
        record: CompanyRecord,
        completed_at: DateTime<Utc>,
    },
    Failed {
        message: String,
        completed_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    id: ItemId,
    source_url: String,
    state: ItemState,
}

impl QueueItem {
    pub(crate) fn pending(id: ItemId, source_url: String) -> Self {
        Self {
            id,
            source_url,
            state: ItemState::Pending,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn state(&self) -> &ItemState {
        &self.state
    }

    pub fn status(&self) -> ItemStatus {
        match self.state {
            ItemState::Pending => ItemStatus::Pending,
            ItemState::InProgress => ItemStatus::InProgress,
            ItemState::Succeeded { .. } => ItemStatus::Succeeded,
            ItemState::Failed { .. } => ItemStatus::Failed,
        }
    }

    pub fn record(&self) -> Option<&CompanyRecord> {
        match &self.state {
            ItemState::Succeeded { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ItemState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            ItemState::Succeeded { completed_at, .. } | ItemState::Failed { completed_at, .. } => {
                Some(*completed_at)
            }
            ItemState::Pending | ItemState::InProgress => None,
        }
    }

    pub(crate) fn set_state(&mut self, state: ItemState) {
        self.state = state;
    }
}
