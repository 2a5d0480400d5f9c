//! Extractor core: pure queue/run state machine and view-model helpers.
mod config;
mod effect;
mod item;
mod msg;
mod record;
mod state;
mod update;
mod urls;
mod view_model;

pub use config::{ConfigError, RunConfiguration};
pub use effect::{Effect, ExportFormat, RunItem, RunRequest};
pub use item::{ItemId, ItemState, ItemStatus, QueueItem};
pub use msg::Msg;
pub use record::{CompanyRecord, SocialLinks};
pub use state::{AppState, RunId, RunState};
pub use update::update;
pub use urls::{normalize_url, parse_url_list, partition_urls, validate_url, RejectedUrl, UrlError};
pub use view_model::{AppViewModel, ExportNotice, ItemRowView, QueueStats};
