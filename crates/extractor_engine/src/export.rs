use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use extractor_core::{CompanyRecord, ExportFormat, ItemId, ItemState, ItemStatus, QueueItem};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

pub const CSV_HEADERS: [&str; 15] = [
    "Company Name",
    "Website URL",
    "Email",
    "Phone",
    "Address",
    "Description",
    "Industry",
    "Employee Count",
    "Founded",
    "LinkedIn",
    "Twitter",
    "Facebook",
    "Status",
    "Error",
    "Extracted At",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flat, serializable view of a finished queue item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub id: ItemId,
    #[serde(flatten)]
    pub company: CompanyRecord,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub extracted_at: DateTime<Utc>,
}

impl ExportRecord {
    /// Returns `None` for items that have not reached a terminal state.
    pub fn from_item(item: &QueueItem) -> Option<Self> {
        match item.state() {
            ItemState::Succeeded {
                record,
                completed_at,
            } => Some(Self {
                id: item.id(),
                company: record.clone(),
                status: ItemStatus::Succeeded,
                error: None,
                extracted_at: *completed_at,
            }),
            ItemState::Failed {
                message,
                completed_at,
            } => Some(Self {
                id: item.id(),
                company: CompanyRecord {
                    website_url: item.source_url().to_string(),
                    ..CompanyRecord::default()
                },
                status: ItemStatus::Failed,
                error: Some(message.clone()),
                extracted_at: *completed_at,
            }),
            ItemState::Pending | ItemState::InProgress => None,
        }
    }
}

/// Header line plus one line per record, joined by `\n`.
pub fn to_csv(records: &[ExportRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for record in records {
        let company = &record.company;
        let extracted_at = record
            .extracted_at
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let fields = [
            company.company_name.as_str(),
            company.website_url.as_str(),
            company.email.as_deref().unwrap_or_default(),
            company.phone.as_deref().unwrap_or_default(),
            company.address.as_deref().unwrap_or_default(),
            company.description.as_deref().unwrap_or_default(),
            company.industry.as_deref().unwrap_or_default(),
            company.employee_count.as_deref().unwrap_or_default(),
            company.founded.as_deref().unwrap_or_default(),
            company.linkedin().unwrap_or_default(),
            company.twitter().unwrap_or_default(),
            company.facebook().unwrap_or_default(),
            record.status.as_str(),
            record.error.as_deref().unwrap_or_default(),
            extracted_at.as_str(),
        ];
        let row: Vec<_> = fields.iter().map(|field| escape_csv(field)).collect();
        lines.push(row.join(","));
    }
    lines.join("\n")
}

/// Pretty-printed array, two-space indentation.
pub fn to_json(records: &[ExportRecord]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Serializes `records` and atomically writes `company-data.{csv,json}`
/// into `dir`, replacing any previous export.
pub fn write_export(
    dir: &Path,
    format: ExportFormat,
    records: &[ExportRecord],
) -> Result<PathBuf, ExportError> {
    let content = match format {
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Json => to_json(records)?,
    };
    emit_file(dir, format.file_name(), &content)
}

fn escape_csv(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn emit_file(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf, ExportError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(ExportError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
    }

    let target = dir.join(file_name);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;
    Ok(target)
}
