use std::collections::HashMap;

use chrono::SecondsFormat;
use extractor_core::{
    AppViewModel, ExportFormat, ItemRowView, ItemStatus, QueueItem, QueueStats, RunConfiguration,
};

/// Lines describing what changed between two consecutive views.
pub fn render_changes(prev: &AppViewModel, next: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if !prev.is_running && next.is_running {
        lines.push(format!("Run started with {} pending", next.stats.pending));
    }

    if !prev.items.is_empty() && next.items.is_empty() {
        lines.push("Queue cleared".to_string());
    }

    if next.rejection_report != prev.rejection_report {
        for rejected in &next.last_rejections {
            lines.push(format!("Rejected {:?}: {}", rejected.input, rejected.error));
        }
    }

    let before: HashMap<_, _> = prev.items.iter().map(|row| (row.item_id, row)).collect();
    let mut added = 0;
    for row in &next.items {
        match before.get(&row.item_id) {
            None => added += 1,
            Some(old) if old.status != row.status => {
                if let Some(line) = transition_line(row) {
                    lines.push(line);
                }
            }
            Some(_) => {}
        }
    }
    if added > 0 {
        lines.push(format!("Queued {added} URL(s); {} total", next.stats.total));
    }

    if !prev.stop_requested && next.stop_requested && next.is_running {
        lines.push("Stopping after the current item".to_string());
    }
    if prev.is_running && !next.is_running && !next.items.is_empty() {
        lines.push(format!("Run finished. {}", format_stats(&next.stats)));
    }

    if next.search_in_flight && !prev.search_in_flight {
        lines.push("Searching...".to_string());
    }
    if next.last_search_error != prev.last_search_error {
        if let Some(error) = &next.last_search_error {
            lines.push(format!("Search failed: {error}"));
        }
    }
    if next.config != prev.config {
        lines.push("Configuration updated".to_string());
    }
    if next.last_config_error != prev.last_config_error {
        if let Some(error) = &next.last_config_error {
            lines.push(format!("Configuration rejected: {error}"));
        }
    }
    if next.last_export != prev.last_export {
        if let Some(notice) = &next.last_export {
            let label = format_label(notice.format);
            lines.push(match &notice.result {
                Ok(path) => format!("{label} export written to {path}"),
                Err(error) => format!("{label} export failed: {error}"),
            });
        }
    }

    lines
}

fn transition_line(row: &ItemRowView) -> Option<String> {
    match row.status {
        ItemStatus::InProgress => Some(format!("[{}] extracting {}", row.item_id, row.url)),
        ItemStatus::Succeeded => Some(format!(
            "[{}] done: {}",
            row.item_id,
            row.company_name.as_deref().unwrap_or(&row.url)
        )),
        ItemStatus::Failed => Some(format!(
            "[{}] failed: {}",
            row.item_id,
            row.error.as_deref().unwrap_or("unknown error")
        )),
        ItemStatus::Pending => None,
    }
}

pub fn format_stats(stats: &QueueStats) -> String {
    format!(
        "Total {} | Succeeded {} | Failed {} | Pending {}",
        stats.total, stats.succeeded, stats.failed, stats.pending
    )
}

pub fn format_config(config: &RunConfiguration) -> Vec<String> {
    let flag = |on: bool| if on { "on" } else { "off" };
    vec![
        format!("max_retries          {}", config.max_retries),
        format!("timeout_seconds      {}", config.timeout_seconds),
        format!("requests_per_second  {}", config.requests_per_second),
        format!("social               {}", flag(config.extract_social_media)),
        format!("address              {}", flag(config.extract_address)),
        format!("description          {}", flag(config.extract_description)),
    ]
}

/// One card per item, as shown by `list`.
pub fn format_item(item: &QueueItem) -> Vec<String> {
    let mut lines = vec![format!(
        "[{}] {:<11} {}",
        item.id(),
        item.status().as_str(),
        item.source_url()
    )];
    if let Some(record) = item.record() {
        lines.push(format!("      {}", record.company_name));
        let optional = [
            ("email", record.email.as_deref()),
            ("phone", record.phone.as_deref()),
            ("address", record.address.as_deref()),
            ("industry", record.industry.as_deref()),
            ("about", record.description.as_deref()),
            ("employees", record.employee_count.as_deref()),
            ("founded", record.founded.as_deref()),
            ("linkedin", record.linkedin()),
            ("twitter", record.twitter()),
            ("facebook", record.facebook()),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                lines.push(format!("      {label:<10} {value}"));
            }
        }
    }
    if let Some(message) = item.error_message() {
        lines.push(format!("      error      {message}"));
    }
    if let Some(at) = item.completed_at() {
        lines.push(format!(
            "      at         {}",
            at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }
    lines
}

fn format_label(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Csv => "CSV",
        ExportFormat::Json => "JSON",
    }
}
