use chrono::Utc;
use extractor_core::{CompanyRecord, RunConfiguration, RunRequest};
use extractor_logging::{extractor_debug, extractor_info, extractor_warn};
use tokio_util::sync::CancellationToken;

use crate::{
    EngineEvent, EventSink, ExtractionError, ExtractionProvider, FailureKind, RunSummary,
};

/// Processes a run snapshot one item at a time.
///
/// Cancellation is cooperative: it is checked before each item and after
/// each completion, so an extraction that already started always reports
/// its result. `RunFinished` is always the last event emitted.
pub async fn run_sequential(
    provider: &dyn ExtractionProvider,
    request: RunRequest,
    cancel: &CancellationToken,
    sink: &dyn EventSink,
) -> RunSummary {
    let RunRequest {
        run_id,
        items,
        config,
    } = request;
    let total = items.len();
    let delay = config.inter_item_delay();
    let mut summary = RunSummary {
        run_id,
        ..RunSummary::default()
    };

    extractor_info!(
        "run {} started: items={} rate={}/s timeout={}s",
        run_id,
        total,
        config.requests_per_second,
        config.timeout_seconds
    );

    for (index, item) in items.into_iter().enumerate() {
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }

        sink.emit(EngineEvent::ItemStarted {
            run_id,
            item_id: item.item_id,
        });
        let result = extract_with_timeout(provider, &item.url, &config).await;
        match &result {
            Ok(record) => {
                summary.succeeded += 1;
                extractor_debug!(
                    "run {} item {} extracted {:?}",
                    run_id,
                    item.item_id,
                    record.company_name
                );
            }
            Err(err) => {
                summary.failed += 1;
                extractor_warn!("run {} item {} failed: {}", run_id, item.item_id, err);
            }
        }
        sink.emit(EngineEvent::ItemCompleted {
            run_id,
            item_id: item.item_id,
            result,
            completed_at: Utc::now(),
        });

        if index + 1 == total {
            break;
        }
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }
        if let Some(delay) = delay {
            tokio::select! {
                _ = cancel.cancelled() => {
                    summary.cancelled = true;
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    if summary.cancelled {
        extractor_info!(
            "run {} cancelled after {} of {} item(s)",
            run_id,
            summary.processed(),
            total
        );
    } else {
        extractor_info!(
            "run {} finished: succeeded={} failed={}",
            run_id,
            summary.succeeded,
            summary.failed
        );
    }
    sink.emit(EngineEvent::RunFinished(summary));
    summary
}

async fn extract_with_timeout(
    provider: &dyn ExtractionProvider,
    url: &str,
    config: &RunConfiguration,
) -> Result<CompanyRecord, ExtractionError> {
    match tokio::time::timeout(config.timeout(), provider.extract(url, config)).await {
        Ok(result) => result,
        Err(_) => Err(ExtractionError::new(
            FailureKind::Timeout {
                seconds: config.timeout_seconds,
            },
            format!(
                "Failed to extract data: no response within {} seconds",
                config.timeout_seconds
            ),
        )),
    }
}
