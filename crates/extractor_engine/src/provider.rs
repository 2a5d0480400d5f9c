use std::sync::mpsc;

use extractor_core::{CompanyRecord, RunConfiguration};

use crate::{EngineEvent, ExtractionError, SearchError};

/// Turns one URL into a company record. Every failure must come back
/// through the returned `Result`; implementations never panic on bad input.
#[async_trait::async_trait]
pub trait ExtractionProvider: Send + Sync {
    async fn extract(
        &self,
        url: &str,
        config: &RunConfiguration,
    ) -> Result<CompanyRecord, ExtractionError>;
}

#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search_companies(&self, query: &str) -> Result<Vec<String>, SearchError>;
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
