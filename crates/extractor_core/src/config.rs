use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_RETRIES_LIMIT: u8 = 5;
pub const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u32> = 5..=60;
pub const RATE_RANGE: std::ops::RangeInclusive<f64> = 0.1..=10.0;

/// Settings snapshot handed to a run. Changing the live configuration never
/// affects a run that has already started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfiguration {
    /// Carried and validated, but no retry loop consumes it.
    pub max_retries: u8,
    pub timeout_seconds: u32,
    /// `0.0` disables throttling.
    pub requests_per_second: f64,
    pub extract_social_media: bool,
    pub extract_address: bool,
    pub extract_description: bool,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            max_retries: 2,
            timeout_seconds: 30,
            requests_per_second: 1.0,
            extract_social_media: true,
            extract_address: true,
            extract_description: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max retries must be between 0 and 5, got {0}")]
    MaxRetries(u8),
    #[error("timeout must be between 5 and 60 seconds, got {0}")]
    Timeout(u32),
    #[error("requests per second must be 0 or between 0.1 and 10, got {0}")]
    RequestsPerSecond(f64),
}

impl RunConfiguration {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::MaxRetries(self.max_retries));
        }
        if !TIMEOUT_RANGE_SECS.contains(&self.timeout_seconds) {
            return Err(ConfigError::Timeout(self.timeout_seconds));
        }
        let rate = self.requests_per_second;
        if rate != 0.0 && !RATE_RANGE.contains(&rate) {
            return Err(ConfigError::RequestsPerSecond(rate));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds))
    }

    /// Delay between two successive extractions, `None` when unthrottled.
    pub fn inter_item_delay(&self) -> Option<Duration> {
        if self.requests_per_second > 0.0 {
            Some(Duration::from_secs_f64(1.0 / self.requests_per_second))
        } else {
            None
        }
    }
}
