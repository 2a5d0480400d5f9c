use std::fs;
use std::path::Path;
use std::time::Duration;

use extractor_core::RunConfiguration;
use extractor_engine::MockSettings;
use extractor_logging::{extractor_info, extractor_warn};
use serde::{Deserialize, Serialize};

/// Startup settings read from an optional RON file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub run: RunConfiguration,
    pub mock: MockSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockSection {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub failure_rate: f64,
    pub search_delay_ms: u64,
}

impl Default for MockSection {
    fn default() -> Self {
        let defaults = MockSettings::default();
        Self {
            min_delay_ms: defaults.min_delay.as_millis() as u64,
            max_delay_ms: defaults.max_delay.as_millis() as u64,
            failure_rate: defaults.failure_rate,
            search_delay_ms: defaults.search_delay.as_millis() as u64,
        }
    }
}

impl MockSection {
    pub fn to_mock_settings(&self) -> MockSettings {
        MockSettings {
            min_delay: Duration::from_millis(self.min_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms.max(self.min_delay_ms)),
            failure_rate: self.failure_rate.clamp(0.0, 1.0),
            search_delay: Duration::from_millis(self.search_delay_ms),
        }
    }
}

/// Loads settings, falling back to defaults on any problem. A missing path
/// or file is not an error.
pub(crate) fn load_settings(path: Option<&Path>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };

    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            extractor_info!("No settings file at {:?}; using defaults", path);
            return Settings::default();
        }
        Err(err) => {
            extractor_warn!("Failed to read settings from {:?}: {}", path, err);
            return Settings::default();
        }
    };

    let mut settings: Settings = match ron::from_str(&content) {
        Ok(settings) => settings,
        Err(err) => {
            extractor_warn!("Failed to parse settings from {:?}: {}", path, err);
            return Settings::default();
        }
    };

    if let Err(err) = settings.run.validate() {
        extractor_warn!(
            "Invalid run configuration in {:?}: {}; using defaults",
            path,
            err
        );
        settings.run = RunConfiguration::default();
    }

    if !settings.mock.failure_rate.is_finite() {
        extractor_warn!(
            "Invalid mock failure rate in {:?}: {}; using default",
            path,
            settings.mock.failure_rate
        );
        settings.mock.failure_rate = MockSection::default().failure_rate;
    }

    extractor_info!("Loaded settings from {:?}", path);
    settings
}
