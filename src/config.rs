// src/config.rs
//! Dashboard settings loaded from YAML, with environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{error::Result, reconcile::StaleEntityPolicy};

pub const CONFIG_PATH_ENV: &str = "IRRIGATE_DASHBOARD_CONFIG";
pub const API_URL_ENV: &str = "IRRIGATE_API_URL";
const DEFAULT_CONFIG_PATH: &str = "dashboard.yml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub ui: UiConfig,
    pub log_dir: LogDir,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Unset means requests wait as long as the transport lets them.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub fast_interval_secs: u64,
    pub slow_interval_secs: u64,
    pub single_flight: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            fast_interval_secs: 5,
            slow_interval_secs: 120,
            single_flight: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub stale_entities: StaleEntityPolicy,
    pub toast_secs: u64,
    pub default_queue_minutes: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            stale_entities: StaleEntityPolicy::Keep,
            toast_secs: 3,
            default_queue_minutes: 15,
        }
    }
}

impl UiConfig {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogDir(pub PathBuf);

impl Default for LogDir {
    fn default() -> Self {
        Self(PathBuf::from("./logs"))
    }
}

impl DashboardConfig {
    /// Load from `$IRRIGATE_DASHBOARD_CONFIG` (or `dashboard.yml`), then apply
    /// `$IRRIGATE_API_URL`.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = Self::from_path(&path)?;
        config.apply_api_url(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    /// A missing file is not an error, it just means defaults. Nothing is
    /// logged here since the log directory comes from this file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn apply_api_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = DashboardConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.request_timeout(), None);
        assert_eq!(config.polling.fast_interval_secs, 5);
        assert_eq!(config.polling.slow_interval_secs, 120);
        assert!(!config.polling.single_flight);
        assert_eq!(config.ui.stale_entities, StaleEntityPolicy::Keep);
        assert_eq!(config.ui.toast_duration(), Duration::from_secs(3));
        assert_eq!(config.ui.default_queue_minutes, 15);
        assert_eq!(config.log_dir.0, PathBuf::from("./logs"));
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let config = DashboardConfig::from_yaml(
            "api:\n  request_timeout_secs: 8\npolling:\n  single_flight: true\nui:\n  stale_entities: remove\nlog_dir: /tmp/irrigate\n",
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.request_timeout(), Some(Duration::from_secs(8)));
        assert!(config.polling.single_flight);
        assert_eq!(config.polling.fast_interval_secs, 5);
        assert_eq!(config.ui.stale_entities, StaleEntityPolicy::Remove);
        assert_eq!(config.ui.toast_secs, 3);
        assert_eq!(config.log_dir.0, PathBuf::from("/tmp/irrigate"));
    }

    #[test]
    fn missing_or_empty_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = DashboardConfig::from_path(&dir.path().join("nope.yml")).unwrap();
        assert_eq!(missing, DashboardConfig::default());

        let mut empty = tempfile::NamedTempFile::new().unwrap();
        writeln!(empty).unwrap();
        assert_eq!(DashboardConfig::from_path(empty.path()).unwrap(), DashboardConfig::default());
    }

    #[test]
    fn file_values_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  base_url: http://garden.local/api\npolling:\n  fast_interval_secs: 2").unwrap();
        let config = DashboardConfig::from_path(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://garden.local/api");
        assert_eq!(config.polling.fast_interval_secs, 2);
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let err = DashboardConfig::from_yaml("polling: [1, 2").unwrap_err();
        assert!(matches!(err, crate::error::DashboardError::Config(_)));
    }

    #[test]
    fn api_url_override() {
        let mut config = DashboardConfig::default();
        config.apply_api_url(Some("http://10.0.0.5:8000/api".to_string()));
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000/api");
        config.apply_api_url(Some("  ".to_string()));
        config.apply_api_url(None);
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000/api");
    }
}
