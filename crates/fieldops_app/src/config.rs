use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use fieldops_client::{ClientSettings, ExportOptions};
use fieldops_core::DEFAULT_PAGE_SIZE;
use fieldops_logging::ops_info;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "fieldops.ron";
const SESSION_FILENAME: &str = ".fieldops_session.ron";

/// Settings read from `fieldops.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub page_size: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub session_path: PathBuf,
    pub log_to_file: bool,
    /// Offset applied to the export `Date` column.
    pub export_utc_offset_minutes: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            session_path: PathBuf::from(SESSION_FILENAME),
            log_to_file: false,
            export_utc_offset_minutes: 0,
        }
    }
}

impl AppConfig {
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read config {path:?}"))
            }
        };
        let config: AppConfig =
            ron::from_str(&content).with_context(|| format!("failed to parse config {path:?}"))?;
        ops_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Command-line values win over the file.
    pub fn apply_overrides(&mut self, base_url: Option<String>, page_size: Option<u64>) {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = base_url;
        }
        if let Some(page_size) = page_size.filter(|size| *size > 0) {
            self.page_size = page_size;
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn export_options(&self) -> Result<ExportOptions> {
        let utc_offset = FixedOffset::east_opt(self.export_utc_offset_minutes * 60)
            .with_context(|| {
                format!(
                    "export_utc_offset_minutes {} is out of range",
                    self.export_utc_offset_minutes
                )
            })?;
        Ok(ExportOptions {
            utc_offset,
            ..ExportOptions::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load(&temp.path().join(CONFIG_FILENAME)).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.page_size, 10);
        assert_eq!(config.session_path, PathBuf::from(".fieldops_session.ron"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(base_url: "https://ops.example.com/api", page_size: 25, export_utc_offset_minutes: 330)"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.base_url, "https://ops.example.com/api");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(
            config.export_options().unwrap().utc_offset,
            FixedOffset::east_opt(330 * 60).unwrap()
        );
    }

    #[test]
    fn broken_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(page_size: \"many\")").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn overrides_ignore_blank_and_zero() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("  ".to_string()), Some(0));
        assert_eq!(config, AppConfig::default());

        config.apply_overrides(Some("http://backend:9000".to_string()), Some(50));
        assert_eq!(config.base_url, "http://backend:9000");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.client_settings().base_url, "http://backend:9000");
    }

    #[test]
    fn absurd_offset_is_rejected() {
        let config = AppConfig {
            export_utc_offset_minutes: 100 * 60,
            ..AppConfig::default()
        };
        assert!(config.export_options().is_err());
    }
}
