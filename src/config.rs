//! Uploader configuration.
//!
//! Loaded from `~/.doc-intake/config.toml`. Defaults are used when the file
//! is missing; every key is optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::categories::{CategoryCatalog, DEFAULT_CATEGORIES};
use crate::error::ConfigError;
use crate::upload::DEFAULT_EXTENSIONS;

pub const ENDPOINT_ENV: &str = "DOC_INTAKE_ENDPOINT";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/upload-image";
pub const DEFAULT_LOG_FILTER: &str = "doc_intake=info";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Multipart upload URL of the intake backend.
    pub endpoint: String,
    /// Document categories, in the order the patient is asked for them.
    pub categories: Vec<String>,
    pub accepted_extensions: Vec<String>,
    /// Pause between finishing the last category and the thank-you screen.
    pub completion_delay_ms: u64,
    pub toast_seconds: u64,
    /// No timeout unless set; the HTTP client default applies.
    pub request_timeout_secs: Option<u64>,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            accepted_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            completion_delay_ms: 1000,
            toast_seconds: 4,
            request_timeout_secs: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load from `~/.doc-intake/config.toml`, then apply `DOC_INTAKE_ENDPOINT`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path().ok_or(ConfigError::NoHomeDir)?;

        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };

        config.apply_endpoint_override(std::env::var(ENDPOINT_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// The config file path: `~/.doc-intake/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".doc-intake").join("config.toml"))
    }

    pub fn apply_endpoint_override(&mut self, endpoint: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint is empty".to_string()));
        }
        if self.accepted_extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "accepted-extensions must list at least one extension".to_string(),
            ));
        }
        self.catalog().map(|_| ())
    }

    pub fn catalog(&self) -> Result<CategoryCatalog, ConfigError> {
        CategoryCatalog::new(self.categories.iter().cloned())
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    pub fn toast_lifetime(&self) -> Duration {
        Duration::from_secs(self.toast_seconds)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let (_dir, path) = write_config("endpoint = \"https://intake.example/upload-image\"\n");

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.endpoint, "https://intake.example/upload-image");
        assert_eq!(config.categories.len(), 5);
        assert_eq!(config.completion_delay(), Duration::from_millis(1000));
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn reads_kebab_case_keys() {
        let (_dir, path) = write_config(
            r#"
categories = ["Insurance Card", "Lab Report"]
accepted-extensions = ["png"]
completion-delay-ms = 250
request-timeout-secs = 30
"#,
        );

        let config = Config::load_from(&path).unwrap();

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(2).unwrap().label, "Lab Report");
        assert_eq!(config.accepted_extensions, vec!["png"]);
        assert_eq!(config.completion_delay(), Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn empty_category_list_is_rejected() {
        let (_dir, path) = write_config("categories = []\n");
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_file_reports_path() {
        let (_dir, path) = write_config("endpoint = [\n");
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn endpoint_override_ignores_blank_values() {
        let mut config = Config::default();
        config.apply_endpoint_override(Some("  ".to_string()));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);

        config.apply_endpoint_override(Some("http://10.0.0.2:8000/upload-image".to_string()));
        assert_eq!(config.endpoint, "http://10.0.0.2:8000/upload-image");
    }
}
