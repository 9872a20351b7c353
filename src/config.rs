//! TOML-based harness configuration.
//!
//! Every key is optional; CLI flags override whatever the file sets.
//!
//! # Example TOML
//!
//! ```toml
//! [settings]
//! endpoint = "http://localhost:3000"
//! timeout_ms = 30000
//! catalog = "tasks.json"
//! ```
//!
//! Without `timeout_ms` no request timeout is configured and the transport's
//! own behaviour applies.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::catalog::DEFAULT_CATALOG;
use crate::error::HarnessError;

/// Endpoint used when neither the config nor the CLI names one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000";

/// Directory searched for [`CONFIG_FILE`] when no `--config` is given.
pub const CONFIG_DIR: &str = ".matmul";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "harness.toml";

/// Top-level configuration parsed from a TOML file.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct HarnessConfig {
    #[serde(default)]
    pub settings: Settings,
}

/// Harness settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// URL every task is POSTed to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout in milliseconds; `None` leaves it to the transport.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Path of the task catalog.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_catalog() -> PathBuf {
    PathBuf::from(DEFAULT_CATALOG)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: None,
            catalog: default_catalog(),
        }
    }
}

impl HarnessConfig {
    /// Parse a TOML string into a validated [`HarnessConfig`].
    pub fn from_toml(content: &str) -> Result<Self, HarnessError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a [`HarnessConfig`] from a file path.
    ///
    /// Returns [`HarnessError::ConfigIo`] if the file cannot be read,
    /// [`HarnessError::ConfigParse`] if the TOML is malformed, or
    /// [`HarnessError::ConfigValidation`] if validation fails.
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|source| HarnessError::ConfigIo {
            source,
            path: path.display().to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Validate the settings section.
    pub fn validate(&self) -> Result<(), HarnessError> {
        self.settings.validate()
    }
}

impl Settings {
    /// Check that the endpoint is an http(s) URL and the timeout is positive.
    pub fn validate(&self) -> Result<(), HarnessError> {
        self.endpoint_url()?;

        if self.timeout_ms == Some(0) {
            return Err(HarnessError::ConfigValidation {
                message: "timeout_ms must be greater than 0 (omit it to disable the timeout)"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// Parse [`endpoint`](Self::endpoint) as an http(s) URL.
    pub fn endpoint_url(&self) -> Result<Url, HarnessError> {
        let url = Url::parse(&self.endpoint).map_err(|e| HarnessError::ConfigValidation {
            message: format!("invalid endpoint '{}': {}", self.endpoint, e),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(HarnessError::ConfigValidation {
                message: format!(
                    "endpoint '{}' uses unsupported scheme '{}'",
                    self.endpoint, other
                ),
            }),
        }
    }

    /// Convert `timeout_ms` to a [`Duration`].
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Find `.matmul/harness.toml` by walking up from `start`.
///
/// Stops at the first match or at the filesystem root.
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_DIR).join(CONFIG_FILE);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[settings]
endpoint = "http://10.0.0.5:8080/compute"
timeout_ms = 2500
catalog = "fixtures/tasks.json"
"#;
        let config = HarnessConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.settings.endpoint, "http://10.0.0.5:8080/compute");
        assert_eq!(config.settings.timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(config.settings.catalog, PathBuf::from("fixtures/tasks.json"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = HarnessConfig::from_toml("").unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.settings.timeout(), None);
        assert_eq!(config.settings.catalog, PathBuf::from("tasks.json"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = HarnessConfig::from_toml("[settings]\ntimeout_ms = 0\n").unwrap_err();
        assert!(matches!(err, HarnessError::ConfigValidation { .. }));
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let err =
            HarnessConfig::from_toml("[settings]\nendpoint = \"ftp://example.com\"\n").unwrap_err();
        assert!(err.to_string().contains("ftp"));

        let err = HarnessConfig::from_toml("[settings]\nendpoint = \"not a url\"\n").unwrap_err();
        assert!(matches!(err, HarnessError::ConfigValidation { .. }));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = HarnessConfig::from_toml("[settings\n").unwrap_err();
        assert!(matches!(err, HarnessError::ConfigParse { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmpfile, "[settings]\ntimeout_ms = 100").unwrap();
        let config = HarnessConfig::load(tmpfile.path()).unwrap();
        assert_eq!(config.settings.timeout_ms, Some(100));
    }

    #[test]
    fn test_load_missing_file() {
        let err = HarnessConfig::load(Path::new("/nonexistent/harness.toml")).unwrap_err();
        assert!(matches!(err, HarnessError::ConfigIo { .. }));
    }

    #[test]
    fn test_discover_config_walks_up() {
        let root = tempfile::tempdir().unwrap();
        let config_dir = root.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join(CONFIG_FILE), "").unwrap();

        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            discover_config(&nested),
            Some(config_dir.join(CONFIG_FILE))
        );
    }
}
