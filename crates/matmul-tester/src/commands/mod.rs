//! CLI subcommands and the settings shared between them.

pub mod add;
pub mod run;
pub mod verify;

use anyhow::{Context, Result};
use clap::Args;
use std::io::IsTerminal;
use std::path::PathBuf;

use matmul_harness::config::{discover_config, HarnessConfig, Settings};

/// Options accepted by every subcommand.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Path to config file (default: auto-discover .matmul/harness.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Task catalog file (overrides config)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Server endpoint URL (overrides config)
    #[arg(long, env = "MATMUL_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Per-request timeout in milliseconds (overrides config)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl GlobalArgs {
    /// Load the config file (explicit or discovered) and apply CLI overrides.
    pub fn resolve(&self) -> Result<Settings> {
        let config = match &self.config {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                load_config(path)?
            },
            None => {
                let cwd = std::env::current_dir()?;
                match discover_config(&cwd) {
                    Some(path) => load_config(&path)?,
                    None => HarnessConfig::default(),
                }
            },
        };

        let mut settings = config.settings;
        self.apply_overrides(&mut settings);
        settings.validate().context("Invalid settings")?;
        Ok(settings)
    }

    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(catalog) = &self.catalog {
            settings.catalog = catalog.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = endpoint.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            settings.timeout_ms = Some(timeout_ms);
        }
    }
}

fn load_config(path: &std::path::Path) -> Result<HarnessConfig> {
    tracing::debug!("Loading config from {}", path.display());
    HarnessConfig::load(path)
        .with_context(|| format!("Failed to load config '{}'", path.display()))
}

/// Turn colors off for `--no-color` or when stdout is piped.
pub fn apply_color(no_color: bool) {
    if no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides_replaces_only_given_fields() {
        let args = GlobalArgs {
            endpoint: Some("http://127.0.0.1:9000".to_string()),
            timeout_ms: Some(250),
            ..Default::default()
        };
        let mut settings = Settings::default();
        args.apply_overrides(&mut settings);

        assert_eq!(settings.endpoint, "http://127.0.0.1:9000");
        assert_eq!(settings.timeout_ms, Some(250));
        assert_eq!(settings.catalog, PathBuf::from("tasks.json"));
    }

    #[test]
    fn test_resolve_with_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.toml");
        std::fs::write(
            &path,
            "[settings]\nendpoint = \"http://10.1.1.1:3000\"\ncatalog = \"bench.json\"\n",
        )
        .unwrap();

        let args = GlobalArgs {
            config: Some(path),
            catalog: Some(PathBuf::from("other.json")),
            ..Default::default()
        };
        let settings = args.resolve().unwrap();
        assert_eq!(settings.endpoint, "http://10.1.1.1:3000");
        assert_eq!(settings.catalog, PathBuf::from("other.json"));
    }

    #[test]
    fn test_resolve_missing_explicit_config_fails() {
        let args = GlobalArgs {
            config: Some(PathBuf::from("/nonexistent/harness.toml")),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_resolve_rejects_bad_endpoint_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.toml");
        std::fs::write(&path, "").unwrap();
        let args = GlobalArgs {
            config: Some(path),
            endpoint: Some("localhost:3000".to_string()),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }
}
