//! Runner configuration
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. `blockrun.toml` in the working directory, or the file named by
//!    `BLOCKRUN_CONFIG_PATH`
//! 3. `BLOCKRUN_*` environment variables, `__` between nested keys
//!    (`BLOCKRUN_RUNNER__MAX_TICKS=600`)
//! 4. explicit builder overrides (CLI flags)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const CONFIG_PATH_VAR: &str = "BLOCKRUN_CONFIG_PATH";
const DEFAULT_FILE: &str = "blockrun";
const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Tick budget for headless runs; unbounded when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ticks: Option<u64>,

    /// Pace ticks at the 60 Hz host rate instead of running flat out
    #[serde(default)]
    pub realtime: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    DEFAULT_FILTER.to_string()
}

impl Config {
    /// Load from files and environment with no overrides
    pub fn load() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    max_ticks: Option<u64>,
    realtime: Option<bool>,
}

impl ConfigBuilder {
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn realtime(mut self, realtime: Option<bool>) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn build(self) -> Result<Config> {
        dotenvy::dotenv().ok();

        let file = match self
            .config_path
            .or_else(|| env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from))
        {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_FILE).required(false),
        };

        let mut config: Config = config::Config::builder()
            .set_default("runner.realtime", false)?
            .set_default("logging.filter", DEFAULT_FILTER)?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("BLOCKRUN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        if let Some(max_ticks) = self.max_ticks {
            config.runner.max_ticks = Some(max_ticks);
        }
        if let Some(realtime) = self.realtime {
            config.runner.realtime = realtime;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_file_values_are_read() {
        let file = write_config(
            r#"
            [runner]
            max_ticks = 600

            [logging]
            filter = "blockrun_core=debug"
            "#,
        );

        let config = Config::builder()
            .config_path(Some(file.path().to_path_buf()))
            .build()
            .unwrap();

        assert_eq!(config.runner.max_ticks, Some(600));
        assert!(!config.runner.realtime);
        assert_eq!(config.logging.filter, "blockrun_core=debug");
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = write_config("[runner]\nmax_ticks = 600\nrealtime = true\n");

        let config = Config::builder()
            .config_path(Some(file.path().to_path_buf()))
            .max_ticks(Some(5))
            .realtime(Some(false))
            .build()
            .unwrap();

        assert_eq!(config.runner.max_ticks, Some(5));
        assert!(!config.runner.realtime);
        assert_eq!(config.logging.filter, DEFAULT_FILTER);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::builder()
            .config_path(Some(dir.path().join("absent.toml")))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = Config::default();
        config.runner.max_ticks = Some(120);
        let rendered = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
