//! Configuration loading for webindex.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/webindex/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::WebIndexError;
use crate::result::DEFAULT_SUFFIX_LEN;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL the endpoint paths are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the existence check endpoint
    #[serde(default = "default_index_exists_path")]
    pub index_exists_path: String,

    /// Path of the build endpoint
    #[serde(default = "default_build_index_path")]
    pub build_index_path: String,

    /// Path of the search endpoint
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Path of the memory samples endpoint
    #[serde(default = "default_samples_path")]
    pub samples_path: String,

    /// Timeout for check, search and samples requests
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for the build request (builds are slow)
    #[serde(default = "default_build_timeout_secs")]
    pub build_timeout_secs: u64,

    /// Length of the non-display suffix the index service appends to results
    #[serde(default = "default_result_suffix_len")]
    pub result_suffix_len: usize,

    /// Pointer hit radius on the chart, in canvas pixels
    #[serde(default = "default_hit_radius")]
    pub hit_radius: f64,

    /// Chart canvas width in pixels
    #[serde(default = "default_chart_width")]
    pub chart_width: f64,

    /// Chart canvas height in pixels
    #[serde(default = "default_chart_height")]
    pub chart_height: f64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    "http://localhost:8080/cgi-bin/".to_string()
}

fn default_index_exists_path() -> String {
    "indexExists.cgi".to_string()
}

fn default_build_index_path() -> String {
    "buildIndex.cgi".to_string()
}

fn default_search_path() -> String {
    "search.cgi".to_string()
}

fn default_samples_path() -> String {
    "data.cgi".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_build_timeout_secs() -> u64 {
    600
}

fn default_result_suffix_len() -> usize {
    DEFAULT_SUFFIX_LEN
}

fn default_hit_radius() -> f64 {
    10.0
}

fn default_chart_width() -> f64 {
    800.0
}

fn default_chart_height() -> f64 {
    400.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            index_exists_path: default_index_exists_path(),
            build_index_path: default_build_index_path(),
            search_path: default_search_path(),
            samples_path: default_samples_path(),
            request_timeout_secs: default_request_timeout_secs(),
            build_timeout_secs: default_build_timeout_secs(),
            result_suffix_len: default_result_suffix_len(),
            hit_radius: default_hit_radius(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/webindex/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (WEBINDEX_*, e.g. WEBINDEX_BASE_URL)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, WebIndexError> {
        let default_config_path = default_config_dir().join("config");

        let mut builder = Config::builder()
            // 1. Built-in defaults
            .set_default("base_url", default_base_url())
            .map_err(|e| WebIndexError::Config(e.to_string()))?
            .set_default("request_timeout_secs", default_request_timeout_secs())
            .map_err(|e| WebIndexError::Config(e.to_string()))?
            .set_default("build_timeout_secs", default_build_timeout_secs())
            .map_err(|e| WebIndexError::Config(e.to_string()))?
            .set_default("result_suffix_len", default_result_suffix_len() as u64)
            .map_err(|e| WebIndexError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| WebIndexError::Config(e.to_string()))?
            // 2. Default config file
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        // 3. CLI-specified config file (higher precedence than default)
        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // 4. Environment variables. Field names contain underscores, so nested
        // keys would need a double underscore.
        builder = builder.add_source(
            Environment::with_prefix("WEBINDEX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| WebIndexError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| WebIndexError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), WebIndexError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(WebIndexError::Config(format!(
                "base_url must start with http:// or https://, got {}",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 || self.build_timeout_secs == 0 {
            return Err(WebIndexError::Config("timeouts must be > 0".to_string()));
        }
        for (name, value) in [
            ("hit_radius", self.hit_radius),
            ("chart_width", self.chart_width),
            ("chart_height", self.chart_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(WebIndexError::Config(format!(
                    "{name} must be a finite number > 0, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Request timeout for the quick endpoints.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Request timeout for the build endpoint.
    pub fn build_timeout(&self) -> Duration {
        Duration::from_secs(self.build_timeout_secs)
    }
}

/// Directory holding the default config file.
pub fn default_config_dir() -> PathBuf {
    ProjectDirs::from("", "", "webindex")
        .map(|p| p.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
