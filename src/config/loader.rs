//! Configuration file loading with precedence handling.

use crate::view_state::budget::RenderBudget;
use crate::view_state::content::ContentOptions;
use crate::view_state::debouncer::DebounceConfig;
use crate::view_state::EngineConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CONVLIST_CONFIG";

/// Environment variable overriding `debounce_ms`.
pub const DEBOUNCE_ENV: &str = "CONVLIST_DEBOUNCE_MS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/convlist/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Row height in layout units.
    #[serde(default)]
    pub item_height: Option<u32>,

    /// Quiet period before a pass runs, in milliseconds.
    #[serde(default)]
    pub debounce_ms: Option<u64>,

    /// Promotions per pass while settled.
    #[serde(default)]
    pub normal_budget: Option<usize>,

    /// Promotions per pass while fast scrolling.
    #[serde(default)]
    pub fast_budget: Option<usize>,

    /// Rows loaded synchronously after a bulk load.
    #[serde(default)]
    pub initial_eager_loads: Option<usize>,

    /// Single-scroll distance (layout units) that counts as fast.
    #[serde(default)]
    pub fast_scroll_delta: Option<u64>,

    /// Scroll events within the burst window that count as fast.
    #[serde(default)]
    pub fast_scroll_burst: Option<usize>,

    /// Burst detection window in milliseconds.
    #[serde(default)]
    pub fast_scroll_window_ms: Option<u64>,

    /// Display name width in columns.
    #[serde(default)]
    pub name_width: Option<usize>,

    /// Preview width in columns.
    #[serde(default)]
    pub preview_width: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Row height in layout units.
    pub item_height: u32,
    /// Debounce delay in milliseconds.
    pub debounce_ms: u64,
    /// Promotions per settled pass.
    pub normal_budget: usize,
    /// Promotions per fast-scroll pass.
    pub fast_budget: usize,
    /// Rows loaded synchronously after a bulk load.
    pub initial_eager_loads: usize,
    /// Fast-scroll distance threshold.
    pub fast_scroll_delta: u64,
    /// Fast-scroll burst threshold.
    pub fast_scroll_burst: usize,
    /// Fast-scroll burst window in milliseconds.
    pub fast_scroll_window_ms: u64,
    /// Display name width.
    pub name_width: usize,
    /// Preview width.
    pub preview_width: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            item_height: engine.item_height,
            debounce_ms: engine.debounce.delay.as_millis() as u64,
            normal_budget: engine.budget.normal,
            fast_budget: engine.budget.fast,
            initial_eager_loads: engine.initial_eager_loads,
            fast_scroll_delta: engine.debounce.fast_scroll_delta,
            fast_scroll_burst: engine.debounce.fast_scroll_burst,
            fast_scroll_window_ms: engine.debounce.fast_scroll_window.as_millis() as u64,
            name_width: engine.content.name_width,
            preview_width: engine.content.preview_width,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Engine tuning derived from this configuration.
    ///
    /// Row heights stay uniform: the terminal draws every conversation two
    /// rows tall, so nothing reports measured heights.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            item_height: self.item_height,
            budget: RenderBudget::new(self.normal_budget, self.fast_budget),
            initial_eager_loads: self.initial_eager_loads,
            debounce: DebounceConfig {
                delay: Duration::from_millis(self.debounce_ms),
                fast_scroll_delta: self.fast_scroll_delta,
                fast_scroll_burst: self.fast_scroll_burst,
                fast_scroll_window: Duration::from_millis(self.fast_scroll_window_ms),
            },
            content: ContentOptions {
                name_width: self.name_width,
                preview_width: self.preview_width,
            },
            ..EngineConfig::default()
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/convlist/convlist.log` on Unix-like systems,
/// or the platform equivalent. Falls back to the current directory when no
/// state directory is known.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("convlist").join("convlist.log")
    } else {
        PathBuf::from("convlist.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path (`~/.config/convlist/config.toml` on Unix).
///
/// Returns `None` if the config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("convlist").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CONVLIST_CONFIG` environment variable
/// 3. Default path `~/.config/convlist/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error if a config file exists but cannot be read or parsed, or
/// if `CONVLIST_CONFIG` is set to something that is not valid UTF-8.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    match std::env::var(CONFIG_ENV) {
        Ok(env_path) => return load_config_file(PathBuf::from(env_path)),
        Err(std::env::VarError::NotUnicode(raw)) => {
            return Err(ConfigError::InvalidPath(raw.to_string_lossy().into_owned()));
        }
        Err(std::env::VarError::NotPresent) => {}
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `CONVLIST_DEBOUNCE_MS`. Values that do not parse are ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(DEBOUNCE_ENV) {
        match raw.trim().parse::<u64>() {
            Ok(ms) => config.debounce_ms = ms,
            Err(e) => warn!(value = %raw, error = %e, "Ignoring invalid {DEBOUNCE_ENV}"),
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        item_height: config.item_height.unwrap_or(defaults.item_height),
        debounce_ms: config.debounce_ms.unwrap_or(defaults.debounce_ms),
        normal_budget: config.normal_budget.unwrap_or(defaults.normal_budget),
        fast_budget: config.fast_budget.unwrap_or(defaults.fast_budget),
        initial_eager_loads: config
            .initial_eager_loads
            .unwrap_or(defaults.initial_eager_loads),
        fast_scroll_delta: config
            .fast_scroll_delta
            .unwrap_or(defaults.fast_scroll_delta),
        fast_scroll_burst: config
            .fast_scroll_burst
            .unwrap_or(defaults.fast_scroll_burst),
        fast_scroll_window_ms: config
            .fast_scroll_window_ms
            .unwrap_or(defaults.fast_scroll_window_ms),
        name_width: config.name_width.unwrap_or(defaults.name_width),
        preview_width: config.preview_width.unwrap_or(defaults.preview_width),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest).
/// Only flags the user actually passed override anything.
pub fn apply_cli_overrides(mut config: ResolvedConfig, debounce_ms: Option<u64>) -> ResolvedConfig {
    if let Some(ms) = debounce_ms {
        config.debounce_ms = ms;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
