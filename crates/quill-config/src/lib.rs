//! Configuration management for quill.
//!
//! Parses `quill.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `highlight.class`
//! - `highlight.theme`
//! - `tables.class`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override highlight enabled flag.
    pub highlight_enabled: Option<bool>,
    /// Override highlight theme.
    pub theme: Option<String>,
    /// Override GFM extensions flag.
    pub gfm: Option<bool>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "quill.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Code block highlighting.
    pub highlight: HighlightConfig,
    /// Table decoration.
    pub tables: TablesConfig,
    /// Markdown parsing.
    pub markdown: MarkdownConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Highlighting configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Whether the highlighting renderer is registered at all.
    pub enabled: bool,
    /// Registration priority of the highlighting renderer.
    pub priority: i32,
    /// Class on the highlighted `<pre>` element.
    pub class: String,
    /// Theme used when generating a stylesheet.
    pub theme: String,
    /// Per-block time limit in milliseconds. `0` disables the limit.
    pub timeout_ms: u64,
    /// Extra fence hint aliases, e.g. `zsh = "bash"`.
    pub aliases: BTreeMap<String, String>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            priority: 150,
            class: "keylighter".to_owned(),
            theme: "InspiredGitHub".to_owned(),
            timeout_ms: 0,
            aliases: BTreeMap::new(),
        }
    }
}

impl HighlightConfig {
    /// Per-block time limit, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// Table decoration configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TablesConfig {
    /// Whether the class decorator is registered.
    pub enabled: bool,
    /// Registration priority of the decorator.
    pub priority: i32,
    /// Class set on every `<table>`.
    pub class: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            priority: 100,
            class: "table".to_owned(),
        }
    }
}

/// Markdown parsing configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Enable tables, strikethrough and task lists.
    pub gfm: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { gfm: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`highlight.theme`").
        field: String,
        /// Error message (e.g., "${`QUILL_THEME`} environment variable not found").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a field to be usable as a single HTML class name.
fn require_class_name(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "{field} must be a single class name"
        )));
    }
    Ok(())
}

/// Require an override priority to beat the built-in defaults.
fn require_positive(value: i32, field: &str) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(ConfigError::Validation(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quill.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and the result is validated
    /// again, so an override cannot produce an invalid configuration.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// a value is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(enabled) = settings.highlight_enabled {
            self.highlight.enabled = enabled;
        }
        if let Some(theme) = &settings.theme {
            self.highlight.theme.clone_from(theme);
        }
        if let Some(gfm) = settings.gfm {
            self.markdown.gfm = gfm;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings. Theme names are checked by the highlighter, not here.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive(self.highlight.priority, "highlight.priority")?;
        require_class_name(&self.highlight.class, "highlight.class")?;
        require_non_empty(&self.highlight.theme, "highlight.theme")?;
        for (alias, target) in &self.highlight.aliases {
            require_non_empty(alias, "highlight.aliases key")?;
            require_non_empty(target, &format!("highlight.aliases.{alias}"))?;
        }

        require_positive(self.tables.priority, "tables.priority")?;
        require_class_name(&self.tables.class, "tables.class")?;

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.highlight.class = expand::expand_env(&self.highlight.class, "highlight.class")?;
        self.highlight.theme = expand::expand_env(&self.highlight.theme, "highlight.theme")?;
        self.tables.class = expand::expand_env(&self.tables.class, "tables.class")?;
        Ok(())
    }
}
