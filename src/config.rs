//! Renderer and logging settings, loaded from TOML.
//!
//! ```toml
//! [renderer]
//! ignored_keys = ["audioScript"]
//! theme = "email"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::style::StyleSheet;

pub const DEFAULT_PLACEHOLDER: &str = "N/A";
pub const DEFAULT_NO_DATA_MESSAGE: &str = "No summary data available";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub renderer: RendererConfig,
    pub logging: LoggingSettings,
}

/// Everything the renderer needs, passed in at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    /// Top-level keys never rendered (consumed elsewhere, e.g. the audio script).
    pub ignored_keys: Vec<String>,
    /// Text shown where a nested value is blank.
    pub placeholder: String,
    /// Text shown when the whole input is not a record.
    pub no_data_message: String,
    pub theme: Theme,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Plain,
    Email,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config at `{key}`: {message}")]
    Parse { key: String, message: String },
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            ignored_keys: Vec::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            no_data_message: DEFAULT_NO_DATA_MESSAGE.to_string(),
            theme: Theme::Plain,
        }
    }
}

impl RendererConfig {
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignored_keys.iter().any(|k| k == key)
    }
}

impl Theme {
    pub fn style_sheet(self) -> StyleSheet {
        match self {
            Self::Plain => StyleSheet::plain(),
            Self::Email => StyleSheet::email(),
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&src)
    }

    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        from_toml_with_path(src)
    }
}

/// Deserialize with key-path context in error messages.
fn from_toml_with_path<T: DeserializeOwned>(src: &str) -> Result<T, ConfigError> {
    let de = toml::Deserializer::new(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let key = err.path().to_string();
        let inner = err.into_inner();
        ConfigError::Parse { key, message: inner.message().to_string() }
    })
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.renderer.placeholder, "N/A");
        assert_eq!(settings.logging.level, LogLevel::Warn);
    }

    #[test]
    fn full_file_round_trips_fields() {
        let settings = Settings::from_toml_str(r#"
            [renderer]
            ignored_keys = ["audioScript", "rawText"]
            placeholder = "—"
            theme = "email"

            [logging]
            level = "debug"
            format = "json"
        "#).unwrap();
        assert!(settings.renderer.is_ignored("audioScript"));
        assert!(!settings.renderer.is_ignored("executiveSummary"));
        assert_eq!(settings.renderer.placeholder, "—");
        assert_eq!(settings.renderer.no_data_message, DEFAULT_NO_DATA_MESSAGE);
        assert_eq!(settings.renderer.theme, Theme::Email);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(LevelFilter::from(settings.logging.level), LevelFilter::DEBUG);
    }

    #[test]
    fn errors_name_the_offending_key() {
        let err = Settings::from_toml_str(r#"
            [renderer]
            theme = "neon"
        "#).unwrap_err();
        match err {
            ConfigError::Parse { key, .. } => assert_eq!(key, "renderer.theme"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
