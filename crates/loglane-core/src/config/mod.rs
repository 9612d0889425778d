//! Logger configuration.
//!
//! Callers describe what they want with [`LoggerOptions`]; every field is an
//! optional override. [`LoggerOptions::resolve`] fills the gaps from an
//! [`Environment`] snapshot and the hard-coded fallback, producing the
//! immutable [`LoggerConfig`] the builder consumes.
//!
//! Precedence is always: caller-supplied, then environment-derived, then
//! fallback (JSON, info, standard output, source annotations on).

mod file;
mod types;
mod validate;

pub use file::SinkKind;
pub use types::*;

use crate::env::Environment;
use crate::error::ConfigError;
use crate::level::Level;
use crate::sink::Sink;
use std::path::{Path, PathBuf};

/// Name of the config file looked up by [`LoggerOptions::load`].
pub const CONFIG_FILE_NAME: &str = "logging.toml";

/// Resolved logger configuration.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Minimum severity written
    pub level: Level,

    /// Output encoding
    pub format: Format,

    /// Destinations; never empty once resolved
    pub sinks: Vec<Sink>,

    /// Annotate records with the caller's file and line
    pub add_source: bool,

    /// Extra `EnvFilter` directives applied after the level threshold
    pub filter: Option<String>,

    /// Logger name written on every record
    pub name: Option<String>,

    /// Attach a stack trace to error records
    pub stacktrace: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            format: Format::Json,
            sinks: vec![Sink::Console],
            add_source: true,
            filter: None,
            name: None,
            stacktrace: false,
        }
    }
}

/// Caller-supplied overrides.
///
/// ```
/// use loglane_core::{Format, Level, LoggerOptions, Sink};
///
/// let options = LoggerOptions::new()
///     .level(Level::Warn)
///     .format(Format::Text)
///     .sink(Sink::Console)
///     .sink(Sink::file_in("/tmp/myapp"));
/// assert!(!options.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggerOptions {
    level: Option<Level>,
    format: Option<Format>,
    sinks: Vec<Sink>,
    add_source: Option<bool>,
    filter: Option<String>,
    name: Option<String>,
    stacktrace: Option<bool>,
}

impl LoggerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Add a destination. Repeated calls fan out to every sink.
    pub fn sink(mut self, sink: Sink) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn sinks(mut self, sinks: impl IntoIterator<Item = Sink>) -> Self {
        self.sinks.extend(sinks);
        self
    }

    pub fn add_source(mut self, add_source: bool) -> Self {
        self.add_source = Some(add_source);
        self
    }

    /// Extra filter directives, e.g. `"hyper=warn,my_crate::db=debug"`.
    pub fn filter(mut self, directives: impl Into<String>) -> Self {
        self.filter = Some(directives.into());
        self
    }

    /// Name written on every record, e.g. the service or component.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn stacktrace(mut self, stacktrace: bool) -> Self {
        self.stacktrace = Some(stacktrace);
        self
    }

    /// True when no override has been supplied.
    pub fn is_empty(&self) -> bool {
        self.level.is_none()
            && self.format.is_none()
            && self.sinks.is_empty()
            && self.add_source.is_none()
            && self.filter.is_none()
            && self.name.is_none()
            && self.stacktrace.is_none()
    }

    /// Fill unset fields from the environment snapshot and the fallback.
    pub fn resolve(self, env: &Environment) -> LoggerConfig {
        let posture = env.posture();
        let fallback = LoggerConfig::default();
        LoggerConfig {
            level: self.level.unwrap_or_else(|| posture.default_level()),
            format: self.format.unwrap_or_else(|| posture.default_format()),
            sinks: if self.sinks.is_empty() {
                fallback.sinks
            } else {
                self.sinks
            },
            add_source: self.add_source.unwrap_or(fallback.add_source),
            filter: self.filter.or(fallback.filter),
            name: self.name.or(fallback.name),
            stacktrace: self.stacktrace.unwrap_or(fallback.stacktrace),
        }
    }

    /// Load options from the default location for `app`.
    ///
    /// Returns empty options if the file doesn't exist.
    pub fn load(app: &str) -> Result<Self, ConfigError> {
        let path = Self::default_path(app);
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load options from a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let file: file::OptionsFile = toml::from_str(&content)?;
        file.validate()?;
        Ok(file.into_options())
    }

    /// Get the default config file path for `app`.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/<app>/logging.toml
    /// - Linux: ~/.config/<app>/logging.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\<app>\config\logging.toml
    ///
    /// Falls back to ~/.<app>/logging.toml if directory detection fails.
    pub fn default_path(app: &str) -> PathBuf {
        directories::ProjectDirs::from("", "", app)
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home)
                    .join(format!(".{app}"))
                    .join(CONFIG_FILE_NAME)
            })
    }
}
