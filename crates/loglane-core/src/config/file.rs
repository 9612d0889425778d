//! TOML representation of [`LoggerOptions`].

use super::{Format, LoggerOptions, Rotation};
use crate::level::Level;
use crate::sink::{FileSink, Sink};
use serde::{Deserialize, Serialize};

/// Destinations that can be named in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Console,
    File,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OptionsFile {
    pub level: Option<Level>,
    pub format: Option<Format>,
    pub add_source: Option<bool>,
    pub filter: Option<String>,
    pub name: Option<String>,
    pub stacktrace: Option<bool>,
    pub sinks: Vec<SinkKind>,
    pub console: ConsoleSection,
    pub file: FileSection,
}

/// `[console]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ConsoleSection {
    /// Overrides the top-level format for standard output
    pub format: Option<Format>,
}

/// `[file]` table: location, format and rotation settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FileSection {
    /// Directory the default relative path is placed under
    pub dir: Option<String>,

    /// Full file path; takes precedence over `dir`
    pub path: Option<String>,

    /// Overrides the top-level format for this file
    pub format: Option<Format>,

    #[serde(flatten)]
    pub rotation: Rotation,
}

impl FileSection {
    fn to_sink(&self) -> Sink {
        let sink = Sink::File(self.to_file_sink());
        match self.format {
            Some(format) => sink.with_format(format),
            None => sink,
        }
    }

    fn to_file_sink(&self) -> FileSink {
        let sink = match (&self.path, &self.dir) {
            (Some(path), _) => FileSink::at(shellexpand::tilde(path).into_owned()),
            (None, Some(dir)) => FileSink::in_dir(shellexpand::tilde(dir).into_owned()),
            (None, None) => FileSink::default(),
        };
        sink.with_rotation(self.rotation.clone())
    }
}

impl OptionsFile {
    pub(crate) fn into_options(self) -> LoggerOptions {
        let sinks = self
            .sinks
            .iter()
            .map(|kind| match kind {
                SinkKind::Console => match self.console.format {
                    Some(format) => Sink::Console.with_format(format),
                    None => Sink::Console,
                },
                SinkKind::File => self.file.to_sink(),
            })
            .collect::<Vec<_>>();

        let mut options = LoggerOptions::new().sinks(sinks);
        if let Some(level) = self.level {
            options = options.level(level);
        }
        if let Some(format) = self.format {
            options = options.format(format);
        }
        if let Some(add_source) = self.add_source {
            options = options.add_source(add_source);
        }
        if let Some(filter) = self.filter {
            options = options.filter(filter);
        }
        if let Some(name) = self.name {
            options = options.name(name);
        }
        if let Some(stacktrace) = self.stacktrace {
            options = options.stacktrace(stacktrace);
        }
        options
    }
}
