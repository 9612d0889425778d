//! Output destinations.
//!
//! A [`Sink`] describes where records go. [`compose`] opens every requested
//! sink and returns one [`FanOut`] writer that delivers each record to all of
//! them. With no sinks requested, records go to standard output.
//!
//! A sink may override the logger's output format with [`Sink::with_format`];
//! the builder groups sinks by their effective format.

mod fanout;
mod rolling;

pub use fanout::{FanOut, FanOutWriter};
pub use rolling::RollingFile;

use crate::config::{Format, Rotation};
use crate::error::BuildResult;
use fanout::Destination;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Relative location of the log file when no explicit path is given.
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/app.log";

/// A requested destination.
#[derive(Debug, Clone)]
pub enum Sink {
    /// Standard output
    Console,
    /// Size-rotated file
    File(FileSink),
    /// Caller-supplied writer
    Writer(SharedWriter),
    /// Another sink with its own output format
    Formatted(Format, Box<Sink>),
}

impl Sink {
    /// Rotating file under `dir`; an empty `dir` means the default path.
    pub fn file_in(dir: impl AsRef<Path>) -> Self {
        Self::File(FileSink::in_dir(dir))
    }

    /// Any `io::Write` value, shared behind a lock.
    pub fn writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self::Writer(SharedWriter::new(writer))
    }

    /// Write this sink in `format` regardless of the logger's format.
    pub fn with_format(self, format: Format) -> Self {
        match self {
            Self::Formatted(_, inner) => Self::Formatted(format, inner),
            other => Self::Formatted(format, Box::new(other)),
        }
    }

    /// The format override, if any.
    pub fn format(&self) -> Option<Format> {
        match self {
            Self::Formatted(format, _) => Some(*format),
            _ => None,
        }
    }

    /// The underlying destination, without any format override.
    pub fn destination(&self) -> &Sink {
        match self {
            Self::Formatted(_, inner) => inner.destination(),
            other => other,
        }
    }
}

/// Location and rotation settings of a file sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSink {
    path: PathBuf,
    rotation: Rotation,
}

impl Default for FileSink {
    fn default() -> Self {
        Self::at(DEFAULT_LOG_FILE_PATH)
    }
}

impl FileSink {
    /// Place the default relative path under `dir`.
    ///
    /// An empty `dir` is not an error; it resolves to [`DEFAULT_LOG_FILE_PATH`].
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        if dir.as_os_str().is_empty() {
            Self::default()
        } else {
            Self::at(dir.join(DEFAULT_LOG_FILE_PATH))
        }
    }

    /// Use an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rotation: Rotation::default(),
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rotation(&self) -> &Rotation {
        &self.rotation
    }
}

/// A caller-supplied writer that can be cloned into several configurations.
#[derive(Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<dyn Write + Send>>,
}

impl SharedWriter {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedWriter").finish_non_exhaustive()
    }
}

/// Open every sink and combine them into one writer.
///
/// Fails if any file sink cannot be created; nothing is written in that case.
pub fn compose(sinks: &[Sink]) -> BuildResult<FanOut> {
    let console = [Sink::Console];
    let sinks = if sinks.is_empty() { &console[..] } else { sinks };

    let destinations = sinks
        .iter()
        .map(open)
        .collect::<BuildResult<Vec<_>>>()?;
    Ok(FanOut::new(destinations))
}

/// True when every record goes to the terminal only.
pub fn is_console_only(sinks: &[Sink]) -> bool {
    sinks
        .iter()
        .all(|sink| matches!(sink.destination(), Sink::Console))
}

fn open(sink: &Sink) -> BuildResult<Destination> {
    match sink.destination() {
        Sink::Console => Ok(Destination::new("stdout", io::stdout())),
        Sink::File(file) => {
            let writer = RollingFile::open(file)?;
            Ok(Destination::new(file.path().display().to_string(), writer))
        }
        Sink::Writer(writer) => Ok(Destination::new("writer", writer.clone())),
        Sink::Formatted(_, inner) => open(inner),
    }
}
