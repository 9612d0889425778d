//! Size-rotated log file.
//!
//! Rollover, numbered backups and gzip compression are handled by
//! `file-rotate`. Age-based expiry of retired files is done here: retired
//! siblings (`app.log.1`, `app.log.2.gz`, ...) older than the configured age
//! are removed when the file is opened and after each rollover.

use super::FileSink;
use crate::error::{BuildError, BuildResult};
use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Exclusive owner of one rotating log file.
pub struct RollingFile {
    inner: FileRotate<AppendCount>,
    path: PathBuf,
    limit: usize,
    written: usize,
    max_age: Duration,
}

impl RollingFile {
    /// Create parent directories, open the file for append and prune expired
    /// backups.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::Config` for invalid rotation settings and
    /// `BuildError::Sink` if the file cannot be created.
    pub fn open(sink: &FileSink) -> BuildResult<Self> {
        let rotation = sink.rotation();
        rotation.validate()?;

        let path = sink.path().to_path_buf();
        let existing = prepare(&path).map_err(|source| BuildError::Sink {
            path: path.clone(),
            source,
        })?;

        let compression = if rotation.compress {
            Compression::OnRotate(0)
        } else {
            Compression::None
        };
        let limit = rotation.max_size_bytes();
        let inner = FileRotate::new(
            &path,
            AppendCount::new(rotation.max_backups),
            ContentLimit::BytesSurpassed(limit),
            compression,
            #[cfg(unix)]
            None,
        );

        let file = Self {
            inner,
            path,
            limit,
            written: existing,
            max_age: rotation.max_age(),
        };
        file.prune_expired();
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn prune_expired(&self) {
        let (Some(dir), Some(name)) = (self.path.parent(), self.path.file_name()) else {
            return;
        };
        let dir = if dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            dir
        };
        let prefix = format!("{}.", name.to_string_lossy());
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        let now = SystemTime::now();
        for entry in entries.flatten() {
            if !entry.file_name().to_string_lossy().starts_with(&prefix) {
                continue;
            }
            let expired = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age > self.max_age);
            if expired {
                let _ = fs::remove_file(entry.path());
            }
        }
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n;
        if self.written > self.limit {
            // The next write rolls the file over.
            self.written = 0;
            self.prune_expired();
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Returns the current size of the file.
fn prepare(path: &Path) -> io::Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let len = file.metadata()?.len();
    Ok(usize::try_from(len).unwrap_or(usize::MAX))
}
