//! Value types shared by options, resolved configuration and config files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const BYTES_PER_MB: u64 = 1024 * 1024;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Format {
    /// One JSON object per line
    #[default]
    Json,
    /// Line-oriented human-readable output
    Text,
}

impl Format {
    /// Parse a format name (case-insensitive).
    ///
    /// Unknown names yield `Json`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "text" | "console" | "pretty" | "human" => Self::Text,
            _ => Self::Json,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

impl From<String> for Format {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rollover settings for a file sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rotation {
    /// Roll the file over once it grows past this many megabytes
    pub max_size_mb: u64,

    /// Number of retired files to keep
    pub max_backups: usize,

    /// Retired files older than this many days are deleted
    pub max_age_days: u64,

    /// Gzip retired files
    pub compress: bool,
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            max_size_mb: 100,
            max_backups: 5,
            max_age_days: 28,
            compress: true,
        }
    }
}

impl Rotation {
    /// Size limit in bytes, saturating on 32-bit targets.
    pub fn max_size_bytes(&self) -> usize {
        usize::try_from(self.max_size_mb.saturating_mul(BYTES_PER_MB)).unwrap_or(usize::MAX)
    }

    /// Maximum age of a retired file.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_days.saturating_mul(SECONDS_PER_DAY))
    }
}
