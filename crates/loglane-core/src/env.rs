//! Environment-derived defaults.
//!
//! Reads the execution-mode variables (`ENV`, `APP_ENV`) and the
//! infrastructure-locality variable (`INFRA`) once, and derives the default
//! format and level from them. Resolution works on a snapshot, so the same
//! snapshot always yields the same defaults.

use crate::config::Format;
use crate::level::Level;

/// Variables that name the execution mode.
pub const MODE_VARS: [&str; 2] = ["ENV", "APP_ENV"];

/// Variable that names where the process runs.
pub const LOCALITY_VAR: &str = "INFRA";

const DEVELOPMENT_VALUES: [&str; 3] = ["dev", "development", "local"];

/// Development or production posture, as derived from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posture {
    /// Local or development run: text output at debug level
    Development,
    /// Anything else: JSON output at info level
    Production,
}

impl Posture {
    /// Default output format for this posture.
    pub fn default_format(self) -> Format {
        match self {
            Self::Development => Format::Text,
            Self::Production => Format::Json,
        }
    }

    /// Default severity threshold for this posture.
    pub fn default_level(self) -> Level {
        match self {
            Self::Development => Level::Debug,
            Self::Production => Level::Info,
        }
    }
}

/// Snapshot of the environment variables that influence logging defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    modes: Vec<String>,
    locality: Option<String>,
}

impl Environment {
    /// Capture the designated variables from the running process.
    pub fn from_process() -> Self {
        Self::from_vars(
            MODE_VARS
                .iter()
                .chain(std::iter::once(&LOCALITY_VAR))
                .filter_map(|name| std::env::var(name).ok().map(|value| (*name, value))),
        )
    }

    /// Build a snapshot from explicit name/value pairs.
    ///
    /// Names other than the designated variables are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut env = Self::default();
        for (name, value) in vars {
            let name = name.as_ref();
            if MODE_VARS.contains(&name) {
                env.modes.push(value.into());
            } else if name == LOCALITY_VAR {
                env.locality = Some(value.into());
            }
        }
        env
    }

    /// Derive the posture from the captured values.
    pub fn posture(&self) -> Posture {
        let dev = self
            .modes
            .iter()
            .chain(self.locality.iter())
            .any(|value| is_development(value));
        if dev {
            Posture::Development
        } else {
            Posture::Production
        }
    }
}

fn is_development(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    DEVELOPMENT_VALUES.contains(&value.as_str())
}
