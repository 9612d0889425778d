//! Loglane - process-wide logging facade.
//!
//! One logger per process, built on first use from options and the process
//! environment, shared by every thread afterwards. Construction failures
//! never stop the program: logging degrades to a discard logger and the
//! failure is reported once on standard error.
//!
//! # Environment
//!
//! | Variable         | Effect                                                  |
//! |------------------|---------------------------------------------------------|
//! | `ENV`, `APP_ENV` | `dev`, `development` or `local` selects text at debug   |
//! | `INFRA`          | `local` selects text at debug                           |
//!
//! Anything else selects JSON at info. Explicit options always win.
//!
//! # Usage
//!
//! ```rust,no_run
//! use loglane::{log_info, Level, LoggerOptions, Sink};
//!
//! loglane::init(
//!     LoggerOptions::new()
//!         .level(Level::Debug)
//!         .sink(Sink::Console)
//!         .sink(Sink::file_in("/var/log/myapp")),
//! )
//! .ok();
//!
//! let logger = loglane::logger();
//! log_info!(logger, "started", version = loglane::VERSION);
//! ```
//!
//! Request-scoped loggers travel in a [`Context`]:
//!
//! ```
//! use loglane::{logger_from, with_logger, Context};
//!
//! let request = loglane::with_attrs(loglane::attrs![request_id = "r-42"]);
//! let ctx = with_logger(&Context::background(), request);
//! logger_from(&ctx).unwrap().info("handled", &[]);
//! ```

// Module declarations
mod macros;

pub mod context;
pub mod error;
pub mod global;

// Re-exports for convenient access
pub use context::{logger_from, with_logger, Context, ContextKey};
pub use error::{ContextError, InitError};
pub use global::{init, logger, logger_with, with_attrs};

pub use loglane_core::{
    Attr, BuildError, ConfigError, DiscardLogger, Environment, FileSink, Format, Level, Logger,
    LoggerConfig, LoggerOptions, Posture, Rotation, SharedLogger, SharedWriter, Sink,
    TracingLogger, DEFAULT_LOG_FILE_PATH,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_core() {
        assert_eq!(VERSION, loglane_core::VERSION);
    }
}
