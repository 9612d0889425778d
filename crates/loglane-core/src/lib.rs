//! Loglane Core - configuration and construction of loggers.
//!
//! Everything here is free of global state: options are resolved against an
//! environment snapshot, sinks are opened, and a logger is built that writes
//! through its own `tracing` dispatcher. The process-wide facade lives in the
//! `loglane` crate.
//!
//! # Architecture
//!
//! ```text
//! LoggerOptions ─┐
//!                ├─ resolve ─→ LoggerConfig ─→ build ─→ TracingLogger
//! Environment ───┘                 │
//!                                  └─ sinks ─→ FanOut (console, file, writer)
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use loglane_core::{build, Attr, Environment, Level, Logger, LoggerOptions, Sink};
//!
//! let config = LoggerOptions::new()
//!     .level(Level::Debug)
//!     .sink(Sink::Console)
//!     .sink(Sink::file_in("/var/lib/myapp"))
//!     .resolve(&Environment::from_process());
//!
//! let logger = build(&config).expect("log file is writable");
//! logger.info("started", &[Attr::new("version", env!("CARGO_PKG_VERSION"))]);
//! ```

// Module declarations
pub mod build;
pub mod config;
pub mod env;
pub mod error;
pub mod level;
pub mod logger;
pub mod sink;

// Re-exports for convenient access
pub use build::build;
pub use config::{Format, LoggerConfig, LoggerOptions, Rotation, SinkKind};
pub use env::{Environment, Posture};
pub use error::{BuildError, BuildResult, ConfigError};
pub use level::Level;
pub use logger::{Attr, DiscardLogger, Logger, SharedLogger, TracingLogger};
pub use sink::{FileSink, SharedWriter, Sink, DEFAULT_LOG_FILE_PATH};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
