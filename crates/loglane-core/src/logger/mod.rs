//! Logger capability.
//!
//! Application code logs through the [`Logger`] trait, usually held as a
//! [`SharedLogger`]. Two implementations exist:
//!
//! - [`TracingLogger`]: produced by [`crate::build`], writes through a
//!   `tracing` dispatcher to the configured sinks
//! - [`DiscardLogger`]: accepts every call and writes nothing
//!
//! ```
//! use loglane_core::{Attr, DiscardLogger, Logger, SharedLogger};
//! use std::sync::Arc;
//!
//! let logger: SharedLogger = Arc::new(DiscardLogger);
//! logger.info("request served", &[Attr::new("status", 200), Attr::new("path", "/health")]);
//! ```

mod discard;
mod tracing_adapter;

pub use discard::DiscardLogger;
pub use tracing_adapter::TracingLogger;

use crate::level::Level;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Target of every event emitted through a [`TracingLogger`].
pub const TARGET: &str = "loglane";

/// Field name that carries call attributes inside a `tracing` event.
pub(crate) const ATTRS_FIELD: &str = "attrs";

/// Shared, thread-safe logger handle.
pub type SharedLogger = Arc<dyn Logger>;

/// A key/value pair attached to a record.
///
/// Values are JSON values so structured output keeps their type.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    key: Cow<'static, str>,
    value: Value,
}

impl Attr {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Record a value through its `Display` implementation.
    pub fn display(key: impl Into<Cow<'static, str>>, value: impl fmt::Display) -> Self {
        Self::new(key, value.to_string())
    }

    /// Record a value through its `Debug` implementation.
    pub fn debug(key: impl Into<Cow<'static, str>>, value: impl fmt::Debug) -> Self {
        Self::new(key, format!("{value:?}"))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Severity-tagged logging operations.
///
/// Implementations must be `Send + Sync`; a single handle is shared by every
/// thread of the process. Calls never fail and never panic.
pub trait Logger: Send + Sync + fmt::Debug {
    /// Write a record at `level` if it passes the threshold.
    ///
    /// This is the core method that implementations must provide.
    #[track_caller]
    fn log(&self, level: Level, message: &str, attrs: &[Attr]);

    /// Whether a record at `level` would be written.
    fn enabled(&self, level: Level) -> bool;

    /// A child logger whose records carry `attrs` before the per-call ones.
    fn with_attrs(&self, attrs: Vec<Attr>) -> SharedLogger;

    #[track_caller]
    fn debug(&self, message: &str, attrs: &[Attr]) {
        self.log(Level::Debug, message, attrs);
    }

    #[track_caller]
    fn info(&self, message: &str, attrs: &[Attr]) {
        self.log(Level::Info, message, attrs);
    }

    #[track_caller]
    fn warn(&self, message: &str, attrs: &[Attr]) {
        self.log(Level::Warn, message, attrs);
    }

    #[track_caller]
    fn error(&self, message: &str, attrs: &[Attr]) {
        self.log(Level::Error, message, attrs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attr_keeps_value_type() {
        assert_eq!(Attr::new("n", 42).value(), &json!(42));
        assert_eq!(Attr::new("ok", true).value(), &json!(true));
        assert_eq!(Attr::new("name", "api").value(), &json!("api"));
        assert_eq!(Attr::new("ratio", 0.5).value(), &json!(0.5));
    }

    #[test]
    fn test_attr_owned_key() {
        let key = format!("shard_{}", 3);
        let attr = Attr::new(key, 1);
        assert_eq!(attr.key(), "shard_3");
    }

    #[test]
    fn test_attr_display_and_debug() {
        let path = std::path::Path::new("/tmp/x");
        assert_eq!(Attr::display("path", path.display()).value(), &json!("/tmp/x"));
        assert_eq!(Attr::debug("tags", ["a", "b"]).value(), &json!("[\"a\", \"b\"]"));
    }
}
