//! Logger that writes nothing.

use super::{Attr, Logger, SharedLogger};
use crate::level::Level;
use std::sync::Arc;

/// A logger that discards all records.
///
/// Handed out when the process-wide logger could not be constructed, so that
/// logging calls keep working without output. Also handy in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardLogger;

impl Logger for DiscardLogger {
    #[inline]
    fn log(&self, _level: Level, _message: &str, _attrs: &[Attr]) {}

    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn with_attrs(&self, _attrs: Vec<Attr>) -> SharedLogger {
        Arc::new(DiscardLogger)
    }
}
