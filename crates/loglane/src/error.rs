//! Error types for the process-wide facade.

use loglane_core::BuildError;
use std::sync::Arc;
use thiserror::Error;

/// The process-wide logger could not be constructed.
///
/// Stored once and handed out to every later [`crate::init`] call; logging
/// itself falls back to a discard logger.
#[derive(Error, Debug, Clone)]
#[error("logger construction failed: {0}")]
pub struct InitError(Arc<BuildError>);

impl InitError {
    pub(crate) fn new(err: BuildError) -> Self {
        Self(Arc::new(err))
    }

    /// The underlying construction failure.
    pub fn build_error(&self) -> &BuildError {
        &self.0
    }
}

/// Errors from context lookups.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// No logger was attached to the context
    #[error("no logger found in context")]
    NoLogger,
}
