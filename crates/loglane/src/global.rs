//! Process-wide logger.
//!
//! The logger is built on first demand and lives for the rest of the process.
//! Every accessor goes through one [`Lifecycle`]: the first caller resolves
//! options against the process environment, opens the sinks and builds the
//! handler; concurrent callers wait for that single attempt and all later
//! callers get the cached result.
//!
//! A failed construction never reaches the caller. The failure is reported
//! once on standard error and every accessor returns a [`DiscardLogger`].

use crate::error::InitError;
use loglane_core::{
    build, Attr, BuildResult, DiscardLogger, Environment, Logger, LoggerOptions, SharedLogger,
};
use std::sync::{Arc, OnceLock};

static GLOBAL: Lifecycle = Lifecycle::new();

/// Outcome of the single construction attempt.
struct State {
    logger: SharedLogger,
    error: Option<InitError>,
}

/// Holder of the process-wide state. Construction runs at most once.
pub(crate) struct Lifecycle {
    state: OnceLock<State>,
}

impl Lifecycle {
    pub(crate) const fn new() -> Self {
        Self {
            state: OnceLock::new(),
        }
    }

    /// Returns the state and whether this call ran the construction.
    fn get_or_construct<F>(&self, construct: F) -> (&State, bool)
    where
        F: FnOnce() -> BuildResult<SharedLogger>,
    {
        let mut constructed = false;
        let state = self.state.get_or_init(|| {
            constructed = true;
            match construct() {
                Ok(logger) => State {
                    logger,
                    error: None,
                },
                Err(err) => {
                    eprintln!("loglane: {err}; logging is disabled for this process");
                    State {
                        logger: Arc::new(DiscardLogger),
                        error: Some(InitError::new(err)),
                    }
                }
            }
        });
        (state, constructed)
    }

    fn acquire(&self, options: LoggerOptions) -> &State {
        let explicit = !options.is_empty();
        let (state, constructed) = self.get_or_construct(|| construct(options));
        if explicit && !constructed {
            state
                .logger
                .debug("logger already initialized; options ignored", &[]);
        }
        state
    }
}

fn construct(options: LoggerOptions) -> BuildResult<SharedLogger> {
    let config = options.resolve(&Environment::from_process());
    let logger = build(&config)?;
    if tracing::dispatcher::set_global_default(logger.dispatch().clone()).is_err() {
        logger.debug(
            "a global tracing subscriber is already installed; leaving it in place",
            &[],
        );
    }
    Ok(Arc::new(logger))
}

/// Construct the process-wide logger with `options`.
///
/// Only the first call across the process builds anything; later calls
/// return the outcome of that first attempt and ignore their options.
///
/// # Errors
///
/// Returns the construction error, on this and every later call. Logging
/// still works without output.
pub fn init(options: LoggerOptions) -> Result<(), InitError> {
    match &GLOBAL.acquire(options).error {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}

/// The process-wide logger, built from environment defaults if needed.
pub fn logger() -> SharedLogger {
    logger_with(LoggerOptions::default())
}

/// The process-wide logger, built from `options` if this is the first call.
///
/// Never fails: a construction error yields a discard logger.
pub fn logger_with(options: LoggerOptions) -> SharedLogger {
    Arc::clone(&GLOBAL.acquire(options).logger)
}

/// A child of the process-wide logger carrying `attrs` on every record.
pub fn with_attrs(attrs: Vec<Attr>) -> SharedLogger {
    logger().with_attrs(attrs)
}
