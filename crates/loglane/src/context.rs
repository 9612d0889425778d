//! Request-scoped values, including a logger.
//!
//! A [`Context`] is an immutable chain of typed values. Deriving a new
//! context never changes the one it came from, so a context can be cloned
//! into tasks and threads freely.
//!
//! ```
//! use loglane::{logger_from, with_logger, Context, DiscardLogger, SharedLogger};
//! use std::sync::Arc;
//!
//! let logger: SharedLogger = Arc::new(DiscardLogger);
//! let ctx = with_logger(&Context::background(), logger);
//! assert!(logger_from(&ctx).is_ok());
//! assert!(logger_from(&Context::background()).is_err());
//! ```

use crate::error::ContextError;
use loglane_core::SharedLogger;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Identifies one slot in a [`Context`].
///
/// Keys are types, so two libraries cannot collide on a name: only code that
/// can name the key type can read or write its slot.
pub trait ContextKey: 'static {
    type Value: Send + Sync + 'static;
}

struct Entry {
    key: TypeId,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Entry>>,
}

/// Immutable carrier of request-scoped values.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Entry>>,
}

impl Context {
    /// The empty root context.
    pub fn background() -> Self {
        Self::default()
    }

    /// A derived context holding `value` under `K`. Shadows any earlier
    /// value for the same key; `self` is untouched.
    pub fn with_value<K: ContextKey>(&self, value: K::Value) -> Self {
        Self {
            head: Some(Arc::new(Entry {
                key: TypeId::of::<K>(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// The nearest value stored under `K`.
    pub fn value<K: ContextKey>(&self) -> Option<&K::Value> {
        let wanted = TypeId::of::<K>();
        let mut cursor = self.head.as_deref();
        while let Some(entry) = cursor {
            if entry.key == wanted {
                return entry.value.downcast_ref::<K::Value>();
            }
            cursor = entry.parent.as_deref();
        }
        None
    }

    fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.head.as_deref();
        while let Some(entry) = cursor {
            depth += 1;
            cursor = entry.parent.as_deref();
        }
        depth
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.depth())
            .finish()
    }
}

struct LoggerKey;

impl ContextKey for LoggerKey {
    type Value = SharedLogger;
}

/// A derived context carrying `logger`.
pub fn with_logger(ctx: &Context, logger: SharedLogger) -> Context {
    ctx.with_value::<LoggerKey>(logger)
}

/// The logger attached to `ctx`, or to its nearest ancestor.
///
/// # Errors
///
/// [`ContextError::NoLogger`] when no logger was attached.
pub fn logger_from(ctx: &Context) -> Result<SharedLogger, ContextError> {
    ctx.value::<LoggerKey>()
        .cloned()
        .ok_or(ContextError::NoLogger)
}
