//! Tracing library adapter implementation.

use super::{Attr, Logger, SharedLogger, TARGET};
use crate::config::{Format, LoggerConfig};
use crate::level::Level;
use serde_json::Value;
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use tracing::field::{self, DebugValue, DisplayValue};
use tracing::{dispatcher, Dispatch};

/// Logger that emits `tracing` events into its own dispatcher.
///
/// The dispatcher is built by [`crate::build`] and owns the filter, the
/// output format and the sinks. Cloning is cheap; clones share the
/// dispatcher.
#[derive(Clone)]
pub struct TracingLogger {
    dispatch: Dispatch,
    level: Level,
    format: Format,
    add_source: bool,
    stacktrace: bool,
    attrs: Arc<[Attr]>,
}

impl TracingLogger {
    pub(crate) fn new(dispatch: Dispatch, config: &LoggerConfig) -> Self {
        Self {
            dispatch,
            level: config.level,
            format: config.format,
            add_source: config.add_source,
            stacktrace: config.stacktrace,
            attrs: Arc::from(Vec::new()),
        }
    }

    /// The dispatcher records are written through.
    ///
    /// Installing it as the `tracing` global default routes plain
    /// `tracing::info!` calls to the same sinks.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

impl fmt::Debug for TracingLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingLogger")
            .field("level", &self.level)
            .field("format", &self.format)
            .field("add_source", &self.add_source)
            .field("stacktrace", &self.stacktrace)
            .field("attrs", &self.attrs)
            .finish()
    }
}

impl Logger for TracingLogger {
    #[track_caller]
    fn log(&self, level: Level, message: &str, attrs: &[Attr]) {
        if !self.enabled(level) {
            return;
        }
        let location = Location::caller();
        let source = self
            .add_source
            .then(|| format!("{}:{}", location.file(), location.line()));

        let merged: Vec<&Attr> = self.attrs.iter().chain(attrs).collect();
        let rendered = AttrSet { attrs: &merged };
        let backtrace =
            (self.stacktrace && level == Level::Error).then(Backtrace::force_capture);

        let fields = EventFields {
            attrs: (!merged.is_empty()).then(|| field::debug(&rendered)),
            source: source.as_deref().map(field::display),
            stacktrace: backtrace.as_ref().map(field::display),
        };
        dispatcher::with_default(&self.dispatch, || emit(level, message, fields));
    }

    fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> SharedLogger {
        let mut child = self.clone();
        child.attrs = self.attrs.iter().cloned().chain(attrs).collect();
        Arc::new(child)
    }
}

/// Optional fields of one record. `None` fields are not written.
struct EventFields<'a> {
    /// Read back by the formatters under `ATTRS_FIELD`
    attrs: Option<DebugValue<&'a AttrSet<'a>>>,
    source: Option<DisplayValue<&'a str>>,
    stacktrace: Option<DisplayValue<&'a Backtrace>>,
}

fn emit(level: Level, message: &str, fields: EventFields<'_>) {
    let EventFields {
        attrs,
        source,
        stacktrace,
    } = fields;
    match level {
        Level::Debug => tracing::event!(
            target: TARGET,
            tracing::Level::DEBUG,
            attrs = attrs,
            source = source,
            stacktrace = stacktrace,
            "{}",
            message
        ),
        Level::Info => tracing::event!(
            target: TARGET,
            tracing::Level::INFO,
            attrs = attrs,
            source = source,
            stacktrace = stacktrace,
            "{}",
            message
        ),
        Level::Warn => tracing::event!(
            target: TARGET,
            tracing::Level::WARN,
            attrs = attrs,
            source = source,
            stacktrace = stacktrace,
            "{}",
            message
        ),
        Level::Error => tracing::event!(
            target: TARGET,
            tracing::Level::ERROR,
            attrs = attrs,
            source = source,
            stacktrace = stacktrace,
            "{}",
            message
        ),
    }
}

/// Call attributes as one event field.
///
/// `{:?}` renders a JSON object that the structured formatter merges into the
/// record; `{:#?}` renders `key=value` pairs for human-readable output.
struct AttrSet<'a> {
    attrs: &'a [&'a Attr],
}

impl fmt::Debug for AttrSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            for (i, attr) in self.attrs.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}=", attr.key())?;
                write_text_value(f, attr.value())?;
            }
            return Ok(());
        }

        f.write_str("{")?;
        for (i, attr) in self.attrs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            let key = serde_json::to_string(attr.key()).map_err(|_| fmt::Error)?;
            write!(f, "{key}:{}", attr.value())?;
        }
        f.write_str("}")
    }
}

fn write_text_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::String(s) if needs_quotes(s) => write!(f, "{s:?}"),
        Value::String(s) => f.write_str(s),
        other => write!(f, "{other}"),
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '"' || c == '=')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(format: Format, attrs: &[Attr]) -> String {
        let refs: Vec<&Attr> = attrs.iter().collect();
        let set = AttrSet { attrs: &refs };
        match format {
            Format::Json => format!("{set:?}"),
            Format::Text => format!("{set:#?}"),
        }
    }

    #[test]
    fn test_tracing_logger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TracingLogger>();
    }

    #[test]
    fn test_render_json_attrs() {
        let attrs = [Attr::new("user_id", 42), Attr::new("role", "admin")];
        let rendered = render(Format::Json, &attrs);
        assert_eq!(rendered, r#"{"user_id":42,"role":"admin"}"#);
    }

    #[test]
    fn test_render_json_escapes_keys() {
        let attrs = [Attr::new("we\"ird", "x")];
        let value: Value = serde_json::from_str(&render(Format::Json, &attrs)).unwrap();
        assert_eq!(value["we\"ird"], "x");
    }

    #[test]
    fn test_render_text_attrs() {
        let attrs = [
            Attr::new("user_id", 42),
            Attr::new("role", "admin"),
            Attr::new("note", "two words"),
            Attr::new("ok", true),
        ];
        assert_eq!(
            render(Format::Text, &attrs),
            r#"user_id=42 role=admin note="two words" ok=true"#
        );
    }

    #[test]
    fn test_enabled_follows_threshold() {
        let config = LoggerConfig {
            level: Level::Warn,
            ..LoggerConfig::default()
        };
        let logger = TracingLogger::new(Dispatch::none(), &config);
        assert!(!logger.enabled(Level::Debug));
        assert!(!logger.enabled(Level::Info));
        assert!(logger.enabled(Level::Warn));
        assert!(logger.enabled(Level::Error));
    }

    #[test]
    fn test_stacktrace_only_on_error_records() {
        use std::io::{self, Write};
        use std::sync::Mutex;

        #[derive(Clone, Default)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl Write for Capture {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let capture = Capture::default();
        let config = LoggerConfig {
            stacktrace: true,
            sinks: vec![crate::sink::Sink::writer(capture.clone())],
            ..LoggerConfig::default()
        };
        let logger = crate::build(&config).unwrap();

        logger.warn("degraded", &[]);
        logger.error("failed", &[]);

        let text = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        let records: Vec<Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert!(records[0].get("stacktrace").is_none());
        assert!(records[1]["stacktrace"].is_string());
    }

    #[test]
    fn test_with_attrs_accumulates() {
        let logger = TracingLogger::new(Dispatch::none(), &LoggerConfig::default());
        let child = logger.with_attrs(vec![Attr::new("service", "api")]);
        let debug = format!("{child:?}");
        assert!(debug.contains("service"));
        assert!(!format!("{logger:?}").contains("service"));
    }
}
