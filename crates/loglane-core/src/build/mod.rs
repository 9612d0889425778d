//! Logger construction.
//!
//! Uses the `tracing` ecosystem for the handler: a registry with an
//! `EnvFilter` and up to two `fmt` layers, one writing JSON lines and one
//! writing human-readable lines. Each sink lands in the layer of its own
//! format, or of the logger's format when it has none.

mod json;
mod text;

use crate::config::{Format, LoggerConfig};
use crate::error::BuildResult;
use crate::logger::TracingLogger;
use crate::sink::{self, Sink};
use json::JsonLines;
use std::io::IsTerminal;
use text::TextLines;
use tracing::Dispatch;
use tracing_subscriber::field::MakeExt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Build a logger from a resolved configuration.
///
/// Opens the sinks, parses the extra filter directives and assembles the
/// handler for each output format in use. Nothing is installed globally; the
/// returned logger writes through its own dispatcher.
///
/// # Errors
///
/// Returns an error if a file sink cannot be opened, rotation settings are
/// invalid, or the filter directives don't parse.
pub fn build(config: &LoggerConfig) -> BuildResult<TracingLogger> {
    let (json_sinks, text_sinks) = split_by_format(config);

    let json_layer = if json_sinks.is_empty() {
        None
    } else {
        let writer = sink::compose(&json_sinks)?;
        Some(
            fmt::layer()
                .event_format(JsonLines::new(config.add_source, config.name.clone()))
                .with_writer(writer),
        )
    };

    let text_layer = if text_sinks.is_empty() {
        None
    } else {
        let writer = sink::compose(&text_sinks)?;
        // Colors only when every record lands on a terminal
        let ansi = sink::is_console_only(&text_sinks) && std::io::stdout().is_terminal();
        Some(
            fmt::layer()
                .fmt_fields(format::debug_fn(text::write_field).delimited(" "))
                .event_format(TextLines::new(config.add_source, config.name.clone()))
                .with_ansi(ansi)
                .with_writer(writer),
        )
    };

    // Named targets follow their directives; everything else the level.
    let filter = EnvFilter::builder()
        .parse(config.filter.as_deref().unwrap_or_default())?
        .add_directive(LevelFilter::from(config.level).into());

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer);

    Ok(TracingLogger::new(Dispatch::new(subscriber), config))
}

/// Sinks grouped by effective format; no sinks means the console.
fn split_by_format(config: &LoggerConfig) -> (Vec<Sink>, Vec<Sink>) {
    let console = [Sink::Console];
    let sinks = if config.sinks.is_empty() {
        &console[..]
    } else {
        &config.sinks[..]
    };

    sinks
        .iter()
        .cloned()
        .partition(|sink| sink.format().unwrap_or(config.format) == Format::Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use crate::level::Level;
    use crate::logger::{Attr, Logger};
    use crate::sink::{Sink, DEFAULT_LOG_FILE_PATH};
    use serde_json::Value;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }

        fn records(&self) -> Vec<Value> {
            self.text()
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn config(format: Format, level: Level, capture: &Capture) -> LoggerConfig {
        LoggerConfig {
            level,
            format,
            sinks: vec![Sink::writer(capture.clone())],
            ..LoggerConfig::default()
        }
    }

    #[test]
    fn test_json_record_shape() {
        let capture = Capture::default();
        let logger = build(&config(Format::Json, Level::Info, &capture)).unwrap();

        logger.info(
            "user logged in",
            &[Attr::new("user_id", 42), Attr::new("role", "admin")],
        );

        let records = capture.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["level"], "INFO");
        assert_eq!(record["msg"], "user logged in");
        assert_eq!(record["user_id"], 42);
        assert_eq!(record["role"], "admin");
        assert!(record["time"].is_string());
        assert!(record["source"]
            .as_str()
            .unwrap()
            .contains("build/mod.rs"));
    }

    #[test]
    fn test_json_keeps_attribute_order() {
        let capture = Capture::default();
        let logger = build(&config(Format::Json, Level::Info, &capture)).unwrap();

        logger.info(
            "ordered",
            &[Attr::new("zeta", 1), Attr::new("alpha", 2), Attr::new("mid", 3)],
        );

        let record = &capture.records()[0];
        let keys: Vec<&str> = record
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .filter(|k| ["zeta", "alpha", "mid"].contains(k))
            .collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_source_annotation_can_be_disabled() {
        let capture = Capture::default();
        let mut config = config(Format::Json, Level::Info, &capture);
        config.add_source = false;
        let logger = build(&config).unwrap();

        logger.warn("no location", &[]);

        assert!(capture.records()[0].get("source").is_none());
    }

    #[test]
    fn test_threshold_applies_to_json() {
        let capture = Capture::default();
        let logger = build(&config(Format::Json, Level::Warn, &capture)).unwrap();

        logger.debug("hidden", &[]);
        logger.info("hidden", &[]);
        logger.warn("shown", &[]);
        logger.error("shown", &[]);

        let levels: Vec<Value> = capture
            .records()
            .iter()
            .map(|r| r["level"].clone())
            .collect();
        assert_eq!(levels, ["WARN", "ERROR"]);
    }

    #[test]
    fn test_text_line() {
        let capture = Capture::default();
        let logger = build(&config(Format::Text, Level::Debug, &capture)).unwrap();

        logger.debug("cache warmed", &[Attr::new("entries", 128)]);

        let text = capture.text();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("DEBUG"));
        assert!(text.contains("cache warmed"));
        assert!(text.contains("entries=128"));
        assert!(text.contains("source="));
        assert!(!text.contains('\u{1b}'), "no ANSI escapes in captured output");
    }

    #[test]
    fn test_threshold_applies_to_text() {
        let capture = Capture::default();
        let logger = build(&config(Format::Text, Level::Error, &capture)).unwrap();

        logger.warn("hidden", &[]);
        logger.error("shown", &[]);

        let text = capture.text();
        assert!(!text.contains("hidden"));
        assert!(text.contains("shown"));
    }

    #[test]
    fn test_child_logger_prepends_attrs() {
        let capture = Capture::default();
        let logger = build(&config(Format::Json, Level::Info, &capture)).unwrap();
        let child = logger.with_attrs(vec![Attr::new("request_id", "r-1")]);

        child.info("handled", &[Attr::new("status", 204)]);
        logger.info("parent", &[]);

        let records = capture.records();
        assert_eq!(records[0]["request_id"], "r-1");
        assert_eq!(records[0]["status"], 204);
        assert!(records[1].get("request_id").is_none());
    }

    #[test]
    fn test_filter_directives_apply() {
        let capture = Capture::default();
        let mut config = config(Format::Json, Level::Debug, &capture);
        config.filter = Some("noisy=error".into());
        let logger = build(&config).unwrap();

        tracing::dispatcher::with_default(logger.dispatch(), || {
            tracing::info!(target: "noisy", "suppressed");
            tracing::info!(target: "quiet", "kept");
        });

        let records = capture.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["msg"], "kept");
        assert_eq!(records[0]["target"], "quiet");
        assert!(records[0]["source"].is_string());
    }

    #[test]
    fn test_filter_keeps_level_for_other_targets() {
        let capture = Capture::default();
        let mut config = config(Format::Json, Level::Info, &capture);
        config.filter = Some("hyper=warn".into());
        let logger = build(&config).unwrap();

        logger.error("facade error record", &[]);
        logger.info("facade info record", &[]);
        logger.debug("below threshold", &[]);
        tracing::dispatcher::with_default(logger.dispatch(), || {
            tracing::info!(target: "hyper", "hyper chatter");
            tracing::warn!(target: "hyper", "hyper warning");
        });

        let messages: Vec<Value> = capture.records().iter().map(|r| r["msg"].clone()).collect();
        assert_eq!(
            messages,
            ["facade error record", "facade info record", "hyper warning"]
        );
    }

    #[test]
    fn test_attrs_cannot_replace_record_keys() {
        let capture = Capture::default();
        let logger = build(&config(Format::Json, Level::Info, &capture)).unwrap();

        logger.error(
            "disk failure",
            &[Attr::new("level", "debug"), Attr::new("msg", "ok"), Attr::new("source", "x")],
        );

        let record = &capture.records()[0];
        assert_eq!(record["level"], "ERROR");
        assert_eq!(record["msg"], "disk failure");
        assert!(record["source"].as_str().unwrap().contains("build/mod.rs"));
        assert_eq!(record["attr.level"], "debug");
        assert_eq!(record["attr.msg"], "ok");
        assert_eq!(record["attr.source"], "x");
    }

    #[test]
    fn test_per_sink_format() {
        let json = Capture::default();
        let text = Capture::default();
        let config = LoggerConfig {
            format: Format::Text,
            sinks: vec![
                Sink::writer(json.clone()).with_format(Format::Json),
                Sink::writer(text.clone()),
            ],
            ..LoggerConfig::default()
        };
        let logger = build(&config).unwrap();

        logger.info("mixed", &[Attr::new("shard", 3)]);

        let records = json.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["msg"], "mixed");
        assert_eq!(records[0]["shard"], 3);

        let line = text.text();
        assert!(line.contains("INFO"));
        assert!(line.contains("mixed shard=3"));
        assert!(!line.contains('{'));
    }

    #[test]
    fn test_logger_name_in_both_formats() {
        let json = Capture::default();
        let text = Capture::default();
        let config = LoggerConfig {
            name: Some("billing".into()),
            sinks: vec![
                Sink::writer(json.clone()),
                Sink::writer(text.clone()).with_format(Format::Text),
            ],
            ..LoggerConfig::default()
        };
        let logger = build(&config).unwrap();
        let child = logger.with_attrs(vec![Attr::new("tenant", "t-9")]);

        child.warn("named", &[]);

        assert_eq!(json.records()[0]["logger"], "billing");
        assert!(text.text().contains("billing: named tenant=t-9"));
    }

    #[test]
    fn test_text_source_for_direct_events() {
        let capture = Capture::default();
        let logger = build(&config(Format::Text, Level::Info, &capture)).unwrap();

        tracing::dispatcher::with_default(logger.dispatch(), || tracing::info!("direct"));
        logger.info("facade", &[]);

        let text = capture.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.contains("source=")));
        assert!(lines.iter().all(|line| line.contains("build/mod.rs:")));
        assert_eq!(lines[1].matches("source=").count(), 1);
    }

    #[test]
    fn test_text_source_can_be_disabled() {
        let capture = Capture::default();
        let mut config = config(Format::Text, Level::Info, &capture);
        config.add_source = false;
        let logger = build(&config).unwrap();

        tracing::dispatcher::with_default(logger.dispatch(), || tracing::info!("direct"));
        logger.info("facade", &[]);

        assert!(!capture.text().contains("source="));
    }

    #[test]
    fn test_invalid_filter_is_error() {
        let capture = Capture::default();
        let mut config = config(Format::Json, Level::Info, &capture);
        config.filter = Some("app=loudest".into());
        assert!(matches!(build(&config), Err(BuildError::Filter(_))));
    }

    #[test]
    fn test_fan_out_to_writer_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let capture = Capture::default();
        let config = LoggerConfig {
            sinks: vec![Sink::writer(capture.clone()), Sink::file_in(dir.path())],
            ..LoggerConfig::default()
        };
        let logger = build(&config).unwrap();

        logger.info("delivered twice", &[]);

        let file = std::fs::read_to_string(dir.path().join(DEFAULT_LOG_FILE_PATH)).unwrap();
        assert!(capture.text().contains("delivered twice"));
        assert!(file.contains("delivered twice"));
    }

    #[test]
    fn test_unwritable_file_sink_is_error() {
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let config = LoggerConfig {
            sinks: vec![Sink::file_in(blocker.path())],
            ..LoggerConfig::default()
        };
        assert!(matches!(build(&config), Err(BuildError::Sink { .. })));
    }

    #[test]
    fn test_spans_are_listed() {
        let capture = Capture::default();
        let logger = build(&config(Format::Json, Level::Info, &capture)).unwrap();

        tracing::dispatcher::with_default(logger.dispatch(), || {
            let span = tracing::info_span!("request");
            let _enter = span.enter();
            logger.info("inside", &[]);
        });

        assert_eq!(capture.records()[0]["spans"], serde_json::json!(["request"]));
    }
}
