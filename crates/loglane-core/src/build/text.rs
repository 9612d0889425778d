//! Human-readable output.
//!
//! `<time> <LEVEL> [name:] [span:span:] message key=value ... source=file:line`

use crate::logger::ATTRS_FIELD;
use std::fmt;
use tracing::field::Field;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

pub(crate) struct TextLines {
    add_source: bool,
    name: Option<String>,
}

impl TextLines {
    pub(crate) fn new(add_source: bool, name: Option<String>) -> Self {
        Self { add_source, name }
    }
}

impl<S, N> FormatEvent<S, N> for TextLines
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        if SystemTime.format_time(&mut writer).is_ok() {
            writer.write_char(' ')?;
        }
        write_level(&mut writer, meta.level())?;

        if let Some(name) = &self.name {
            write!(writer, "{name}: ")?;
        }
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}:", span.name())?;
            }
            writer.write_char(' ')?;
        }

        ctx.format_fields(writer.by_ref(), event)?;

        // Facade records declare their own `source` field.
        if self.add_source && meta.fields().field("source").is_none() {
            if let Some(file) = meta.file() {
                write!(writer, " source={file}:{}", meta.line().unwrap_or(0))?;
            }
        }
        writeln!(writer)
    }
}

fn write_level(writer: &mut Writer<'_>, level: &Level) -> fmt::Result {
    if !writer.has_ansi_escapes() {
        return write!(writer, "{:>5} ", level.as_str());
    }
    let color = match *level {
        Level::ERROR => 31,
        Level::WARN => 33,
        Level::INFO => 32,
        Level::DEBUG => 34,
        Level::TRACE => 35,
    };
    write!(writer, "\x1b[{color}m{:>5}\x1b[0m ", level.as_str())
}

/// Message and attributes are written bare, stack traces on their own lines,
/// other fields as `name=value`.
pub(crate) fn write_field(
    writer: &mut Writer<'_>,
    field: &Field,
    value: &dyn fmt::Debug,
) -> fmt::Result {
    match field.name() {
        "message" => write!(writer, "{value:?}"),
        ATTRS_FIELD => write!(writer, "{value:#?}"),
        "stacktrace" => write!(writer, "\n{value:?}"),
        name => write!(writer, "{name}={value:?}"),
    }
}
