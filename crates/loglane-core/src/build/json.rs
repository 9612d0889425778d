//! One JSON object per line.
//!
//! Key order: `time`, `level`, `target`, `logger`, `msg`, `source`,
//! `stacktrace`, event fields and call attributes in insertion order, then
//! `spans` (root first). A field that would shadow one of the record's own
//! keys is written as `attr.<key>` instead.

use crate::logger::ATTRS_FIELD;
use serde_json::{Map, Value};
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

const RESERVED: [&str; 8] = [
    "time",
    "level",
    "target",
    "logger",
    "msg",
    "source",
    "stacktrace",
    "spans",
];

pub(crate) struct JsonLines {
    add_source: bool,
    name: Option<String>,
}

impl JsonLines {
    pub(crate) fn new(add_source: bool, name: Option<String>) -> Self {
        Self { add_source, name }
    }
}

impl<S, N> FormatEvent<S, N> for JsonLines
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
        let mut record = Map::new();

        let mut time = String::new();
        if SystemTime.format_time(&mut Writer::new(&mut time)).is_ok() {
            record.insert("time".into(), Value::String(time));
        }
        record.insert("level".into(), meta.level().as_str().into());
        record.insert("target".into(), meta.target().into());
        if let Some(name) = &self.name {
            record.insert("logger".into(), name.as_str().into());
        }

        let mut fields = Fields::default();
        event.record(&mut fields);

        record.insert("msg".into(), fields.message.unwrap_or_default().into());
        if self.add_source {
            // Facade calls carry the caller's location; direct events use metadata.
            let source = fields.source.or_else(|| {
                meta.file()
                    .map(|file| format!("{file}:{}", meta.line().unwrap_or(0)))
            });
            if let Some(source) = source {
                record.insert("source".into(), source.into());
            }
        }
        if let Some(stacktrace) = fields.stacktrace {
            record.insert("stacktrace".into(), stacktrace.into());
        }
        for (key, value) in fields.values {
            if RESERVED.contains(&key.as_str()) {
                record.insert(format!("attr.{key}"), value);
            } else {
                record.insert(key, value);
            }
        }

        if let Some(scope) = ctx.event_scope() {
            let spans: Vec<Value> = scope
                .from_root()
                .map(|span| Value::String(span.name().to_owned()))
                .collect();
            if !spans.is_empty() {
                record.insert("spans".into(), Value::Array(spans));
            }
        }

        let line = serde_json::to_string(&record).map_err(|_| fmt::Error)?;
        writeln!(writer, "{line}")
    }
}

#[derive(Default)]
struct Fields {
    message: Option<String>,
    source: Option<String>,
    stacktrace: Option<String>,
    values: Map<String, Value>,
}

impl Fields {
    fn insert(&mut self, field: &Field, value: Value) {
        self.values.insert(field.name().to_owned(), value);
    }
}

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = Some(value.to_owned()),
            _ => self.insert(field, value.into()),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        match field.name() {
            "message" => self.message = Some(rendered),
            "source" => self.source = Some(rendered),
            "stacktrace" => self.stacktrace = Some(rendered),
            ATTRS_FIELD => match serde_json::from_str::<Map<String, Value>>(&rendered) {
                Ok(attrs) => self.values.extend(attrs),
                Err(_) => self.insert(field, rendered.into()),
            },
            _ => self.insert(field, rendered.into()),
        }
    }
}
