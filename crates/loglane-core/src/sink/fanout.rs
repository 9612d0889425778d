//! Multi-destination writer.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

/// One opened sink. Writes to it are serialized by its own lock.
pub(crate) struct Destination {
    name: String,
    writer: Mutex<Box<dyn Write + Send>>,
    failed: AtomicBool,
}

impl Destination {
    pub(crate) fn new(name: impl Into<String>, writer: impl Write + Send + 'static) -> Self {
        Self {
            name: name.into(),
            writer: Mutex::new(Box::new(writer)),
            failed: AtomicBool::new(false),
        }
    }

    fn deliver(&self, buf: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(buf)?;
        writer.flush()
    }

    fn flush(&self) -> io::Result<()> {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }

    // The logger cannot log its own failures; stderr is the only channel left.
    fn report(&self, err: &io::Error) {
        if !self.failed.swap(true, Ordering::Relaxed) {
            eprintln!("loglane: write to {} failed: {err}", self.name);
        }
    }
}

/// Delivers every record to all destinations.
///
/// Each destination is written independently. A write fails only when every
/// destination failed; partial failures are reported once per destination on
/// standard error and otherwise ignored.
#[derive(Clone)]
pub struct FanOut {
    destinations: Arc<[Destination]>,
}

impl FanOut {
    pub(crate) fn new(destinations: Vec<Destination>) -> Self {
        Self {
            destinations: destinations.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

impl fmt::Debug for FanOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.destinations.iter().map(|d| &d.name))
            .finish()
    }
}

impl<'a> MakeWriter<'a> for FanOut {
    type Writer = FanOutWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        FanOutWriter {
            destinations: &self.destinations,
        }
    }
}

/// Per-record handle produced by [`FanOut`].
pub struct FanOutWriter<'a> {
    destinations: &'a [Destination],
}

impl FanOutWriter<'_> {
    fn each(&self, op: impl Fn(&Destination) -> io::Result<()>) -> io::Result<()> {
        let mut delivered = false;
        let mut first_err = None;
        for destination in self.destinations {
            match op(destination) {
                Ok(()) => delivered = true,
                Err(err) => {
                    destination.report(&err);
                    first_err.get_or_insert(err);
                }
            }
        }
        match first_err {
            Some(err) if !delivered => Err(err),
            _ => Ok(()),
        }
    }
}

impl Write for FanOutWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.each(|destination| destination.deliver(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.each(Destination::flush)
    }
}
