//! Logging boundary.
//!
//! The facades report through a [`LogSink`], which accepts a severity,
//! a tag and a formatted message. [`LogCrateSink`] forwards to the `log`
//! facade using the tag as the log target, which on the device maps onto
//! ESP-IDF's per-tag log levels. [`MemorySink`] keeps entries in memory
//! for host-side inspection.

use core::cell::RefCell;
use core::fmt;

/// Severity of a facade log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    pub fn level(self) -> log::Level {
        match self {
            Self::Info => log::Level::Info,
            Self::Error => log::Level::Error,
        }
    }
}

/// Destination for facade log entries. Emission is best-effort: a sink
/// has no way to report its own failure back into the facade.
pub trait LogSink {
    fn emit(&self, severity: Severity, tag: &str, message: fmt::Arguments<'_>);
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn emit(&self, severity: Severity, tag: &str, message: fmt::Arguments<'_>) {
        (**self).emit(severity, tag, message);
    }
}

/// Production sink: routes entries through the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn emit(&self, severity: Severity, tag: &str, message: fmt::Arguments<'_>) {
        log::log!(target: tag, severity.level(), "{}", message);
    }
}

// ── In-memory sink ────────────────────────────────────────────

/// One captured log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub severity: Severity,
    pub tag: String,
    pub message: String,
}

/// Sink that records every entry. Single-threaded, like the facades.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: RefCell<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    pub fn last(&self) -> Option<LogEntry> {
        self.entries.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.severity == severity)
            .count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl LogSink for MemorySink {
    fn emit(&self, severity: Severity, tag: &str, message: fmt::Arguments<'_>) {
        self.entries.borrow_mut().push(LogEntry {
            severity,
            tag: tag.to_owned(),
            message: message.to_string(),
        });
    }
}
