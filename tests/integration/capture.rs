//! Capturing `log` backend for integration tests.
//!
//! Installs itself once as the global logger and records every record
//! it sees. Tests run in parallel, so each test filters by a log target
//! (facade tag) only it uses.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub level: Level,
    pub target: String,
    pub message: String,
}

struct CaptureLogger {
    records: Mutex<Vec<Captured>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut records) = self.records.lock() {
            records.push(Captured {
                level: record.level(),
                target: record.target().to_owned(),
                message: record.args().to_string(),
            });
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

/// Install the capturing logger (idempotent).
pub fn install() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

/// Every record logged so far under `target`, oldest first.
pub fn records_for(target: &str) -> Vec<Captured> {
    LOGGER
        .records
        .lock()
        .map(|r| r.iter().filter(|c| c.target == target).cloned().collect())
        .unwrap_or_default()
}

/// Every record whose target starts with `prefix`.
pub fn records_with_prefix(prefix: &str) -> Vec<Captured> {
    LOGGER
        .records
        .lock()
        .map(|r| {
            r.iter()
                .filter(|c| c.target.starts_with(prefix))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}
