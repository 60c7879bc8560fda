//! Outcome interpreter.
//!
//! Maps a driver [`ResultCode`] to a severity and a human-readable
//! message using a per-call-site [`OutcomeTable`], then reports it
//! through the [`LogSink`]. A table only lists the codes its call can
//! legitimately produce; anything else is reported as a call site that
//! is out of sync with the driver.

use crate::error::ResultCode;
use crate::sink::{LogSink, Severity};

/// Diagnostic emitted when a code is missing from the call site's table.
pub const UNRECOGNISED_CODE_MSG: &str = "WARNING: Could not identify error code.";

/// Code → message mapping for a single call site.
///
/// Tables are usually `const` items next to the facade method that
/// uses them, so building one costs nothing at run time.
#[derive(Debug, Clone, Copy)]
pub struct OutcomeTable<'a> {
    entries: &'a [(ResultCode, &'a str)],
}

impl<'a> OutcomeTable<'a> {
    pub const fn new(entries: &'a [(ResultCode, &'a str)]) -> Self {
        Self { entries }
    }

    /// Message for `code`. The first entry wins if a code is listed twice.
    pub fn message(&self, code: ResultCode) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, msg)| *msg)
    }

    pub fn contains(&self, code: ResultCode) -> bool {
        self.message(code).is_some()
    }

    pub fn codes(&self) -> impl Iterator<Item = ResultCode> + 'a {
        self.entries.iter().map(|(c, _)| *c)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Report `code` for the operation named `tag`.
///
/// Emits exactly one entry: Info for [`ResultCode::OK`], Error for any
/// other listed code, Error with [`UNRECOGNISED_CODE_MSG`] for a code the
/// table does not list.
pub fn interpret<S: LogSink + ?Sized>(
    sink: &S,
    tag: &str,
    code: ResultCode,
    table: &OutcomeTable<'_>,
) {
    match table.message(code) {
        Some(msg) if code.is_ok() => sink.emit(Severity::Info, tag, format_args!("{}", msg)),
        Some(msg) => sink.emit(Severity::Error, tag, format_args!("{}", msg)),
        None => sink.emit(
            Severity::Error,
            tag,
            format_args!("{} (code={})", UNRECOGNISED_CODE_MSG, code),
        ),
    }
}
