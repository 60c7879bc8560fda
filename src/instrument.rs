//! Call-outcome wrapper.
//!
//! [`Instrumentation`] is the single seam that decides whether a facade
//! call is logged. [`Direct`] runs the driver primitive and nothing else;
//! [`Instrumented`] logs the intent, runs the primitive, and hands the
//! result code to [`outcome::interpret`](crate::outcome::interpret).
//! Either way the caller gets the driver's code back untouched.
//!
//! The operation is any `FnOnce() -> ResultCode`, so a closure that
//! captures the primitive's argument list covers every driver shape:
//!
//! ```ignore
//! instr.invoke(TAG, format_args!("Configuring I2C params."), &TABLE, || {
//!     driver.param_config(port, cfg)
//! })
//! ```

use core::fmt;

use crate::config::InstrumentationMode;
use crate::error::{BYTES_FAIL, ResultCode};
use crate::outcome::{OutcomeTable, interpret};
use crate::sink::{LogCrateSink, LogSink, Severity};

/// Policy applied by a facade around every driver primitive.
pub trait Instrumentation {
    /// Run `op` and return its code unchanged, reporting `intent` before
    /// and the outcome (looked up in `table`) after.
    fn invoke<F>(
        &self,
        tag: &str,
        intent: fmt::Arguments<'_>,
        table: &OutcomeTable<'_>,
        op: F,
    ) -> ResultCode
    where
        F: FnOnce() -> ResultCode;

    /// Report a byte-count result; `count == BYTES_FAIL` is a parameter error.
    fn report_count(&self, tag: &str, verb: &str, count: i32);

    /// Plain informational entry.
    fn note(&self, tag: &str, message: fmt::Arguments<'_>);

    /// Plain error entry.
    fn diagnose(&self, tag: &str, message: fmt::Arguments<'_>);

    fn is_enabled(&self) -> bool;
}

// ── Direct ────────────────────────────────────────────────────

/// Uninstrumented path: zero logging, zero added work.
#[derive(Debug, Default, Clone, Copy)]
pub struct Direct;

impl Instrumentation for Direct {
    #[inline]
    fn invoke<F>(&self, _: &str, _: fmt::Arguments<'_>, _: &OutcomeTable<'_>, op: F) -> ResultCode
    where
        F: FnOnce() -> ResultCode,
    {
        op()
    }

    #[inline]
    fn report_count(&self, _: &str, _: &str, _: i32) {}

    #[inline]
    fn note(&self, _: &str, _: fmt::Arguments<'_>) {}

    #[inline]
    fn diagnose(&self, _: &str, _: fmt::Arguments<'_>) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

// ── Instrumented ──────────────────────────────────────────────

/// Instrumented path: every call logs its intent and its outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct Instrumented<S = LogCrateSink> {
    sink: S,
}

impl<S: LogSink> Instrumented<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: LogSink> Instrumentation for Instrumented<S> {
    fn invoke<F>(
        &self,
        tag: &str,
        intent: fmt::Arguments<'_>,
        table: &OutcomeTable<'_>,
        op: F,
    ) -> ResultCode
    where
        F: FnOnce() -> ResultCode,
    {
        self.sink.emit(Severity::Info, tag, intent);
        let code = op();
        interpret(&self.sink, tag, code, table);
        code
    }

    fn report_count(&self, tag: &str, verb: &str, count: i32) {
        if count == BYTES_FAIL {
            self.sink.emit(Severity::Error, tag, format_args!("Parameter error."));
        } else {
            self.sink
                .emit(Severity::Info, tag, format_args!("{} {} bytes.", verb, count));
        }
    }

    fn note(&self, tag: &str, message: fmt::Arguments<'_>) {
        self.sink.emit(Severity::Info, tag, message);
    }

    fn diagnose(&self, tag: &str, message: fmt::Arguments<'_>) {
        self.sink.emit(Severity::Error, tag, message);
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

// ── Run-time selection ────────────────────────────────────────

/// Either policy, chosen at start-up from an [`InstrumentationMode`].
#[derive(Debug, Clone, Copy)]
pub enum Switchable<S = LogCrateSink> {
    Direct(Direct),
    Instrumented(Instrumented<S>),
}

impl<S: LogSink> Switchable<S> {
    pub fn from_mode(mode: InstrumentationMode, sink: S) -> Self {
        match mode {
            InstrumentationMode::Off => Self::Direct(Direct),
            InstrumentationMode::On => Self::Instrumented(Instrumented::new(sink)),
        }
    }
}

impl<S: LogSink> Instrumentation for Switchable<S> {
    fn invoke<F>(
        &self,
        tag: &str,
        intent: fmt::Arguments<'_>,
        table: &OutcomeTable<'_>,
        op: F,
    ) -> ResultCode
    where
        F: FnOnce() -> ResultCode,
    {
        match self {
            Self::Direct(d) => d.invoke(tag, intent, table, op),
            Self::Instrumented(i) => i.invoke(tag, intent, table, op),
        }
    }

    fn report_count(&self, tag: &str, verb: &str, count: i32) {
        match self {
            Self::Direct(d) => d.report_count(tag, verb, count),
            Self::Instrumented(i) => i.report_count(tag, verb, count),
        }
    }

    fn note(&self, tag: &str, message: fmt::Arguments<'_>) {
        match self {
            Self::Direct(d) => d.note(tag, message),
            Self::Instrumented(i) => i.note(tag, message),
        }
    }

    fn diagnose(&self, tag: &str, message: fmt::Arguments<'_>) {
        match self {
            Self::Direct(d) => d.diagnose(tag, message),
            Self::Instrumented(i) => i.diagnose(tag, message),
        }
    }

    fn is_enabled(&self) -> bool {
        matches!(self, Self::Instrumented(_))
    }
}

// ── Compile-time defaults ─────────────────────────────────────

/// Bus facade policy selected by the `debug-bus` feature.
#[cfg(feature = "debug-bus")]
pub type DefaultBusInstrumentation = Instrumented<LogCrateSink>;
#[cfg(not(feature = "debug-bus"))]
pub type DefaultBusInstrumentation = Direct;

/// PWM facade policy selected by the `debug-pwm` feature.
#[cfg(feature = "debug-pwm")]
pub type DefaultPwmInstrumentation = Instrumented<LogCrateSink>;
#[cfg(not(feature = "debug-pwm"))]
pub type DefaultPwmInstrumentation = Direct;
