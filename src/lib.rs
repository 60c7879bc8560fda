//! Peripheral facade library.
//!
//! Uniform call surface over the ESP-IDF I2C slave driver and the LEDC
//! PWM controller, with optional per-call outcome logging. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`;
//! on the host the simulated drivers in [`drivers::sim`] stand in for
//! the hardware.
//!
//! ```text
//!   caller ──▶ BusFacade / PwmFacade ──▶ Instrumentation::invoke ──▶ driver
//!                                              │
//!                                              ▼
//!                                   outcome::interpret ──▶ LogSink
//! ```

#![deny(unused_must_use)]

pub mod bus;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fade;
pub mod instrument;
pub mod outcome;
pub mod pwm;
pub mod sink;
pub mod types;

pub use bus::BusFacade;
pub use config::{FacadeConfig, FadeOrdering, InstrumentationMode};
pub use error::{ErrorKind, FacadeError, ResultCode};
pub use instrument::{Direct, Instrumentation, Instrumented, Switchable};
pub use outcome::{OutcomeTable, interpret};
pub use pwm::PwmFacade;
pub use sink::{LogCrateSink, LogSink, Severity};
