//! Facade configuration.
//!
//! The instrumentation switch exists twice: as the `debug-bus` /
//! `debug-pwm` Cargo features (compile-time defaults) and as data in
//! [`FacadeConfig`], so firmware can pick a policy at start-up without
//! rebuilding.

use serde::{Deserialize, Serialize};

/// Whether a facade logs intent and outcome of each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentationMode {
    Off,
    On,
}

impl InstrumentationMode {
    pub const fn from_flag(enabled: bool) -> Self {
        if enabled { Self::On } else { Self::Off }
    }
}

/// Who rejects out-of-order fade calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadeOrdering {
    /// The PWM facade tracks fade state and returns `INVALID_STATE`
    /// before the driver is touched.
    Enforce,
    /// Calls go straight to the driver, which may or may not reject them.
    DriverOnly,
}

/// Composition-time settings for both facades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeConfig {
    /// I2C facade logging.
    pub bus_instrumentation: InstrumentationMode,
    /// LEDC facade logging.
    pub pwm_instrumentation: InstrumentationMode,
    /// Fade sequencing policy for the LEDC facade.
    pub fade_ordering: FadeOrdering,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            bus_instrumentation: InstrumentationMode::from_flag(cfg!(feature = "debug-bus")),
            pwm_instrumentation: InstrumentationMode::from_flag(cfg!(feature = "debug-pwm")),
            fade_ordering: FadeOrdering::Enforce,
        }
    }
}

impl FacadeConfig {
    /// Both facades instrumented, fade ordering enforced.
    pub fn verbose() -> Self {
        Self {
            bus_instrumentation: InstrumentationMode::On,
            pwm_instrumentation: InstrumentationMode::On,
            fade_ordering: FadeOrdering::Enforce,
        }
    }
}
