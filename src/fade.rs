//! Fade sequencing.
//!
//! ```text
//!   Unconfigured ──install──▶ FadeEngineInstalled ──schedule──▶ FadeScheduled
//!                                     ▲                          │      ▲
//!                                     │                start(NoWait)    │ schedule
//!                              start(WaitDone)               ▼      │
//!                                     └──────── Idle ◀──isr── Fading ─┘
//! ```
//!
//! The fade engine is installed once for the whole controller; the
//! scheduled/fading/idle part is tracked per speed mode and channel.
//! The PWM facade checks a call here before it reaches the driver and
//! advances the state only after the driver reports success.

use core::fmt;

use heapless::LinearMap;
use log::warn;

use crate::error::ResultCode;
use crate::types::{Channel, FadeWait, SpeedMode};

/// Every (speed mode, channel) pair the controller has.
const FADE_SLOTS: usize = SpeedMode::COUNT * Channel::COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    Unconfigured,
    FadeEngineInstalled,
    FadeScheduled,
    Fading,
    Idle,
}

/// A fade call made out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeOrderError {
    EngineAlreadyInstalled,
    EngineNotInstalled,
    NothingScheduled,
}

impl FadeOrderError {
    /// Every ordering violation surfaces as `INVALID_STATE`.
    pub fn code(self) -> ResultCode {
        ResultCode::INVALID_STATE
    }
}

impl fmt::Display for FadeOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EngineAlreadyInstalled => write!(f, "fade engine already installed"),
            Self::EngineNotInstalled => write!(f, "fade engine not installed"),
            Self::NothingScheduled => write!(f, "no fade scheduled on this channel"),
        }
    }
}

/// Tracks [`FadeState`] for every channel. Stack-allocated, no heap.
#[derive(Debug, Default)]
pub struct FadeSequencer {
    engine_installed: bool,
    channels: LinearMap<(SpeedMode, Channel), FadeState, FADE_SLOTS>,
}

impl FadeSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine_installed(&self) -> bool {
        self.engine_installed
    }

    pub fn state(&self, mode: SpeedMode, channel: Channel) -> FadeState {
        if !self.engine_installed {
            return FadeState::Unconfigured;
        }
        self.channels
            .get(&(mode, channel))
            .copied()
            .unwrap_or(FadeState::FadeEngineInstalled)
    }

    // ── Guards ────────────────────────────────────────────────

    pub fn check_install(&self) -> Result<(), FadeOrderError> {
        if self.engine_installed {
            Err(FadeOrderError::EngineAlreadyInstalled)
        } else {
            Ok(())
        }
    }

    /// Scheduling is allowed from any state once the engine is installed;
    /// scheduling over a pending or running fade replaces it.
    pub fn check_schedule(&self, _mode: SpeedMode, _channel: Channel) -> Result<(), FadeOrderError> {
        if self.engine_installed {
            Ok(())
        } else {
            Err(FadeOrderError::EngineNotInstalled)
        }
    }

    pub fn check_start(&self, mode: SpeedMode, channel: Channel) -> Result<(), FadeOrderError> {
        match self.state(mode, channel) {
            FadeState::Unconfigured => Err(FadeOrderError::EngineNotInstalled),
            FadeState::FadeScheduled => Ok(()),
            _ => Err(FadeOrderError::NothingScheduled),
        }
    }

    // ── Transitions (call after the driver returned OK) ───────

    pub fn installed(&mut self) {
        self.engine_installed = true;
    }

    pub fn scheduled(&mut self, mode: SpeedMode, channel: Channel) {
        self.set(mode, channel, FadeState::FadeScheduled);
    }

    /// A blocking start has already finished; a non-blocking one is still
    /// running until the fade-end interrupt.
    pub fn started(&mut self, mode: SpeedMode, channel: Channel, wait: FadeWait) {
        let next = match wait {
            FadeWait::WaitDone => FadeState::Idle,
            FadeWait::NoWait => FadeState::Fading,
        };
        self.set(mode, channel, next);
    }

    /// The channel was reconfigured; whatever was scheduled on it is gone.
    pub fn channel_reset(&mut self, mode: SpeedMode, channel: Channel) {
        self.channels.remove(&(mode, channel));
    }

    /// Fade-end notification for a non-blocking fade.
    pub fn completed(&mut self, mode: SpeedMode, channel: Channel) {
        if self.state(mode, channel) == FadeState::Fading {
            self.set(mode, channel, FadeState::Idle);
        }
    }

    fn set(&mut self, mode: SpeedMode, channel: Channel, state: FadeState) {
        if self.channels.insert((mode, channel), state).is_err() {
            warn!("fade: no slot for {:?}/{:?}", mode, channel);
        }
    }
}
