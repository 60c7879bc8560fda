//! LEDC PWM facade.
//!
//! Forwards each call to a [`PwmDriver`] through the configured
//! [`Instrumentation`] and keeps one piece of state of its own: the
//! [`FadeSequencer`], which (under [`FadeOrdering::Enforce`]) rejects
//! `set_fade_time` before `install_fade_engine` and `start_fade` before
//! `set_fade_time` with `INVALID_STATE`. The ordering check runs inside
//! the wrapped operation, so a rejected call is logged through the same
//! outcome table as a driver rejection.
//!
//! Duty is staged: `set_duty` writes the duty register, `update_duty`
//! makes it live, and `duty` reports the live value.

use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use crate::config::{FacadeConfig, FadeOrdering};
use crate::drivers::PwmDriver;
use crate::error::{DUTY_ERROR, FREQ_ERROR, FacadeError, ResultCode};
use crate::fade::{FadeSequencer, FadeState};
use crate::instrument::{DefaultPwmInstrumentation, Instrumentation, Switchable};
use crate::outcome::OutcomeTable;
use crate::sink::LogSink;
use crate::types::{
    Channel, ChannelConfig, FadeWait, InterruptType, SpeedMode, TimerBits, TimerConfig, TimerNum,
};

// ── Default preset ────────────────────────────────────────────

pub const DEFAULT_PWM_GPIO: i32 = 16;
pub const DEFAULT_PWM_SPEED_MODE: SpeedMode = SpeedMode::HighSpeed;
pub const DEFAULT_PWM_CHANNEL: Channel = Channel::Channel0;
pub const DEFAULT_PWM_INTR_TYPE: InterruptType = InterruptType::FadeEnd;
pub const DEFAULT_PWM_TIMER: TimerNum = TimerNum::Timer0;
pub const DEFAULT_PWM_DUTY: u32 = 10;
pub const DEFAULT_PWM_TIMER_BITS: TimerBits = TimerBits::BITS_10;
pub const DEFAULT_PWM_FREQ_HZ: u32 = 100;
/// `ESP_INTR_FLAG_LEVEL1`.
pub const DEFAULT_FADE_INTR_FLAGS: i32 = 1 << 1;

// ── Tags and outcome tables ───────────────────────────────────

const TAG_DEFAULT_CHANNEL: &str = "pwm::set_default_channel_params";
const TAG_DEFAULT_TIMER: &str = "pwm::set_default_timer_params";
const TAG_CONFIG_CHANNEL: &str = "pwm::configure_channel";
const TAG_CONFIG_TIMER: &str = "pwm::configure_timer";
const TAG_SET_FREQ: &str = "pwm::set_frequency";
const TAG_GET_FREQ: &str = "pwm::frequency";
const TAG_SET_DUTY: &str = "pwm::set_duty";
const TAG_GET_DUTY: &str = "pwm::duty";
const TAG_UPDATE_DUTY: &str = "pwm::update_duty";
const TAG_INSTALL_FADE: &str = "pwm::install_fade_engine";
const TAG_SET_FADE_TIME: &str = "pwm::set_fade_time";
const TAG_START_FADE: &str = "pwm::start_fade";

const NO_DIVIDER_MSG: &str =
    "Cannot find a proper pre-divider number based on the given frequency and the current bit_num.";

const CONFIG_CHANNEL_OUTCOMES: OutcomeTable<'static> = OutcomeTable::new(&[
    (ResultCode::OK, "PWM channel successfully configured."),
    (ResultCode::INVALID_ARG, "Invalid parameter."),
]);

const CONFIG_TIMER_OUTCOMES: OutcomeTable<'static> = OutcomeTable::new(&[
    (ResultCode::OK, "Successfully configured PWM timer."),
    (ResultCode::INVALID_ARG, "Invalid parameter. Cannot configure timer."),
    (ResultCode::FAIL, NO_DIVIDER_MSG),
]);

const SET_FREQ_OUTCOMES: OutcomeTable<'static> = OutcomeTable::new(&[
    (ResultCode::OK, "Successfully set PWM frequency."),
    (ResultCode::INVALID_ARG, "Parameter error."),
    (ResultCode::FAIL, NO_DIVIDER_MSG),
]);

const SET_DUTY_OUTCOMES: OutcomeTable<'static> = OutcomeTable::new(&[
    (ResultCode::OK, "Successfully set PWM duty cycle."),
    (ResultCode::INVALID_ARG, "Parameter error."),
]);

const UPDATE_DUTY_OUTCOMES: OutcomeTable<'static> = OutcomeTable::new(&[
    (ResultCode::OK, "Successfully updated PWM duty cycle."),
    (ResultCode::INVALID_ARG, "Parameter error."),
]);

const INSTALL_FADE_OUTCOMES: OutcomeTable<'static> = OutcomeTable::new(&[
    (ResultCode::OK, "Successfully installed fade function."),
    (ResultCode::INVALID_STATE, "Fade function already installed."),
]);

const SET_FADE_TIME_OUTCOMES: OutcomeTable<'static> = OutcomeTable::new(&[
    (ResultCode::OK, "Successfully set PWM fade time."),
    (ResultCode::INVALID_ARG, "Parameter error."),
    (ResultCode::INVALID_STATE, "Fade function not installed."),
    (ResultCode::FAIL, "Fade function init error."),
]);

const START_FADE_OUTCOMES: OutcomeTable<'static> = OutcomeTable::new(&[
    (ResultCode::OK, "Successfully started fade."),
    (ResultCode::INVALID_STATE, "Fade function not installed or no fade scheduled."),
    (ResultCode::INVALID_ARG, "Parameter error."),
]);

// ── Facade ────────────────────────────────────────────────────

/// LEDC facade over a [`PwmDriver`].
pub struct PwmFacade<D, I = DefaultPwmInstrumentation> {
    driver: D,
    instr: I,
    fade: FadeSequencer,
    ordering: FadeOrdering,
}

impl<D: PwmDriver> PwmFacade<D> {
    /// Facade with the policy chosen by the `debug-pwm` feature and fade
    /// ordering enforced.
    pub fn new(driver: D) -> Self {
        Self::with_instrumentation(driver, DefaultPwmInstrumentation::default())
    }
}

impl<D: PwmDriver, S: LogSink> PwmFacade<D, Switchable<S>> {
    /// Facade with logging and fade ordering taken from `config`.
    pub fn from_config(driver: D, config: &FacadeConfig, sink: S) -> Self {
        let instr = Switchable::from_mode(config.pwm_instrumentation, sink);
        Self::with_instrumentation(driver, instr).with_fade_ordering(config.fade_ordering)
    }
}

impl<D: PwmDriver, I: Instrumentation> PwmFacade<D, I> {
    pub fn with_instrumentation(driver: D, instr: I) -> Self {
        Self {
            driver,
            instr,
            fade: FadeSequencer::new(),
            ordering: FadeOrdering::Enforce,
        }
    }

    #[must_use]
    pub fn with_fade_ordering(mut self, ordering: FadeOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    // ── Presets ───────────────────────────────────────────────

    /// Fill `params` with the default channel preset. `None` is reported
    /// and leaves nothing modified.
    pub fn set_default_channel_params(&self, params: Option<&mut ChannelConfig>) {
        self.instr
            .note(TAG_DEFAULT_CHANNEL, format_args!("Setting PWM channel defaults."));
        match params {
            Some(p) => {
                p.gpio_num = DEFAULT_PWM_GPIO;
                p.speed_mode = DEFAULT_PWM_SPEED_MODE;
                p.channel = DEFAULT_PWM_CHANNEL;
                p.intr_type = DEFAULT_PWM_INTR_TYPE;
                p.timer_sel = DEFAULT_PWM_TIMER;
                p.duty = DEFAULT_PWM_DUTY;
                self.instr.note(TAG_DEFAULT_CHANNEL, format_args!("{}", p));
            }
            None => self
                .instr
                .diagnose(TAG_DEFAULT_CHANNEL, format_args!("Cannot initialize NULL params.")),
        }
    }

    /// Fill `params` with the default timer preset. `None` is reported
    /// and leaves nothing modified.
    pub fn set_default_timer_params(&self, params: Option<&mut TimerConfig>) {
        self.instr
            .note(TAG_DEFAULT_TIMER, format_args!("Setting PWM timer defaults."));
        match params {
            Some(p) => {
                p.speed_mode = DEFAULT_PWM_SPEED_MODE;
                p.duty_resolution = DEFAULT_PWM_TIMER_BITS;
                p.timer_num = DEFAULT_PWM_TIMER;
                p.freq_hz = DEFAULT_PWM_FREQ_HZ;
                self.instr.note(TAG_DEFAULT_TIMER, format_args!("{}", p));
            }
            None => self
                .instr
                .diagnose(TAG_DEFAULT_TIMER, format_args!("Cannot initialize NULL params.")),
        }
    }

    // ── Timer / channel setup ─────────────────────────────────

    pub fn configure_channel(&mut self, config: &ChannelConfig) -> ResultCode {
        let driver = &mut self.driver;
        let code = self.instr.invoke(
            TAG_CONFIG_CHANNEL,
            format_args!("Configuring PWM channel."),
            &CONFIG_CHANNEL_OUTCOMES,
            || driver.channel_config(config),
        );
        // Reconfiguring drops any fade pending on the channel.
        if code.is_ok() {
            self.fade.channel_reset(config.speed_mode, config.channel);
        }
        code
    }

    pub fn configure_timer(&mut self, config: &TimerConfig) -> ResultCode {
        let driver = &mut self.driver;
        self.instr.invoke(
            TAG_CONFIG_TIMER,
            format_args!("Configuring PWM timer."),
            &CONFIG_TIMER_OUTCOMES,
            || driver.timer_config(config),
        )
    }

    // ── Frequency ─────────────────────────────────────────────

    /// Fails with `FAIL` when no pre-divider fits `freq_hz` at the timer's
    /// current resolution.
    pub fn set_frequency(&mut self, mode: SpeedMode, timer: TimerNum, freq_hz: u32) -> ResultCode {
        let driver = &mut self.driver;
        self.instr.invoke(
            TAG_SET_FREQ,
            format_args!("speed_mode = {:?}, timer = {:?}, freq_hz = {}", mode, timer, freq_hz),
            &SET_FREQ_OUTCOMES,
            || driver.set_freq(mode, timer, freq_hz),
        )
    }

    /// Current timer frequency, [`FREQ_ERROR`] (0) on failure.
    pub fn frequency(&self, mode: SpeedMode, timer: TimerNum) -> u32 {
        let freq = self.driver.get_freq(mode, timer);
        if freq == FREQ_ERROR {
            self.instr
                .diagnose(TAG_GET_FREQ, format_args!("ERROR retrieving frequency."));
        }
        freq
    }

    // ── Duty ──────────────────────────────────────────────────

    /// Stage a duty value; it takes effect on [`Self::update_duty`].
    pub fn set_duty(&mut self, mode: SpeedMode, channel: Channel, duty: u32) -> ResultCode {
        let driver = &mut self.driver;
        self.instr.invoke(
            TAG_SET_DUTY,
            format_args!("speed_mode = {:?}, channel = {:?}, duty = {}", mode, channel, duty),
            &SET_DUTY_OUTCOMES,
            || driver.set_duty(mode, channel, duty),
        )
    }

    /// Live duty of `channel`, [`DUTY_ERROR`] (-1) on failure.
    pub fn duty(&self, mode: SpeedMode, channel: Channel) -> i32 {
        let duty = self.driver.get_duty(mode, channel);
        if duty == DUTY_ERROR {
            self.instr
                .diagnose(TAG_GET_DUTY, format_args!("ERROR retrieving duty cycle."));
        }
        duty
    }

    /// Commit the staged duty to hardware.
    pub fn update_duty(&mut self, mode: SpeedMode, channel: Channel) -> ResultCode {
        let driver = &mut self.driver;
        self.instr.invoke(
            TAG_UPDATE_DUTY,
            format_args!("Updating PWM duty cycle: speed_mode = {:?}, channel = {:?}", mode, channel),
            &UPDATE_DUTY_OUTCOMES,
            || driver.update_duty(mode, channel),
        )
    }

    // ── Fades ─────────────────────────────────────────────────

    /// One-time activation of the fade engine. An engine that was already
    /// installed outside this facade is adopted.
    pub fn install_fade_engine(&mut self, intr_alloc_flags: i32) -> ResultCode {
        let enforce = self.ordering == FadeOrdering::Enforce;
        let fade = &self.fade;
        let driver = &mut self.driver;
        let code = self.instr.invoke(
            TAG_INSTALL_FADE,
            format_args!("Installing fade function."),
            &INSTALL_FADE_OUTCOMES,
            || {
                if enforce {
                    if let Err(e) = fade.check_install() {
                        return e.code();
                    }
                }
                driver.fade_func_install(intr_alloc_flags)
            },
        );
        // INVALID_STATE from the driver means someone else installed it.
        if code.is_ok() || code == ResultCode::INVALID_STATE {
            self.fade.installed();
        }
        code
    }

    /// Schedule a fade of `channel` to `target_duty` over `max_fade_time_ms`.
    pub fn set_fade_time(
        &mut self,
        mode: SpeedMode,
        channel: Channel,
        target_duty: u32,
        max_fade_time_ms: i32,
    ) -> ResultCode {
        let enforce = self.ordering == FadeOrdering::Enforce;
        let fade = &self.fade;
        let driver = &mut self.driver;
        let code = self.instr.invoke(
            TAG_SET_FADE_TIME,
            format_args!("Setting PWM fade time."),
            &SET_FADE_TIME_OUTCOMES,
            || {
                if enforce {
                    if let Err(e) = fade.check_schedule(mode, channel) {
                        return e.code();
                    }
                }
                driver.set_fade_with_time(mode, channel, target_duty, max_fade_time_ms)
            },
        );
        if code.is_ok() {
            self.fade.scheduled(mode, channel);
        }
        code
    }

    /// Start the scheduled fade. With [`FadeWait::WaitDone`] the call
    /// returns once the fade has finished.
    pub fn start_fade(&mut self, mode: SpeedMode, channel: Channel, wait: FadeWait) -> ResultCode {
        let enforce = self.ordering == FadeOrdering::Enforce;
        let fade = &self.fade;
        let driver = &mut self.driver;
        let code = self.instr.invoke(
            TAG_START_FADE,
            format_args!("Starting PWM fade."),
            &START_FADE_OUTCOMES,
            || {
                if enforce {
                    if let Err(e) = fade.check_start(mode, channel) {
                        return e.code();
                    }
                }
                driver.fade_start(mode, channel, wait)
            },
        );
        if code.is_ok() {
            self.fade.started(mode, channel, wait);
        }
        code
    }

    /// Record the fade-end interrupt for a non-blocking fade.
    pub fn fade_completed(&mut self, mode: SpeedMode, channel: Channel) {
        self.fade.completed(mode, channel);
    }

    pub fn fade_state(&self, mode: SpeedMode, channel: Channel) -> FadeState {
        self.fade.state(mode, channel)
    }

    // ── Accessors ─────────────────────────────────────────────

    /// Borrow one channel as an `embedded_hal` PWM output.
    pub fn channel(
        &mut self,
        mode: SpeedMode,
        channel: Channel,
        resolution: TimerBits,
    ) -> PwmChannel<'_, D, I> {
        PwmChannel {
            facade: self,
            mode,
            channel,
            resolution,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn instrumentation(&self) -> &I {
        &self.instr
    }

    pub fn fade_ordering(&self) -> FadeOrdering {
        self.ordering
    }
}

// ── embedded-hal adapter ──────────────────────────────────────

/// A single LEDC channel as [`SetDutyCycle`]. Each write stages and
/// commits the duty in one step.
pub struct PwmChannel<'a, D, I> {
    facade: &'a mut PwmFacade<D, I>,
    mode: SpeedMode,
    channel: Channel,
    resolution: TimerBits,
}

impl<D, I> ErrorType for PwmChannel<'_, D, I> {
    type Error = FacadeError;
}

impl<D: PwmDriver, I: Instrumentation> SetDutyCycle for PwmChannel<'_, D, I> {
    fn max_duty_cycle(&self) -> u16 {
        (self.resolution.max_duty() - 1).min(u32::from(u16::MAX)) as u16
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.facade
            .set_duty(self.mode, self.channel, u32::from(duty))
            .check()?;
        self.facade.update_duty(self.mode, self.channel).check()
    }
}
