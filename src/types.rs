//! Peripheral handles and configuration structs.
//!
//! Handles identify *which* hardware instance a call targets. The
//! facades pass them through untouched; only the driver interprets them.

use core::fmt;

// ── I2C ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum I2cPort {
    #[default]
    Port0,
    Port1,
}

impl I2cPort {
    pub const COUNT: usize = 2;

    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusMode {
    #[default]
    Slave,
    Master,
}

/// Bus timing and role parameters for `BusFacade::configure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BusConfig {
    pub mode: BusMode,
    pub sda_io: i32,
    pub scl_io: i32,
    pub sda_pullup: bool,
    pub scl_pullup: bool,
    /// SCL clock in master mode; ignored in slave mode.
    pub master_clk_hz: u32,
    /// Own address in slave mode; ignored in master mode.
    pub slave_addr: u16,
    pub addr_10bit: bool,
}

impl BusConfig {
    /// Slave on `addr` (7-bit) with internal pull-ups enabled.
    pub fn slave(addr: u16, sda_io: i32, scl_io: i32) -> Self {
        Self {
            mode: BusMode::Slave,
            sda_io,
            scl_io,
            sda_pullup: true,
            scl_pullup: true,
            master_clk_hz: 0,
            slave_addr: addr,
            addr_10bit: false,
        }
    }

    /// Master clocking SCL at `clk_hz` with internal pull-ups enabled.
    pub fn master(clk_hz: u32, sda_io: i32, scl_io: i32) -> Self {
        Self {
            mode: BusMode::Master,
            sda_io,
            scl_io,
            sda_pullup: true,
            scl_pullup: true,
            master_clk_hz: clk_hz,
            slave_addr: 0,
            addr_10bit: false,
        }
    }
}

// ── LEDC ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpeedMode {
    /// Only present on the original ESP32.
    #[default]
    HighSpeed,
    LowSpeed,
}

impl SpeedMode {
    pub const COUNT: usize = 2;

    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimerNum {
    #[default]
    Timer0,
    Timer1,
    Timer2,
    Timer3,
}

impl TimerNum {
    pub const COUNT: usize = 4;

    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Channel {
    #[default]
    Channel0,
    Channel1,
    Channel2,
    Channel3,
    Channel4,
    Channel5,
    Channel6,
    Channel7,
}

impl Channel {
    pub const COUNT: usize = 8;

    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterruptType {
    #[default]
    Disabled,
    /// Interrupt when a hardware fade completes.
    FadeEnd,
}

/// Whether `start_fade` blocks until the fade completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeWait {
    NoWait,
    WaitDone,
}

/// Duty resolution of a LEDC timer, 1..=20 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerBits(u8);

impl TimerBits {
    pub const MAX: u8 = 20;
    pub const BITS_8: Self = Self(8);
    pub const BITS_10: Self = Self(10);
    pub const BITS_13: Self = Self(13);

    pub const fn new(bits: u8) -> Option<Self> {
        if bits >= 1 && bits <= Self::MAX {
            Some(Self(bits))
        } else {
            None
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Largest duty value accepted for this resolution (100 % on).
    pub const fn max_duty(self) -> u32 {
        1 << self.0
    }
}

impl Default for TimerBits {
    fn default() -> Self {
        Self::BITS_10
    }
}

/// One LEDC channel: pin, timer binding and initial duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelConfig {
    pub gpio_num: i32,
    pub speed_mode: SpeedMode,
    pub channel: Channel,
    pub intr_type: InterruptType,
    pub timer_sel: TimerNum,
    pub duty: u32,
    pub hpoint: i32,
}

/// One LEDC timer: resolution and output frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerConfig {
    pub speed_mode: SpeedMode,
    pub duty_resolution: TimerBits,
    pub timer_num: TimerNum,
    pub freq_hz: u32,
}

impl fmt::Display for ChannelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChannelConfig {{ gpio_num = {}, speed_mode = {:?}, channel = {:?}, \
             intr_type = {:?}, timer_sel = {:?}, duty = {}, hpoint = {} }}",
            self.gpio_num,
            self.speed_mode,
            self.channel,
            self.intr_type,
            self.timer_sel,
            self.duty,
            self.hpoint,
        )
    }
}

impl fmt::Display for TimerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TimerConfig {{ speed_mode = {:?}, bit_num = {}, timer_num = {:?}, freq_hz = {} }}",
            self.speed_mode,
            self.duty_resolution.bits(),
            self.timer_num,
            self.freq_hz,
        )
    }
}
