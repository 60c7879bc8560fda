//! In-memory I2C and LEDC drivers for host builds and tests.
//!
//! Tracks the same state the hardware would and applies the vendor
//! driver's argument checks, but never blocks: with no bus master or
//! fade ISR on the host, a read on an empty buffer returns at once and a
//! started fade lands on its target duty immediately.

use std::collections::VecDeque;

use log::debug;

use crate::drivers::{BusDriver, PwmDriver};
use crate::error::{BYTES_FAIL, DUTY_ERROR, FREQ_ERROR, ResultCode};
use crate::types::{
    BusConfig, BusMode, Channel, ChannelConfig, FadeWait, I2cPort, SpeedMode, TimerBits,
    TimerConfig, TimerNum,
};

/// Highest GPIO number routable through the matrix (ESP32-S3).
pub const SIM_GPIO_MAX: i32 = 48;

/// Slave-mode ring buffers must be larger than this (vendor limit).
pub const SLAVE_MIN_BUF_LEN: usize = 100;

/// LEDC source clock (APB).
pub const LEDC_APB_CLK_HZ: u64 = 80_000_000;

/// Largest timer divider, 10.8 fixed point.
pub const LEDC_DIV_NUM_MAX: u64 = 0x3_FFFF;

// ── I2C ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct PortState {
    config: Option<BusConfig>,
    installed: Option<BusMode>,
    rx_cap: usize,
    tx_cap: usize,
    rx: VecDeque<u8>,
    tx: VecDeque<u8>,
}

/// Simulated I2C controller. The "bus master" side is driven by tests
/// through [`SimBus::inject_rx`] and [`SimBus::drain_tx`].
#[derive(Debug, Default)]
pub struct SimBus {
    ports: [PortState; I2cPort::COUNT],
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self, port: I2cPort) -> Option<BusConfig> {
        self.ports[port.index()].config
    }

    pub fn is_installed(&self, port: I2cPort) -> bool {
        self.ports[port.index()].installed.is_some()
    }

    /// Master writes to us: queue bytes into the receive buffer.
    /// Returns how many fit.
    pub fn inject_rx(&mut self, port: I2cPort, bytes: &[u8]) -> usize {
        let p = &mut self.ports[port.index()];
        if p.installed != Some(BusMode::Slave) {
            return 0;
        }
        let room = p.rx_cap.saturating_sub(p.rx.len());
        let n = room.min(bytes.len());
        p.rx.extend(&bytes[..n]);
        n
    }

    /// Master reads from us: take everything queued for transmission.
    pub fn drain_tx(&mut self, port: I2cPort) -> Vec<u8> {
        self.ports[port.index()].tx.drain(..).collect()
    }

    pub fn rx_pending(&self, port: I2cPort) -> usize {
        self.ports[port.index()].rx.len()
    }

    fn valid_config(config: &BusConfig) -> bool {
        let pin_ok = |io: i32| (0..=SIM_GPIO_MAX).contains(&io);
        if !pin_ok(config.sda_io) || !pin_ok(config.scl_io) || config.sda_io == config.scl_io {
            return false;
        }
        match config.mode {
            BusMode::Master => config.master_clk_hz > 0,
            BusMode::Slave if config.addr_10bit => config.slave_addr <= 0x3FF,
            BusMode::Slave => config.slave_addr <= 0x7F,
        }
    }
}

impl BusDriver for SimBus {
    fn param_config(&mut self, port: I2cPort, config: &BusConfig) -> ResultCode {
        if !Self::valid_config(config) {
            return ResultCode::INVALID_ARG;
        }
        self.ports[port.index()].config = Some(*config);
        ResultCode::OK
    }

    fn driver_install(
        &mut self,
        port: I2cPort,
        mode: BusMode,
        rx_buf_len: usize,
        tx_buf_len: usize,
        _intr_alloc_flags: i32,
    ) -> ResultCode {
        if mode == BusMode::Slave
            && (rx_buf_len <= SLAVE_MIN_BUF_LEN || tx_buf_len <= SLAVE_MIN_BUF_LEN)
        {
            return ResultCode::INVALID_ARG;
        }
        let p = &mut self.ports[port.index()];
        if p.installed.is_some() {
            debug!("sim i2c: port {:?} already installed", port);
            return ResultCode::FAIL;
        }
        p.installed = Some(mode);
        p.rx_cap = rx_buf_len;
        p.tx_cap = tx_buf_len;
        ResultCode::OK
    }

    fn slave_read_buffer(
        &mut self,
        port: I2cPort,
        data: &mut [u8],
        max_size: usize,
        _ticks_to_wait: u32,
    ) -> i32 {
        let p = &mut self.ports[port.index()];
        if p.installed != Some(BusMode::Slave) || max_size > data.len() {
            return BYTES_FAIL;
        }
        let n = max_size.min(p.rx.len());
        for (dst, src) in data.iter_mut().zip(p.rx.drain(..n)) {
            *dst = src;
        }
        n as i32
    }

    fn slave_write_buffer(
        &mut self,
        port: I2cPort,
        data: &[u8],
        size: i32,
        _ticks_to_wait: u32,
    ) -> i32 {
        let p = &mut self.ports[port.index()];
        if p.installed != Some(BusMode::Slave) || size <= 0 || size as usize > data.len() {
            return BYTES_FAIL;
        }
        let room = p.tx_cap.saturating_sub(p.tx.len());
        let n = room.min(size as usize);
        p.tx.extend(&data[..n]);
        n as i32
    }
}

// ── LEDC ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct TimerState {
    bits: TimerBits,
    freq_hz: u32,
}

#[derive(Debug, Clone, Copy)]
struct ChannelState {
    timer: TimerNum,
    staged_duty: u32,
    duty: u32,
    pending_fade: Option<u32>,
}

/// Simulated LEDC controller.
#[derive(Debug, Default)]
pub struct SimLedc {
    timers: [[Option<TimerState>; TimerNum::COUNT]; SpeedMode::COUNT],
    channels: [[Option<ChannelState>; Channel::COUNT]; SpeedMode::COUNT],
    fade_installed: bool,
}

impl SimLedc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fade_installed(&self) -> bool {
        self.fade_installed
    }

    /// Duty staged by `set_duty` but not yet committed.
    pub fn staged_duty(&self, mode: SpeedMode, channel: Channel) -> Option<u32> {
        self.channels[mode.index()][channel.index()].map(|c| c.staged_duty)
    }

    /// Whether a timer divider exists for `freq_hz` at `bits` resolution.
    pub fn divider_fits(freq_hz: u32, bits: TimerBits) -> bool {
        if freq_hz == 0 {
            return false;
        }
        let precision = u64::from(freq_hz) << bits.bits();
        let div = ((LEDC_APB_CLK_HZ << 8) + precision / 2) / precision;
        (256..=LEDC_DIV_NUM_MAX).contains(&div)
    }

    fn timer(&self, mode: SpeedMode, timer: TimerNum) -> Option<TimerState> {
        self.timers[mode.index()][timer.index()]
    }

    fn channel_bits(&self, mode: SpeedMode, ch: &ChannelState) -> Option<TimerBits> {
        self.timer(mode, ch.timer).map(|t| t.bits)
    }
}

impl PwmDriver for SimLedc {
    fn channel_config(&mut self, config: &ChannelConfig) -> ResultCode {
        if !(0..=SIM_GPIO_MAX).contains(&config.gpio_num) || config.hpoint < 0 {
            return ResultCode::INVALID_ARG;
        }
        let mode = config.speed_mode;
        if let Some(t) = self.timer(mode, config.timer_sel) {
            if config.duty > t.bits.max_duty() {
                return ResultCode::INVALID_ARG;
            }
        }
        self.channels[mode.index()][config.channel.index()] = Some(ChannelState {
            timer: config.timer_sel,
            staged_duty: config.duty,
            duty: config.duty,
            pending_fade: None,
        });
        ResultCode::OK
    }

    fn timer_config(&mut self, config: &TimerConfig) -> ResultCode {
        if config.freq_hz == 0 {
            return ResultCode::INVALID_ARG;
        }
        if !Self::divider_fits(config.freq_hz, config.duty_resolution) {
            return ResultCode::FAIL;
        }
        self.timers[config.speed_mode.index()][config.timer_num.index()] = Some(TimerState {
            bits: config.duty_resolution,
            freq_hz: config.freq_hz,
        });
        ResultCode::OK
    }

    fn set_freq(&mut self, mode: SpeedMode, timer: TimerNum, freq_hz: u32) -> ResultCode {
        let Some(state) = self.timers[mode.index()][timer.index()].as_mut() else {
            return ResultCode::INVALID_ARG;
        };
        if !Self::divider_fits(freq_hz, state.bits) {
            return ResultCode::FAIL;
        }
        state.freq_hz = freq_hz;
        ResultCode::OK
    }

    fn get_freq(&self, mode: SpeedMode, timer: TimerNum) -> u32 {
        self.timer(mode, timer).map_or(FREQ_ERROR, |t| t.freq_hz)
    }

    fn set_duty(&mut self, mode: SpeedMode, channel: Channel, duty: u32) -> ResultCode {
        let Some(ch) = self.channels[mode.index()][channel.index()] else {
            return ResultCode::INVALID_ARG;
        };
        if self.channel_bits(mode, &ch).is_some_and(|b| duty > b.max_duty()) {
            return ResultCode::INVALID_ARG;
        }
        if let Some(ch) = self.channels[mode.index()][channel.index()].as_mut() {
            ch.staged_duty = duty;
        }
        ResultCode::OK
    }

    fn get_duty(&self, mode: SpeedMode, channel: Channel) -> i32 {
        self.channels[mode.index()][channel.index()].map_or(DUTY_ERROR, |c| c.duty as i32)
    }

    fn update_duty(&mut self, mode: SpeedMode, channel: Channel) -> ResultCode {
        match self.channels[mode.index()][channel.index()].as_mut() {
            Some(ch) => {
                ch.duty = ch.staged_duty;
                ResultCode::OK
            }
            None => ResultCode::INVALID_ARG,
        }
    }

    fn fade_func_install(&mut self, _intr_alloc_flags: i32) -> ResultCode {
        if self.fade_installed {
            return ResultCode::INVALID_STATE;
        }
        self.fade_installed = true;
        ResultCode::OK
    }

    fn set_fade_with_time(
        &mut self,
        mode: SpeedMode,
        channel: Channel,
        target_duty: u32,
        max_fade_time_ms: i32,
    ) -> ResultCode {
        if !self.fade_installed {
            return ResultCode::INVALID_STATE;
        }
        let Some(ch) = self.channels[mode.index()][channel.index()] else {
            return ResultCode::INVALID_ARG;
        };
        let too_high = self
            .channel_bits(mode, &ch)
            .is_some_and(|b| target_duty > b.max_duty());
        if too_high || max_fade_time_ms < 0 {
            return ResultCode::INVALID_ARG;
        }
        if let Some(ch) = self.channels[mode.index()][channel.index()].as_mut() {
            ch.pending_fade = Some(target_duty);
        }
        ResultCode::OK
    }

    fn fade_start(&mut self, mode: SpeedMode, channel: Channel, wait: FadeWait) -> ResultCode {
        if !self.fade_installed {
            return ResultCode::INVALID_STATE;
        }
        let Some(ch) = self.channels[mode.index()][channel.index()].as_mut() else {
            return ResultCode::INVALID_ARG;
        };
        let Some(target) = ch.pending_fade.take() else {
            return ResultCode::INVALID_STATE;
        };
        ch.staged_duty = target;
        ch.duty = target;
        debug!("sim ledc: {:?}/{:?} faded to {} ({:?})", mode, channel, target, wait);
        ResultCode::OK
    }
}
