//! Driver boundary consumed by the facades.
//!
//! One trait per peripheral, one method per vendor primitive. Methods
//! return the vendor's raw result (a [`ResultCode`], a byte count or a
//! register value) and are assumed correct; the facades never retry or
//! translate them.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`esp`] calls the `i2c_*` / `ledc_*` C API.
//! On host/test: [`sim`] models the same primitives in memory.

#[cfg(all(target_os = "espidf", feature = "espidf"))]
pub mod esp;
pub mod sim;

use crate::error::ResultCode;
use crate::types::{
    BusConfig, BusMode, Channel, ChannelConfig, FadeWait, I2cPort, SpeedMode, TimerConfig,
    TimerNum,
};

/// I2C controller primitives (slave-mode buffered I/O).
pub trait BusDriver {
    /// `i2c_param_config`.
    fn param_config(&mut self, port: I2cPort, config: &BusConfig) -> ResultCode;

    /// `i2c_driver_install`.
    fn driver_install(
        &mut self,
        port: I2cPort,
        mode: BusMode,
        rx_buf_len: usize,
        tx_buf_len: usize,
        intr_alloc_flags: i32,
    ) -> ResultCode;

    /// `i2c_slave_read_buffer`: bytes read, or `BYTES_FAIL`.
    /// Must return `BYTES_FAIL` when `max_size > data.len()`.
    fn slave_read_buffer(
        &mut self,
        port: I2cPort,
        data: &mut [u8],
        max_size: usize,
        ticks_to_wait: u32,
    ) -> i32;

    /// `i2c_slave_write_buffer`: bytes queued, or `BYTES_FAIL`.
    /// Must return `BYTES_FAIL` when `size` is not within `1..=data.len()`.
    fn slave_write_buffer(
        &mut self,
        port: I2cPort,
        data: &[u8],
        size: i32,
        ticks_to_wait: u32,
    ) -> i32;
}

/// LEDC controller primitives.
pub trait PwmDriver {
    /// `ledc_channel_config`.
    fn channel_config(&mut self, config: &ChannelConfig) -> ResultCode;

    /// `ledc_timer_config`.
    fn timer_config(&mut self, config: &TimerConfig) -> ResultCode;

    /// `ledc_set_freq`.
    fn set_freq(&mut self, mode: SpeedMode, timer: TimerNum, freq_hz: u32) -> ResultCode;

    /// `ledc_get_freq`: 0 on failure.
    fn get_freq(&self, mode: SpeedMode, timer: TimerNum) -> u32;

    /// `ledc_set_duty`: stages a duty value.
    fn set_duty(&mut self, mode: SpeedMode, channel: Channel, duty: u32) -> ResultCode;

    /// `ledc_get_duty`: the committed duty, -1 on failure.
    fn get_duty(&self, mode: SpeedMode, channel: Channel) -> i32;

    /// `ledc_update_duty`: commits the staged duty.
    fn update_duty(&mut self, mode: SpeedMode, channel: Channel) -> ResultCode;

    /// `ledc_fade_func_install`.
    fn fade_func_install(&mut self, intr_alloc_flags: i32) -> ResultCode;

    /// `ledc_set_fade_with_time`.
    fn set_fade_with_time(
        &mut self,
        mode: SpeedMode,
        channel: Channel,
        target_duty: u32,
        max_fade_time_ms: i32,
    ) -> ResultCode;

    /// `ledc_fade_start`.
    fn fade_start(&mut self, mode: SpeedMode, channel: Channel, wait: FadeWait) -> ResultCode;
}
