//! ESP-IDF driver bindings.
//!
//! Thin FFI shims over the `i2c_*` and `ledc_*` C API. Every method is a
//! single vendor call plus the handle/struct conversion it needs; no
//! logic lives here.

use esp_idf_svc::sys::*;

use crate::drivers::{BusDriver, PwmDriver};
use crate::error::{BYTES_FAIL, DUTY_ERROR, ResultCode};
use crate::types::{
    BusConfig, BusMode, Channel, ChannelConfig, FadeWait, I2cPort, InterruptType, SpeedMode,
    TimerConfig, TimerNum,
};

/// `ledc_get_duty` error value.
const LEDC_ERR_DUTY: u32 = u32::MAX;

// ── Handle conversions ────────────────────────────────────────

fn i2c_port(port: I2cPort) -> i2c_port_t {
    port.index() as i2c_port_t
}

fn i2c_mode(mode: BusMode) -> i2c_mode_t {
    match mode {
        BusMode::Slave => i2c_mode_t_I2C_MODE_SLAVE,
        BusMode::Master => i2c_mode_t_I2C_MODE_MASTER,
    }
}

fn speed_mode(mode: SpeedMode) -> ledc_mode_t {
    match mode {
        #[cfg(esp32)]
        SpeedMode::HighSpeed => ledc_mode_t_LEDC_HIGH_SPEED_MODE,
        // No high-speed block on this chip; the driver rejects it.
        #[cfg(not(esp32))]
        SpeedMode::HighSpeed => ledc_mode_t_LEDC_SPEED_MODE_MAX,
        SpeedMode::LowSpeed => ledc_mode_t_LEDC_LOW_SPEED_MODE,
    }
}

fn timer_num(timer: TimerNum) -> ledc_timer_t {
    ledc_timer_t_LEDC_TIMER_0 + timer.index() as u32
}

fn channel_num(channel: Channel) -> ledc_channel_t {
    ledc_channel_t_LEDC_CHANNEL_0 + channel.index() as u32
}

fn intr_type(intr: InterruptType) -> ledc_intr_type_t {
    match intr {
        InterruptType::Disabled => ledc_intr_type_t_LEDC_INTR_DISABLE,
        InterruptType::FadeEnd => ledc_intr_type_t_LEDC_INTR_FADE_END,
    }
}

fn fade_mode(wait: FadeWait) -> ledc_fade_mode_t {
    match wait {
        FadeWait::NoWait => ledc_fade_mode_t_LEDC_FADE_NO_WAIT,
        FadeWait::WaitDone => ledc_fade_mode_t_LEDC_FADE_WAIT_DONE,
    }
}

// ── I2C ───────────────────────────────────────────────────────

/// I2C controller via `driver/i2c.h`.
#[derive(Debug, Default)]
pub struct EspBus;

impl EspBus {
    pub fn new() -> Self {
        Self
    }
}

impl BusDriver for EspBus {
    fn param_config(&mut self, port: I2cPort, config: &BusConfig) -> ResultCode {
        let role = match config.mode {
            BusMode::Master => i2c_config_t__bindgen_ty_1 {
                master: i2c_config_t__bindgen_ty_1__bindgen_ty_1 {
                    clk_speed: config.master_clk_hz,
                },
            },
            BusMode::Slave => i2c_config_t__bindgen_ty_1 {
                slave: i2c_config_t__bindgen_ty_1__bindgen_ty_2 {
                    addr_10bit_en: u8::from(config.addr_10bit),
                    slave_addr: config.slave_addr,
                    ..Default::default()
                },
            },
        };
        let cfg = i2c_config_t {
            mode: i2c_mode(config.mode),
            sda_io_num: config.sda_io,
            scl_io_num: config.scl_io,
            sda_pullup_en: config.sda_pullup,
            scl_pullup_en: config.scl_pullup,
            __bindgen_anon_1: role,
            ..Default::default()
        };
        // SAFETY: `cfg` is a fully initialised config that outlives the call;
        // the driver copies it into its own state.
        ResultCode::from_raw(unsafe { i2c_param_config(i2c_port(port), &cfg) })
    }

    fn driver_install(
        &mut self,
        port: I2cPort,
        mode: BusMode,
        rx_buf_len: usize,
        tx_buf_len: usize,
        intr_alloc_flags: i32,
    ) -> ResultCode {
        // SAFETY: plain-value arguments; the driver allocates its own buffers.
        ResultCode::from_raw(unsafe {
            i2c_driver_install(
                i2c_port(port),
                i2c_mode(mode),
                rx_buf_len,
                tx_buf_len,
                intr_alloc_flags,
            )
        })
    }

    fn slave_read_buffer(
        &mut self,
        port: I2cPort,
        data: &mut [u8],
        max_size: usize,
        ticks_to_wait: u32,
    ) -> i32 {
        if max_size > data.len() {
            return BYTES_FAIL;
        }
        // SAFETY: `data` is a live exclusive buffer of at least `max_size`
        // bytes for the duration of the (blocking) call.
        unsafe {
            i2c_slave_read_buffer(
                i2c_port(port),
                data.as_mut_ptr(),
                max_size,
                ticks_to_wait as TickType_t,
            )
        }
    }

    fn slave_write_buffer(
        &mut self,
        port: I2cPort,
        data: &[u8],
        size: i32,
        ticks_to_wait: u32,
    ) -> i32 {
        if size <= 0 || size as usize > data.len() {
            return BYTES_FAIL;
        }
        // SAFETY: `data` holds at least `size` bytes and outlives the
        // (blocking) call; the driver copies into its ring buffer.
        unsafe {
            i2c_slave_write_buffer(
                i2c_port(port),
                data.as_ptr() as _,
                size,
                ticks_to_wait as TickType_t,
            )
        }
    }
}

// ── LEDC ──────────────────────────────────────────────────────

/// LEDC controller via `driver/ledc.h`.
#[derive(Debug, Default)]
pub struct EspLedc;

impl EspLedc {
    pub fn new() -> Self {
        Self
    }
}

impl PwmDriver for EspLedc {
    fn channel_config(&mut self, config: &ChannelConfig) -> ResultCode {
        let cfg = ledc_channel_config_t {
            gpio_num: config.gpio_num,
            speed_mode: speed_mode(config.speed_mode),
            channel: channel_num(config.channel),
            intr_type: intr_type(config.intr_type),
            timer_sel: timer_num(config.timer_sel),
            duty: config.duty,
            hpoint: config.hpoint,
            ..Default::default()
        };
        // SAFETY: `cfg` is fully initialised and only read by the driver.
        ResultCode::from_raw(unsafe { ledc_channel_config(&cfg) })
    }

    fn timer_config(&mut self, config: &TimerConfig) -> ResultCode {
        let cfg = ledc_timer_config_t {
            speed_mode: speed_mode(config.speed_mode),
            duty_resolution: u32::from(config.duty_resolution.bits()),
            timer_num: timer_num(config.timer_num),
            freq_hz: config.freq_hz,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        // SAFETY: `cfg` is fully initialised and only read by the driver.
        ResultCode::from_raw(unsafe { ledc_timer_config(&cfg) })
    }

    fn set_freq(&mut self, mode: SpeedMode, timer: TimerNum, freq_hz: u32) -> ResultCode {
        // SAFETY: register write on plain-value handles.
        ResultCode::from_raw(unsafe { ledc_set_freq(speed_mode(mode), timer_num(timer), freq_hz) })
    }

    fn get_freq(&self, mode: SpeedMode, timer: TimerNum) -> u32 {
        // SAFETY: register read on plain-value handles.
        unsafe { ledc_get_freq(speed_mode(mode), timer_num(timer)) }
    }

    fn set_duty(&mut self, mode: SpeedMode, channel: Channel, duty: u32) -> ResultCode {
        // SAFETY: register write on plain-value handles.
        ResultCode::from_raw(unsafe { ledc_set_duty(speed_mode(mode), channel_num(channel), duty) })
    }

    fn get_duty(&self, mode: SpeedMode, channel: Channel) -> i32 {
        // SAFETY: register read on plain-value handles.
        let duty = unsafe { ledc_get_duty(speed_mode(mode), channel_num(channel)) };
        if duty == LEDC_ERR_DUTY { DUTY_ERROR } else { duty as i32 }
    }

    fn update_duty(&mut self, mode: SpeedMode, channel: Channel) -> ResultCode {
        // SAFETY: register write on plain-value handles.
        ResultCode::from_raw(unsafe { ledc_update_duty(speed_mode(mode), channel_num(channel)) })
    }

    fn fade_func_install(&mut self, intr_alloc_flags: i32) -> ResultCode {
        // SAFETY: installs the fade ISR once; the driver reports
        // ESP_ERR_INVALID_STATE on a second call.
        ResultCode::from_raw(unsafe { ledc_fade_func_install(intr_alloc_flags) })
    }

    fn set_fade_with_time(
        &mut self,
        mode: SpeedMode,
        channel: Channel,
        target_duty: u32,
        max_fade_time_ms: i32,
    ) -> ResultCode {
        // SAFETY: plain-value arguments.
        ResultCode::from_raw(unsafe {
            ledc_set_fade_with_time(
                speed_mode(mode),
                channel_num(channel),
                target_duty,
                max_fade_time_ms,
            )
        })
    }

    fn fade_start(&mut self, mode: SpeedMode, channel: Channel, wait: FadeWait) -> ResultCode {
        // SAFETY: plain-value arguments; with WaitDone the call blocks on
        // the driver's fade semaphore.
        ResultCode::from_raw(unsafe {
            ledc_fade_start(speed_mode(mode), channel_num(channel), fade_mode(wait))
        })
    }
}
