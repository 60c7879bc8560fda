//! I2C bus facade.
//!
//! One method per driver primitive. `configure` and `install_driver` go
//! through [`Instrumentation::invoke`]; the slave read/write calls return
//! byte counts rather than result codes and use the narrower
//! [`Instrumentation::report_count`] path instead.

use crate::config::FacadeConfig;
use crate::drivers::BusDriver;
use crate::error::ResultCode;
use crate::instrument::{DefaultBusInstrumentation, Instrumentation, Switchable};
use crate::outcome::OutcomeTable;
use crate::sink::LogSink;
use crate::types::{BusConfig, BusMode, I2cPort};

const TAG_CONFIGURE: &str = "i2c::configure";
const TAG_INSTALL: &str = "i2c::install_driver";
const TAG_READ: &str = "i2c::slave_read";
const TAG_WRITE: &str = "i2c::slave_write";

const CONFIGURE_OUTCOMES: OutcomeTable<'static> = OutcomeTable::new(&[
    (ResultCode::OK, "Successfully configured I2C params."),
    (ResultCode::INVALID_ARG, "Parameter error."),
]);

const INSTALL_OUTCOMES: OutcomeTable<'static> = OutcomeTable::new(&[
    (ResultCode::OK, "Successfully installed I2C driver."),
    (ResultCode::INVALID_ARG, "Parameter error."),
    (ResultCode::FAIL, "Driver installation error."),
]);

/// I2C facade over a [`BusDriver`].
pub struct BusFacade<D, I = DefaultBusInstrumentation> {
    driver: D,
    instr: I,
}

impl<D: BusDriver> BusFacade<D> {
    /// Facade with the policy chosen by the `debug-bus` feature.
    pub fn new(driver: D) -> Self {
        Self::with_instrumentation(driver, DefaultBusInstrumentation::default())
    }
}

impl<D: BusDriver, S: LogSink> BusFacade<D, Switchable<S>> {
    /// Facade with the policy chosen by `config.bus_instrumentation`.
    pub fn from_config(driver: D, config: &FacadeConfig, sink: S) -> Self {
        Self::with_instrumentation(driver, Switchable::from_mode(config.bus_instrumentation, sink))
    }
}

impl<D: BusDriver, I: Instrumentation> BusFacade<D, I> {
    pub fn with_instrumentation(driver: D, instr: I) -> Self {
        Self { driver, instr }
    }

    /// Program bus timing and role parameters.
    pub fn configure(&mut self, port: I2cPort, config: &BusConfig) -> ResultCode {
        let driver = &mut self.driver;
        self.instr.invoke(
            TAG_CONFIGURE,
            format_args!("Configuring I2C params."),
            &CONFIGURE_OUTCOMES,
            || driver.param_config(port, config),
        )
    }

    /// Allocate the driver's ring buffers and register its interrupt handler.
    pub fn install_driver(
        &mut self,
        port: I2cPort,
        mode: BusMode,
        rx_buf_len: usize,
        tx_buf_len: usize,
        intr_alloc_flags: i32,
    ) -> ResultCode {
        let driver = &mut self.driver;
        self.instr.invoke(
            TAG_INSTALL,
            format_args!("Installing I2C driver."),
            &INSTALL_OUTCOMES,
            || driver.driver_install(port, mode, rx_buf_len, tx_buf_len, intr_alloc_flags),
        )
    }

    /// Drain up to `max_size` received bytes into `data`, waiting up to
    /// `ticks_to_wait` if the buffer is empty.
    ///
    /// Returns the number of bytes read (0 when nothing arrived) or
    /// [`BYTES_FAIL`](crate::error::BYTES_FAIL) for invalid parameters.
    pub fn slave_read(
        &mut self,
        port: I2cPort,
        data: &mut [u8],
        max_size: usize,
        ticks_to_wait: u32,
    ) -> i32 {
        self.instr
            .note(TAG_READ, format_args!("Attempting to read from buffer."));
        let n = self
            .driver
            .slave_read_buffer(port, data, max_size, ticks_to_wait);
        self.instr.report_count(TAG_READ, "Read", n);
        n
    }

    /// Queue up to `size` bytes of `data` for transmission, waiting up to
    /// `ticks_to_wait` if the transmit buffer is full.
    ///
    /// Returns the number of bytes queued or
    /// [`BYTES_FAIL`](crate::error::BYTES_FAIL) for invalid parameters.
    pub fn slave_write(&mut self, port: I2cPort, data: &[u8], size: i32, ticks_to_wait: u32) -> i32 {
        self.instr
            .note(TAG_WRITE, format_args!("Attempting to write to buffer."));
        let n = self
            .driver
            .slave_write_buffer(port, data, size, ticks_to_wait);
        self.instr.report_count(TAG_WRITE, "Wrote", n);
        n
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

    pub fn into_parts(self) -> (D, I) {
        (self.driver, self.instr)
    }
}
