//! I2C slave facade over the simulated bus.

use periph_facade::drivers::sim::SimBus;
use periph_facade::error::BYTES_FAIL;
use periph_facade::sink::{MemorySink, Severity};
use periph_facade::types::{BusConfig, BusMode, I2cPort};
use periph_facade::{BusFacade, Instrumented, ResultCode};

const PORT: I2cPort = I2cPort::Port0;

fn slave<'a>(sink: &'a MemorySink) -> BusFacade<SimBus, Instrumented<&'a MemorySink>> {
    let mut bus = BusFacade::with_instrumentation(SimBus::new(), Instrumented::new(sink));
    assert_eq!(bus.configure(PORT, &BusConfig::slave(0x28, 21, 22)), ResultCode::OK);
    assert_eq!(
        bus.install_driver(PORT, BusMode::Slave, 256, 256, 0),
        ResultCode::OK
    );
    sink.clear();
    bus
}

#[test]
fn empty_buffer_with_zero_timeout_reads_nothing() {
    let sink = MemorySink::new();
    let mut bus = slave(&sink);

    let mut buf = [0u8; 16];
    let n = bus.slave_read(PORT, &mut buf, 16, 0);

    assert_eq!(n, 0);
    assert_ne!(n, BYTES_FAIL);
    let last = sink.last().unwrap();
    assert_eq!(last.severity, Severity::Info);
    assert_eq!(last.message, "Read 0 bytes.");
}

#[test]
fn echo_round_trip() {
    let sink = MemorySink::new();
    let mut bus = slave(&sink);

    assert_eq!(bus.driver_mut().inject_rx(PORT, b"ping"), 4);

    let mut buf = [0u8; 32];
    let len = buf.len();
    let n = bus.slave_read(PORT, &mut buf, len, 0);
    assert_eq!(n, 4);

    let wrote = bus.slave_write(PORT, &buf[..4], n, 0);
    assert_eq!(wrote, 4);
    assert_eq!(bus.driver_mut().drain_tx(PORT), b"ping");

    let messages: Vec<_> = sink.entries().into_iter().map(|e| e.message).collect();
    assert_eq!(
        messages,
        [
            "Attempting to read from buffer.",
            "Read 4 bytes.",
            "Attempting to write to buffer.",
            "Wrote 4 bytes.",
        ]
    );
}

#[test]
fn write_of_zero_bytes_is_a_parameter_error() {
    let sink = MemorySink::new();
    let mut bus = slave(&sink);

    assert_eq!(bus.slave_write(PORT, b"x", 0, 0), BYTES_FAIL);
    let last = sink.last().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert_eq!(last.message, "Parameter error.");
}

#[test]
fn ports_are_independent() {
    let sink = MemorySink::new();
    let mut bus = slave(&sink);

    // Port1 was never installed.
    let mut buf = [0u8; 4];
    assert_eq!(bus.slave_read(I2cPort::Port1, &mut buf, 4, 0), BYTES_FAIL);
    assert!(bus.driver().is_installed(PORT));
    assert!(!bus.driver().is_installed(I2cPort::Port1));
}

#[test]
fn undersized_slave_buffers_are_rejected_with_parameter_error() {
    let sink = MemorySink::new();
    let mut bus = BusFacade::with_instrumentation(SimBus::new(), Instrumented::new(&sink));

    let code = bus.install_driver(I2cPort::Port1, BusMode::Slave, 64, 64, 0);

    assert_eq!(code, ResultCode::INVALID_ARG);
    assert_eq!(sink.last().unwrap().message, "Parameter error.");
    assert_eq!(sink.count(Severity::Error), 1);
}

#[test]
fn bad_address_is_rejected_at_configure() {
    let sink = MemorySink::new();
    let mut bus = BusFacade::with_instrumentation(SimBus::new(), Instrumented::new(&sink));

    let code = bus.configure(PORT, &BusConfig::slave(0x80, 21, 22));

    assert_eq!(code, ResultCode::INVALID_ARG);
    assert!(bus.driver().config(PORT).is_none());
}
