//! Fuzz target: `BusFacade` over `SimBus`
//!
//! Interprets the input as a stream of one-byte opcodes with operands and
//! drives configure / install / read / write / inject in arbitrary order.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Read and write return either `BYTES_FAIL` or a count within bounds
//! - One intent plus one outcome entry per configure/install call
//!
//! cargo fuzz run fuzz_bus_ops

#![no_main]

use libfuzzer_sys::fuzz_target;
use periph_facade::drivers::sim::SimBus;
use periph_facade::error::BYTES_FAIL;
use periph_facade::sink::MemorySink;
use periph_facade::types::{BusConfig, BusMode, I2cPort};
use periph_facade::{BusFacade, Instrumented};

fn port(b: u8) -> I2cPort {
    if b & 1 == 0 { I2cPort::Port0 } else { I2cPort::Port1 }
}

fuzz_target!(|data: &[u8]| {
    let sink = MemorySink::new();
    let mut bus = BusFacade::with_instrumentation(SimBus::new(), Instrumented::new(&sink));
    let mut buf = [0u8; 64];

    for chunk in data.chunks_exact(4) {
        let (op, a, b, c) = (chunk[0], chunk[1], chunk[2], chunk[3]);
        let p = port(a);
        match op % 5 {
            0 => {
                let before = sink.len();
                let cfg = BusConfig::slave(u16::from(b), i32::from(c % 50), i32::from(a % 50));
                let _ = bus.configure(p, &cfg);
                assert_eq!(sink.len(), before + 2);
            }
            1 => {
                let before = sink.len();
                let mode = if b & 1 == 0 { BusMode::Slave } else { BusMode::Master };
                let _ = bus.install_driver(p, mode, usize::from(c) * 2, usize::from(c) * 2, 0);
                assert_eq!(sink.len(), before + 2);
            }
            2 => {
                let max = usize::from(b % 80);
                let n = bus.slave_read(p, &mut buf, max, 0);
                assert!(n == BYTES_FAIL || (0..=max as i32).contains(&n));
            }
            3 => {
                let size = i32::from(b % 80) - 8;
                let n = bus.slave_write(p, &buf, size, 0);
                assert!(n == BYTES_FAIL || (0..=size).contains(&n));
            }
            _ => {
                let len = usize::from(c % 64);
                bus.driver_mut().inject_rx(p, &buf[..len]);
            }
        }
        if sink.len() > 4096 {
            sink.clear();
        }
    }
});
