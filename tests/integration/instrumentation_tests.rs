//! Instrumentation policy: run-time selection via `FacadeConfig`, the
//! silent direct path, and routing through the `log` crate.

use log::Level;
use periph_facade::drivers::sim::{SimBus, SimLedc};
use periph_facade::sink::{MemorySink, Severity};
use periph_facade::types::{BusConfig, BusMode, ChannelConfig, FadeWait, I2cPort, TimerConfig};
use periph_facade::{
    BusFacade, FacadeConfig, FadeOrdering, InstrumentationMode, Instrumentation, Instrumented,
    LogCrateSink, PwmFacade, ResultCode,
};

use crate::capture;

fn config(mode: InstrumentationMode) -> FacadeConfig {
    FacadeConfig {
        bus_instrumentation: mode,
        pwm_instrumentation: mode,
        fade_ordering: FadeOrdering::Enforce,
    }
}

#[test]
fn off_logs_nothing_and_returns_the_same_codes() {
    let quiet_sink = MemorySink::new();
    let loud_sink = MemorySink::new();
    let mut quiet = BusFacade::from_config(
        SimBus::new(),
        &config(InstrumentationMode::Off),
        &quiet_sink,
    );
    let mut loud = BusFacade::from_config(
        SimBus::new(),
        &config(InstrumentationMode::On),
        &loud_sink,
    );
    assert!(!quiet.instrumentation().is_enabled());
    assert!(loud.instrumentation().is_enabled());

    let cfg = BusConfig::slave(0x28, 21, 22);
    assert_eq!(quiet.configure(I2cPort::Port0, &cfg), loud.configure(I2cPort::Port0, &cfg));
    for _ in 0..2 {
        assert_eq!(
            quiet.install_driver(I2cPort::Port0, BusMode::Slave, 128, 128, 0),
            loud.install_driver(I2cPort::Port0, BusMode::Slave, 128, 128, 0),
        );
    }
    let mut buf = [0u8; 4];
    assert_eq!(
        quiet.slave_read(I2cPort::Port0, &mut buf, 4, 0),
        loud.slave_read(I2cPort::Port0, &mut buf, 4, 0),
    );

    assert!(quiet_sink.is_empty());
    assert!(!loud_sink.is_empty());
}

#[test]
fn off_pwm_facade_is_silent_through_a_whole_fade() {
    let sink = MemorySink::new();
    let mut pwm = PwmFacade::from_config(SimLedc::new(), &config(InstrumentationMode::Off), &sink);

    let mut timer = TimerConfig::default();
    let mut channel = ChannelConfig::default();
    pwm.set_default_timer_params(Some(&mut timer));
    pwm.set_default_channel_params(Some(&mut channel));
    pwm.set_default_channel_params(None);
    assert!(pwm.configure_timer(&timer).is_ok());
    assert!(pwm.configure_channel(&channel).is_ok());
    assert!(pwm.install_fade_engine(0).is_ok());
    assert!(pwm.set_fade_time(channel.speed_mode, channel.channel, 1, 1).is_ok());
    assert!(pwm.start_fade(channel.speed_mode, channel.channel, FadeWait::WaitDone).is_ok());
    // Rejected, and still nothing logged.
    assert_eq!(pwm.install_fade_engine(0), ResultCode::INVALID_STATE);

    assert!(sink.is_empty());
}

#[test]
fn from_config_carries_fade_ordering() {
    let cfg = FacadeConfig {
        fade_ordering: FadeOrdering::DriverOnly,
        ..FacadeConfig::verbose()
    };
    let pwm = PwmFacade::from_config(SimLedc::new(), &cfg, MemorySink::new());
    assert_eq!(pwm.fade_ordering(), FadeOrdering::DriverOnly);
}

#[test]
fn every_instrumented_call_logs_intent_first() {
    let sink = MemorySink::new();
    let mut bus = BusFacade::with_instrumentation(SimBus::new(), Instrumented::new(&sink));

    let _ = bus.configure(I2cPort::Port1, &BusConfig::master(400_000, 18, 19));
    let _ = bus.install_driver(I2cPort::Port1, BusMode::Master, 0, 0, 0);

    let entries = sink.entries();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].message, "Configuring I2C params.");
    assert_eq!(entries[2].message, "Installing I2C driver.");
    assert_eq!(sink.count(Severity::Info), 4);
}

#[test]
fn log_crate_sink_uses_the_tag_as_target() {
    capture::install();
    let mut bus = BusFacade::with_instrumentation(SimBus::new(), Instrumented::new(LogCrateSink));

    let _ = bus.configure(I2cPort::Port0, &BusConfig::slave(0x28, 21, 22));
    let _ = bus.install_driver(I2cPort::Port0, BusMode::Slave, 8, 8, 0);

    let configure = capture::records_for("i2c::configure");
    assert_eq!(configure.len(), 2);
    assert_eq!(configure[1].level, Level::Info);
    assert_eq!(configure[1].message, "Successfully configured I2C params.");

    let install = capture::records_for("i2c::install_driver");
    assert_eq!(install.len(), 2);
    assert_eq!(install[1].level, Level::Error);
    assert_eq!(install[1].message, "Parameter error.");

    assert_eq!(capture::records_with_prefix("i2c::").len(), 4);
}
