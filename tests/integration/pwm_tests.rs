//! LEDC facade over the simulated controller: presets, timer setup and
//! staged duty.

use embedded_hal::pwm::SetDutyCycle;
use periph_facade::drivers::sim::SimLedc;
use periph_facade::pwm::DEFAULT_PWM_GPIO;
use periph_facade::sink::{MemorySink, Severity};
use periph_facade::types::{
    Channel, ChannelConfig, SpeedMode, TimerBits, TimerConfig, TimerNum,
};
use periph_facade::{Direct, Instrumented, PwmFacade, ResultCode};

fn configured(sink: &MemorySink) -> PwmFacade<SimLedc, Instrumented<&MemorySink>> {
    let mut pwm = PwmFacade::with_instrumentation(SimLedc::new(), Instrumented::new(sink));
    let mut timer = TimerConfig::default();
    let mut channel = ChannelConfig::default();
    pwm.set_default_timer_params(Some(&mut timer));
    pwm.set_default_channel_params(Some(&mut channel));
    assert_eq!(pwm.configure_timer(&timer), ResultCode::OK);
    assert_eq!(pwm.configure_channel(&channel), ResultCode::OK);
    sink.clear();
    pwm
}

#[test]
fn presets_are_deterministic() {
    let pwm = PwmFacade::with_instrumentation(SimLedc::new(), Direct);

    let mut a = ChannelConfig::default();
    let mut b = ChannelConfig {
        gpio_num: 3,
        duty: 999,
        ..ChannelConfig::default()
    };
    pwm.set_default_channel_params(Some(&mut a));
    pwm.set_default_channel_params(Some(&mut b));
    assert_eq!(a, b);
    assert_eq!(a.gpio_num, DEFAULT_PWM_GPIO);

    let mut t1 = TimerConfig::default();
    let mut t2 = TimerConfig {
        freq_hz: 5,
        ..TimerConfig::default()
    };
    pwm.set_default_timer_params(Some(&mut t1));
    pwm.set_default_timer_params(Some(&mut t2));
    assert_eq!(t1, t2);
}

#[test]
fn preset_logs_resulting_values() {
    let sink = MemorySink::new();
    let pwm = PwmFacade::with_instrumentation(SimLedc::new(), Instrumented::new(&sink));

    let mut timer = TimerConfig::default();
    pwm.set_default_timer_params(Some(&mut timer));

    let entries = sink.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries[1].message.contains("freq_hz = 100"));
    assert!(entries.iter().all(|e| e.severity == Severity::Info));
}

#[test]
fn presets_tolerate_missing_params() {
    let sink = MemorySink::new();
    let pwm = PwmFacade::with_instrumentation(SimLedc::new(), Instrumented::new(&sink));

    pwm.set_default_channel_params(None);
    pwm.set_default_timer_params(None);

    assert_eq!(sink.count(Severity::Error), 2);
}

#[test]
fn duty_is_staged_until_update() {
    let sink = MemorySink::new();
    let mut pwm = configured(&sink);
    let (m, c) = (SpeedMode::HighSpeed, Channel::Channel0);

    let before = pwm.duty(m, c);
    assert_eq!(before, 10);

    assert_eq!(pwm.set_duty(m, c, 700), ResultCode::OK);
    assert_eq!(pwm.duty(m, c), before);
    assert_eq!(pwm.driver().staged_duty(m, c), Some(700));

    assert_eq!(pwm.update_duty(m, c), ResultCode::OK);
    assert_eq!(pwm.duty(m, c), 700);

    let messages: Vec<_> = sink.entries().into_iter().map(|e| e.message).collect();
    assert!(messages.contains(&"Successfully set PWM duty cycle.".to_owned()));
    assert!(messages.contains(&"Successfully updated PWM duty cycle.".to_owned()));
}

#[test]
fn duty_of_unconfigured_channel_is_sentinel() {
    let sink = MemorySink::new();
    let pwm = configured(&sink);

    assert_eq!(pwm.duty(SpeedMode::LowSpeed, Channel::Channel4), -1);
    let last = sink.last().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert_eq!(last.message, "ERROR retrieving duty cycle.");
}

#[test]
fn duty_above_resolution_is_rejected() {
    let sink = MemorySink::new();
    let mut pwm = configured(&sink);

    let code = pwm.set_duty(SpeedMode::HighSpeed, Channel::Channel0, 5_000);

    assert_eq!(code, ResultCode::INVALID_ARG);
    assert_eq!(sink.last().unwrap().message, "Parameter error.");
}

#[test]
fn timer_without_divider_fails() {
    let sink = MemorySink::new();
    let mut pwm = PwmFacade::with_instrumentation(SimLedc::new(), Instrumented::new(&sink));

    let timer = TimerConfig {
        duty_resolution: TimerBits::new(20).unwrap(),
        freq_hz: 40_000,
        ..TimerConfig::default()
    };

    assert_eq!(pwm.configure_timer(&timer), ResultCode::FAIL);
    let last = sink.last().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert!(last.message.contains("pre-divider"));
}

#[test]
fn zero_frequency_timer_is_invalid() {
    let sink = MemorySink::new();
    let mut pwm = PwmFacade::with_instrumentation(SimLedc::new(), Instrumented::new(&sink));

    let timer = TimerConfig {
        freq_hz: 0,
        ..TimerConfig::default()
    };

    assert_eq!(pwm.configure_timer(&timer), ResultCode::INVALID_ARG);
    assert_eq!(
        sink.last().unwrap().message,
        "Invalid parameter. Cannot configure timer."
    );
}

#[test]
fn set_frequency_round_trips_through_frequency() {
    let sink = MemorySink::new();
    let mut pwm = configured(&sink);

    assert_eq!(
        pwm.set_frequency(SpeedMode::HighSpeed, TimerNum::Timer0, 5_000),
        ResultCode::OK
    );
    assert_eq!(pwm.frequency(SpeedMode::HighSpeed, TimerNum::Timer0), 5_000);
}

#[test]
fn embedded_hal_channel_at_13_bits() {
    let mut pwm = PwmFacade::with_instrumentation(SimLedc::new(), Direct);
    let timer = TimerConfig {
        speed_mode: SpeedMode::LowSpeed,
        duty_resolution: TimerBits::BITS_13,
        timer_num: TimerNum::Timer1,
        freq_hz: 5_000,
    };
    let channel = ChannelConfig {
        speed_mode: SpeedMode::LowSpeed,
        channel: Channel::Channel2,
        timer_sel: TimerNum::Timer1,
        duty: 0,
        ..ChannelConfig::default()
    };
    assert!(pwm.configure_timer(&timer).is_ok());
    assert!(pwm.configure_channel(&channel).is_ok());

    let mut out = pwm.channel(SpeedMode::LowSpeed, Channel::Channel2, TimerBits::BITS_13);
    assert_eq!(out.max_duty_cycle(), 8191);
    out.set_duty_cycle_fully_on().unwrap();

    assert_eq!(pwm.duty(SpeedMode::LowSpeed, Channel::Channel2), 8191);
}

#[test]
fn embedded_hal_max_duty_saturates_at_u16() {
    let mut pwm = PwmFacade::with_instrumentation(SimLedc::new(), Direct);
    let out = pwm.channel(
        SpeedMode::LowSpeed,
        Channel::Channel0,
        TimerBits::new(20).unwrap(),
    );
    assert_eq!(out.max_duty_cycle(), u16::MAX);
}
