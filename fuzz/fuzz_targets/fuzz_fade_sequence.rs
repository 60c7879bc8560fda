//! Fuzz target: fade ordering on `PwmFacade` over `SimLedc`
//!
//! Drives install / schedule / start / complete on arbitrary channels in
//! arbitrary order with fade ordering enforced.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - `start_fade` succeeds only from `FadeScheduled`
//! - `set_fade_time` never succeeds before the fade engine is installed
//!
//! cargo fuzz run fuzz_fade_sequence

#![no_main]

use libfuzzer_sys::fuzz_target;
use periph_facade::drivers::sim::SimLedc;
use periph_facade::fade::FadeState;
use periph_facade::types::{Channel, ChannelConfig, FadeWait, SpeedMode, TimerConfig};
use periph_facade::{Direct, PwmFacade, ResultCode};

const CHANNELS: [Channel; 4] = [
    Channel::Channel0,
    Channel::Channel1,
    Channel::Channel2,
    Channel::Channel3,
];

fuzz_target!(|data: &[u8]| {
    let mut pwm = PwmFacade::with_instrumentation(SimLedc::new(), Direct);
    let mode = SpeedMode::LowSpeed;

    let timer = TimerConfig {
        speed_mode: mode,
        ..TimerConfig::default()
    };
    if pwm.configure_timer(&timer) != ResultCode::OK {
        return;
    }
    for ch in CHANNELS {
        let cfg = ChannelConfig {
            speed_mode: mode,
            channel: ch,
            ..ChannelConfig::default()
        };
        let _ = pwm.configure_channel(&cfg);
    }

    for pair in data.chunks_exact(2) {
        let ch = CHANNELS[usize::from(pair[1]) % CHANNELS.len()];
        let before = pwm.fade_state(mode, ch);
        match pair[0] % 5 {
            0 => {
                let _ = pwm.install_fade_engine(0);
            }
            1 => {
                let code = pwm.set_fade_time(mode, ch, u32::from(pair[1]) * 4, 10);
                if before == FadeState::Unconfigured {
                    assert_eq!(code, ResultCode::INVALID_STATE);
                }
            }
            2 | 3 => {
                let wait = if pair[0] % 5 == 2 { FadeWait::WaitDone } else { FadeWait::NoWait };
                let code = pwm.start_fade(mode, ch, wait);
                assert_eq!(code.is_ok(), before == FadeState::FadeScheduled);
            }
            _ => pwm.fade_completed(mode, ch),
        }
    }
});
