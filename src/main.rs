//! Peripheral facade demo firmware.
//!
//! Brings up one LEDC channel and breathes it with blocking fades, and
//! runs an I2C slave that echoes whatever the bus master writes.
//!
//! ```text
//!   LEDC timer0 ── channel0 ── GPIO16   (breathing fade, 1 s each way)
//!   I2C port0 slave @ 0x28   SDA 21 / SCL 22   (echo)
//! ```

#[cfg(all(target_os = "espidf", feature = "espidf"))]
fn main() -> anyhow::Result<()> {
    use esp_idf_hal::delay::FreeRtos;
    use log::{info, warn};

    use periph_facade::drivers::esp::{EspBus, EspLedc};
    use periph_facade::pwm::DEFAULT_FADE_INTR_FLAGS;
    use periph_facade::types::{
        BusConfig, BusMode, ChannelConfig, FadeWait, I2cPort, TimerConfig,
    };
    use periph_facade::{BusFacade, FacadeConfig, LogCrateSink, PwmFacade};

    const SLAVE_ADDR: u16 = 0x28;
    const SDA_IO: i32 = 21;
    const SCL_IO: i32 = 22;
    const I2C_BUF_LEN: usize = 512;
    const FADE_MS: i32 = 1_000;
    /// Ticks to block on an empty receive buffer.
    const READ_TICKS: u32 = 10;

    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("periph-demo v{}", env!("CARGO_PKG_VERSION"));

    let config = FacadeConfig::verbose();

    // ── 2. LEDC ───────────────────────────────────────────────
    let mut pwm = PwmFacade::from_config(EspLedc::new(), &config, LogCrateSink);

    let mut timer = TimerConfig::default();
    let mut channel = ChannelConfig::default();
    pwm.set_default_timer_params(Some(&mut timer));
    pwm.set_default_channel_params(Some(&mut channel));

    // Only the original ESP32 has the high-speed block.
    #[cfg(not(esp32))]
    {
        use periph_facade::types::SpeedMode;
        timer.speed_mode = SpeedMode::LowSpeed;
        channel.speed_mode = SpeedMode::LowSpeed;
    }

    pwm.configure_timer(&timer).check()?;
    pwm.configure_channel(&channel).check()?;
    pwm.install_fade_engine(DEFAULT_FADE_INTR_FLAGS).check()?;

    let (mode, ch) = (channel.speed_mode, channel.channel);
    let full = timer.duty_resolution.max_duty() - 1;

    // ── 3. I2C slave ──────────────────────────────────────────
    let mut bus = BusFacade::from_config(EspBus::new(), &config, LogCrateSink);
    bus.configure(I2cPort::Port0, &BusConfig::slave(SLAVE_ADDR, SDA_IO, SCL_IO))
        .check()?;
    bus.install_driver(I2cPort::Port0, BusMode::Slave, I2C_BUF_LEN, I2C_BUF_LEN, 0)
        .check()?;

    // ── 4. Main loop ──────────────────────────────────────────
    let mut rx = [0u8; 64];
    let mut rising = true;
    loop {
        let target = if rising { full } else { 0 };
        let code = pwm.set_fade_time(mode, ch, target, FADE_MS);
        let code = if code.is_ok() {
            pwm.start_fade(mode, ch, FadeWait::WaitDone)
        } else {
            code
        };
        if !code.is_ok() {
            warn!("fade: {} toward duty {}", code, target);
        }
        rising = !rising;

        let n = bus.slave_read(I2cPort::Port0, &mut rx, rx.len(), READ_TICKS);
        if n > 0 {
            let len = n as usize;
            if bus.slave_write(I2cPort::Port0, &rx[..len], n, READ_TICKS) != n {
                warn!("echo: transmit buffer full, dropped bytes");
            }
        }

        FreeRtos::delay_ms(10);
    }
}

#[cfg(not(all(target_os = "espidf", feature = "espidf")))]
fn main() {
    eprintln!("periph-demo only runs on an ESP-IDF target; use `cargo test` on the host.");
}
