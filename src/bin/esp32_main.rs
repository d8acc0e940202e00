//! ESP32-C3 SuperMini encoder panel.
//!
//! Main entry point for the physical hardware. It wires the quadrature
//! encoder interrupts, then runs a 50Hz loop that:
//! - Reads the analog button ladder (zero / Z-sync toggle / drift reset)
//! - Prints position and drift statistics at a throttled rate
//!
//! # Hardware Setup
//!
//! - Encoder A/B/Z (NPN open-collector) on GPIO6/7/10
//! - Button ladder on GPIO4 (ADC1)
//!
//! # Build
//!
//! ```bash
//! cargo build --release --features esp32 --target riscv32imc-esp-espidf
//! ```

use esp_idf_hal::adc::oneshot::AdcDriver;
use esp_idf_hal::peripherals::Peripherals;
use rs_periph::hal::esp32::{
    configure_z_pin, pins, Esp32Adc, Esp32Clock, Esp32EdgeSource, Esp32QuadPins,
};
use rs_periph::traits::{AnalogSource, Clock, InterruptControl};
use rs_periph::{
    AnalogConfig, Config, Encoder, EncoderConfig, LadderButtons, OpenCollector, PinSetup,
    Smoother, Throttle,
};
use std::thread;
use std::time::Duration;

/// Main loop interval in milliseconds (50Hz = 20ms)
const LOOP_INTERVAL_MS: u64 = 20;

/// Status print interval in milliseconds
const STATUS_INTERVAL_MS: u64 = 500;

/// Nominal ladder readings for the three panel buttons
const BUTTON_LEVELS: [u16; 3] = [0, 1240, 2480];

/// Ladder idle reading (pulled to the rail)
const BUTTON_IDLE: u16 = 4095;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();

    println!();
    println!("================================");
    println!("  rs-periph SuperMini Panel");
    println!("================================");
    println!();

    // =========================================================================
    // Configuration
    // =========================================================================
    // TODO: Load from NVS instead of compile-time defaults
    let config = Config::default().with_encoder(
        EncoderConfig::default()
            .with_pin_a(PinSetup::open_collector(OpenCollector::Npn))
            .with_pin_b(PinSetup::open_collector(OpenCollector::Npn))
            .with_pin_z(PinSetup::open_collector(OpenCollector::Npn))
            .with_zsync(400, 0),
    );

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Initialize Encoder (A/B/Z on GPIO6/7/10)
    // =========================================================================
    let mut edges = Esp32EdgeSource::new(
        peripherals.pins.gpio6,
        peripherals.pins.gpio7,
        &config.encoder,
    )?;
    let z_gpio = configure_z_pin(peripherals.pins.gpio10, config.encoder.pin_z)?;

    // The ISR needs the encoder to outlive every stack frame.
    let encoder: &'static Encoder<Esp32QuadPins> = Box::leak(Box::new(Encoder::new(
        edges.quad_pins(Some(z_gpio)),
        &config.encoder,
    )));
    edges.attach(encoder)?;
    edges.enable_interrupt()?;
    println!("[OK] Encoder initialized (GPIO{}/{}/{})", pins::ENC_A, pins::ENC_B, pins::ENC_Z);

    // =========================================================================
    // Initialize Button Ladder (ADC on GPIO4)
    // =========================================================================
    let adc1 = AdcDriver::new(peripherals.adc1)?;
    let mut ladder_adc = Esp32Adc::new(&adc1, peripherals.pins.gpio4)?;
    let mut smoother: Smoother<4> = Smoother::new();
    let mut buttons = LadderButtons::new(BUTTON_LEVELS, BUTTON_IDLE, &AnalogConfig::default());
    println!("[OK] Button ladder initialized (GPIO{} ADC)", pins::BUTTONS);

    // =========================================================================
    // Initialize Clock and Status Output
    // =========================================================================
    let clock = Esp32Clock::new();
    let mut status = Throttle::new(STATUS_INTERVAL_MS, || {
        let drift = encoder.drift();
        println!(
            "pos {:6}  drift net {:+} abs {}",
            encoder.position(),
            drift.net,
            drift.absolute
        );
    });

    println!();
    println!("Controls:");
    println!("  Button 0: Zero the counter");
    println!("  Button 1: Toggle Z-sync");
    println!("  Button 2: Reset drift stats");
    println!();
    println!("Starting main loop (50Hz)...");
    println!();

    // =========================================================================
    // Main Loop (50Hz)
    // =========================================================================
    loop {
        let now = clock.now_ms();

        if let Ok(raw) = ladder_adc.read_raw() {
            smoother.push(raw);
            buttons.sample(smoother.average());
        }

        match buttons.just_pressed() {
            Some(0) => {
                encoder.set_position(0);
                println!("counter zeroed");
            }
            Some(1) => {
                if encoder.zsync_enabled() {
                    encoder.disable_zsync();
                    println!("z-sync off");
                } else {
                    encoder.set_zsync(config.encoder.ppr, config.encoder.sync_value);
                    println!("z-sync on (ppr {})", config.encoder.ppr);
                }
            }
            Some(2) => {
                encoder.reset_drift();
                println!("drift stats reset");
            }
            _ => {}
        }

        status.poll(now);

        thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
    }
}
