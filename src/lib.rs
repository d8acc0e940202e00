//! # rs-periph
//!
//! Interrupt-driven peripheral helpers for ESP32 control panels: a
//! quadrature encoder counter with Z-index resynchronization, analog
//! button ladders, a buffered character display, and a small settings
//! menu.
//!
//! ## Features
//!
//! - **ISR-safe encoder counting**: full 4x quadrature decoding via
//!   transition tables, with every shared access behind one critical
//!   section so reads never tear
//! - **Z-index drift correction**: the index pulse snaps the counter to
//!   the nearest expected multiple and keeps drift statistics
//! - **Position triggers**: one-shot callbacks when the counter hits a
//!   target, fired outside the critical section
//! - **Analog helpers**: moving-average smoothing and debounced
//!   resistor-ladder button decoding
//! - **Buffered text display**: diff-only flushing over any
//!   character-addressable sink, with an I2C retry wrapper underneath
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware abstractions (pins, interrupts, time, ADC, display)
//! - `decoder` / `zsync` - Pure quadrature and Z-index state machines
//! - `encoder` - The shared counter tying decoder, Z-sync and triggers together
//! - `analog` / `display` / `menu` / `throttle` - Main-loop helpers
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_periph::config::EncoderConfig;
//! use rs_periph::encoder::Encoder;
//! use rs_periph::hal::MockPins;
//! use rs_periph::pins::{ActiveLevel, PinSetup};
//!
//! let pins = MockPins::new();
//! let config = EncoderConfig::default()
//!     .with_pin_a(PinSetup::push_pull(ActiveLevel::High))
//!     .with_pin_b(PinSetup::push_pull(ActiveLevel::High))
//!     .with_zsync(400, 0);
//! let encoder = Encoder::new(pins.clone(), &config);
//!
//! encoder.set_trigger_at(100, || println!("reached 100"));
//!
//! // The platform layer calls this from the pin-change interrupt.
//! pins.set_levels(true, false);
//! encoder.on_edge();
//! assert_eq!(encoder.position(), 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Analog smoothing and resistor-ladder button decoding.
pub mod analog;
/// Quadrature transition tables and the step decoder.
pub mod decoder;
/// Double-buffered character frame with diff-only flushing.
pub mod display;
/// The shared encoder counter: ISR entry point, triggers, Z-sync.
pub mod encoder;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Retrying I2C bus wrapper.
pub mod i2c;
/// Settings menu over polymorphic owned entries.
pub mod menu;
/// Pin electrical configuration (pulls, polarity, open-collector presets).
pub mod pins;
/// Call-rate limiting for slow work in fast loops.
pub mod throttle;
/// Core traits for hardware abstraction.
pub mod traits;
/// Z-index resynchronization arithmetic and drift statistics.
pub mod zsync;

/// Shared configuration system for desktop and ESP32.
pub mod config;

// Re-exports for convenience
pub use analog::{LadderButtons, Smoother};
pub use decoder::{QuadDecoder, RotationConvention};
pub use display::TextFrame;
pub use encoder::Encoder;
pub use i2c::{I2cRetry, I2cStats};
pub use menu::{ActionEntry, IntEntry, Menu, MenuEntry, Separator, ToggleEntry};
pub use pins::{ActiveLevel, OpenCollector, PinSetup, Pull};
pub use throttle::Throttle;
pub use traits::{AnalogSource, CharacterSink, Clock, InterruptControl, QuadratureInput};
pub use zsync::{DriftStats, ZSync};

// Config re-exports
pub use config::{AnalogConfig, Config, DeviceConfig, EncoderConfig};
