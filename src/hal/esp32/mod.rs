//! ESP32-C3 SuperMini hardware abstraction layer.
//!
//! Implementations for an industrial quadrature encoder (A/B/Z, NPN
//! open-collector outputs) wired to an ESP32-C3 SuperMini, plus the analog
//! button ladder and the millisecond clock.
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini
//! layout.

mod adc;
mod clock;
mod quad;

pub use adc::Esp32Adc;
pub use clock::Esp32Clock;
pub use quad::{configure_z_pin, Esp32EdgeSource, Esp32QuadPins};

/// Pin assignments for SuperMini ESP32-C3.
pub mod pins {
    // =========================================================================
    // Quadrature encoder (industrial, NPN open-collector)
    // =========================================================================

    /// Encoder channel A
    pub const ENC_A: i32 = 6;

    /// Encoder channel B
    pub const ENC_B: i32 = 7;

    /// Encoder Z index pulse
    pub const ENC_Z: i32 = 10;

    // =========================================================================
    // Analog button ladder
    // =========================================================================

    /// Resistor-ladder button bank input (ADC1)
    pub const BUTTONS: i32 = 4;

    // =========================================================================
    // I2C display
    // =========================================================================

    /// I2C data line (also has onboard blue LED - will flicker during I2C)
    pub const I2C_SDA: i32 = 8;

    /// I2C clock line (also shared with BOOT button - only affects programming)
    pub const I2C_SCL: i32 = 9;

    /// Default I2C address for a PCF8574 LCD backpack
    pub const LCD_I2C_ADDR: u8 = 0x27;
}
