//! Shared configuration system for desktop and ESP32.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use rs_periph::config::{Config, EncoderConfig};
//! use rs_periph::decoder::RotationConvention;
//!
//! // Use defaults
//! let config = Config::default();
//!
//! // Or customize
//! let config = Config::default().with_encoder(
//!     EncoderConfig::default()
//!         .with_convention(RotationConvention::CcwPositive)
//!         .with_zsync(400, 50),
//! );
//! ```

use heapless::String as HString;

use crate::decoder::RotationConvention;
use crate::pins::PinSetup;

/// Maximum length for short config strings (device names, IDs)
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    // Take only whole characters that fit within the capacity.
    let mut end = 0;
    for (i, c) in s.char_indices() {
        if i + c.len_utf8() > MAX_SHORT_STRING {
            break;
        }
        end = i + c.len_utf8();
    }
    let _ = hs.push_str(&s[..end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Device identification
    pub device: DeviceConfig,
    /// Quadrature encoder configuration
    pub encoder: EncoderConfig,
    /// Analog input configuration
    pub analog: AnalogConfig,
}

impl Config {
    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }

    /// Set encoder configuration
    pub fn with_encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    /// Set analog input configuration
    pub fn with_analog(mut self, analog: AnalogConfig) -> Self {
        self.analog = analog;
        self
    }
}

// ============================================================================
// Encoder Config
// ============================================================================

/// Quadrature encoder configuration.
///
/// Pin setups default to NPN open-collector (pull-up, active-low), the
/// most common industrial encoder output. Z-sync starts disabled.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncoderConfig {
    /// Which rotation direction counts positive
    pub convention: RotationConvention,
    /// Pulses per mechanical revolution (for Z-sync)
    pub ppr: i32,
    /// Counter value expected at the Z reference pulse, modulo `ppr`
    pub sync_value: i32,
    /// Whether Z-index resynchronization is enabled
    pub zsync: bool,
    /// Channel A input configuration
    pub pin_a: PinSetup,
    /// Channel B input configuration
    pub pin_b: PinSetup,
    /// Z index input configuration
    pub pin_z: PinSetup,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            convention: RotationConvention::CwPositive,
            ppr: 0,
            sync_value: 0,
            zsync: false,
            pin_a: PinSetup::default(),
            pin_b: PinSetup::default(),
            pin_z: PinSetup::default(),
        }
    }
}

impl EncoderConfig {
    /// Set the rotation convention
    pub fn with_convention(mut self, convention: RotationConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Enable Z-index resynchronization with the given pulses per
    /// revolution and sync offset. A non-positive `ppr` keeps it disabled.
    pub fn with_zsync(mut self, ppr: i32, sync_value: i32) -> Self {
        self.ppr = ppr;
        self.sync_value = sync_value;
        self.zsync = ppr > 0;
        self
    }

    /// Set the channel A pin configuration
    pub fn with_pin_a(mut self, setup: PinSetup) -> Self {
        self.pin_a = setup;
        self
    }

    /// Set the channel B pin configuration
    pub fn with_pin_b(mut self, setup: PinSetup) -> Self {
        self.pin_b = setup;
        self
    }

    /// Set the Z index pin configuration
    pub fn with_pin_z(mut self, setup: PinSetup) -> Self {
        self.pin_z = setup;
        self
    }
}

// ============================================================================
// Analog Config
// ============================================================================

/// Analog input configuration for the smoothing and ladder-button helpers
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalogConfig {
    /// Consecutive identical decodes required before a button press counts
    pub debounce_samples: u8,
    /// Raw ADC hysteresis applied around ladder thresholds
    pub hysteresis: u16,
}

impl Default for AnalogConfig {
    fn default() -> Self {
        Self {
            debounce_samples: 3,
            hysteresis: 32,
        }
    }
}

impl AnalogConfig {
    /// Set the debounce sample count
    pub fn with_debounce_samples(mut self, samples: u8) -> Self {
        self.debounce_samples = samples;
        self
    }

    /// Set the threshold hysteresis
    pub fn with_hysteresis(mut self, hysteresis: u16) -> Self {
        self.hysteresis = hysteresis;
        self
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name
    pub name: ShortString,
    /// Device ID (for multi-device setups)
    pub id: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("rs-periph"),
            id: short_string("dev1"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }

    /// Set the device ID
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = short_string(id);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
