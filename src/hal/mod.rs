//! Hardware abstraction layer implementations.
//!
//! The mock implementations are always available and back the host-side
//! test suite; the ESP32 implementations compile only with the `esp32`
//! feature against esp-idf.

pub mod mock;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::{MockAdc, MockClock, MockI2cBus, MockInterrupt, MockPins, MockSink};
