//! Trait definitions for hardware abstraction.
//!
//! These are the seams that keep the core logic (transition tables, resync
//! arithmetic, diff rendering) testable on a host machine without real
//! hardware:
//!
//! - `hardware`: quadrature pin sampling, interrupt control, time source,
//!   analog input
//! - `display`: character-cell output sink
//!
//! For testing and desktop development, use the mock implementations from
//! [`crate::hal::mock`]. For ESP32 hardware, use `hal::esp32` (requires the
//! `esp32` feature).

pub mod display;
pub mod hardware;

pub use display::*;
pub use hardware::*;
