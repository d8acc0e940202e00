//! Hardware abstraction traits for encoder pins, interrupts, time, and
//! analog input.
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`QuadratureInput`] | Raw digital sampling of the A/B/Z pins |
//! | [`InterruptControl`] | Attach/detach the edge interrupt |
//! | [`Clock`] | Time source for `no_std` environments |
//! | [`AnalogSource`] | Raw ADC reads for the analog helpers |
//!
//! Implementations read *raw* electrical levels; polarity translation
//! happens in the core against the configured [`PinSetup`].
//!
//! [`PinSetup`]: crate::pins::PinSetup

/// Raw digital access to the quadrature pins.
///
/// Called from inside the interrupt handler, so implementations must be
/// non-blocking and safe to invoke in interrupt context. Both A and B are
/// sampled on every edge rather than trusting the interrupt's reported pin;
/// this avoids races when both channels change within the ISR-latency
/// window.
pub trait QuadratureInput {
    /// Raw level of channel A (true = electrically high).
    fn read_a(&self) -> bool;

    /// Raw level of channel B.
    fn read_b(&self) -> bool;

    /// Raw level of the Z index pin, or `None` if no Z pin is wired.
    fn read_z(&self) -> Option<bool> {
        None
    }
}

/// Control over the edge interrupt driving the encoder.
///
/// Disabling is the only cancellation primitive and is not atomic with
/// respect to an in-flight invocation: callers must tolerate at most one
/// more counted edge after requesting disablement.
pub trait InterruptControl {
    /// Error type for interrupt operations.
    type Error;

    /// Enables edge interrupts on both quadrature channels.
    fn enable_interrupt(&mut self) -> Result<(), Self::Error>;

    /// Disables edge interrupts.
    fn disable_interrupt(&mut self) -> Result<(), Self::Error>;
}

/// Time source trait for `no_std` compatibility.
///
/// Provides monotonic time in milliseconds for throttling and debounce.
/// On desktop this can wrap `std::time::Instant`; on embedded, a hardware
/// timer.
///
/// # Example
///
/// ```rust
/// use rs_periph::traits::Clock;
/// use rs_periph::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}

/// Raw analog input source.
///
/// Readings are raw ADC counts; scaling and smoothing live in
/// [`crate::analog`].
pub trait AnalogSource {
    /// Error type for ADC operations.
    type Error;

    /// Reads one raw sample.
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}
