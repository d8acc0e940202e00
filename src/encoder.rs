//! ISR-driven quadrature encoder counter with trigger and Z-index support.
//!
//! [`Encoder`] owns the quadrature pins (behind the [`QuadratureInput`]
//! seam) and a position counter shared between the interrupt handler and
//! the main program. All shared state lives under a single
//! `critical_section::Mutex`; every main-context accessor takes the same
//! lock the ISR takes, so multi-byte reads can never tear.
//!
//! The crate does not own the interrupt vector: the platform layer
//! registers a trampoline that calls [`Encoder::on_edge`] on any edge of
//! A or B (see `hal::esp32` for the esp-idf wiring, or drive it manually
//! from tests).
//!
//! # Example
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
//!     .with_pin_b(PinSetup::push_pull(ActiveLevel::High));
//! let encoder = Encoder::new(pins.clone(), &config);
//!
//! // Simulate one clockwise edge: A rises while B is low.
//! pins.set_levels(true, false);
//! encoder.on_edge();
//! assert_eq!(encoder.position(), 1);
//! ```

extern crate alloc;

use alloc::boxed::Box;
use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::EncoderConfig;
use crate::decoder::{QuadDecoder, RotationConvention, Z_WINDOW_CCW, Z_WINDOW_CW};
use crate::pins::ActiveLevel;
use crate::traits::QuadratureInput;
use crate::zsync::{DriftStats, ZSync};

/// One-shot position watch.
struct Trigger {
    target: i32,
    callback: Box<dyn FnOnce() + Send>,
}

/// Everything the ISR and the main program share.
struct EncoderCore {
    position: i32,
    decoder: QuadDecoder,
    active_a: ActiveLevel,
    active_b: ActiveLevel,
    active_z: ActiveLevel,
    trigger: Option<Trigger>,
    zsync: ZSync,
}

/// Quadrature encoder counter shared between interrupt and main context.
///
/// # Locking discipline
///
/// `position`, the trigger and the drift statistics are only ever touched
/// inside `critical_section::with`. Configuration setters (convention,
/// PPR, sync value) go through the same section, so reconfiguring while
/// interrupts are live is safe — unlike the usual Arduino pattern where
/// config reads race the ISR.
pub struct Encoder<P: QuadratureInput> {
    pins: P,
    core: Mutex<RefCell<EncoderCore>>,
}

impl<P: QuadratureInput> Encoder<P> {
    /// Creates an encoder over the given pins.
    ///
    /// Seeds the decoder history from the current pin levels so the first
    /// interrupt decodes a real transition. Z-sync starts enabled only if
    /// the config asks for it with a positive PPR.
    pub fn new(pins: P, config: &EncoderConfig) -> Self {
        let mut decoder = QuadDecoder::new(config.convention);
        decoder.prime(
            config.pin_a.active.translate(pins.read_a()),
            config.pin_b.active.translate(pins.read_b()),
        );

        let mut zsync = ZSync::new();
        if config.zsync {
            zsync.enable(config.ppr, config.sync_value);
        }

        Self {
            pins,
            core: Mutex::new(RefCell::new(EncoderCore {
                position: 0,
                decoder,
                active_a: config.pin_a.active,
                active_b: config.pin_b.active,
                active_z: config.pin_z.active,
                trigger: None,
                zsync,
            })),
        }
    }

    /// Runs `f` with the shared state locked against the ISR.
    fn with_core<R>(&self, f: impl FnOnce(&mut EncoderCore) -> R) -> R {
        critical_section::with(|cs| f(&mut self.core.borrow_ref_mut(cs)))
    }

    /// The interrupt entry point. Call on any edge of A or B.
    ///
    /// Samples both pins, translates polarity, applies the table step,
    /// resynchronizes against the Z pulse when the reference window is
    /// entered, and checks the trigger. If the trigger fires, its callback
    /// runs *after* the critical section is released so user code never
    /// executes with interrupts locked out.
    pub fn on_edge(&self) {
        let fired = critical_section::with(|cs| {
            let mut inner = self.core.borrow_ref_mut(cs);

            let a = inner.active_a.translate(self.pins.read_a());
            let b = inner.active_b.translate(self.pins.read_b());
            let step = inner.decoder.feed(a, b);
            inner.position = inner.position.wrapping_add(step as i32);

            if inner.zsync.is_enabled() {
                let code = inner.decoder.code();
                if code == Z_WINDOW_CW || code == Z_WINDOW_CCW {
                    if let Some(raw) = self.pins.read_z() {
                        if inner.active_z.translate(raw) {
                            let position = inner.position;
                            let correction = inner.zsync.resync(position);
                            inner.position = position.wrapping_add(correction);
                        }
                    }
                }
            }

            let hit = matches!(&inner.trigger, Some(t) if t.target == inner.position);
            if hit {
                inner.trigger.take().map(|t| t.callback)
            } else {
                None
            }
        });

        if let Some(callback) = fired {
            callback();
        }
    }

    // =========================================================================
    // Position access
    // =========================================================================

    /// Current position. Locked read; safe against a concurrent ISR.
    pub fn position(&self) -> i32 {
        self.with_core(|c| c.position)
    }

    /// Sets the position to an absolute value.
    ///
    /// Does not evaluate the trigger: only ISR-driven changes can fire it.
    pub fn set_position(&self, value: i32) {
        self.with_core(|c| c.position = value);
    }

    /// Adds a signed delta to the position. Trigger is not evaluated.
    pub fn adjust(&self, delta: i32) {
        self.with_core(|c| c.position = c.position.wrapping_add(delta));
    }

    /// Increments the position by one.
    pub fn increment(&self) {
        self.adjust(1);
    }

    /// Decrements the position by one.
    pub fn decrement(&self) {
        self.adjust(-1);
    }

    // =========================================================================
    // Trigger
    // =========================================================================

    /// Arms a one-shot watch: when an ISR-driven change lands the counter
    /// exactly on `target`, the trigger disarms and `callback` runs (outside
    /// the critical section). Re-arming replaces any previous trigger.
    pub fn set_trigger_at(&self, target: i32, callback: impl FnOnce() + Send + 'static) {
        self.with_core(|c| {
            c.trigger = Some(Trigger {
                target,
                callback: Box::new(callback),
            })
        });
    }

    /// Disarms the trigger. Returns true if one was armed.
    pub fn cancel_trigger(&self) -> bool {
        self.with_core(|c| c.trigger.take().is_some())
    }

    /// Whether a trigger is currently armed.
    pub fn trigger_armed(&self) -> bool {
        self.with_core(|c| c.trigger.is_some())
    }

    // =========================================================================
    // Z-index sync
    // =========================================================================

    /// Enables Z-index correction. A non-positive `ppr` leaves it disabled.
    pub fn set_zsync(&self, ppr: i32, sync_value: i32) {
        self.with_core(|c| c.zsync.enable(ppr, sync_value));
    }

    /// Disables Z-index correction; drift statistics are kept.
    pub fn disable_zsync(&self) {
        self.with_core(|c| c.zsync.disable());
    }

    /// Whether Z-index correction is active.
    pub fn zsync_enabled(&self) -> bool {
        self.with_core(|c| c.zsync.is_enabled())
    }

    /// Cumulative drift-correction statistics.
    pub fn drift(&self) -> DriftStats {
        self.with_core(|c| c.zsync.stats())
    }

    /// Clears the drift counters.
    pub fn reset_drift(&self) {
        self.with_core(|c| c.zsync.reset_stats());
    }

    // =========================================================================
    // Misc
    // =========================================================================

    /// Switches the rotation convention. Takes the lock like everything
    /// else, so it is safe with interrupts enabled.
    pub fn set_convention(&self, convention: RotationConvention) {
        self.with_core(|c| c.decoder.set_convention(convention));
    }

    /// Raw electrical level of the Z pin, if wired.
    pub fn z_raw(&self) -> Option<bool> {
        self.pins.read_z()
    }

    /// Polarity-translated Z level, if wired.
    pub fn z_active(&self) -> Option<bool> {
        let raw = self.pins.read_z()?;
        Some(self.with_core(|c| c.active_z.translate(raw)))
    }

    /// Access to the underlying pins (for platform interrupt wiring).
    pub fn pins(&self) -> &P {
        &self.pins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockPins;
    use crate::pins::PinSetup;
    use core::sync::atomic::{AtomicUsize, Ordering};

    fn push_pull_config() -> EncoderConfig {
        EncoderConfig::default()
            .with_pin_a(PinSetup::push_pull(ActiveLevel::High))
            .with_pin_b(PinSetup::push_pull(ActiveLevel::High))
            .with_pin_z(PinSetup::push_pull(ActiveLevel::High))
    }

    /// Drives one full gray-code step and fires the "ISR".
    fn step(pins: &MockPins, encoder: &Encoder<MockPins>, phase: usize) {
        pins.set_phase(phase as u8);
        encoder.on_edge();
    }

    fn rotate_cw(pins: &MockPins, encoder: &Encoder<MockPins>, edges: usize) {
        let mut phase = pins.phase() as usize;
        for _ in 0..edges {
            phase = (phase + 1) % 4;
            step(pins, encoder, phase);
        }
    }

    fn rotate_ccw(pins: &MockPins, encoder: &Encoder<MockPins>, edges: usize) {
        let mut phase = pins.phase() as usize;
        for _ in 0..edges {
            phase = (phase + 3) % 4;
            step(pins, encoder, phase);
        }
    }

    #[test]
    fn counts_full_revolution_both_directions() {
        let pins = MockPins::new();
        let encoder = Encoder::new(pins.clone(), &push_pull_config());

        let ppr = 100;
        rotate_cw(&pins, &encoder, ppr);
        assert_eq!(encoder.position(), ppr as i32);

        rotate_ccw(&pins, &encoder, 2 * ppr);
        assert_eq!(encoder.position(), -(ppr as i32));
    }

    #[test]
    fn explicit_writes_share_the_lock() {
        let pins = MockPins::new();
        let encoder = Encoder::new(pins.clone(), &push_pull_config());

        encoder.set_position(10);
        encoder.adjust(-3);
        encoder.increment();
        encoder.decrement();
        assert_eq!(encoder.position(), 7);

        rotate_cw(&pins, &encoder, 5);
        assert_eq!(encoder.position(), 12);
    }

    #[test]
    fn trigger_fires_exactly_once() {
        static FIRES: AtomicUsize = AtomicUsize::new(0);
        FIRES.store(0, Ordering::SeqCst);

        let pins = MockPins::new();
        let encoder = Encoder::new(pins.clone(), &push_pull_config());

        encoder.set_trigger_at(3, || {
            FIRES.fetch_add(1, Ordering::SeqCst);
        });

        rotate_cw(&pins, &encoder, 10);
        assert_eq!(FIRES.load(Ordering::SeqCst), 1);
        assert!(!encoder.trigger_armed());

        // Passing through the target again does not re-fire.
        rotate_ccw(&pins, &encoder, 10);
        assert_eq!(FIRES.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancelled_trigger_never_fires() {
        static FIRES: AtomicUsize = AtomicUsize::new(0);
        FIRES.store(0, Ordering::SeqCst);

        let pins = MockPins::new();
        let encoder = Encoder::new(pins.clone(), &push_pull_config());

        encoder.set_trigger_at(3, || {
            FIRES.fetch_add(1, Ordering::SeqCst);
        });
        assert!(encoder.cancel_trigger());
        assert!(!encoder.cancel_trigger());

        rotate_cw(&pins, &encoder, 10);
        assert_eq!(FIRES.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn explicit_set_does_not_fire_trigger() {
        static FIRES: AtomicUsize = AtomicUsize::new(0);
        FIRES.store(0, Ordering::SeqCst);

        let pins = MockPins::new();
        let encoder = Encoder::new(pins.clone(), &push_pull_config());

        encoder.set_trigger_at(42, || {
            FIRES.fetch_add(1, Ordering::SeqCst);
        });
        encoder.set_position(42);
        assert_eq!(FIRES.load(Ordering::SeqCst), 0);
        assert!(encoder.trigger_armed());
    }

    #[test]
    fn zsync_corrects_at_reference_window() {
        let pins = MockPins::new().with_z(false);
        let config = push_pull_config().with_zsync(100, 0);
        let encoder = Encoder::new(pins.clone(), &config);

        // Drift the counter by one missed pulse: pretend we are at 99
        // when the mechanical revolution completes.
        encoder.set_position(97);

        // Walk clockwise into the (1,1) state with Z asserted. Phases:
        // 0 -> 1 -> 2 lands on (1,1) with code Z_WINDOW_CW.
        pins.set_phase(1);
        encoder.on_edge(); // position 98
        pins.set_z(true);
        pins.set_phase(2);
        encoder.on_edge(); // position 99, then snapped to 100

        assert_eq!(encoder.position(), 100);
        let drift = encoder.drift();
        assert_eq!(drift.net, 1);
        assert_eq!(drift.absolute, 1);
    }

    #[test]
    fn zsync_ignores_inactive_z() {
        let pins = MockPins::new().with_z(false);
        let config = push_pull_config().with_zsync(100, 0);
        let encoder = Encoder::new(pins.clone(), &config);

        encoder.set_position(98);
        pins.set_phase(1);
        encoder.on_edge();
        pins.set_phase(2); // Z stays low
        encoder.on_edge();

        assert_eq!(encoder.position(), 100);
        assert_eq!(encoder.drift(), DriftStats::default());
    }

    #[test]
    fn active_low_polarity_inverts_counting() {
        // NPN open-collector: idle high, active low. Inverting both
        // channels preserves the gray sequence, so counting still works
        // when the mock drives the raw (inverted) levels.
        let pins = MockPins::new();
        pins.set_levels(true, true); // both idle (logical 00)

        let config = EncoderConfig::default()
            .with_pin_a(PinSetup::open_collector(crate::pins::OpenCollector::Npn))
            .with_pin_b(PinSetup::open_collector(crate::pins::OpenCollector::Npn));
        let encoder = Encoder::new(pins.clone(), &config);

        // Logical CW step 00 -> 10 is raw 11 -> 01.
        pins.set_levels(false, true);
        encoder.on_edge();
        assert_eq!(encoder.position(), 1);
    }

    #[test]
    fn convention_flip_reverses_future_steps() {
        let pins = MockPins::new();
        let encoder = Encoder::new(pins.clone(), &push_pull_config());

        rotate_cw(&pins, &encoder, 4);
        assert_eq!(encoder.position(), 4);

        encoder.set_convention(RotationConvention::CcwPositive);
        rotate_cw(&pins, &encoder, 4);
        assert_eq!(encoder.position(), 0);
    }
}
