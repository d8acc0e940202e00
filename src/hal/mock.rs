//! Mock hardware implementations for host-side tests.
//!
//! Everything here is deterministic and script-driven: tests set pin
//! levels, advance the clock, queue ADC samples, and then assert on what
//! the code under test did. The mocks use shared interior state
//! (`Arc<AtomicU8>` for pins) so a test can keep a handle while the
//! encoder owns its clone, mirroring how the real pins are shared with
//! the interrupt handler.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::convert::Infallible;
use core::sync::atomic::{AtomicU8, Ordering};

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation, SevenBitAddress};

use crate::traits::{AnalogSource, CharacterSink, Clock, InterruptControl, QuadratureInput};

// ============================================================================
// MockPins
// ============================================================================

const BIT_A: u8 = 1 << 0;
const BIT_B: u8 = 1 << 1;
const BIT_Z: u8 = 1 << 2;
const BIT_Z_WIRED: u8 = 1 << 3;

/// Gray sequence of (A, B) levels for clockwise rotation.
const PHASES: [(bool, bool); 4] = [(false, false), (true, false), (true, true), (false, true)];

/// Simulated quadrature pins.
///
/// Levels live behind an `Arc`, so clones observe each other's writes.
/// Tests typically clone one handle into the encoder and keep the other
/// to drive the "hardware".
///
/// # Example
///
/// ```rust
/// use rs_periph::hal::MockPins;
/// use rs_periph::traits::QuadratureInput;
///
/// let pins = MockPins::new();
/// let encoder_side = pins.clone();
///
/// pins.set_levels(true, false);
/// assert!(encoder_side.read_a());
/// assert!(!encoder_side.read_b());
/// assert_eq!(encoder_side.read_z(), None); // no Z wired by default
/// ```
#[derive(Clone)]
pub struct MockPins {
    state: Arc<AtomicU8>,
}

impl MockPins {
    /// Creates pins with A and B low and no Z pin wired.
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(0)),
        }
    }

    /// Wires up a Z pin at the given initial level.
    pub fn with_z(self, level: bool) -> Self {
        let mut bits = BIT_Z_WIRED;
        if level {
            bits |= BIT_Z;
        }
        self.state.fetch_or(bits, Ordering::SeqCst);
        self
    }

    /// Sets the raw A and B levels.
    pub fn set_levels(&self, a: bool, b: bool) {
        let mut bits = self.state.load(Ordering::SeqCst);
        loop {
            let mut next = bits & !(BIT_A | BIT_B);
            if a {
                next |= BIT_A;
            }
            if b {
                next |= BIT_B;
            }
            match self
                .state
                .compare_exchange(bits, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return,
                Err(cur) => bits = cur,
            }
        }
    }

    /// Sets A and B to gray-code phase `0..=3` (clockwise order).
    pub fn set_phase(&self, phase: u8) {
        let (a, b) = PHASES[(phase & 0b11) as usize];
        self.set_levels(a, b);
    }

    /// Current gray-code phase index derived from the levels.
    pub fn phase(&self) -> u8 {
        let bits = self.state.load(Ordering::SeqCst);
        match (bits & BIT_A != 0, bits & BIT_B != 0) {
            (false, false) => 0,
            (true, false) => 1,
            (true, true) => 2,
            (false, true) => 3,
        }
    }

    /// Sets the Z pin level. Wires the pin up if it was absent.
    pub fn set_z(&self, level: bool) {
        if level {
            self.state.fetch_or(BIT_Z_WIRED | BIT_Z, Ordering::SeqCst);
        } else {
            self.state.fetch_or(BIT_Z_WIRED, Ordering::SeqCst);
            self.state.fetch_and(!BIT_Z, Ordering::SeqCst);
        }
    }
}

impl Default for MockPins {
    fn default() -> Self {
        Self::new()
    }
}

impl QuadratureInput for MockPins {
    fn read_a(&self) -> bool {
        self.state.load(Ordering::SeqCst) & BIT_A != 0
    }

    fn read_b(&self) -> bool {
        self.state.load(Ordering::SeqCst) & BIT_B != 0
    }

    fn read_z(&self) -> Option<bool> {
        let bits = self.state.load(Ordering::SeqCst);
        if bits & BIT_Z_WIRED != 0 {
            Some(bits & BIT_Z != 0)
        } else {
            None
        }
    }
}

// ============================================================================
// MockInterrupt
// ============================================================================

/// Interrupt control double tracking the enabled state and how often it
/// was toggled.
#[derive(Debug, Default)]
pub struct MockInterrupt {
    enabled: bool,
    toggles: u32,
}

impl MockInterrupt {
    /// Creates a disabled interrupt control.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether interrupts are currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of enable/disable transitions seen.
    pub fn toggles(&self) -> u32 {
        self.toggles
    }
}

impl InterruptControl for MockInterrupt {
    type Error = Infallible;

    fn enable_interrupt(&mut self) -> Result<(), Self::Error> {
        if !self.enabled {
            self.toggles += 1;
        }
        self.enabled = true;
        Ok(())
    }

    fn disable_interrupt(&mut self) -> Result<(), Self::Error> {
        if self.enabled {
            self.toggles += 1;
        }
        self.enabled = false;
        Ok(())
    }
}

// ============================================================================
// MockClock
// ============================================================================

/// Manually advanced clock for testing time-dependent code.
#[derive(Debug, Default)]
pub struct MockClock {
    now: u64,
}

impl MockClock {
    /// Creates a clock at t = 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jumps to an absolute time.
    pub fn set(&mut self, ms: u64) {
        self.now = ms;
    }

    /// Advances by `ms` milliseconds.
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now
    }
}

// ============================================================================
// MockAdc
// ============================================================================

/// Scripted ADC source. Plays back queued samples in order, then repeats
/// the last one.
pub struct MockAdc {
    samples: Vec<u16>,
    index: usize,
}

impl MockAdc {
    /// Creates a source that plays back `samples`.
    pub fn new(samples: &[u16]) -> Self {
        Self {
            samples: samples.to_vec(),
            index: 0,
        }
    }

    /// Appends more samples to the script.
    pub fn push(&mut self, raw: u16) {
        self.samples.push(raw);
    }
}

impl AnalogSource for MockAdc {
    type Error = Infallible;

    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        let raw = match self.samples.get(self.index) {
            Some(&v) => {
                self.index += 1;
                v
            }
            None => self.samples.last().copied().unwrap_or(0),
        };
        Ok(raw)
    }
}

// ============================================================================
// MockSink
// ============================================================================

/// Recording character sink. Keeps every cursor move and written byte
/// since construction or the last [`reset`](Self::reset).
#[derive(Debug, Default)]
pub struct MockSink {
    cursors: Vec<(u8, u8)>,
    bytes: Vec<u8>,
}

impl MockSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the recorded history.
    pub fn reset(&mut self) {
        self.cursors.clear();
        self.bytes.clear();
    }

    /// Number of cursor moves recorded.
    pub fn cursor_moves(&self) -> usize {
        self.cursors.len()
    }

    /// Recorded cursor positions as (col, row).
    pub fn cursors(&self) -> &[(u8, u8)] {
        &self.cursors
    }

    /// Bytes written, in order.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl CharacterSink for MockSink {
    type Error = Infallible;

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        self.cursors.push((col, row));
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.bytes.push(byte);
        Ok(())
    }
}

// ============================================================================
// MockI2cBus
// ============================================================================

/// Error returned by a scripted [`MockI2cBus`] failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockI2cError;

impl embedded_hal::i2c::Error for MockI2cError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// I2C bus that fails the first `n` transactions, then succeeds.
///
/// Reads are filled with a configurable byte; successful transactions
/// containing a write are counted so tests can assert how many writes
/// actually reached the device.
pub struct MockI2cBus {
    failures_left: u32,
    read_byte: u8,
    writes: u32,
}

impl MockI2cBus {
    /// Creates a bus that never fails and answers reads with zeros.
    pub fn new() -> Self {
        Self {
            failures_left: 0,
            read_byte: 0,
            writes: 0,
        }
    }

    /// Fails the next `n` transactions before recovering.
    pub fn with_failures(mut self, n: u32) -> Self {
        self.failures_left = n;
        self
    }

    /// Byte returned for every position of a read operation.
    pub fn with_read_byte(mut self, byte: u8) -> Self {
        self.read_byte = byte;
        self
    }

    /// Successful transactions that carried at least one write.
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl Default for MockI2cBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorType for MockI2cBus {
    type Error = MockI2cError;
}

impl I2c<SevenBitAddress> for MockI2cBus {
    fn transaction(
        &mut self,
        _address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(MockI2cError);
        }

        let mut wrote = false;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(_) => wrote = true,
                Operation::Read(buf) => buf.fill(self.read_byte),
            }
        }
        if wrote {
            self.writes += 1;
        }
        Ok(())
    }
}
