//! Retrying wrapper around an `embedded-hal` I2C bus.
//!
//! Long cable runs to display boards and port expanders produce the
//! occasional NACK or arbitration glitch. [`I2cRetry`] wraps any
//! [`embedded_hal::i2c::I2c`] implementation and re-attempts a failed
//! transaction a bounded number of times before surfacing the error.
//! Because it implements `I2c` itself, drivers stack on top of it
//! unchanged.
//!
//! Transactions are retried whole. A transaction that partially completed
//! on the wire is re-issued from the start, which is the right call for
//! register-style devices where writes are idempotent.

use embedded_hal::i2c::{AddressMode, ErrorType, I2c, Operation};

/// Counters kept by [`I2cRetry`] across its lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct I2cStats {
    /// Transactions attempted, including retries.
    pub attempts: u32,
    /// Attempts that returned an error.
    pub failures: u32,
    /// Transactions that failed at least once and then succeeded.
    pub recoveries: u32,
}

/// I2C bus wrapper that retries failed transactions.
///
/// # Example
///
/// ```rust
/// use embedded_hal::i2c::I2c;
/// use rs_periph::hal::MockI2cBus;
/// use rs_periph::i2c::I2cRetry;
///
/// // A bus that NACKs twice before answering.
/// let bus = MockI2cBus::new().with_failures(2);
/// let mut bus = I2cRetry::new(bus, 3);
///
/// bus.write(0x27, &[0x80, 0x01]).unwrap();
/// assert_eq!(bus.stats().recoveries, 1);
/// ```
pub struct I2cRetry<B> {
    bus: B,
    max_retries: u8,
    stats: I2cStats,
}

impl<B> I2cRetry<B> {
    /// Wraps `bus`, allowing up to `max_retries` re-attempts per
    /// transaction (so `max_retries + 1` attempts total).
    pub fn new(bus: B, max_retries: u8) -> Self {
        Self {
            bus,
            max_retries,
            stats: I2cStats::default(),
        }
    }

    /// Attempt and failure counters.
    pub fn stats(&self) -> I2cStats {
        self.stats
    }

    /// Clears the counters.
    pub fn reset_stats(&mut self) {
        self.stats = I2cStats::default();
    }

    /// Consumes the wrapper, returning the inner bus.
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: ErrorType> ErrorType for I2cRetry<B> {
    type Error = B::Error;
}

impl<A: AddressMode + Copy, B: I2c<A>> I2c<A> for I2cRetry<B> {
    fn transaction(
        &mut self,
        address: A,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut attempt = 0u8;
        loop {
            self.stats.attempts += 1;
            match self.bus.transaction(address, &mut *operations) {
                Ok(()) => {
                    if attempt > 0 {
                        self.stats.recoveries += 1;
                    }
                    return Ok(());
                }
                Err(err) => {
                    self.stats.failures += 1;
                    if attempt >= self.max_retries {
                        return Err(err);
                    }
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockI2cBus;

    #[test]
    fn passes_through_on_clean_bus() {
        let mut bus = I2cRetry::new(MockI2cBus::new(), 3);
        bus.write(0x27, &[0x01, 0x02]).unwrap();

        let stats = bus.stats();
        assert_eq!(stats.attempts, 1);
        assert_eq!(stats.failures, 0);
        assert_eq!(stats.recoveries, 0);
    }

    #[test]
    fn recovers_within_retry_budget() {
        let mut bus = I2cRetry::new(MockI2cBus::new().with_failures(2), 3);
        bus.write(0x27, &[0xaa]).unwrap();

        let stats = bus.stats();
        assert_eq!(stats.attempts, 3);
        assert_eq!(stats.failures, 2);
        assert_eq!(stats.recoveries, 1);
        assert_eq!(bus.release().writes(), 1);
    }

    #[test]
    fn surfaces_error_when_budget_exhausted() {
        let mut bus = I2cRetry::new(MockI2cBus::new().with_failures(5), 2);
        assert!(bus.write(0x27, &[0xaa]).is_err());

        let stats = bus.stats();
        assert_eq!(stats.attempts, 3); // 1 initial + 2 retries
        assert_eq!(stats.failures, 3);
        assert_eq!(stats.recoveries, 0);
    }

    #[test]
    fn zero_retries_fails_on_first_error() {
        let mut bus = I2cRetry::new(MockI2cBus::new().with_failures(1), 0);
        assert!(bus.write(0x27, &[0xaa]).is_err());
        assert_eq!(bus.stats().attempts, 1);
    }

    #[test]
    fn read_data_survives_retry() {
        let mut bus = I2cRetry::new(
            MockI2cBus::new().with_failures(1).with_read_byte(0x5a),
            3,
        );
        let mut buf = [0u8; 2];
        bus.read(0x27, &mut buf).unwrap();
        assert_eq!(buf, [0x5a, 0x5a]);
        assert_eq!(bus.stats().recoveries, 1);
    }
}
