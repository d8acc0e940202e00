//! Generic call-rate limiter over closures.
//!
//! Wraps any `FnMut` so it runs at most once per interval, for pacing slow
//! work (display refresh, serial prints, telemetry) from a fast main loop.
//! Time comes in as a millisecond timestamp, typically from a
//! [`Clock`](crate::traits::Clock) implementation, so the limiter itself
//! stays hardware-free and testable.
//!
//! # Example
//!
//! ```rust
//! use rs_periph::throttle::Throttle;
//!
//! let mut calls = 0u32;
//! let mut throttle = Throttle::new(100, || calls += 1);
//!
//! assert!(throttle.poll(0));    // first call always runs
//! assert!(!throttle.poll(50));  // suppressed
//! assert!(throttle.poll(100));  // interval elapsed
//! drop(throttle);
//! assert_eq!(calls, 2);
//! ```

/// Runs a closure at most once per interval.
pub struct Throttle<F> {
    f: F,
    interval_ms: u64,
    last_run: Option<u64>,
    suppressed: u32,
}

impl<F: FnMut()> Throttle<F> {
    /// Creates a limiter that lets `f` run at most once per `interval_ms`.
    pub fn new(interval_ms: u64, f: F) -> Self {
        Self {
            f,
            interval_ms,
            last_run: None,
            suppressed: 0,
        }
    }

    /// Runs the closure if the interval has elapsed since the last run.
    ///
    /// Returns true if the closure ran. The first poll always runs.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let due = match self.last_run {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        };
        if due {
            self.last_run = Some(now_ms);
            (self.f)();
        } else {
            self.suppressed = self.suppressed.saturating_add(1);
        }
        due
    }

    /// Runs the closure unconditionally and restarts the interval.
    pub fn force(&mut self, now_ms: u64) {
        self.last_run = Some(now_ms);
        (self.f)();
    }

    /// Number of polls suppressed since construction or the last
    /// [`reset_suppressed`](Self::reset_suppressed).
    pub fn suppressed(&self) -> u32 {
        self.suppressed
    }

    /// Clears the suppressed-call counter.
    pub fn reset_suppressed(&mut self) {
        self.suppressed = 0;
    }

    /// Changes the interval; takes effect on the next poll.
    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }
}
