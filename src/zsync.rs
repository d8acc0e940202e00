//! Z-index resynchronization: snapping the counter to the nearest valid
//! absolute position when the once-per-revolution reference pulse fires.
//!
//! Electrical noise loses and invents quadrature edges, so the accumulated
//! count drifts away from the true mechanical position. The Z pulse marks a
//! known position modulo one revolution; when it fires, the counter is
//! corrected to the *nearest* value congruent to `sync_value mod ppr` —
//! rounding to nearest rather than always in one direction tolerates the
//! counter being anywhere within half a revolution of truth.
//!
//! Corrections are tallied in [`DriftStats`]: the absolute counter is a
//! health signal, the signed counter exposes systematic bias such as pulses
//! consistently missed in one direction.

/// Cumulative drift-correction statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriftStats {
    /// Net signed pulses corrected (bias detector).
    pub net: i64,
    /// Total pulses corrected regardless of sign (health monitor).
    pub absolute: u64,
}

impl DriftStats {
    fn record(&mut self, correction: i32) {
        self.net += correction as i64;
        self.absolute += correction.unsigned_abs() as u64;
    }
}

/// Z-index resynchronization state.
///
/// Disabled by default; enable with a positive pulses-per-revolution count
/// and the position expected at the reference pulse.
#[derive(Clone, Debug, Default)]
pub struct ZSync {
    enabled: bool,
    ppr: i32,
    sync_value: i32,
    stats: DriftStats,
}

impl ZSync {
    /// Creates a disabled Z-sync.
    pub const fn new() -> Self {
        Self {
            enabled: false,
            ppr: 0,
            sync_value: 0,
            stats: DriftStats { net: 0, absolute: 0 },
        }
    }

    /// Enables correction with the given pulses-per-revolution and the
    /// counter value expected at the reference pulse (modulo `ppr`).
    ///
    /// A non-positive `ppr` leaves the sync disabled: correction is
    /// guarded, not an error.
    pub fn enable(&mut self, ppr: i32, sync_value: i32) {
        self.ppr = ppr;
        self.sync_value = sync_value;
        self.enabled = ppr > 0;
    }

    /// Disables correction. Drift statistics are retained.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Whether corrections are currently applied.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Configured pulses per revolution.
    #[inline]
    pub fn ppr(&self) -> i32 {
        self.ppr
    }

    /// Cumulative correction statistics.
    #[inline]
    pub fn stats(&self) -> DriftStats {
        self.stats
    }

    /// Clears the drift counters.
    pub fn reset_stats(&mut self) {
        self.stats = DriftStats::default();
    }

    /// Computes and records the correction for `position`, returning the
    /// signed amount to add so the counter lands on the nearest value
    /// congruent to `sync_value mod ppr`.
    ///
    /// Returns 0 when disabled or already congruent. Truncating remainder
    /// semantics: the sign of the stray follows `position - sync_value`.
    pub fn resync(&mut self, position: i32) -> i32 {
        if !self.enabled || self.ppr <= 0 {
            return 0;
        }

        let adjusted = position - self.sync_value;
        let stray = adjusted % self.ppr;
        let half = self.ppr / 2;

        let correction = if stray == 0 {
            0
        } else if stray > 0 {
            if stray >= half {
                self.ppr - stray // round up to the next multiple
            } else {
                -stray // round down to the previous multiple
            }
        } else if -stray >= half {
            -(self.ppr + stray) // round down to the next lower multiple
        } else {
            -stray // round up toward the nearer multiple
        };

        if correction != 0 {
            self.stats.record(correction);
        }
        correction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrected(position: i32, ppr: i32, sync_value: i32) -> i32 {
        let mut z = ZSync::new();
        z.enable(ppr, sync_value);
        position + z.resync(position)
    }

    #[test]
    fn reference_correction_table() {
        assert_eq!(corrected(99, 100, 0), 100);
        assert_eq!(corrected(49, 100, 0), 0);
        assert_eq!(corrected(-101, 100, 0), -100);
        assert_eq!(corrected(300, 400, 50), 450);
        assert_eq!(corrected(249, 400, 50), 50);
    }

    #[test]
    fn idempotent_when_congruent() {
        let mut z = ZSync::new();
        z.enable(100, 25);

        for position in [25, 125, -75, 1025] {
            assert_eq!(z.resync(position), 0);
        }
        assert_eq!(z.stats(), DriftStats::default());
    }

    #[test]
    fn negative_strays_are_symmetric() {
        // Mirror images of the positive vectors.
        assert_eq!(corrected(-99, 100, 0), -100);
        assert_eq!(corrected(-49, 100, 0), 0);
        assert_eq!(corrected(101, 100, 0), 100);
    }

    #[test]
    fn exact_half_rounds_to_next_multiple() {
        assert_eq!(corrected(50, 100, 0), 100);
        assert_eq!(corrected(-50, 100, 0), -100);
    }

    #[test]
    fn drift_counters_accumulate() {
        let mut z = ZSync::new();
        z.enable(100, 0);

        // +1 correction (99 -> 100), then -3 correction (103 -> 100).
        assert_eq!(z.resync(99), 1);
        assert_eq!(z.resync(103), -3);

        let stats = z.stats();
        assert_eq!(stats.net, -2);
        assert_eq!(stats.absolute, 4);

        z.reset_stats();
        assert_eq!(z.stats(), DriftStats::default());
    }

    #[test]
    fn zero_ppr_disables_correction() {
        let mut z = ZSync::new();
        z.enable(0, 0);
        assert!(!z.is_enabled());
        assert_eq!(z.resync(1234), 0);
        assert_eq!(z.stats(), DriftStats::default());
    }

    #[test]
    fn disable_keeps_stats() {
        let mut z = ZSync::new();
        z.enable(100, 0);
        z.resync(99);
        z.disable();
        assert_eq!(z.resync(42), 0);
        assert_eq!(z.stats().absolute, 1);
    }
}
