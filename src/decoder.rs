//! Quadrature transition decoding via a 4-bit state table.
//!
//! A quadrature encoder produces two phase-shifted signals:
//!
//! ```text
//!    +----+    +----+
//!    |    |    |    |       A
//!  --+    +----+    +----
//!       +----+    +----+
//!       |    |    |    |    B
//!   ----+    +----+    +--
//! ```
//!
//! Each interrupt samples both pins and packs the new pair together with
//! the previous pair into a 4-bit code `(A<<3) | (B<<2) | (a<<1) | b`
//! (uppercase = new sample, lowercase = previous). Only 8 of the 16 codes
//! are legal single-edge transitions; the other 8 (no change, or both bits
//! changing at once) decode to zero movement, which tolerates electrical
//! noise and missed edges instead of mis-counting them.
//!
//! The whole direction decision is one table lookup, which keeps ISR
//! latency to a handful of loads.

/// Which physical rotation direction counts as positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RotationConvention {
    /// Clockwise rotation increments the counter.
    #[default]
    CwPositive,
    /// Counter-clockwise rotation increments the counter.
    CcwPositive,
}

/// Step table for [`RotationConvention::CwPositive`].
///
/// Index is the 4-bit transition code `(A<<3)|(B<<2)|(a<<1)|b`. The gray
/// sequence clockwise is `00 -> 10 -> 11 -> 01 -> 00` (A is the high bit).
pub const CW_TABLE: [i8; 16] = [
    0,  // 0000  no change
    1,  // 0001  01 -> 00  cw
    -1, // 0010  10 -> 00  ccw
    0,  // 0011  11 -> 00  both changed
    -1, // 0100  00 -> 01  ccw
    0,  // 0101  no change
    0,  // 0110  10 -> 01  both changed
    1,  // 0111  11 -> 01  cw
    1,  // 1000  00 -> 10  cw
    0,  // 1001  01 -> 10  both changed
    0,  // 1010  no change
    -1, // 1011  11 -> 10  ccw
    0,  // 1100  00 -> 11  both changed
    -1, // 1101  01 -> 11  ccw
    1,  // 1110  10 -> 11  cw
    0,  // 1111  no change
];

/// Step table for [`RotationConvention::CcwPositive`], derived from
/// [`CW_TABLE`] by elementwise negation. Deriving it (instead of writing a
/// second literal) makes the negation invariant hold by construction.
pub const CCW_TABLE: [i8; 16] = negate(CW_TABLE);

const fn negate(table: [i8; 16]) -> [i8; 16] {
    let mut out = [0i8; 16];
    let mut i = 0;
    while i < 16 {
        out[i] = -table[i];
        i += 1;
    }
    out
}

/// Transition code for a clockwise entry into the (A,B) = (1,1) state.
///
/// Together with [`Z_WINDOW_CCW`] this marks the edge on which the Z index
/// pulse is sampled for resynchronization.
pub const Z_WINDOW_CW: u8 = 0b1110;

/// Transition code for a counter-clockwise entry into (A,B) = (1,1).
pub const Z_WINDOW_CCW: u8 = 0b1101;

impl RotationConvention {
    /// Returns the step table for this convention.
    #[inline]
    pub const fn table(self) -> &'static [i8; 16] {
        match self {
            RotationConvention::CwPositive => &CW_TABLE,
            RotationConvention::CcwPositive => &CCW_TABLE,
        }
    }
}

/// Rolling 4-bit quadrature state decoder.
///
/// Feed it one logical (A,B) sample per edge interrupt; it returns the
/// signed step for that transition. The previous sample is kept in the low
/// two bits of the history word.
///
/// # Example
///
/// ```rust
/// use rs_periph::decoder::{QuadDecoder, RotationConvention};
///
/// let mut dec = QuadDecoder::new(RotationConvention::CwPositive);
/// dec.prime(false, false);
///
/// // One clockwise gray-code cycle: 00 -> 10 -> 11 -> 01 -> 00
/// let steps: i32 = [(true, false), (true, true), (false, true), (false, false)]
///     .iter()
///     .map(|&(a, b)| dec.feed(a, b) as i32)
///     .sum();
/// assert_eq!(steps, 4);
/// ```
#[derive(Clone, Debug)]
pub struct QuadDecoder {
    /// 4-bit history: `(A<<3)|(B<<2)|(a<<1)|b`.
    history: u8,
    table: &'static [i8; 16],
}

impl QuadDecoder {
    /// Creates a decoder using the given rotation convention.
    pub const fn new(convention: RotationConvention) -> Self {
        Self {
            history: 0,
            table: convention.table(),
        }
    }

    /// Seeds the history with the current pin levels without counting.
    ///
    /// Call once before enabling interrupts so the first real edge is not
    /// decoded against a stale zero history.
    pub fn prime(&mut self, a: bool, b: bool) {
        self.history = pack(a, b) << 2;
    }

    /// Switches the rotation convention. Does not disturb the history.
    pub fn set_convention(&mut self, convention: RotationConvention) {
        self.table = convention.table();
    }

    /// Feeds one sampled (A,B) pair and returns the signed step.
    ///
    /// Shifts the history right by two (new pair becomes old pair), ORs the
    /// fresh sample into the top bits, and looks the code up.
    #[inline]
    pub fn feed(&mut self, a: bool, b: bool) -> i8 {
        self.history = (self.history >> 2) | (pack(a, b) << 2);
        self.table[self.history as usize]
    }

    /// The current 4-bit transition code (for Z-window matching).
    #[inline]
    pub fn code(&self) -> u8 {
        self.history
    }
}

#[inline]
const fn pack(a: bool, b: bool) -> u8 {
    ((a as u8) << 1) | (b as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_elementwise_negations() {
        for code in 0..16 {
            assert_eq!(
                CW_TABLE[code], -CCW_TABLE[code],
                "tables disagree at code {code:#06b}"
            );
        }
    }

    #[test]
    fn exactly_eight_legal_codes() {
        let moving = CW_TABLE.iter().filter(|&&s| s != 0).count();
        assert_eq!(moving, 8);

        // No-change codes (new pair == old pair) must be zero.
        for pair in 0..4u8 {
            let code = (pair << 2) | pair;
            assert_eq!(CW_TABLE[code as usize], 0);
        }
        // Both-bits-changed codes must be zero.
        for pair in 0..4u8 {
            let flipped = pair ^ 0b11;
            let code = (flipped << 2) | pair;
            assert_eq!(CW_TABLE[code as usize], 0);
        }
    }

    /// Naive reference decoder: tracks the gray sequence position directly.
    fn reference_step(old: (bool, bool), new: (bool, bool)) -> i32 {
        // Gray sequence clockwise, A first.
        const SEQ: [(bool, bool); 4] = [
            (false, false),
            (true, false),
            (true, true),
            (false, true),
        ];
        let from = SEQ.iter().position(|&s| s == old).unwrap() as i32;
        let to = SEQ.iter().position(|&s| s == new).unwrap() as i32;
        match (to - from).rem_euclid(4) {
            1 => 1,
            3 => -1,
            _ => 0, // no move or illegal two-step jump
        }
    }

    #[test]
    fn matches_naive_reference_over_random_walk() {
        const SEQ: [(bool, bool); 4] = [
            (false, false),
            (true, false),
            (true, true),
            (false, true),
        ];

        let mut dec = QuadDecoder::new(RotationConvention::CwPositive);
        dec.prime(false, false);

        // Deterministic pseudo-random walk over valid single-edge moves.
        let mut phase = 0usize;
        let mut lcg = 0x2545_f491u32;
        let mut table_sum = 0i32;
        let mut reference_sum = 0i32;

        for _ in 0..10_000 {
            lcg = lcg.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let dir = if lcg & 0x8000 != 0 { 1 } else { 3 }; // +1 or -1 mod 4
            let next = (phase + dir) % 4;

            reference_sum += reference_step(SEQ[phase], SEQ[next]);
            table_sum += dec.feed(SEQ[next].0, SEQ[next].1) as i32;
            phase = next;
        }

        assert_eq!(table_sum, reference_sum);
    }

    #[test]
    fn ccw_convention_flips_sign() {
        let mut cw = QuadDecoder::new(RotationConvention::CwPositive);
        let mut ccw = QuadDecoder::new(RotationConvention::CcwPositive);
        cw.prime(false, false);
        ccw.prime(false, false);

        for &(a, b) in &[(true, false), (true, true), (false, true), (false, false)] {
            assert_eq!(cw.feed(a, b), -ccw.feed(a, b));
        }
    }

    #[test]
    fn z_window_codes_are_legal_transitions() {
        assert_eq!(CW_TABLE[Z_WINDOW_CW as usize], 1);
        assert_eq!(CW_TABLE[Z_WINDOW_CCW as usize], -1);
    }

    #[test]
    fn illegal_double_edge_is_ignored() {
        let mut dec = QuadDecoder::new(RotationConvention::CwPositive);
        dec.prime(false, false);
        // 00 -> 11 flips both bits at once.
        assert_eq!(dec.feed(true, true), 0);
    }
}
