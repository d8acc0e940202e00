//! Analog input helpers: sample smoothing and resistor-ladder button
//! decoding.
//!
//! Both helpers are pure state machines over raw ADC counts; the actual
//! conversion happens behind the [`AnalogSource`](crate::traits::AnalogSource)
//! trait so they test on a host without hardware.

use heapless::HistoryBuffer;

use crate::config::AnalogConfig;

/// Moving-average smoother over the last `N` raw samples.
///
/// # Example
///
/// ```rust
/// use rs_periph::analog::Smoother;
///
/// let mut smoother: Smoother<4> = Smoother::new();
/// for raw in [100u16, 104, 96, 100] {
///     smoother.push(raw);
/// }
/// assert_eq!(smoother.average(), 100);
/// ```
#[derive(Default)]
pub struct Smoother<const N: usize> {
    window: HistoryBuffer<u16, N>,
}

impl<const N: usize> Smoother<N> {
    /// Creates an empty smoother.
    pub fn new() -> Self {
        Self {
            window: HistoryBuffer::new(),
        }
    }

    /// Adds one raw sample, evicting the oldest once the window is full.
    pub fn push(&mut self, raw: u16) {
        self.window.write(raw);
    }

    /// Average of the samples currently in the window; 0 when empty.
    pub fn average(&self) -> u16 {
        let len = self.window.len();
        if len == 0 {
            return 0;
        }
        let sum: u32 = self.window.oldest_ordered().map(|&v| v as u32).sum();
        (sum / len as u32) as u16
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// True if no samples have been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.window.len() == 0
    }
}

/// Decoded state of a resistor-ladder button bank.
///
/// Several buttons share one ADC pin through a resistor ladder; each button
/// produces a distinct voltage. `N` is the number of buttons; level `i`
/// is the nominal raw reading for button `i`, and readings above the last
/// midpoint decode as "no button" (the ladder's idle pull level).
pub struct LadderButtons<const N: usize> {
    /// Nominal raw reading per button, ascending.
    levels: [u16; N],
    /// Raw reading when nothing is pressed.
    idle: u16,
    hysteresis: u16,
    debounce_samples: u8,
    /// Candidate decode and how many consecutive samples agreed with it.
    candidate: Option<usize>,
    agreement: u8,
    /// Debounced stable state.
    stable: Option<usize>,
    /// Edge flag set when `stable` transitions to a pressed button.
    pressed_edge: Option<usize>,
}

impl<const N: usize> LadderButtons<N> {
    /// Creates a decoder from nominal per-button levels (ascending) and the
    /// idle reading.
    pub fn new(levels: [u16; N], idle: u16, config: &AnalogConfig) -> Self {
        Self {
            levels,
            idle,
            hysteresis: config.hysteresis,
            debounce_samples: config.debounce_samples.max(1),
            candidate: None,
            agreement: 0,
            stable: None,
            pressed_edge: None,
        }
    }

    /// Decodes one raw sample to the nearest nominal level.
    ///
    /// Returns `Some(index)` when the reading sits within the button's band
    /// (nearest level, minus hysteresis slack toward the idle level).
    fn decode(&self, raw: u16) -> Option<usize> {
        // Nearest of the button levels and the idle level wins.
        let mut best: Option<usize> = None; // None = idle
        let mut best_dist = raw.abs_diff(self.idle);
        for (i, &level) in self.levels.iter().enumerate() {
            let dist = raw.abs_diff(level);
            if dist + self.hysteresis < best_dist {
                best = Some(i);
                best_dist = dist;
            }
        }
        best
    }

    /// Feeds one raw sample. Returns the debounced stable state.
    ///
    /// A decode must repeat for the configured number of consecutive
    /// samples before it becomes stable; a press edge is latched for
    /// [`just_pressed`](Self::just_pressed).
    pub fn sample(&mut self, raw: u16) -> Option<usize> {
        let decoded = self.decode(raw);

        if decoded == self.candidate {
            self.agreement = self.agreement.saturating_add(1);
        } else {
            self.candidate = decoded;
            self.agreement = 1;
        }

        if self.agreement >= self.debounce_samples && self.stable != self.candidate {
            if let Some(idx) = self.candidate {
                self.pressed_edge = Some(idx);
            }
            self.stable = self.candidate;
        }

        self.stable
    }

    /// Currently held button, debounced.
    pub fn held(&self) -> Option<usize> {
        self.stable
    }

    /// Button that was just pressed since the last call, if any.
    /// Consumes the edge.
    pub fn just_pressed(&mut self) -> Option<usize> {
        self.pressed_edge.take()
    }
}
