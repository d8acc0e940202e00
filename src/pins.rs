//! Electrical pin configuration: open-collector conventions, pull
//! resistors, and active-level polarity.
//!
//! Encoder outputs come in two common styles. NPN open-collector outputs
//! sink to ground and idle high through a pull-up, so "active" is low. PNP
//! outputs source to the supply and idle low through a pull-down, so
//! "active" is high. Push-pull outputs drive both ways and need no pull at
//! all. [`PinSetup`] captures both the pull the input needs and the level
//! that counts as logically active, applied independently to A, B and Z.

/// Logic level that counts as "active" when reading a pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ActiveLevel {
    /// A high raw level reads as logical 1.
    High,
    /// A low raw level reads as logical 1.
    Low,
}

impl ActiveLevel {
    /// Translates a raw digital level into a logical 0/1.
    #[inline]
    pub const fn translate(self, raw_high: bool) -> bool {
        match self {
            ActiveLevel::High => raw_high,
            ActiveLevel::Low => !raw_high,
        }
    }
}

/// Input pull configuration, subject to what the target supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Pull {
    /// Plain input, externally biased.
    #[default]
    None,
    /// Internal pull-up.
    Up,
    /// Internal pull-down.
    Down,
}

/// Open-collector output transistor type of the attached encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OpenCollector {
    /// Sinks to ground; idles high via pull-up; active-low.
    Npn,
    /// Sources to supply; idles low via pull-down; active-high.
    Pnp,
}

/// Complete input configuration for one encoder pin.
///
/// # Example
///
/// ```rust
/// use rs_periph::pins::{ActiveLevel, OpenCollector, PinSetup, Pull};
///
/// let npn = PinSetup::open_collector(OpenCollector::Npn);
/// assert_eq!(npn.pull, Pull::Up);
/// assert_eq!(npn.active, ActiveLevel::Low);
///
/// let direct = PinSetup::push_pull(ActiveLevel::High);
/// assert_eq!(direct.pull, Pull::None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinSetup {
    /// Pull resistor to enable on the input.
    pub pull: Pull,
    /// Level interpreted as logical 1.
    pub active: ActiveLevel,
}

impl PinSetup {
    /// Configuration for an open-collector encoder output.
    pub const fn open_collector(kind: OpenCollector) -> Self {
        match kind {
            OpenCollector::Npn => Self {
                pull: Pull::Up,
                active: ActiveLevel::Low,
            },
            OpenCollector::Pnp => Self {
                pull: Pull::Down,
                active: ActiveLevel::High,
            },
        }
    }

    /// Configuration for a push-pull (voltage) output with an explicit
    /// active level.
    pub const fn push_pull(active: ActiveLevel) -> Self {
        Self {
            pull: Pull::None,
            active,
        }
    }
}

impl Default for PinSetup {
    /// NPN open-collector is by far the most common encoder output.
    fn default() -> Self {
        Self::open_collector(OpenCollector::Npn)
    }
}
