use embassy_time::Instant;
use serde::{Deserialize, Serialize};

/// The classification of a completed, debounced press.
///
/// Variants are ordered by duration, so `PressLength::Long > PressLength::Short`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressLength {
    /// Shorter than [`PressLength::Short`], treated as noise and never published
    NoAction,
    /// Held at least the short threshold
    Short,
    /// Held at least the long threshold
    Long,
    /// Held at least the extra long threshold
    ExtraLong,
}

impl PressLength {
    /// Whether this classification is delivered to subscribers.
    pub const fn is_action(self) -> bool {
        !matches!(self, PressLength::NoAction)
    }
}

/// A single logic-level transition on a button line.
///
/// Built in interrupt context and consumed exactly once by the recognizer that owns the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeSample {
    /// Line level read right after the transition, `true` is high
    pub level: bool,
    /// When the transition was observed
    pub timestamp: Instant,
}

impl EdgeSample {
    pub const fn new(level: bool, timestamp: Instant) -> Self {
        Self { level, timestamp }
    }
}
