use core::fmt;

use embassy_time::Duration;

use crate::event::PressLength;

/// Upper bound of the accepted debounce threshold, in ticks.
pub const MAX_DEBOUNCE_TICKS: u8 = 64;

/// Errors reported while setting up a recognizer.
///
/// These are fatal to setup. A recognizer is never produced from an invalid configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Duration thresholds must satisfy `short <= long <= extra_long`
    ThresholdsNotAscending {
        short: Duration,
        long: Duration,
        extra_long: Duration,
    },
    /// Debounce threshold outside `1..=MAX_DEBOUNCE_TICKS`
    DebounceOutOfRange(u8),
    /// A hold limit at or below the debounce threshold would reject every release
    HoldLimitTooShort { hold_limit: u32, debounce: u8 },
    /// A recognizer needs at least one output queue
    NoSubscribers,
    /// More output queues than a recognizer can hold
    TooManySubscribers { capacity: usize },
    /// The tick relay has no room for another recognizer
    TooManyTickSubscribers { capacity: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ThresholdsNotAscending {
                short,
                long,
                extra_long,
            } => write!(
                f,
                "press thresholds must be ascending, got short={}ms long={}ms extra_long={}ms",
                short.as_millis(),
                long.as_millis(),
                extra_long.as_millis()
            ),
            ConfigError::DebounceOutOfRange(ticks) => write!(
                f,
                "debounce threshold {} is outside 1..={} ticks",
                ticks, MAX_DEBOUNCE_TICKS
            ),
            ConfigError::HoldLimitTooShort { hold_limit, debounce } => write!(
                f,
                "hold limit of {} ticks must exceed the debounce threshold of {} ticks",
                hold_limit, debounce
            ),
            ConfigError::NoSubscribers => write!(f, "recognizer wasn't given any output queues"),
            ConfigError::TooManySubscribers { capacity } => {
                write!(f, "recognizer supports at most {} output queues", capacity)
            }
            ConfigError::TooManyTickSubscribers { capacity } => {
                write!(f, "tick relay supports at most {} recognizers", capacity)
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Duration thresholds of the press buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DurationConfig {
    /// Minimum hold for a [`PressLength::Short`]
    pub short: Duration,
    /// Minimum hold for a [`PressLength::Long`]
    pub long: Duration,
    /// Minimum hold for a [`PressLength::ExtraLong`]
    pub extra_long: Duration,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            short: Duration::from_millis(22),
            long: Duration::from_millis(500),
            extra_long: Duration::from_millis(1971),
        }
    }
}

impl DurationConfig {
    pub const fn new(short: Duration, long: Duration, extra_long: Duration) -> Self {
        Self {
            short,
            long,
            extra_long,
        }
    }

    /// Check `short <= long <= extra_long`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short > self.long || self.long > self.extra_long {
            return Err(ConfigError::ThresholdsNotAscending {
                short: self.short,
                long: self.long,
                extra_long: self.extra_long,
            });
        }
        Ok(())
    }

    /// Classify a hold duration into the highest bucket whose threshold it meets.
    pub fn classify(&self, held: Duration) -> PressLength {
        if held >= self.extra_long {
            PressLength::ExtraLong
        } else if held >= self.long {
            PressLength::Long
        } else if held >= self.short {
            PressLength::Short
        } else {
            PressLength::NoAction
        }
    }

    /// The minimum hold duration of the given bucket. `NoAction` has no lower bound.
    pub fn threshold(&self, length: PressLength) -> Duration {
        match length {
            PressLength::NoAction => Duration::from_ticks(0),
            PressLength::Short => self.short,
            PressLength::Long => self.long,
            PressLength::ExtraLong => self.extra_long,
        }
    }
}

/// Minimum number of ticks between a press edge and its release edge for the release to be
/// accepted as genuine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceThreshold(u8);

impl Default for DebounceThreshold {
    fn default() -> Self {
        Self(2)
    }
}

impl DebounceThreshold {
    pub const fn new(ticks: u8) -> Result<Self, ConfigError> {
        if ticks == 0 || ticks > MAX_DEBOUNCE_TICKS {
            return Err(ConfigError::DebounceOutOfRange(ticks));
        }
        Ok(Self(ticks))
    }

    pub const fn ticks(self) -> u8 {
        self.0
    }
}

/// Line level that means "pressed".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pull-up wiring, the button pulls the line low
    #[default]
    Low,
    /// Pull-down wiring, the button pulls the line high
    High,
}

impl ActiveLevel {
    /// Whether a line read at `level` means the button is down.
    pub const fn is_pressed(self, level: bool) -> bool {
        match self {
            ActiveLevel::Low => !level,
            ActiveLevel::High => level,
        }
    }
}

/// Setup parameters of a single recognizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecognizerConfig {
    pub durations: DurationConfig,
    pub debounce: DebounceThreshold,
    pub active_level: ActiveLevel,
    /// Abandon a press after this many ticks without an accepted release.
    /// `None` keeps the recognizer armed until a release arrives.
    pub hold_limit: Option<u32>,
}

impl RecognizerConfig {
    pub const fn new(durations: DurationConfig, debounce: DebounceThreshold) -> Self {
        Self {
            durations,
            debounce,
            active_level: ActiveLevel::Low,
            hold_limit: None,
        }
    }

    pub const fn with_active_level(mut self, active_level: ActiveLevel) -> Self {
        self.active_level = active_level;
        self
    }

    pub const fn with_hold_limit(mut self, ticks: u32) -> Self {
        self.hold_limit = Some(ticks);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.durations.validate()?;
        if let Some(hold_limit) = self.hold_limit
            && hold_limit <= self.debounce.ticks() as u32
        {
            return Err(ConfigError::HoldLimitTooShort {
                hold_limit,
                debounce: self.debounce.ticks(),
            });
        }
        Ok(())
    }
}
