//! Press recognition state machine.
//!
//! A recognizer is either idle or armed. The first press edge arms it and records when the press
//! started. While armed, every relayed tick bumps a counter, and a release edge is only accepted
//! once the counter reached the debounce threshold. Earlier releases are contact bounce and are
//! ignored, as are repeated press edges. An accepted release classifies the time between the two
//! edges and returns to idle.
//!
//! The tick counter never measures the press. Durations come from edge timestamps only, so ticks
//! dropped by the relay make debounce slightly more lenient but can't skew a classification.

use embassy_time::Instant;
use futures::FutureExt;

use crate::channel::{EdgeChannel, TickInlet};
use crate::config::{ConfigError, RecognizerConfig};
use crate::event::{EdgeSample, PressLength};
use crate::publisher::{PressPublisher, PressQueue};
use crate::relay::TickRelay;
use crate::stop::StopSignal;
use crate::{EDGE_CHANNEL_SIZE, PRESS_QUEUE_SIZE};

/// State of a [`PressTracker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecognizerState {
    /// No press in progress
    Idle,
    /// A press edge was seen
    Armed {
        /// Timestamp of the first press edge of the sequence
        press_start: Instant,
        /// Starts at 1 on the press edge, incremented by every tick
        ticks: u32,
    },
}

/// The synchronous core of a [`Recognizer`], fed one edge or tick at a time.
#[derive(Clone, Debug)]
pub struct PressTracker {
    config: RecognizerConfig,
    state: RecognizerState,
}

impl PressTracker {
    pub fn new(config: RecognizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: RecognizerState::Idle,
        })
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    pub fn state(&self) -> RecognizerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, RecognizerState::Armed { .. })
    }

    /// Drop any press in progress.
    pub fn reset(&mut self) {
        self.state = RecognizerState::Idle;
    }

    /// Process an edge.
    ///
    /// Returns the classification when the edge completes a debounced press, `NoAction` included.
    pub fn on_edge(&mut self, sample: EdgeSample) -> Option<PressLength> {
        let pressed = self.config.active_level.is_pressed(sample.level);
        match (self.state, pressed) {
            (RecognizerState::Idle, true) => {
                debug!("Press started at {}ms", sample.timestamp.as_millis());
                self.state = RecognizerState::Armed {
                    press_start: sample.timestamp,
                    ticks: 1,
                };
                None
            }
            // A release without a press, or a bouncing press edge
            (RecognizerState::Idle, false) | (RecognizerState::Armed { .. }, true) => None,
            (RecognizerState::Armed { press_start, ticks }, false) => {
                if ticks < self.config.debounce.ticks() as u32 {
                    debug!("Release after {} ticks rejected as bounce", ticks);
                    return None;
                }
                let held = sample.timestamp.saturating_duration_since(press_start);
                self.state = RecognizerState::Idle;
                let press = self.config.durations.classify(held);
                debug!("Press released after {}ms: {:?}", held.as_millis(), press);
                Some(press)
            }
        }
    }

    /// Process a tick.
    pub fn on_tick(&mut self) {
        let RecognizerState::Armed { ticks, .. } = &mut self.state else {
            return;
        };
        *ticks = ticks.saturating_add(1);
        let ticks = *ticks;

        if let Some(limit) = self.config.hold_limit
            && ticks >= limit
        {
            warn!("No release within {} ticks, abandoning press", limit);
            self.state = RecognizerState::Idle;
        }
    }
}

enum Input {
    Stop,
    Edge(EdgeSample),
    Tick,
}

/// Per-button recognizer task.
///
/// Owns the button's state machine and borrows its edge inlet, tick inlet and subscriber queues.
pub struct Recognizer<'a, const E: usize = EDGE_CHANNEL_SIZE, const Q: usize = PRESS_QUEUE_SIZE> {
    tracker: PressTracker,
    edges: &'a EdgeChannel<E>,
    ticks: &'a TickInlet,
    publisher: PressPublisher<'a, Q>,
}

impl<'a, const E: usize, const Q: usize> Recognizer<'a, E, Q> {
    /// Validate `config`, register `ticks` with the relay and bind the subscriber queues.
    pub fn new<const R: usize>(
        config: RecognizerConfig,
        edges: &'a EdgeChannel<E>,
        ticks: &'a TickInlet,
        relay: &mut TickRelay<'a, R>,
        outputs: &[&'a PressQueue<Q>],
    ) -> Result<Self, ConfigError> {
        let tracker = PressTracker::new(config)?;
        let publisher = PressPublisher::new(outputs)?;
        // Register last, a failed setup must not leave a dangling inlet in the relay
        relay.register(ticks)?;
        Ok(Self {
            tracker,
            edges,
            ticks,
            publisher,
        })
    }

    pub fn state(&self) -> RecognizerState {
        self.tracker.state()
    }

    pub fn config(&self) -> &RecognizerConfig {
        self.tracker.config()
    }

    pub fn subscriber_count(&self) -> usize {
        self.publisher.subscriber_count()
    }

    /// Process one edge and publish the resulting press, if any.
    pub fn handle_edge(&mut self, sample: EdgeSample) {
        match self.tracker.on_edge(sample) {
            Some(press) if press.is_action() => self.publisher.publish(press),
            Some(_) => debug!("Press too short, ignored as noise"),
            None => (),
        }
    }

    pub fn handle_tick(&mut self) {
        self.tracker.on_tick();
    }

    /// Process edges and ticks until `stop` fires.
    ///
    /// A press in progress survives the stop, calling `run` again resumes it.
    pub async fn run<const W: usize>(&mut self, stop: &StopSignal<W>) {
        loop {
            let input = futures::select_biased! {
                _ = stop.wait().fuse() => Input::Stop,
                sample = self.edges.receive().fuse() => Input::Edge(sample),
                _ = self.ticks.receive().fuse() => Input::Tick,
            };
            match input {
                Input::Stop => {
                    info!("Recognizer stopped in state {:?}", self.tracker.state());
                    return;
                }
                Input::Edge(sample) => self.handle_edge(sample),
                Input::Tick => self.handle_tick(),
            }
        }
    }
}
