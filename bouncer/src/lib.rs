//! Debounced press-length recognition for physical buttons.
//!
//! Each button gets a [`Recognizer`](recognizer::Recognizer) task. It consumes
//! raw edges pushed from the pin interrupt through an [`EdgeSource`](edge::EdgeSource)
//! and periodic ticks fanned out by a shared [`TickRelay`](relay::TickRelay).
//! Ticks gate which release edge is accepted (debounce), edge timestamps measure
//! how long the button was held. Every completed press is classified into a
//! [`PressLength`](event::PressLength) and broadcast to all of the recognizer's
//! [`PressQueue`](publisher::PressQueue)s.
//!
//! ```rust,ignore
//! static EDGES: EdgeChannel = EdgeChannel::new();
//! static TICKS: TickInlet = TickInlet::new();
//! static ALICE: PressQueue = PressQueue::new();
//! static BOB: PressQueue = PressQueue::new();
//! static STOP: StopSignal = StopSignal::new();
//!
//! let mut relay: TickRelay = TickRelay::new();
//! let mut button = Recognizer::new(RecognizerConfig::default(), &EDGES, &TICKS, &mut relay, &[&ALICE, &BOB])?;
//!
//! // In the pin interrupt handler
//! EdgeSource::new(&EDGES).record(pin.is_high());
//! // In the timer interrupt handler
//! relay.tick();
//!
//! join(relay.run(&STOP), button.run(&STOP)).await;
//! ```
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod channel;
pub mod config;
pub mod edge;
pub mod event;
pub mod publisher;
pub mod recognizer;
pub mod relay;
pub mod stop;

pub use channel::{EdgeChannel, TickInlet};
pub use config::{ActiveLevel, ConfigError, DebounceThreshold, DurationConfig, RecognizerConfig};
pub use edge::{EdgeMonitor, EdgeSource};
pub use event::{EdgeSample, PressLength};
pub use publisher::{PressPublisher, PressQueue};
pub use recognizer::{PressTracker, Recognizer, RecognizerState};
pub use relay::TickRelay;
pub use stop::StopSignal;

/// Mutex used by every channel in this crate.
///
/// Edge and tick producers run in interrupt context, so a critical section is required.
pub type RawMutex = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Default depth of a recognizer's edge inlet.
///
/// A press/release cycle with bounce produces a handful of edges, the inlet must absorb them
/// until the recognizer task runs.
pub const EDGE_CHANNEL_SIZE: usize = 8;
/// Default depth of each subscriber queue.
pub const PRESS_QUEUE_SIZE: usize = 4;
/// Maximum number of subscriber queues per recognizer.
pub const MAX_SUBSCRIBERS: usize = 4;
/// Default number of recognizers a single [`TickRelay`] can feed.
pub const MAX_RECOGNIZERS: usize = 8;
/// Default number of tasks that can wait on one [`StopSignal`] without spurious wakeups.
pub const MAX_STOP_WAITERS: usize = 8;
