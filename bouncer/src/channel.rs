//! Channels connecting interrupt handlers, the tick relay and recognizers

use embassy_sync::channel::Channel;
pub use embassy_sync::{blocking_mutex, channel, signal};

use crate::event::EdgeSample;
use crate::{EDGE_CHANNEL_SIZE, RawMutex};

/// Edge inlet of a recognizer, fed from the pin interrupt.
///
/// Edges must never be dropped, so size it for the worst bounce burst of a press/release cycle.
pub type EdgeChannel<const N: usize = EDGE_CHANNEL_SIZE> = Channel<RawMutex, EdgeSample, N>;

/// Private tick inlet of a recognizer, fed by the [`TickRelay`](crate::relay::TickRelay).
///
/// Holds at most one tick. A tick arriving while the previous one is unconsumed is dropped.
pub type TickInlet = Channel<RawMutex, (), 1>;
