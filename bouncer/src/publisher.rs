//! Fanout of classified presses to subscriber queues.
//!
//! Every subscriber owns a [`PressQueue`], the recognizer only holds references to them.
//! Publishing never waits: when a subscriber falls behind and its queue is full, the oldest
//! unread press in that queue is evicted to make room for the new one. Other subscribers are
//! unaffected.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::{Channel, TrySendError};
use heapless::Vec;

use crate::config::ConfigError;
use crate::event::PressLength;
use crate::{MAX_SUBSCRIBERS, PRESS_QUEUE_SIZE, RawMutex};

/// Bounded single-producer/single-consumer queue of classified presses, with drop-oldest overflow.
pub struct PressQueue<const N: usize = PRESS_QUEUE_SIZE> {
    queue: Channel<RawMutex, PressLength, N>,
    dropped: Mutex<RawMutex, Cell<u32>>,
}

impl<const N: usize> Default for PressQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PressQueue<N> {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
            dropped: Mutex::new(Cell::new(0)),
        }
    }

    /// Wait for the next press.
    pub async fn receive(&self) -> PressLength {
        self.queue.receive().await
    }

    pub fn try_receive(&self) -> Option<PressLength> {
        self.queue.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Discard all unread presses.
    pub fn clear(&self) {
        self.queue.clear();
    }

    /// Number of presses evicted because the subscriber didn't keep up.
    pub fn dropped(&self) -> u32 {
        self.dropped.lock(|dropped| dropped.get())
    }

    /// Enqueue without waiting, evicting the oldest entry when full.
    ///
    /// Returns `true` if an entry was evicted.
    pub(crate) fn push(&self, press: PressLength) -> bool {
        let Err(TrySendError::Full(press)) = self.queue.try_send(press) else {
            return false;
        };
        // The consumer may have drained the queue in the meantime, then there's nothing to evict
        let evicted = self.queue.try_receive().is_ok();
        if evicted {
            self.dropped.lock(|dropped| dropped.set(dropped.get().saturating_add(1)));
        }
        // Only the owning recognizer produces, so there's room now
        let _ = self.queue.try_send(press);
        evicted
    }
}

/// Broadcasts classified presses to every registered [`PressQueue`].
pub struct PressPublisher<'a, const Q: usize = PRESS_QUEUE_SIZE> {
    outputs: Vec<&'a PressQueue<Q>, MAX_SUBSCRIBERS>,
}

impl<'a, const Q: usize> PressPublisher<'a, Q> {
    /// Create a publisher over `outputs`. At least one queue is required.
    pub fn new(outputs: &[&'a PressQueue<Q>]) -> Result<Self, ConfigError> {
        if outputs.is_empty() {
            return Err(ConfigError::NoSubscribers);
        }
        let outputs = Vec::from_slice(outputs).map_err(|_| ConfigError::TooManySubscribers {
            capacity: MAX_SUBSCRIBERS,
        })?;
        Ok(Self { outputs })
    }

    pub fn subscriber_count(&self) -> usize {
        self.outputs.len()
    }

    /// Send `press` to all subscribers, in registration order.
    pub fn publish(&self, press: PressLength) {
        info!("Publishing {:?} to {} subscribers", press, self.outputs.len());
        for (idx, output) in self.outputs.iter().enumerate() {
            if output.push(press) {
                warn!("Subscriber #{} queue is full, dropped its oldest press", idx);
            }
        }
    }
}
