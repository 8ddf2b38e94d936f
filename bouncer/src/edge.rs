//! Edge producers.
//!
//! [`EdgeSource`] is the handle an interrupt handler uses to push samples into a recognizer's
//! [`EdgeChannel`]. It only timestamps and enqueues, all decisions are made by the recognizer task.
//! [`EdgeMonitor`] drives an `embedded-hal-async` pin for boards whose HAL exposes edge waiting
//! instead of raw interrupt handlers.

use embassy_time::Instant;
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;
use futures::FutureExt;

use crate::EDGE_CHANNEL_SIZE;
use crate::channel::EdgeChannel;
use crate::event::EdgeSample;
use crate::stop::StopSignal;

/// Interrupt-side producer of [`EdgeSample`]s.
pub struct EdgeSource<'a, const N: usize = EDGE_CHANNEL_SIZE> {
    edges: &'a EdgeChannel<N>,
}

impl<const N: usize> Clone for EdgeSource<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<const N: usize> Copy for EdgeSource<'_, N> {}

impl<'a, const N: usize> EdgeSource<'a, N> {
    pub const fn new(edges: &'a EdgeChannel<N>) -> Self {
        Self { edges }
    }

    /// Record a transition to `level`, timestamped now.
    pub fn record(&self, level: bool) {
        self.record_at(level, Instant::now());
    }

    /// Record a transition to `level` observed at `timestamp`.
    ///
    /// Never blocks. A full inlet means the recognizer task is starved, the sample is discarded.
    pub fn record_at(&self, level: bool, timestamp: Instant) {
        if self.edges.try_send(EdgeSample::new(level, timestamp)).is_err() {
            warn!("Edge inlet is full, dropping edge sample");
        }
    }
}

/// Watches a pin for transitions and records each of them through an [`EdgeSource`].
pub struct EdgeMonitor<'a, P: Wait + InputPin, const N: usize = EDGE_CHANNEL_SIZE> {
    pin: P,
    source: EdgeSource<'a, N>,
}

impl<'a, P: Wait + InputPin, const N: usize> EdgeMonitor<'a, P, N> {
    pub fn new(pin: P, source: EdgeSource<'a, N>) -> Self {
        Self { pin, source }
    }

    /// Release the pin.
    pub fn into_inner(self) -> P {
        self.pin
    }

    /// Record edges until `stop` fires.
    pub async fn run<const W: usize>(&mut self, stop: &StopSignal<W>) {
        loop {
            let edge = futures::select_biased! {
                _ = stop.wait().fuse() => None,
                r = self.pin.wait_for_any_edge().fuse() => Some(r),
            };
            let Some(edge) = edge else {
                return;
            };
            // Timestamp as close to the edge as possible
            let timestamp = Instant::now();
            match edge.and_then(|_| self.pin.is_high()) {
                Ok(level) => self.source.record_at(level, timestamp),
                Err(_) => error!("Failed to read button pin"),
            }
        }
    }
}
