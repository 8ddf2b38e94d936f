//! Fanout of a single periodic tick source to every recognizer.
//!
//! The timer interrupt calls [`TickRelay::tick`], which overwrites a single-slot intake and never
//! blocks. The [`TickRelay::run`] task drains the intake and offers the tick to each registered
//! [`TickInlet`]. An inlet that still holds its previous tick loses the new one. Recognizers only
//! use ticks to decide when a release is genuine, so a lost tick never changes a measured duration.

use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use futures::FutureExt;
use heapless::Vec;

use crate::channel::TickInlet;
use crate::config::ConfigError;
use crate::stop::StopSignal;
use crate::{MAX_RECOGNIZERS, RawMutex};

pub struct TickRelay<'a, const N: usize = MAX_RECOGNIZERS> {
    /// Single-slot intake, a new tick replaces an unconsumed one
    intake: Signal<RawMutex, ()>,
    /// Tick inlets of the registered recognizers
    inlets: Vec<&'a TickInlet, N>,
}

impl<const N: usize> Default for TickRelay<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> TickRelay<'a, N> {
    pub const fn new() -> Self {
        Self {
            intake: Signal::new(),
            inlets: Vec::new(),
        }
    }

    /// Register a recognizer's tick inlet.
    ///
    /// Requires exclusive access, so the subscriber list can't change while ticks are relayed.
    pub fn register(&mut self, inlet: &'a TickInlet) -> Result<(), ConfigError> {
        self.inlets
            .push(inlet)
            .map_err(|_| ConfigError::TooManyTickSubscribers { capacity: N })?;
        debug!("Registered tick inlet #{}", self.inlets.len() - 1);
        Ok(())
    }

    pub fn subscriber_count(&self) -> usize {
        self.inlets.len()
    }

    /// Feed one tick into the relay. Safe to call from interrupt context.
    pub fn tick(&self) {
        self.intake.signal(());
    }

    /// Whether a tick is waiting in the intake.
    pub fn is_tick_pending(&self) -> bool {
        self.intake.signaled()
    }

    /// Relay ticks until `stop` fires.
    pub async fn run<const W: usize>(&self, stop: &StopSignal<W>) {
        info!("Tick relay started with {} recognizers", self.inlets.len());
        loop {
            let ticked = futures::select_biased! {
                _ = stop.wait().fuse() => false,
                _ = self.intake.wait().fuse() => true,
            };
            if !ticked {
                info!("Tick relay stopped");
                return;
            }
            self.relay_tick();
        }
    }

    /// Software tick source, calls [`TickRelay::tick`] every `period` until `stop` fires.
    ///
    /// Use it when no hardware timer interrupt is dedicated to the relay. Run it alongside
    /// [`TickRelay::run`].
    pub async fn run_ticker<const W: usize>(&self, period: Duration, stop: &StopSignal<W>) {
        let mut ticker = Ticker::every(period);
        loop {
            let ticked = futures::select_biased! {
                _ = stop.wait().fuse() => false,
                _ = ticker.next().fuse() => true,
            };
            if !ticked {
                return;
            }
            self.tick();
        }
    }

    /// Offer one tick to every inlet, returns how many accepted it.
    fn relay_tick(&self) -> usize {
        let mut delivered = 0;
        for (idx, inlet) in self.inlets.iter().enumerate() {
            if inlet.try_send(()).is_ok() {
                delivered += 1;
            } else {
                trace!("Recognizer #{} hasn't consumed its last tick, dropping", idx);
            }
        }
        delivered
    }
}
