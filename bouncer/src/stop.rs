use core::cell::RefCell;
use core::future::poll_fn;
use core::sync::atomic::{AtomicBool, Ordering};
use core::task::Poll;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::waitqueue::MultiWakerRegistration;

use crate::{MAX_STOP_WAITERS, RawMutex};

/// Broadcast stop request for the relay and recognizer tasks.
///
/// Unlike [`Signal`](embassy_sync::signal::Signal), every waiter observes the stop, and the flag
/// stays raised until [`StopSignal::reset`] is called. More than `N` concurrent waiters still
/// work, at the cost of spurious wakeups.
pub struct StopSignal<const N: usize = MAX_STOP_WAITERS> {
    stopped: AtomicBool,
    wakers: Mutex<RawMutex, RefCell<MultiWakerRegistration<N>>>,
}

impl<const N: usize> Default for StopSignal<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> StopSignal<N> {
    pub const fn new() -> Self {
        Self {
            stopped: AtomicBool::new(false),
            wakers: Mutex::new(RefCell::new(MultiWakerRegistration::new())),
        }
    }

    /// Request every waiting task to stop.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        self.wakers.lock(|wakers| wakers.borrow_mut().wake());
    }

    /// Lower the flag so that stopped tasks can be run again.
    pub fn reset(&self) {
        self.stopped.store(false, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Wait until [`StopSignal::stop`] is called. Returns immediately if it already was.
    pub async fn wait(&self) {
        poll_fn(|cx| {
            if self.is_stopped() {
                return Poll::Ready(());
            }
            self.wakers.lock(|wakers| wakers.borrow_mut().register(cx.waker()));
            // `stop` may have run between the check and the registration
            if self.is_stopped() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
        .await
    }
}
