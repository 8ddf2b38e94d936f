//! Drives the mock clock, keep it in its own test binary.

pub mod common;

use bouncer::{StopSignal, TickInlet, TickRelay};
use embassy_futures::{block_on, yield_now};
use embassy_time::{Duration, MockDriver};
use futures::join;

#[test]
fn test_software_ticker_feeds_relay() {
    let period = Duration::from_millis(25);
    let inlet = TickInlet::new();
    let stop: StopSignal = StopSignal::new();
    let mut relay: TickRelay = TickRelay::new();
    relay.register(&inlet).unwrap();

    let mut ticks = 0;
    block_on(async {
        join!(relay.run(&stop), relay.run_ticker(period, &stop), async {
            // Let the ticker arm its first deadline before the clock moves
            yield_now().await;
            for _ in 0..3 {
                MockDriver::get().advance(period);
                while inlet.try_receive().is_err() {
                    yield_now().await;
                }
                ticks += 1;
            }
            stop.stop();
        });
    });

    assert_eq!(ticks, 3);
    assert!(inlet.try_receive().is_err());
}
