pub mod common;

use bouncer::{StopSignal, TickInlet, TickRelay};
use embassy_futures::{block_on, yield_now};
use futures::join;

#[test]
fn test_relay_fans_out_every_tick() {
    let inlets = [TickInlet::new(), TickInlet::new(), TickInlet::new()];
    let stop: StopSignal = StopSignal::new();
    let mut relay: TickRelay = TickRelay::new();
    for inlet in &inlets {
        relay.register(inlet).unwrap();
    }

    let mut received = [0usize; 3];
    block_on(async {
        join!(relay.run(&stop), async {
            for _ in 0..5 {
                relay.tick();
                while relay.is_tick_pending() {
                    yield_now().await;
                }
                for (count, inlet) in received.iter_mut().zip(&inlets) {
                    if inlet.try_receive().is_ok() {
                        *count += 1;
                    }
                }
            }
            stop.stop();
        });
    });

    assert_eq!(received, [5, 5, 5]);
}

#[test]
fn test_unconsumed_tick_is_dropped_for_that_inlet_only() {
    let busy = TickInlet::new();
    let idle = TickInlet::new();
    let stop: StopSignal = StopSignal::new();
    let mut relay: TickRelay = TickRelay::new();
    relay.register(&busy).unwrap();
    relay.register(&idle).unwrap();

    let mut idle_ticks = 0;
    block_on(async {
        join!(relay.run(&stop), async {
            for _ in 0..4 {
                relay.tick();
                while relay.is_tick_pending() {
                    yield_now().await;
                }
                if idle.try_receive().is_ok() {
                    idle_ticks += 1;
                }
            }
            stop.stop();
        });
    });

    assert_eq!(idle_ticks, 4);
    // `busy` was never drained, it holds a single tick
    assert!(busy.try_receive().is_ok());
    assert!(busy.try_receive().is_err());
}

#[test]
fn test_ticks_coalesce_while_relay_is_busy() {
    let inlet = TickInlet::new();
    let stop: StopSignal = StopSignal::new();
    let mut relay: TickRelay = TickRelay::new();
    relay.register(&inlet).unwrap();

    // The relay task isn't running yet, the intake keeps one tick
    relay.tick();
    relay.tick();
    relay.tick();

    block_on(async {
        join!(relay.run(&stop), async {
            while relay.is_tick_pending() {
                yield_now().await;
            }
            stop.stop();
        });
    });

    assert!(inlet.try_receive().is_ok());
    assert!(inlet.try_receive().is_err());
}

#[test]
fn test_stopped_relay_returns_immediately() {
    let relay: TickRelay = TickRelay::new();
    let stop: StopSignal = StopSignal::new();
    stop.stop();
    relay.tick();
    block_on(relay.run(&stop));
    // Stop wins over a pending tick
    assert!(relay.is_tick_pending());
}
