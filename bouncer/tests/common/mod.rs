pub mod test_macro;

use bouncer::{
    DebounceThreshold, DurationConfig, EdgeChannel, EdgeSource, PressLength, PressQueue, Recognizer, RecognizerConfig,
    RecognizerState, StopSignal, TickInlet, TickRelay,
};
use embassy_futures::yield_now;
use embassy_time::{Duration, Instant};
use futures::join;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Queue depth used by the sequence tests, deep enough that nothing is evicted
pub const TEST_QUEUE_SIZE: usize = 8;

/// One input of a simulated button
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Line pulled low at the given millisecond
    Press(u64),
    /// Line released at the given millisecond
    Release(u64),
    /// One tick from the timer
    Tick,
}

#[derive(Debug)]
pub struct Outcome {
    pub alice: Vec<PressLength>,
    pub bob: Vec<PressLength>,
    pub state: RecognizerState,
}

/// Thresholds `{20ms, 500ms, 1500ms}` with a debounce threshold of 2 ticks
pub fn scenario_config() -> RecognizerConfig {
    RecognizerConfig::new(
        DurationConfig::new(
            Duration::from_millis(20),
            Duration::from_millis(500),
            Duration::from_millis(1500),
        ),
        DebounceThreshold::new(2).unwrap(),
    )
}

/// Record a step the way the interrupt handlers would.
pub fn apply(step: Step, source: &EdgeSource<'_>, relay: &TickRelay<'_>) {
    match step {
        Step::Press(ms) => source.record_at(false, Instant::from_millis(ms)),
        Step::Release(ms) => source.record_at(true, Instant::from_millis(ms)),
        Step::Tick => relay.tick(),
    }
}

/// Yield until every edge and tick has been consumed by the running tasks.
pub async fn settle(edges: &EdgeChannel, relay: &TickRelay<'_>, inlets: &[&TickInlet]) {
    while !edges.is_empty() || relay.is_tick_pending() || inlets.iter().any(|inlet| !inlet.is_empty()) {
        yield_now().await;
    }
}

pub fn drain<const N: usize>(queue: &PressQueue<N>) -> Vec<PressLength> {
    let mut presses = Vec::new();
    while let Some(press) = queue.try_receive() {
        presses.push(press);
    }
    presses
}

// Run a single recognizer with two subscribers through the relay, feeding the steps one by one
pub async fn run_press_sequence(config: RecognizerConfig, steps: &[Step]) -> Outcome {
    let edges: EdgeChannel = EdgeChannel::new();
    let tick_inlet = TickInlet::new();
    let alice: PressQueue<TEST_QUEUE_SIZE> = PressQueue::new();
    let bob: PressQueue<TEST_QUEUE_SIZE> = PressQueue::new();
    let stop: StopSignal = StopSignal::new();
    let mut relay: TickRelay = TickRelay::new();
    let mut recognizer = Recognizer::new(config, &edges, &tick_inlet, &mut relay, &[&alice, &bob]).unwrap();
    let source = EdgeSource::new(&edges);

    join!(relay.run(&stop), recognizer.run(&stop), async {
        for step in steps {
            apply(*step, &source, &relay);
            settle(&edges, &relay, &[&tick_inlet]).await;
        }
        stop.stop();
    });

    Outcome {
        alice: drain(&alice),
        bob: drain(&bob),
        state: recognizer.state(),
    }
}
