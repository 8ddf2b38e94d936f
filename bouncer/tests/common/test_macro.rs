extern crate bouncer;

// Run a press sequence and check that both subscribers received exactly the expected presses
#[macro_export]
macro_rules! press_sequence_test {
    (config: $config:expr, sequence: [$($step:expr),* $(,)?], expected: [$($press:expr),* $(,)?] $(,)?) => {
        embassy_futures::block_on(async {
            let sequence = vec![$($step),*];
            let expected: Vec<bouncer::PressLength> = vec![$($press),*];
            let outcome = $crate::common::run_press_sequence($config, &sequence).await;
            assert_eq!(outcome.alice, expected, "first subscriber received unexpected presses");
            assert_eq!(outcome.bob, expected, "second subscriber received unexpected presses");
            outcome
        })
    };
}

