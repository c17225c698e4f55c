//! Unit tests for Tube, Onion and Inverted Onion pipelines.
//!
//! Covers execution order, continuation wiring, early termination and the
//! empty-pipeline edge cases.

#![cfg(feature = "pipeline")]

use cumulus::compose::identity;
use cumulus::pipeline::{
    BoxedContinuationStage, ContinuationStage, Dispatcher, Layers, Tube, inverted_onion,
    inverted_onion_with_terminal, layer, onion, onion_with_terminal, step, tube,
};
use rstest::rstest;
use std::sync::{Arc, Mutex};
use std::thread;

type Log = Arc<Mutex<Vec<&'static str>>>;

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<&'static str> {
    log.lock().unwrap().clone()
}

/// A stage that records its name and always continues.
fn passing(name: &'static str, log: &Log) -> BoxedContinuationStage<i32, i32> {
    let log = Arc::clone(log);
    layer(move |value: i32, next: &dyn Fn(i32) -> i32| {
        log.lock().unwrap().push(name);
        next(value)
    })
}

/// A stage that records its name and never continues.
fn stopping(name: &'static str, result: i32, log: &Log) -> BoxedContinuationStage<i32, i32> {
    let log = Arc::clone(log);
    layer(move |_: i32, _: &dyn Fn(i32) -> i32| {
        log.lock().unwrap().push(name);
        result
    })
}

fn add_one() -> BoxedContinuationStage<i32, i32> {
    layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x + 1))
}

fn double() -> BoxedContinuationStage<i32, i32> {
    layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x * 2))
}

fn subtract_three() -> BoxedContinuationStage<i32, i32> {
    layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x - 3))
}

// =============================================================================
// Tube
// =============================================================================

#[rstest]
fn tube_applies_stages_left_to_right() {
    let pipeline = tube(vec![
        step(|x: i32| x + 1),
        step(|x: i32| x * 2),
        step(|x: i32| x - 3),
    ]);

    assert_eq!(pipeline.call(5), 9);
}

#[rstest]
#[case(0)]
#[case(-17)]
#[case(i32::MAX)]
fn empty_tube_is_identity(#[case] value: i32) {
    let pipeline = tube::<i32, _>(std::iter::empty());
    assert_eq!(pipeline.call(value), identity(value));
}

#[rstest]
fn tube_accepts_a_lazy_sequence_of_stages() {
    let pipeline: Tube<u64> = (1..=4u64).map(|factor| step(move |x: u64| x * factor)).collect();

    assert_eq!(pipeline.len(), 4);
    assert_eq!(pipeline.call(1), 24);
}

#[rstest]
fn tube_is_reusable() {
    let pipeline = Tube::new().then(|s: String| s + "!");

    assert_eq!(pipeline.call("hi".to_string()), "hi!");
    assert_eq!(pipeline.call("hey".to_string()), "hey!");
}

#[rstest]
fn tube_into_fn_works_with_iterators() {
    let pipeline = Tube::new().then(|x: i32| x * x).into_fn();
    let squares: Vec<i32> = (1..=4).map(pipeline).collect();
    assert_eq!(squares, vec![1, 4, 9, 16]);
}

// =============================================================================
// Inverted Onion
// =============================================================================

#[rstest]
fn inverted_onion_executes_in_declaration_order() {
    let log = new_log();
    let pipeline = inverted_onion(vec![
        passing("S1", &log),
        passing("S2", &log),
        passing("S3", &log),
    ]);

    assert_eq!(pipeline.call(1), 1);
    assert_eq!(entries(&log), vec!["S1", "S2", "S3"]);
}

#[rstest]
fn inverted_onion_threads_values() {
    let pipeline = inverted_onion(vec![add_one(), double(), subtract_three()]);
    assert_eq!(pipeline.call(5), 9);
}

#[rstest]
fn inverted_onion_guard_rejects_without_running_inner_stages() {
    let ran = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&ran);

    let pipeline = inverted_onion_with_terminal(
        vec![
            layer(|x: i32, next: &dyn Fn(i32) -> Result<i32, String>| {
                if x < 0 {
                    Err("rejected".to_string())
                } else {
                    next(x)
                }
            }),
            layer(move |x: i32, next: &dyn Fn(i32) -> Result<i32, String>| {
                *flag.lock().unwrap() = true;
                next(x + 1)
            }),
        ],
        |x: i32| Ok(x),
    );

    assert_eq!(pipeline.call(-1), Err("rejected".to_string()));
    assert!(!*ran.lock().unwrap());
    assert_eq!(pipeline.call(1), Ok(2));
    assert!(*ran.lock().unwrap());
}

// =============================================================================
// Onion
// =============================================================================

#[rstest]
fn onion_executes_last_declared_stage_first() {
    let log = new_log();
    let pipeline = onion(vec![
        passing("S1", &log),
        passing("S2", &log),
        passing("S3", &log),
    ]);

    assert_eq!(pipeline.call(1), 1);
    assert_eq!(entries(&log), vec!["S3", "S2", "S1"]);
}

#[rstest]
fn onion_threads_values_in_reverse() {
    // C first: 5 - 3 = 2, then B: 2 * 2 = 4, then A: 4 + 1 = 5
    let pipeline = onion(vec![add_one(), double(), subtract_three()]);
    assert_eq!(pipeline.call(5), 5);
}

#[rstest]
fn onion_outer_layer_sees_inner_result() {
    let pipeline = onion(vec![
        layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x) + 100),
        layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x) * 2),
    ]);

    // Outer (second) layer doubles what the inner layer returns.
    assert_eq!(pipeline.call(1), 202);
}

// =============================================================================
// Short circuit
// =============================================================================

#[rstest]
#[case::onion(true)]
#[case::inverted(false)]
fn stopping_stage_skips_the_rest(#[case] lifo: bool) {
    let log = new_log();
    let stages = vec![
        passing("first", &log),
        stopping("middle", 42, &log),
        passing("last", &log),
    ];
    let pipeline = if lifo { onion(stages) } else { inverted_onion(stages) };

    assert_eq!(pipeline.call(0), 42);
    let expected = if lifo { vec!["last", "middle"] } else { vec!["first", "middle"] };
    assert_eq!(entries(&log), expected);
}

// =============================================================================
// Edge cases
// =============================================================================

#[rstest]
fn empty_onions_are_identity() {
    let lifo = onion::<String>(Vec::new());
    let fifo = inverted_onion::<String>(Vec::new());

    assert!(lifo.is_empty());
    assert!(fifo.is_empty());
    assert_eq!(lifo.call("x".to_string()), "x");
    assert_eq!(fifo.call("x".to_string()), "x");
    assert_eq!(Dispatcher::<String>::identity().call("x".to_string()), "x");
}

#[rstest]
fn single_stage_receives_identity_as_next() {
    let pipeline = onion(vec![layer(|x: i32, next: &dyn Fn(i32) -> i32| {
        assert_eq!(next(x), x);
        next(x) + 1
    })]);
    assert_eq!(pipeline.call(10), 11);
}

#[rstest]
fn building_does_not_invoke_stages() {
    let log = new_log();
    let _lifo = onion(vec![passing("a", &log), passing("b", &log)]);
    let _fifo = inverted_onion(vec![passing("c", &log)]);
    let _forward = Tube::new().then({
        let log = Arc::clone(&log);
        move |x: i32| {
            log.lock().unwrap().push("d");
            x
        }
    });

    assert!(entries(&log).is_empty());
}

#[rstest]
fn each_call_starts_a_fresh_chain() {
    let log = new_log();
    let pipeline = inverted_onion(vec![passing("a", &log), passing("b", &log)]);

    pipeline.call(1);
    pipeline.call(2);

    assert_eq!(entries(&log), vec!["a", "b", "a", "b"]);
}

#[rstest]
#[case::onion(true)]
#[case::inverted(false)]
fn long_pipeline_is_dropped_without_being_called(#[case] lifo: bool) {
    let stages: Vec<_> = (0..100_000).map(|_| add_one()).collect();
    let pipeline = if lifo { onion(stages) } else { inverted_onion(stages) };

    assert_eq!(pipeline.len(), 100_000);
    drop(pipeline);
}

#[rstest]
fn long_pipeline_handles_moderate_call_depth() {
    let pipeline = inverted_onion((0..500).map(|_| add_one()).collect());
    assert_eq!(pipeline.call(0), 500);
}

// =============================================================================
// Custom terminals and builders
// =============================================================================

#[rstest]
fn custom_terminal_changes_result_type() {
    let stages = || {
        vec![
            layer(|x: u8, next: &dyn Fn(u8) -> String| format!("a({})", next(x))),
            layer(|x: u8, next: &dyn Fn(u8) -> String| format!("b({})", next(x))),
        ]
    };

    let lifo = onion_with_terminal(stages(), |x: u8| x.to_string());
    let fifo = inverted_onion_with_terminal(stages(), |x: u8| x.to_string());

    assert_eq!(lifo.call(7), "b(a(7))");
    assert_eq!(fifo.call(7), "a(b(7))");
}

#[rstest]
fn empty_pipeline_with_terminal_is_terminal() {
    let pipeline = onion_with_terminal(Vec::new(), |x: i32| x > 0);
    assert!(pipeline.call(1));
    assert!(!pipeline.call(-1));
}

#[rstest]
fn layers_builder_matches_free_functions() {
    let builder = || {
        let mut layers = Layers::new();
        layers.extend(vec![add_one(), double(), subtract_three()]);
        layers
    };

    assert_eq!(
        builder().onion().call(5),
        onion(vec![add_one(), double(), subtract_three()]).call(5)
    );
    assert_eq!(
        builder().inverted_onion().call(5),
        inverted_onion(vec![add_one(), double(), subtract_three()]).call(5)
    );
}

#[rstest]
fn invocable_objects_are_stages() {
    struct Clamp {
        maximum: i32,
    }

    impl ContinuationStage<i32, i32> for Clamp {
        fn process(&self, value: i32, next: &dyn Fn(i32) -> i32) -> i32 {
            next(value.min(self.maximum))
        }
    }

    let pipeline = Layers::<i32>::new()
        .layer(Clamp { maximum: 10 })
        .layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x + 5))
        .inverted_onion();

    assert_eq!(pipeline.call(3), 8);
    assert_eq!(pipeline.call(30), 15);
}

// =============================================================================
// Concurrency
// =============================================================================

#[rstest]
fn dispatcher_can_be_shared_across_threads() {
    let pipeline = inverted_onion(vec![add_one(), double()]);

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let pipeline = pipeline.clone();
            thread::spawn(move || pipeline.call(index))
        })
        .collect();

    let results: Vec<i32> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert_eq!(results, vec![2, 4, 6, 8]);
}
