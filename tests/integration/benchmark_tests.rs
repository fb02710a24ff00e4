//! Benchmark runs and progress relay.

use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::{Value, json};

use crate::mock_hw::{EngineCall, TestBridge, envelope};

fn progress_runs(out: &[Value]) -> Vec<(u64, u64)> {
    out.iter()
        .filter(|v| v["broadcast"] == "benchmarkProgress")
        .map(|v| {
            (
                v["result"]["currentRun"].as_u64().unwrap(),
                v["result"]["totalRuns"].as_u64().unwrap(),
            )
        })
        .collect()
}

#[test]
fn multi_core_progress_is_ordered_and_bounded() {
    let bridge = TestBridge::new();
    let out = bridge.send(&envelope("1", "runMultiCoreBenchmark", json!({"numRuns": 3})));

    let runs = progress_runs(&out);
    assert_eq!(runs, [(1, 3), (2, 3), (3, 3)]);
    assert!(runs.windows(2).all(|w| w[0].0 <= w[1].0));

    let reply = out.last().unwrap();
    assert!(reply["result"]["score"].as_f64().unwrap() > 0.0);
    assert_eq!(reply["result"]["success"], true);
}

#[test]
fn engine_progress_is_forwarded_without_coalescing() {
    let bridge = TestBridge::new();
    *bridge.engine.progress_script.lock().unwrap() = Some(vec![(1, 3), (1, 3), (2, 3), (3, 3), (3, 3)]);

    let out = bridge.send(&envelope("1", "runMultiCoreBenchmark", json!({"numRuns": 3})));
    assert_eq!(progress_runs(&out), [(1, 3), (1, 3), (2, 3), (3, 3), (3, 3)]);
}

#[test]
fn no_progress_events_still_yields_a_reply() {
    let bridge = TestBridge::new();
    *bridge.engine.progress_script.lock().unwrap() = Some(Vec::new());

    let out = bridge.send(&envelope("1", "runMultiCoreBenchmark", Value::Null));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["replyTo"], "runMultiCoreBenchmark");
}

#[test]
fn num_runs_defaults_to_three_and_is_clamped() {
    let bridge = TestBridge::new();
    bridge.send(&envelope("1", "runMultiCoreBenchmark", Value::Null));
    bridge.send(&envelope("2", "runMultiCoreBenchmark", json!({"numRuns": 50})));
    bridge.send(&envelope("3", "runMultiCoreBenchmark", json!({"numRuns": -2})));

    assert_eq!(
        bridge.engine.calls(),
        [EngineCall::MultiCore(3), EngineCall::MultiCore(10), EngineCall::MultiCore(1)]
    );
}

#[test]
fn zero_score_reports_failure() {
    let bridge = TestBridge::new();
    *bridge.engine.score.lock().unwrap() = 0.0;
    let reply = bridge.request(&envelope("1", "runSingleCoreBenchmark", Value::Null));
    assert_eq!(reply["result"], json!({"score": 0.0, "success": false}));
    assert_eq!(bridge.engine.calls(), [EngineCall::SingleCore]);
}

#[test]
fn concurrent_multi_core_runs_are_serialized() {
    let bridge = TestBridge::new();
    *bridge.engine.benchmark_delay.lock().unwrap() = Duration::from_millis(10);

    let workers: Vec<_> = (0..3)
        .map(|i| {
            match bridge
                .dispatcher
                .dispatch(&envelope(&i.to_string(), "runMultiCoreBenchmark", json!({"numRuns": 2})))
            {
                cpubridge::rpc::dispatcher::Dispatch::Deferred(h) => h,
                other => panic!("expected a worker, got {other:?}"),
            }
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }

    assert_eq!(bridge.engine.max_multi_in_flight.load(Ordering::SeqCst), 1);
    let out = bridge.drain();
    assert_eq!(out.iter().filter(|v| v.get("replyTo").is_some()).count(), 3);
    assert_eq!(progress_runs(&out).len(), 6);
}
