use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use vouch_assert::Recorder;
use vouch_value::{anything, matched_by, Value};

use super::*;
use crate::{args, matchers};

fn attached() -> (Mock, Arc<Recorder>) {
    let mock = Mock::new();
    let r = Arc::new(Recorder::new());
    mock.test(Arc::clone(&r));
    (mock, r)
}

#[test]
fn dispatch_returns_registered_values() {
    let mock = Mock::new();
    mock.on("Get", matchers!["a"]).returns(args![1, true]);
    let out = mock.called("Get", args!["a"]);
    assert_eq!(out.int(0), 1);
    assert!(out.bool(1));

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "Get");
    assert_eq!(calls[0].arguments.string(0), "a");
    assert!(calls[0].location.file().ends_with("tests.rs"));
}

#[test]
fn first_registered_match_wins_until_exhausted() {
    let mock = Mock::new();
    mock.on("F", matchers![1]).returns(args![10]).once();
    mock.on("F", matchers![anything()]).returns(args![20]);
    let seen: Vec<i64> = (0..3).map(|_| mock.called("F", args![1]).int(0)).collect();
    assert_eq!(seen, vec![10, 20, 20]);
}

#[test]
fn repeatability_counts_down_to_exhausted() {
    let mock = Mock::new();
    let handle = mock.on("F", matchers![]).twice();
    assert_eq!(handle.state(), Some(ExpectationState::Registered));
    mock.called("F", args![]);
    assert_eq!(handle.state(), Some(ExpectationState::PartiallyConsumed));
    mock.called("F", args![]);
    assert_eq!(handle.state(), Some(ExpectationState::Exhausted));
    assert_eq!(handle.calls(), 2);
    assert!(!mock.is_method_callable("F", &[]));
}

#[test]
fn unlimited_expectation_never_exhausts() {
    let mock = Mock::new();
    let handle = mock.on("F", matchers![]);
    for _ in 0..5 {
        mock.called("F", args![]);
    }
    assert_eq!(handle.state(), Some(ExpectationState::PartiallyConsumed));
    assert!(mock.is_method_callable("F", &[]));
}

#[test]
fn exhausted_call_is_fatal() {
    let (mock, r) = attached();
    mock.on("F", matchers![1]).once();
    mock.called("F", args![1]);
    assert!(r.catch(|| mock.called("F", args![1])).is_none());
    let errors = r.errors();
    assert!(errors[0].contains("unexpected call to F(1)"));
    assert!(errors[0].contains("over 1 time(s)"));
}

#[test]
fn mismatch_names_the_closest_call() {
    let (mock, r) = attached();
    mock.on("F", matchers!["a", 1, true]);
    mock.on("F", matchers!["b", 2, false]);
    assert!(r.catch(|| mock.called("F", args!["a", 1, false])).is_none());
    let error = &r.errors()[0];
    assert!(error.contains("closest call registered is"));
    assert!(error.contains("F(\"a\", 1, true)"));
    assert!(error.contains("2: FAIL:  false != true"));
}

#[test]
#[should_panic(expected = "no expectation is registered for Missing")]
fn unknown_method_panics_without_context() {
    let mock = Mock::new();
    mock.on("Other", matchers![]);
    mock.called("Missing", args![]);
}

#[test]
fn raw_callable_matcher_is_fatal() {
    let (mock, r) = attached();
    let f = Value::func("fn()", |_| Vec::new());
    assert!(r.catch(|| mock.on("F", matchers![f])).is_none());
    assert!(r.errors()[0].contains("cannot use a func in expectations for F"));
}

#[test]
fn nil_passed_to_typed_predicate_is_fatal() {
    let (mock, r) = attached();
    mock.on("F", matchers![matched_by(|s: String| s.is_empty())]);
    assert!(r.catch(|| mock.called("F", args![Value::Nil])).is_none());
    assert!(r.errors()[0].contains("invalid matcher"));
}

#[test]
fn ordering_constraint() {
    let (mock, r) = attached();
    let open = mock.on("Open", matchers![]);
    mock.on("Read", matchers![]).not_before(&[&open]);
    assert!(r.catch(|| mock.called("Read", args![])).is_none());
    assert!(r.errors()[0].contains("it must be preceded by Open()"));

    mock.called("Open", args![]);
    mock.called("Read", args![]);
    assert_eq!(mock.calls().len(), 2);
}

#[test]
fn foreign_handle_is_fatal() {
    let (mock, r) = attached();
    let other = Mock::new();
    let foreign = other.on("Open", matchers![]);
    let read = mock.on("Read", matchers![]);
    assert!(r.catch(|| read.not_before(&[&foreign])).is_none());
    assert!(r.errors()[0].contains("same mock"));
}

#[test]
fn unset_removes_expectation() {
    let (mock, r) = attached();
    let handle = mock.on("F", matchers![]);
    handle.clone().unset();
    assert_eq!(handle.state(), None);
    assert!(r.catch(|| handle.clone().once()).is_none());
    assert!(r.errors()[0].contains("already unset"));
    assert!(!mock.is_method_callable("F", &[]));
}

#[test]
fn panic_with_records_call_first() {
    let mock = Mock::new();
    mock.on("Boom", matchers![]).panic_with("kaboom");
    let payload = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        mock.called("Boom", args![]);
    }))
    .unwrap_err();
    assert_eq!(vouch_assert::panic_message(&*payload), "kaboom");
    assert_eq!(mock.calls().len(), 1);
}

#[test]
fn callback_writes_through_references() {
    let mock = Mock::new();
    mock.on("Fill", matchers![anything()]).run(|args| {
        args.get(0).as_ref_value().unwrap().store(Value::int(42));
    });
    let out = Value::pointer(Value::int(0));
    mock.called("Fill", vec![out.clone()]);
    assert_eq!(out.as_ref_value().unwrap().load(), Some(Value::int(42)));
}

#[test]
fn wait_happens_outside_the_lock() {
    let mock = Arc::new(Mock::new());
    let (tx, rx) = crossbeam::channel::bounded::<()>(0);
    mock.on("Slow", matchers![]).wait_until(rx);
    mock.on("Fast", matchers![]).returns(args![1]);

    let slow = {
        let mock = Arc::clone(&mock);
        thread::spawn(move || {
            mock.called("Slow", args![]);
        })
    };
    while mock.calls().is_empty() {
        thread::yield_now();
    }
    assert_eq!(mock.called("Fast", args![]).int(0), 1);
    drop(tx);
    slow.join().unwrap();
}

#[test]
fn wait_until_releases_on_value_then_on_disconnect() {
    let mock = Mock::new();
    let (tx, rx) = crossbeam::channel::bounded::<u8>(1);
    mock.on("Gate", matchers![]).wait_until(rx).returns(args![5]);
    tx.send(0).unwrap();
    drop(tx);

    let start = std::time::Instant::now();
    assert_eq!(mock.called("Gate", args![]).int(0), 5);
    assert_eq!(mock.called("Gate", args![]).int(0), 5);
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(mock.calls().len(), 2);
}

#[test]
fn after_delays_the_call() {
    let mock = Mock::new();
    mock.on("F", matchers![]).after(Duration::from_millis(20));
    let start = std::time::Instant::now();
    mock.called("F", args![]);
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn concurrent_dispatch_records_every_call() {
    let mock = Arc::new(Mock::new());
    let handle = mock.on("Inc", matchers![anything()]);
    let workers: Vec<_> = (0..8)
        .map(|w| {
            let mock = Arc::clone(&mock);
            thread::spawn(move || {
                for i in 0..50 {
                    mock.called("Inc", args![w * 50 + i]);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(mock.calls().len(), 400);
    assert_eq!(handle.calls(), 400);
}

#[test]
fn test_data_is_created_lazily() {
    let mock = Mock::new();
    assert!(mock.test_data().is_empty());
    mock.test_data().insert("seen".to_owned(), Value::bool(true));
    assert_eq!(mock.test_data().get("seen"), Some(&Value::bool(true)));
}
