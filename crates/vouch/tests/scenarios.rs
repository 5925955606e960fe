//! End-to-end scenarios: assertions, mocks and suites working together
//! under the suite runner's context.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use vouch::prelude::*;
use vouch::suite::{run, RunOptions, TestOutcome};

/// Run `body` as a single subtest of a fresh root and return its outcome.
fn outcome(mut body: impl FnMut(&T)) -> TestOutcome {
    let root = T::new("scenarios");
    root.run("case", &mut body);
    root.subtests().into_iter().next().unwrap().outcome
}

fn failure(body: impl FnMut(&T)) -> String {
    match outcome(body) {
        TestOutcome::Failed(message) => message,
        other => panic!("expected a failure, got {other:?}"),
    }
}

fn person(city: &str) -> Value {
    Value::record("scenarios::Person")
        .field("Name", "John")
        .field("Age", 30i32)
        .field(
            "Addr",
            Value::record("scenarios::Address").field("City", city).build(),
        )
        .build()
}

#[test]
fn nested_struct_difference() {
    let mut returned = None;
    let message = failure(|t| {
        returned = Some(assert::equal(t, person("NY"), person("Boston"), ()));
    });
    assert_eq!(returned, Some(false));
    assert!(message.contains("Not equal"), "{message}");
    assert!(
        message.contains("Addr.City: expected \"NY\", actual \"Boston\""),
        "{message}"
    );
    assert_eq!(message.matches("Addr.").count(), 1, "{message}");
}

trait Fetcher {
    fn fetch(&self, request: Value) -> Arguments;
}

#[derive(Default)]
struct FetcherMock(Mock);

impl Fetcher for FetcherMock {
    fn fetch(&self, request: Value) -> Arguments {
        self.0.called("do", vec![request])
    }
}

fn request(host: &str) -> Value {
    Value::record("scenarios::Request")
        .field("host", host)
        .field("path", "/x")
        .build()
}

#[test]
fn mock_predicate_matcher() {
    let fetcher = FetcherMock::default();
    let mut seen = Vec::new();

    let message = failure(|t| {
        fetcher.0.test(t.clone());
        fetcher
            .0
            .on(
                "do",
                matchers![matched_by(|req: Value| {
                    req.field("host").and_then(Value::as_str) == Some("example.com")
                })],
            )
            .returns(args![Value::Nil]);

        let returned = fetcher.fetch(request("example.com"));
        seen.push(returned.get(0).to_string());
        seen.push(fetcher.0.calls().len().to_string());

        fetcher.fetch(request("other"));
        seen.push("unreachable".to_owned());
    });

    assert_eq!(seen, vec!["nil", "1"]);
    assert!(message.contains("mock: unexpected call to do("), "{message}");
    assert!(message.contains("closest call registered is"), "{message}");
    assert!(message.contains("<matched_by"), "{message}");
    assert_eq!(fetcher.0.calls().len(), 1);
}

#[derive(Clone, Default)]
struct Ordered {
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl Suite for Ordered {
    fn methods(m: &mut Methods<Self>) {
        for name in [
            "SetupSuite",
            "SetupTest",
            "TestA",
            "TestB",
            "TearDownTest",
            "TearDownSuite",
        ] {
            m.add(name, move |s, _| s.log.lock().push(name));
        }
    }
}

#[test]
fn suite_hook_ordering() {
    let suite = Ordered::default();
    let log = Arc::clone(&suite.log);
    let summary = run_suite(suite);
    assert_eq!(summary.passed, 2);
    assert_eq!(
        *log.lock(),
        vec![
            "SetupSuite",
            "SetupTest",
            "TestA",
            "TearDownTest",
            "SetupTest",
            "TestB",
            "TearDownTest",
            "TearDownSuite",
        ]
    );
}

#[test]
fn ordering_on_mixed_kinds() {
    let mut returned = None;
    let message = failure(|t| {
        let mixed = Value::list(vec![1.to_value(), 2.to_value(), "3".to_value()]);
        returned = Some(assert::is_increasing(t, mixed, ()));
    });
    assert_eq!(returned, Some(false));
    assert!(message.contains("not comparable at index 2"), "{message}");
}

#[test]
fn eventually_with_aborting_condition() {
    let mut returned = None;
    let mut elapsed = Duration::ZERO;
    let root = T::new("scenarios");
    root.run("case", &mut |t: &T| {
        let worker = t.clone();
        let start = Instant::now();
        returned = Some(assert::eventually(
            t,
            move || worker.fail_now(),
            Duration::from_secs(1),
            Duration::from_millis(10),
            (),
        ));
        elapsed = start.elapsed();
    });

    assert_eq!(returned, Some(false));
    assert!(elapsed < Duration::from_secs(1), "{elapsed:?}");
    let case = root.subtests().into_iter().next().unwrap();
    match case.outcome {
        TestOutcome::Failed(message) => {
            assert_eq!(message.matches("Location:").count(), 1, "{message}");
            assert!(message.contains("Condition exited unexpectedly"), "{message}");
        }
        other => panic!("expected a failure, got {other:?}"),
    }
}

#[test]
fn partial_repeatability() {
    let mock = Mock::new();
    let mut counted = None;
    let message = failure(|t| {
        mock.test(t.clone());
        mock.on("F", matchers![7]).times(3);
        mock.called("F", args![7]);
        mock.called("F", args![7]);
        assert!(!mock.assert_expectations(t));
        counted = Some(mock.assert_number_of_calls(t, "F", 2, ()));
    });
    assert_eq!(counted, Some(true));
    assert!(message.contains("F(7) registered at"), "{message}");
    assert!(message.contains("called 2 time(s), expected 3"), "{message}");
}

#[derive(Default)]
struct Inventory {
    warehouse: Mock,
    reserved: Vec<String>,
}

impl Inventory {
    fn reserve(&mut self, item: &str) -> bool {
        let stock = self.warehouse.called("Stock", args![item]).int(0);
        if stock > 0 {
            self.reserved.push(item.to_owned());
        }
        stock > 0
    }

    fn test_reserve(&mut self, t: &T) {
        self.warehouse
            .on("Stock", matchers!["apples"])
            .returns(args![3i64])
            .once();
        self.warehouse
            .on("Stock", matchers![any_of_type("String")])
            .returns(args![0i64]);

        assert::is_true(t, self.reserve("apples"), ());
        assert::is_false(t, self.reserve("pears"), ());
        assert::equal(t, vec!["apples".to_owned()], self.reserved.clone(), ());
        self.warehouse.assert_number_of_calls(t, "Stock", 2, ());
    }
}

impl Suite for Inventory {
    fn methods(m: &mut Methods<Self>) {
        m.add("SetupTest", |s, t| {
            s.warehouse = Mock::new();
            s.warehouse.test(t.clone());
            s.reserved.clear();
        })
        .add("TestReserve", Self::test_reserve)
        .add("TearDownTest", |s, t| {
            s.warehouse.assert_expectations(t);
        });
    }
}

#[test]
fn suite_with_a_mock_collaborator() {
    let summary = run_suite(Inventory::default());
    assert_eq!(summary.passed, 1);
}

#[derive(Clone, Default)]
struct Isolated {
    owner: String,
}

impl Suite for Isolated {
    fn methods(m: &mut Methods<Self>) {
        m.add("SetupTest", |s, t| s.owner = t.name());
        for name in ["TestOne", "TestTwo", "TestThree", "TestFour"] {
            m.add(name, |s, t| {
                std::thread::sleep(Duration::from_millis(20));
                assert::equal(t, t.name(), s.owner.clone(), "sibling setup leaked");
            });
        }
    }
}

#[test]
fn parallel_tests_do_not_share_setup() {
    let summary = run_suite_parallel(Isolated::default());
    assert_eq!(summary.passed, 4);
}

#[test]
fn filtered_out_suite_fires_no_hooks() {
    let mut suite = Ordered::default();
    let t = T::new("scenarios");
    let summary = run(&t, &mut suite, &RunOptions::new().filter(|_| false));
    assert_eq!(summary.total(), 0);
    assert!(suite.log.lock().is_empty());
}
