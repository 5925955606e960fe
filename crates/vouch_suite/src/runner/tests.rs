use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use vouch_assert::{require, TestContext, TestingT};

use super::*;
use crate::stats::TestOutcome;

type Log = Arc<Mutex<Vec<String>>>;

#[derive(Clone, Default)]
struct Lifecycled {
    log: Log,
}

impl Lifecycled {
    fn note(&self, entry: &str) {
        self.log.lock().push(entry.to_owned());
    }
}

impl Suite for Lifecycled {
    fn methods(m: &mut Methods<Self>) {
        m.add("SetupSuite", |s, _| s.note("SetupSuite"))
            .add("SetupTest", |s, _| s.note("SetupTest"))
            .add("TestA", |s, _| s.note("TestA"))
            .add("TestB", |s, _| s.note("TestB"))
            .add("TearDownTest", |s, _| s.note("TearDownTest"))
            .add("TearDownSuite", |s, _| s.note("TearDownSuite"))
            .add("helper", |s, _| s.note("helper"));
    }
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().clone()
}

#[test]
fn hooks_run_in_order() {
    let mut suite = Lifecycled::default();
    let t = T::new("root");
    let summary = run(&t, &mut suite, &RunOptions::new());
    assert_eq!(
        entries(&suite.log),
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
    assert_eq!(summary.suite, "Lifecycled");
    assert_eq!(summary.passed, 2);
    assert!(!summary.has_failures());
}

#[test]
fn empty_filter_fires_no_hooks() {
    let mut suite = Lifecycled::default();
    let t = T::new("root");
    let summary = run(&t, &mut suite, &RunOptions::new().filter(|_| false));
    assert!(entries(&suite.log).is_empty());
    assert_eq!(summary.total(), 0);
    assert!(!t.failed());
}

#[test]
fn filter_selects_tests() {
    let mut suite = Lifecycled::default();
    let t = T::new("root");
    let summary = run(&t, &mut suite, &RunOptions::new().filter_substring("B"));
    assert_eq!(summary.total(), 1);
    assert!(entries(&suite.log).contains(&"TestB".to_owned()));
    assert!(!entries(&suite.log).contains(&"TestA".to_owned()));

    let mut suite = Lifecycled::default();
    let options = RunOptions::new().filter_substring("B").ignore_filter(true);
    assert_eq!(run(&t, &mut suite, &options).total(), 2);
}

#[derive(Default)]
struct Failing {
    log: Log,
}

impl Suite for Failing {
    fn methods(m: &mut Methods<Self>) {
        m.add("SetupTest", |s, _| s.log.lock().push("SetupTest".into()))
            .add("TestPanics", |_, _| panic!("kaboom"))
            .add("TestStops", |_, t| {
                require::equal(t, 1, 2, ());
            })
            .add("TestSoft", |_, t| {
                t.error("soft failure");
            })
            .add("TearDownTest", |s, _| s.log.lock().push("TearDownTest".into()));
        m.after_test(|s, _, _, test| s.log.lock().push(format!("AfterTest {test}")));
    }
}

#[test]
fn teardown_runs_after_failures() {
    let mut suite = Failing::default();
    let t = T::new("root");
    let summary = run(&t, &mut suite, &RunOptions::new());
    assert_eq!(
        entries(&suite.log),
        vec![
            "SetupTest",
            "TearDownTest",
            "SetupTest",
            "TearDownTest",
            "SetupTest",
            "AfterTest TestSoft",
            "TearDownTest",
        ]
    );
    assert_eq!(summary.failed, 3);
    assert!(t.failed());
    assert_eq!(
        summary.result("TestPanics").unwrap().outcome,
        TestOutcome::Failed("test panicked: kaboom".to_owned())
    );
    match &summary.result("TestStops").unwrap().outcome {
        TestOutcome::Failed(message) => assert!(message.contains("Not equal")),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[derive(Default)]
struct BrokenSetup {
    log: Log,
}

impl Suite for BrokenSetup {
    fn methods(m: &mut Methods<Self>) {
        m.add("SetupSuite", |_, _| panic!("no database"))
            .add("TestA", |s, _| s.log.lock().push("TestA".into()))
            .add("TearDownSuite", |s, _| s.log.lock().push("TearDownSuite".into()));
    }
}

#[test]
fn failed_setup_suite_skips_tests_but_tears_down() {
    let mut suite = BrokenSetup::default();
    let t = T::new("root");
    let summary = run(&t, &mut suite, &RunOptions::new());
    assert_eq!(entries(&suite.log), vec!["TearDownSuite"]);
    assert_eq!(summary.skipped, 1);
    assert!(summary.suite_hooks_failed);
    assert_eq!(t.errors(), vec!["SetupSuite panicked: no database".to_owned()]);
}

#[derive(Default)]
struct Observed {
    log: Log,
    stats: Arc<Mutex<Option<SuiteInformation>>>,
}

impl Suite for Observed {
    fn methods(m: &mut Methods<Self>) {
        m.add("TestGood", |_, _| {})
            .add("TestBad", |_, t| t.error("bad"));
        m.before_test(|s, _, suite, test| s.log.lock().push(format!("before {suite}.{test}")))
            .after_test(|s, _, suite, test| s.log.lock().push(format!("after {suite}.{test}")))
            .handle_stats(|s, _, suite, stats| {
                s.log.lock().push(format!("stats {suite}"));
                *s.stats.lock() = Some(stats.clone());
            });
    }

    fn name() -> String {
        "Observed".to_owned()
    }
}

#[test]
fn before_after_and_stats() {
    let mut suite = Observed::default();
    let t = T::new("root");
    run(&t, &mut suite, &RunOptions::new());
    assert_eq!(
        entries(&suite.log),
        vec![
            "before Observed.TestGood",
            "after Observed.TestGood",
            "before Observed.TestBad",
            "after Observed.TestBad",
            "stats Observed",
        ]
    );
    let stats = suite.stats.lock().clone().unwrap();
    assert_eq!(stats.test_stats.len(), 2);
    assert!(stats.test_stats["TestGood"].passed);
    assert!(!stats.test_stats["TestBad"].passed);
    assert!(stats.test_stats["TestBad"].duration().is_some());
    assert!(!stats.passed());
    assert!(stats.end.is_some());
}

#[derive(Default)]
struct Misregistered;

impl Suite for Misregistered {
    fn methods(m: &mut Methods<Self>) {
        m.add("TestA", |_, _| {})
            .add("TestA", |_, _| {})
            .add("HandleStats", |_, _| {});
    }
}

#[test]
fn registration_errors_fail_the_run() {
    let t = T::new("root");
    let summary = run(&t, &mut Misregistered, &RunOptions::new());
    assert_eq!(summary.total(), 0);
    assert!(summary.has_failures());
    let errors = t.errors();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("registered more than once"));
    assert!(errors[1].contains("Methods::handle_stats"));
}

struct Counted {
    copies: Arc<AtomicUsize>,
    touched: usize,
    parallel: Arc<AtomicUsize>,
}

impl Clone for Counted {
    fn clone(&self) -> Self {
        self.copies.fetch_add(1, Ordering::SeqCst);
        Counted {
            copies: Arc::clone(&self.copies),
            touched: self.touched,
            parallel: Arc::clone(&self.parallel),
        }
    }
}

impl Suite for Counted {
    fn methods(m: &mut Methods<Self>) {
        for name in ["TestOne", "TestTwo", "TestThree"] {
            m.add(name, |s, t| {
                s.touched += 1;
                if t.set_parallel() {
                    s.parallel.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    }
}

#[test]
fn parallel_copies_only_admitted_tests() {
    let mut suite = Counted {
        copies: Arc::default(),
        touched: 0,
        parallel: Arc::default(),
    };
    let t = T::new("root");
    let options = RunOptions::new().filter(|name| name != "TestTwo");
    let summary = run_parallel(&t, &mut suite, &options);
    assert_eq!(summary.passed, 2);
    assert_eq!(suite.copies.load(Ordering::SeqCst), 2);
    assert_eq!(suite.parallel.load(Ordering::SeqCst), 2);
    assert_eq!(suite.touched, 0);
}

#[test]
fn sequential_tests_cannot_go_parallel() {
    let mut suite = Counted {
        copies: Arc::default(),
        touched: 0,
        parallel: Arc::default(),
    };
    let t = T::new("root");
    run(&t, &mut suite, &RunOptions::new());
    assert_eq!(suite.touched, 3);
    assert_eq!(suite.copies.load(Ordering::SeqCst), 0);
    assert_eq!(suite.parallel.load(Ordering::SeqCst), 0);
}

#[derive(Default)]
struct Nested {
    log: Log,
    current: Option<String>,
}

impl Nested {
    fn test_outer(&mut self, t: &T) {
        self.subtest(t, "first", |s, _| {
            let name = s.current.clone().unwrap_or_default();
            s.log.lock().push(format!("body {name}"));
        });
        self.subtest(t, "second", |_, t| t.error("inner failure"));
    }
}

impl Suite for Nested {
    fn methods(m: &mut Methods<Self>) {
        m.add("TestOuter", Self::test_outer)
            .add("SetupSubTest", |s, _| s.log.lock().push("SetupSubTest".into()))
            .add("TearDownSubTest", |s, _| {
                s.log.lock().push("TearDownSubTest".into());
            });
    }

    fn set_t(&mut self, t: &T) {
        self.current = Some(t.name());
    }
}

#[test]
fn subtests_are_wrapped_in_hooks() {
    let mut suite = Nested::default();
    let t = T::new("root");
    let summary = run(&t, &mut suite, &RunOptions::new());
    assert_eq!(
        entries(&suite.log),
        vec![
            "SetupSubTest",
            "body root/TestOuter/first",
            "TearDownSubTest",
            "SetupSubTest",
            "TearDownSubTest",
        ]
    );
    let outer = summary.result("TestOuter").unwrap();
    assert!(outer.outcome.is_failed());
    assert_eq!(outer.subtests.len(), 2);
    assert!(outer.subtests[0].outcome.is_passed());
    assert_eq!(
        outer.subtests[1].outcome,
        TestOutcome::Failed("inner failure".to_owned())
    );
    assert_eq!(suite.current.as_deref(), Some("root"));
}

#[derive(Default)]
struct Bare {
    t: Option<T>,
    names: Log,
}

impl Suite for Bare {
    fn methods(m: &mut Methods<Self>) {
        m.add_bare("TestBare", |s| {
            if let Some(t) = &s.t {
                s.names.lock().push(t.name());
            }
        });
    }

    fn set_t(&mut self, t: &T) {
        self.t = Some(t.clone());
    }
}

#[test]
fn bare_methods_read_the_stored_context() {
    let mut suite = Bare::default();
    let t = T::new("root");
    run(&t, &mut suite, &RunOptions::new());
    assert_eq!(entries(&suite.names), vec!["root/TestBare"]);
}

#[test]
fn lifecycle_flags() {
    let methods = Methods::<Lifecycled>::of();
    let lifecycle = methods.lifecycle();
    assert!(lifecycle.contains(Lifecycle::SETUP_SUITE | Lifecycle::TEARDOWN_TEST));
    assert!(!lifecycle.contains(Lifecycle::BEFORE_TEST));
    assert_eq!(methods.tests().collect::<Vec<_>>(), vec!["TestA", "TestB"]);

    let observed = Methods::<Observed>::of().lifecycle();
    assert_eq!(
        observed,
        Lifecycle::BEFORE_TEST | Lifecycle::AFTER_TEST | Lifecycle::HANDLE_STATS
    );
}
