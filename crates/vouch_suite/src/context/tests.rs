use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use vouch_assert::{require, TestContext, TestingT};

use super::*;

#[test]
fn errors_mark_the_test_failed() {
    let t = T::new("root");
    assert!(!t.failed());
    t.error("first");
    t.error("second");
    assert!(t.failed());
    assert_eq!(t.errors(), vec!["first".to_owned(), "second".to_owned()]);
}

#[test]
fn guard_reports_panics_once() {
    let t = T::new("root");
    assert!(!t.guard("test", || panic!("boom")));
    assert_eq!(t.errors(), vec!["test panicked: boom".to_owned()]);

    assert!(!t.guard("test", || {
        require::is_true(&t, false, ());
    }));
    assert_eq!(t.errors().len(), 2);
    assert!(t.guard("test", || {}));
}

#[test]
fn subtests_are_named_and_propagate_failure() {
    let t = T::new("root");
    assert!(t.run("ok", &mut |child: &T| {
        assert_eq!(child.name(), "root/ok");
        child.log("inside");
    }));
    assert!(!t.failed());
    assert!(!t.run("bad", &mut |child: &T| child.error("nope")));
    assert!(t.failed());

    let subtests = t.subtests();
    assert_eq!(subtests.len(), 2);
    assert!(subtests[0].outcome.is_passed());
    assert_eq!(subtests[0].logs, vec!["inside".to_owned()]);
    assert_eq!(subtests[1].outcome, TestOutcome::Failed("nope".to_owned()));
}

#[test]
fn skipped_subtest_is_not_a_failure() {
    let t = T::new("root");
    assert!(t.run("later", &mut |child: &T| child.skip("not today")));
    assert_eq!(
        t.subtests()[0].outcome,
        TestOutcome::Skipped("not today".to_owned())
    );
    assert!(!t.failed());
}

#[test]
fn cleanups_run_last_first() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let t = T::new("root");
    for i in 0..3 {
        let order = Arc::clone(&order);
        t.cleanup(Box::new(move || order.lock().push(i)));
    }
    t.cleanup(Box::new(|| panic!("cleanup broke")));
    t.finish();
    assert_eq!(*order.lock(), vec![2, 1, 0]);
    assert_eq!(t.errors(), vec!["cleanup panicked: cleanup broke".to_owned()]);
}

#[test]
fn temp_dir_is_removed_on_finish() {
    let t = T::new("root");
    let dir = t.temp_dir().unwrap();
    assert!(dir.is_dir());
    assert_eq!(t.temp_dir(), Some(dir.clone()));
    t.finish();
    assert!(!dir.exists());
}

#[test]
fn set_env_is_restored() {
    const KEY: &str = "VOUCH_CONTEXT_SET_ENV_TEST";
    let t = T::new("root");
    assert!(t.set_env(KEY, "on"));
    assert_eq!(std::env::var(KEY).as_deref(), Ok("on"));
    t.finish();
    assert!(std::env::var(KEY).is_err());
}

#[test]
fn parallel_capabilities() {
    let root = T::new("root");
    assert!(!root.set_parallel());
    assert!(!root.is_parallel());

    let fanned = root.test_child("TestX", true, None);
    assert!(fanned.set_parallel());
    assert!(fanned.is_parallel());
    assert!(!fanned.set_env("VOUCH_CONTEXT_PARALLEL_ENV", "x"));
    assert!(std::env::var("VOUCH_CONTEXT_PARALLEL_ENV").is_err());
}

#[test]
fn deadline_is_inherited() {
    let at = Instant::now() + std::time::Duration::from_secs(60);
    let root = T::new("root");
    assert_eq!(root.deadline(), None);
    let test = root.test_child("TestX", false, Some(at));
    assert_eq!(test.child("sub").deadline(), Some(at));
}
