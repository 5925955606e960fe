//! Test-context capabilities.
//!
//! Assertions only need to report errors ([`TestingT`]). Fail-fast
//! requirements also need to stop the test ([`FailNow`]). Mocks, suites and
//! subtests need the full host context ([`TestContext`]).
//!
//! Stopping a test unwinds with a [`TestAborted`] payload. Runners catch it
//! at their failure barrier and recognise it as "already reported", so an
//! abort never produces a second diagnostic.

use std::any::Any;
use std::path::PathBuf;
use std::time::Instant;

/// Minimal sink for assertion failures.
pub trait TestingT {
    /// Report a failure. The test keeps running.
    fn error(&self, message: &str);

    /// Mark the calling function as a helper for call-site attribution.
    fn helper(&self) {}
}

/// A context that can stop the current test.
pub trait FailNow: TestingT {
    /// Mark the test failed and stop it. Never returns.
    fn fail_now(&self) -> !;
}

/// Full host test context.
pub trait TestContext: FailNow {
    /// Record a log line against the test.
    fn log(&self, message: &str);

    /// Name of the test, `Parent/child` for subtests.
    fn name(&self) -> String;

    /// Whether the test has failed so far.
    fn failed(&self) -> bool;

    /// Run `body` as a subtest with its own context. Returns whether the
    /// subtest passed.
    fn run(&self, name: &str, body: &mut dyn FnMut(&Self)) -> bool
    where
        Self: Sized;

    /// Mark the test skipped and stop it.
    fn skip(&self, reason: &str) -> !;

    /// Register `f` to run when the test (and its subtests) finish.
    fn cleanup(&self, f: Box<dyn FnOnce() + Send>);

    fn is_skipped(&self) -> bool {
        false
    }

    /// Opt into parallel execution. Returns `false` when the host cannot
    /// run this test in parallel.
    fn set_parallel(&self) -> bool {
        false
    }

    /// Instant at which the host will time the test out, if any.
    fn deadline(&self) -> Option<Instant> {
        None
    }

    /// Per-test temporary directory, removed after the test.
    fn temp_dir(&self) -> Option<PathBuf> {
        None
    }

    /// Set an environment variable for the duration of the test. Returns
    /// `false` when the host refuses.
    fn set_env(&self, _key: &str, _value: &str) -> bool {
        false
    }
}

/// Unwind payload of a stopped test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TestAborted;

/// Unwind payload of a skipped test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestSkipped(pub String);

/// Stop the current test without invoking the panic hook.
pub fn abort() -> ! {
    std::panic::resume_unwind(Box::new(TestAborted))
}

/// Skip the current test without invoking the panic hook.
pub fn abort_skipped(reason: &str) -> ! {
    std::panic::resume_unwind(Box::new(TestSkipped(reason.to_owned())))
}

/// Whether an unwind payload is a [`TestAborted`].
pub fn is_aborted(payload: &(dyn Any + Send)) -> bool {
    payload.is::<TestAborted>()
}

/// Skip reason of an unwind payload, if it is a [`TestSkipped`].
pub fn skipped_reason(payload: &(dyn Any + Send)) -> Option<&str> {
    payload.downcast_ref::<TestSkipped>().map(|s| s.0.as_str())
}

/// Human-readable text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if is_aborted(payload) {
        "test aborted".to_owned()
    } else if let Some(reason) = skipped_reason(payload) {
        format!("test skipped: {reason}")
    } else {
        "unknown panic payload".to_owned()
    }
}

impl<T: TestingT + ?Sized> TestingT for &T {
    fn error(&self, message: &str) {
        (**self).error(message);
    }

    fn helper(&self) {
        (**self).helper();
    }
}

impl<T: FailNow + ?Sized> FailNow for &T {
    fn fail_now(&self) -> ! {
        (**self).fail_now()
    }
}

impl<T: TestingT + ?Sized> TestingT for std::sync::Arc<T> {
    fn error(&self, message: &str) {
        (**self).error(message);
    }

    fn helper(&self) {
        (**self).helper();
    }
}

impl<T: FailNow + ?Sized> FailNow for std::sync::Arc<T> {
    fn fail_now(&self) -> ! {
        (**self).fail_now()
    }
}
