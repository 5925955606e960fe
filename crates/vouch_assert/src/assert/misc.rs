use super::report;
use crate::context::{FailNow, TestingT};
use crate::diagnostic::{Diagnostic, Message};

/// Asserts that `comp` returns `true`.
#[track_caller]
pub fn condition(
    t: &(impl TestingT + ?Sized),
    comp: impl FnOnce() -> bool,
    msg: impl Into<Message>,
) -> bool {
    if comp() {
        return true;
    }
    report(t, Diagnostic::new("Condition failed!").with_message(&msg.into()))
}

/// Reports `failure` unconditionally. Always returns `false`.
#[track_caller]
pub fn fail(t: &(impl TestingT + ?Sized), failure: &str, msg: impl Into<Message>) -> bool {
    report(t, Diagnostic::new(failure).with_message(&msg.into()))
}

/// Reports `failure` and stops the test.
#[track_caller]
pub fn fail_now(t: &(impl FailNow + ?Sized), failure: &str, msg: impl Into<Message>) -> ! {
    fail(t, failure, msg);
    t.fail_now()
}
