use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::report;
use crate::context::{is_aborted, panic_message, skipped_reason, TestingT};
use crate::diagnostic::{Diagnostic, Message};

/// Run `f`, returning its panic payload if it panicked. Aborts and skips
/// of the enclosing test keep unwinding.
fn catch(f: impl FnOnce()) -> Option<Box<dyn Any + Send>> {
    let payload = panic::catch_unwind(AssertUnwindSafe(f)).err()?;
    if is_aborted(&*payload) || skipped_reason(&*payload).is_some() {
        panic::resume_unwind(payload);
    }
    Some(payload)
}

/// Asserts that `f` panics.
#[track_caller]
pub fn panics(t: &(impl TestingT + ?Sized), f: impl FnOnce(), msg: impl Into<Message>) -> bool {
    if catch(f).is_some() {
        return true;
    }
    report(
        t,
        Diagnostic::new("func should panic")
            .with_label("Panic value", "<none>")
            .with_message(&msg.into()),
    )
}

/// Asserts that `f` panics with the message `expected`.
#[track_caller]
pub fn panics_with_value(
    t: &(impl TestingT + ?Sized),
    expected: &str,
    f: impl FnOnce(),
    msg: impl Into<Message>,
) -> bool {
    let Some(payload) = catch(f) else {
        return report(
            t,
            Diagnostic::new("func should panic")
                .with_label("Panic value", "<none>")
                .with_message(&msg.into()),
        );
    };
    let actual = panic_message(&*payload);
    if actual == expected {
        return true;
    }
    report(
        t,
        Diagnostic::new("func should panic with value")
            .with_label("Expected", format!("{expected:?}"))
            .with_label("Panic value", format!("{actual:?}"))
            .with_message(&msg.into()),
    )
}

/// Asserts that `f` does not panic.
#[track_caller]
pub fn not_panics(
    t: &(impl TestingT + ?Sized),
    f: impl FnOnce(),
    msg: impl Into<Message>,
) -> bool {
    let Some(payload) = catch(f) else {
        return true;
    };
    report(
        t,
        Diagnostic::new("func should not panic")
            .with_label("Panic value", panic_message(&*payload))
            .with_message(&msg.into()),
    )
}
