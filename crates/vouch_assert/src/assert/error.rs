use std::error::Error;
use std::iter;

use super::report;
use crate::context::TestingT;
use crate::diagnostic::{Diagnostic, Message};

/// Something that may hold an error: a `Result`, an `Option` of an error,
/// or an error itself.
pub trait MaybeError {
    fn as_error(&self) -> Option<&(dyn Error + 'static)>;
}

impl<T, E: Error + 'static> MaybeError for Result<T, E> {
    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        self.as_ref().err().map(|e| e as &(dyn Error + 'static))
    }
}

impl<E: Error + 'static> MaybeError for Option<E> {
    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        self.as_ref().map(|e| e as &(dyn Error + 'static))
    }
}

impl MaybeError for dyn Error + 'static {
    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        Some(self)
    }
}

impl MaybeError for dyn Error + Send + Sync + 'static {
    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        Some(self)
    }
}

impl MaybeError for Box<dyn Error + Send + Sync> {
    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        Some(&**self)
    }
}

/// The error followed by its `source()` chain.
fn chain<'a>(err: &'a (dyn Error + 'static)) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    iter::successors(Some(err), |&e| e.source())
}

fn render_chain(err: &(dyn Error + 'static)) -> String {
    chain(err)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// First error of type `E` in the chain of `err`.
pub fn find_error<E: Error + 'static>(err: &(impl MaybeError + ?Sized)) -> Option<&E> {
    chain(err.as_error()?).find_map(|e| e.downcast_ref::<E>())
}

/// Asserts that `err` holds an error.
#[track_caller]
pub fn error(
    t: &(impl TestingT + ?Sized),
    err: &(impl MaybeError + ?Sized),
    msg: impl Into<Message>,
) -> bool {
    if err.as_error().is_some() {
        return true;
    }
    report(
        t,
        Diagnostic::new("An error is expected but got nil.").with_message(&msg.into()),
    )
}

/// Asserts that `err` holds no error.
#[track_caller]
pub fn no_error(
    t: &(impl TestingT + ?Sized),
    err: &(impl MaybeError + ?Sized),
    msg: impl Into<Message>,
) -> bool {
    match err.as_error() {
        None => true,
        Some(e) => report(
            t,
            Diagnostic::new(format!("Received unexpected error:\n{e}")).with_message(&msg.into()),
        ),
    }
}

fn chain_contains<E>(err: &(dyn Error + 'static), target: &E) -> bool
where
    E: Error + PartialEq + 'static,
{
    chain(err).any(|e| e.downcast_ref::<E>() == Some(target))
}

/// Asserts that some error in the chain of `err` equals `target`.
#[track_caller]
pub fn error_is(
    t: &(impl TestingT + ?Sized),
    err: &(impl MaybeError + ?Sized),
    target: &(impl Error + PartialEq + 'static),
    msg: impl Into<Message>,
) -> bool {
    let Some(actual) = err.as_error() else {
        return report(
            t,
            Diagnostic::new("Target error should be in err chain")
                .with_label("Expected", target.to_string())
                .with_label("Chain", "<nil>")
                .with_message(&msg.into()),
        );
    };
    if chain_contains(actual, target) {
        return true;
    }
    report(
        t,
        Diagnostic::new("Target error should be in err chain")
            .with_label("Expected", target.to_string())
            .with_label("Chain", render_chain(actual))
            .with_message(&msg.into()),
    )
}

/// Asserts that no error in the chain of `err` equals `target`.
#[track_caller]
pub fn not_error_is(
    t: &(impl TestingT + ?Sized),
    err: &(impl MaybeError + ?Sized),
    target: &(impl Error + PartialEq + 'static),
    msg: impl Into<Message>,
) -> bool {
    match err.as_error() {
        Some(actual) if chain_contains(actual, target) => report(
            t,
            Diagnostic::new("Target error should not be in err chain")
                .with_label("Found", target.to_string())
                .with_label("Chain", render_chain(actual))
                .with_message(&msg.into()),
        ),
        _ => true,
    }
}

/// Asserts that some error in the chain of `err` has type `E`. Use
/// [`find_error`] to get at it.
#[track_caller]
pub fn error_as<E: Error + 'static>(
    t: &(impl TestingT + ?Sized),
    err: &(impl MaybeError + ?Sized),
    msg: impl Into<Message>,
) -> bool {
    if find_error::<E>(err).is_some() {
        return true;
    }
    let chain = err.as_error().map_or_else(|| "<nil>".to_owned(), render_chain);
    report(
        t,
        Diagnostic::new("Should be in error chain")
            .with_label("Expected", std::any::type_name::<E>())
            .with_label("Chain", chain)
            .with_message(&msg.into()),
    )
}

/// Asserts that `err` is an error whose message contains `contains`.
#[track_caller]
pub fn error_contains(
    t: &(impl TestingT + ?Sized),
    err: &(impl MaybeError + ?Sized),
    contains: &str,
    msg: impl Into<Message>,
) -> bool {
    let Some(e) = err.as_error() else {
        return report(
            t,
            Diagnostic::new(format!("An error is expected but got nil.\nexpected: {contains:?}"))
                .with_message(&msg.into()),
        );
    };
    let actual = e.to_string();
    if actual.contains(contains) {
        return true;
    }
    report(
        t,
        Diagnostic::new(format!("Error {actual:?} does not contain {contains:?}"))
            .with_message(&msg.into()),
    )
}

/// Asserts that `err` is an error whose message is exactly `expected`.
#[track_caller]
pub fn equal_error(
    t: &(impl TestingT + ?Sized),
    err: &(impl MaybeError + ?Sized),
    expected: &str,
    msg: impl Into<Message>,
) -> bool {
    let Some(e) = err.as_error() else {
        return report(
            t,
            Diagnostic::new(format!("An error is expected but got nil.\nexpected: {expected:?}"))
                .with_message(&msg.into()),
        );
    };
    let actual = e.to_string();
    if actual == expected {
        return true;
    }
    report(
        t,
        Diagnostic::new("Error message not equal")
            .with_label("Expected", format!("{expected:?}"))
            .with_label("Actual", format!("{actual:?}"))
            .with_message(&msg.into()),
    )
}
