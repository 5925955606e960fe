use vouch_value::{self as value, clone_exported, equal_deep, ToValue, Value};

use super::report;
use crate::context::TestingT;
use crate::diagnostic::{Diagnostic, Message};

/// Callables have no meaningful equality; comparing one is a misuse.
fn validate_equal_args(expected: &Value, actual: &Value) -> Option<Diagnostic> {
    let is_callable = |v: &Value| v.as_func().is_some_and(|f| !f.is_nil());
    (is_callable(expected) || is_callable(actual)).then(|| {
        Diagnostic::new(format!(
            "Invalid operation: {expected} == {actual} (cannot take func type as argument)"
        ))
    })
}

fn not_equal_diagnostic(expected: &Value, actual: &Value) -> Diagnostic {
    Diagnostic::new("Not equal")
        .with_expected_actual(expected, actual)
        .with_diff(expected, actual)
}

/// Asserts that two values are deeply equal.
///
/// Types must match exactly: `1i32` and `1i64` are not equal. Use
/// [`equal_values`] to compare across numeric widths.
#[track_caller]
pub fn equal(
    t: &(impl TestingT + ?Sized),
    expected: impl ToValue,
    actual: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    let (expected, actual) = (expected.to_value(), actual.to_value());
    if let Some(diag) = validate_equal_args(&expected, &actual) {
        return report(t, diag.with_message(&msg.into()));
    }
    if equal_deep(&expected, &actual) {
        return true;
    }
    report(
        t,
        not_equal_diagnostic(&expected, &actual).with_message(&msg.into()),
    )
}

/// Asserts that two values are not deeply equal.
#[track_caller]
pub fn not_equal(
    t: &(impl TestingT + ?Sized),
    expected: impl ToValue,
    actual: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    let (expected, actual) = (expected.to_value(), actual.to_value());
    if let Some(diag) = validate_equal_args(&expected, &actual) {
        return report(t, diag.with_message(&msg.into()));
    }
    if !equal_deep(&expected, &actual) {
        return true;
    }
    report(
        t,
        Diagnostic::new(format!("Should not be: {actual}")).with_message(&msg.into()),
    )
}

/// Asserts equality after converting `actual` to the type of `expected`.
#[track_caller]
pub fn equal_values(
    t: &(impl TestingT + ?Sized),
    expected: impl ToValue,
    actual: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    let (expected, actual) = (expected.to_value(), actual.to_value());
    if value::equal_values(&expected, &actual) {
        return true;
    }
    report(
        t,
        not_equal_diagnostic(&expected, &actual).with_message(&msg.into()),
    )
}

#[track_caller]
pub fn not_equal_values(
    t: &(impl TestingT + ?Sized),
    expected: impl ToValue,
    actual: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    let (expected, actual) = (expected.to_value(), actual.to_value());
    if !value::equal_values(&expected, &actual) {
        return true;
    }
    report(
        t,
        Diagnostic::new(format!("Should not be: {actual}")).with_message(&msg.into()),
    )
}

/// Asserts that both values have the same type, then that they are equal.
#[track_caller]
pub fn exactly(
    t: &(impl TestingT + ?Sized),
    expected: impl ToValue,
    actual: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    let (expected, actual) = (expected.to_value(), actual.to_value());
    if expected.type_name() != actual.type_name() {
        return report(
            t,
            Diagnostic::new(format!(
                "Types expected to match exactly\n\t{} != {}",
                expected.type_name(),
                actual.type_name()
            ))
            .with_message(&msg.into()),
        );
    }
    equal(t, expected, actual, msg)
}

/// Asserts that two records of the same type agree on their exported
/// fields, recursively. Hidden fields are ignored.
#[track_caller]
pub fn equal_exported(
    t: &(impl TestingT + ?Sized),
    expected: impl ToValue,
    actual: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    let (expected, actual) = (expected.to_value(), actual.to_value());
    if expected.type_name() != actual.type_name() {
        return report(
            t,
            Diagnostic::new(format!(
                "Types expected to match exactly\n\t{} != {}",
                expected.type_name(),
                actual.type_name()
            ))
            .with_message(&msg.into()),
        );
    }
    if value::equal_exported(&expected, &actual) {
        return true;
    }
    let (expected, actual) = (clone_exported(&expected), clone_exported(&actual));
    report(
        t,
        not_equal_diagnostic(&expected, &actual).with_message(&msg.into()),
    )
}

fn check_pointers(expected: &Value, actual: &Value) -> Option<Diagnostic> {
    (!expected.is_pointer_like() || !actual.is_pointer_like()).then(|| {
        Diagnostic::new("Both arguments must be pointers")
            .with_label("Expected", expected.type_name())
            .with_label("Actual", actual.type_name())
    })
}

/// Asserts that two references point to the same object.
#[track_caller]
pub fn same(
    t: &(impl TestingT + ?Sized),
    expected: impl ToValue,
    actual: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    let (expected, actual) = (expected.to_value(), actual.to_value());
    if let Some(diag) = check_pointers(&expected, &actual) {
        return report(t, diag.with_message(&msg.into()));
    }
    if expected.same(&actual) {
        return true;
    }
    report(
        t,
        Diagnostic::new("Not same")
            .with_expected_actual(&expected, &actual)
            .with_message(&msg.into()),
    )
}

/// Asserts that two references do not point to the same object.
#[track_caller]
pub fn not_same(
    t: &(impl TestingT + ?Sized),
    expected: impl ToValue,
    actual: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    let (expected, actual) = (expected.to_value(), actual.to_value());
    if let Some(diag) = check_pointers(&expected, &actual) {
        return report(t, diag.with_message(&msg.into()));
    }
    if !expected.same(&actual) {
        return true;
    }
    report(
        t,
        Diagnostic::new(format!("Expected and actual point to the same object: {actual}"))
            .with_message(&msg.into()),
    )
}
