use std::cmp::Ordering;

use vouch_value::{compare, CompareError, ToValue, Value};

use super::report;
use crate::context::TestingT;
use crate::diagnostic::{Diagnostic, Message};

#[track_caller]
fn compare_two(
    t: &(impl TestingT + ?Sized),
    e1: impl ToValue,
    e2: impl ToValue,
    allowed: &[Ordering],
    relation: &str,
    msg: impl Into<Message>,
) -> bool {
    let (e1, e2) = (e1.to_value(), e2.to_value());
    match compare(&e1, &e2) {
        Ok(ord) if allowed.contains(&ord) => true,
        Ok(_) => report(
            t,
            Diagnostic::new(format!("{e1} is not {relation} {e2}")).with_message(&msg.into()),
        ),
        Err(CompareError::KindMismatch { .. }) => report(
            t,
            Diagnostic::new("Elements should be the same type")
                .with_label("Left", e1.type_name())
                .with_label("Right", e2.type_name())
                .with_message(&msg.into()),
        ),
        Err(err) => report(t, Diagnostic::new(err.to_string()).with_message(&msg.into())),
    }
}

/// Asserts `e1 > e2`. Both must have the same orderable type.
#[track_caller]
pub fn greater(
    t: &(impl TestingT + ?Sized),
    e1: impl ToValue,
    e2: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    compare_two(t, e1, e2, &[Ordering::Greater], "greater than", msg)
}

#[track_caller]
pub fn greater_or_equal(
    t: &(impl TestingT + ?Sized),
    e1: impl ToValue,
    e2: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    compare_two(
        t,
        e1,
        e2,
        &[Ordering::Greater, Ordering::Equal],
        "greater than or equal to",
        msg,
    )
}

#[track_caller]
pub fn less(
    t: &(impl TestingT + ?Sized),
    e1: impl ToValue,
    e2: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    compare_two(t, e1, e2, &[Ordering::Less], "less than", msg)
}

#[track_caller]
pub fn less_or_equal(
    t: &(impl TestingT + ?Sized),
    e1: impl ToValue,
    e2: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    compare_two(
        t,
        e1,
        e2,
        &[Ordering::Less, Ordering::Equal],
        "less than or equal to",
        msg,
    )
}

/// Index of the element to blame when `items[i]` and `items[i + 1]`
/// cannot be compared.
fn offending_index(items: &[Value], i: usize, err: &CompareError) -> usize {
    match err {
        CompareError::NotComparable if items[i].as_f64().is_some_and(f64::is_nan) => i,
        CompareError::NotOrderable { .. } => i,
        _ => i + 1,
    }
}

#[track_caller]
fn check_ordered(
    t: &(impl TestingT + ?Sized),
    object: impl ToValue,
    allowed: &[Ordering],
    relation: &str,
    msg: impl Into<Message>,
) -> bool {
    let object = object.to_value();
    let items = match &object {
        Value::Seq(s) => s.items().unwrap_or(&[]),
        _ => {
            return report(
                t,
                Diagnostic::new(format!("object {object} is not an ordered collection"))
                    .with_message(&msg.into()),
            );
        }
    };
    for (i, pair) in items.windows(2).enumerate() {
        match compare(&pair[0], &pair[1]) {
            Ok(ord) if allowed.contains(&ord) => {}
            Ok(_) => {
                return report(
                    t,
                    Diagnostic::new(format!("{} is not {relation} {}", pair[0], pair[1]))
                        .with_message(&msg.into()),
                );
            }
            Err(err) => {
                let at = offending_index(items, i, &err);
                return report(
                    t,
                    Diagnostic::new(format!(
                        "Elements not comparable at index {at} ({}): {err}",
                        items[at]
                    ))
                    .with_message(&msg.into()),
                );
            }
        }
    }
    true
}

/// Asserts that a sequence is strictly increasing. Empty and
/// single-element sequences pass.
#[track_caller]
pub fn is_increasing(
    t: &(impl TestingT + ?Sized),
    object: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    check_ordered(t, object, &[Ordering::Less], "less than", msg)
}

#[track_caller]
pub fn is_non_decreasing(
    t: &(impl TestingT + ?Sized),
    object: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    check_ordered(
        t,
        object,
        &[Ordering::Less, Ordering::Equal],
        "less than or equal to",
        msg,
    )
}

#[track_caller]
pub fn is_decreasing(
    t: &(impl TestingT + ?Sized),
    object: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    check_ordered(t, object, &[Ordering::Greater], "greater than", msg)
}

#[track_caller]
pub fn is_non_increasing(
    t: &(impl TestingT + ?Sized),
    object: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    check_ordered(
        t,
        object,
        &[Ordering::Greater, Ordering::Equal],
        "greater than or equal to",
        msg,
    )
}
