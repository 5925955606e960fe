use vouch_value::{ToValue, Value};

use super::report;
use crate::context::TestingT;
use crate::diagnostic::{Diagnostic, Message};

/// Asserts that the value is nil: the untyped nil, or the nil of a kind
/// that has one (a nil sequence, reference, callable...).
#[track_caller]
pub fn nil(t: &(impl TestingT + ?Sized), object: impl ToValue, msg: impl Into<Message>) -> bool {
    let object = object.to_value();
    if object.is_nil() {
        return true;
    }
    report(
        t,
        Diagnostic::new(format!("Expected nil, but got: {object}")).with_message(&msg.into()),
    )
}

/// Asserts that the value is not nil. Kinds without a nil always pass.
#[track_caller]
pub fn not_nil(
    t: &(impl TestingT + ?Sized),
    object: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    if !object.to_value().is_nil() {
        return true;
    }
    report(
        t,
        Diagnostic::new("Expected value not to be nil.").with_message(&msg.into()),
    )
}

#[track_caller]
pub fn is_true(t: &(impl TestingT + ?Sized), value: bool, msg: impl Into<Message>) -> bool {
    if value {
        return true;
    }
    report(t, Diagnostic::new("Should be true").with_message(&msg.into()))
}

#[track_caller]
pub fn is_false(t: &(impl TestingT + ?Sized), value: bool, msg: impl Into<Message>) -> bool {
    if !value {
        return true;
    }
    report(t, Diagnostic::new("Should be false").with_message(&msg.into()))
}

/// Zero-value test: nil, `false`, zero numbers, empty strings and
/// collections, records whose fields are all empty, and references to
/// empty values.
pub(crate) fn is_empty_value(v: &Value) -> bool {
    match v {
        Value::Nil => true,
        Value::Bool(b) => !b,
        Value::Int(_) => v.as_i64() == Some(0),
        Value::Uint(_) => v.as_u64() == Some(0),
        Value::Float(_) => v.as_f64() == Some(0.0),
        Value::Str(s) => s.is_empty(),
        Value::Bytes(_) | Value::Seq(_) | Value::Map(_) | Value::Set(_) | Value::Chan(_) => {
            v.len() == Some(0)
        }
        Value::Record(r) => r.fields().iter().all(|f| is_empty_value(f.value())),
        Value::Ref(r) => r.load().is_none_or(|inner| is_empty_value(&inner)),
        Value::Func(f) => f.is_nil(),
        Value::Opaque(_) => false,
    }
}

/// Asserts that the value is empty (its kind's zero value).
#[track_caller]
pub fn empty(t: &(impl TestingT + ?Sized), object: impl ToValue, msg: impl Into<Message>) -> bool {
    let object = object.to_value();
    if is_empty_value(&object) {
        return true;
    }
    report(
        t,
        Diagnostic::new(format!("Should be empty, but was {object}")).with_message(&msg.into()),
    )
}

#[track_caller]
pub fn not_empty(
    t: &(impl TestingT + ?Sized),
    object: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    let object = object.to_value();
    if !is_empty_value(&object) {
        return true;
    }
    report(
        t,
        Diagnostic::new(format!("Should NOT be empty, but was {object}"))
            .with_message(&msg.into()),
    )
}

/// Asserts that the value has `length` elements (bytes for strings).
#[track_caller]
pub fn len(
    t: &(impl TestingT + ?Sized),
    object: impl ToValue,
    length: usize,
    msg: impl Into<Message>,
) -> bool {
    let object = object.to_value();
    match object.len() {
        Some(n) if n == length => true,
        Some(n) => report(
            t,
            Diagnostic::new(format!(
                "{object} should have {length} item(s), but has {n}"
            ))
            .with_message(&msg.into()),
        ),
        None => report(
            t,
            Diagnostic::new(format!("{object} has no length")).with_message(&msg.into()),
        ),
    }
}
