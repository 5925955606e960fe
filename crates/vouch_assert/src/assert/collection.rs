use vouch_value::{equal_deep, ToValue, Value};

use super::report;
use crate::context::TestingT;
use crate::diagnostic::{Diagnostic, Message};

/// Elements of a sequence or set; a nil collection has none.
fn elements(v: &Value) -> Option<&[Value]> {
    match v {
        Value::Seq(s) => Some(s.items().unwrap_or(&[])),
        Value::Set(s) => Some(s.items().unwrap_or(&[])),
        _ => None,
    }
}

/// Whether `container` includes `element`: substring for strings, element
/// for sequences and sets, key for mappings. `None` if `container` cannot
/// be searched for `element`.
fn includes(container: &Value, element: &Value) -> Option<bool> {
    match container {
        Value::Str(s) => element.as_str().map(|needle| s.contains(needle)),
        Value::Bytes(b) => {
            let needle = element.as_bytes()?;
            let haystack = b.as_deref().unwrap_or(&[]);
            Some(needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle))
        }
        Value::Map(m) => Some(m.contains_key(element)),
        _ => elements(container).map(|items| items.iter().any(|item| equal_deep(item, element))),
    }
}

/// Asserts that `container` contains `element`.
#[track_caller]
pub fn contains(
    t: &(impl TestingT + ?Sized),
    container: impl ToValue,
    element: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    let (container, element) = (container.to_value(), element.to_value());
    match includes(&container, &element) {
        Some(true) => true,
        Some(false) => report(
            t,
            Diagnostic::new(format!("{container} does not contain {element}"))
                .with_message(&msg.into()),
        ),
        None => report(
            t,
            Diagnostic::new(format!("{container} could not be searched for {element}"))
                .with_message(&msg.into()),
        ),
    }
}

/// Asserts that `container` does not contain `element`.
#[track_caller]
pub fn not_contains(
    t: &(impl TestingT + ?Sized),
    container: impl ToValue,
    element: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    let (container, element) = (container.to_value(), element.to_value());
    match includes(&container, &element) {
        Some(false) => true,
        Some(true) => report(
            t,
            Diagnostic::new(format!("{container} should not contain {element}"))
                .with_message(&msg.into()),
        ),
        None => report(
            t,
            Diagnostic::new(format!("{container} could not be searched for {element}"))
                .with_message(&msg.into()),
        ),
    }
}

/// Asserts that every element of `subset` is in `list`. For two mappings,
/// every entry of `subset` must be present in `list` with an equal value.
#[track_caller]
pub fn subset(
    t: &(impl TestingT + ?Sized),
    list: impl ToValue,
    subset: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    let (list, subset) = (list.to_value(), subset.to_value());
    if let (Value::Map(outer), Value::Map(inner)) = (&list, &subset) {
        for (key, value) in inner.entries().unwrap_or(&[]) {
            if !outer.get(key).is_some_and(|v| equal_deep(v, value)) {
                return report(
                    t,
                    Diagnostic::new(format!("{list} does not contain {key}: {value}"))
                        .with_message(&msg.into()),
                );
            }
        }
        return true;
    }
    let Some(wanted) = elements(&subset) else {
        return report(
            t,
            Diagnostic::new(format!("{subset} has an unsupported type {}", subset.kind()))
                .with_message(&msg.into()),
        );
    };
    for element in wanted {
        match includes(&list, element) {
            Some(true) => {}
            Some(false) => {
                return report(
                    t,
                    Diagnostic::new(format!("{list} does not contain {element}"))
                        .with_message(&msg.into()),
                );
            }
            None => {
                return report(
                    t,
                    Diagnostic::new(format!("{list} could not be searched for {element}"))
                        .with_message(&msg.into()),
                );
            }
        }
    }
    true
}

/// Elements of `a` and `b` left over after pairing equal elements off.
fn unmatched(a: &[Value], b: &[Value]) -> (Vec<Value>, Vec<Value>) {
    let mut used = vec![false; b.len()];
    let mut extra_a = Vec::new();
    for x in a {
        let slot = (0..b.len()).find(|&j| !used[j] && equal_deep(x, &b[j]));
        match slot {
            Some(j) => used[j] = true,
            None => extra_a.push(x.clone()),
        }
    }
    let extra_b = b
        .iter()
        .zip(used)
        .filter(|(_, used)| !used)
        .map(|(y, _)| y.clone())
        .collect();
    (extra_a, extra_b)
}

/// Asserts that two lists hold the same elements, ignoring order.
/// Duplicates must appear the same number of times in each.
#[track_caller]
pub fn elements_match(
    t: &(impl TestingT + ?Sized),
    list_a: impl ToValue,
    list_b: impl ToValue,
    msg: impl Into<Message>,
) -> bool {
    let (list_a, list_b) = (list_a.to_value(), list_b.to_value());
    let (Some(a), Some(b)) = (elements(&list_a), elements(&list_b)) else {
        let bad = if elements(&list_a).is_none() { &list_a } else { &list_b };
        return report(
            t,
            Diagnostic::new(format!("{bad} has an unsupported type {}", bad.kind()))
                .with_message(&msg.into()),
        );
    };
    let (extra_a, extra_b) = unmatched(a, b);
    if extra_a.is_empty() && extra_b.is_empty() {
        return true;
    }
    let mut diag = Diagnostic::new("elements differ");
    if !extra_a.is_empty() {
        diag = diag.with_label("Extra in A", Value::list(extra_a).to_string());
    }
    if !extra_b.is_empty() {
        diag = diag.with_label("Extra in B", Value::list(extra_b).to_string());
    }
    diag = diag
        .with_label("List A", list_a.to_string())
        .with_label("List B", list_b.to_string());
    report(t, diag.with_message(&msg.into()))
}
