//! The three equivalence relations.
//!
//! - [`equal_deep`]: strict structural equality. Types must match exactly,
//!   so `i32(1) != i64(1)`.
//! - [`equal_values`]: `equal_deep`, or equal after converting one operand
//!   to the other's type where such a conversion exists.
//! - [`equal_exported`]: `equal_deep` over copies with hidden record fields
//!   removed.
//!
//! References are the only values that can form cycles. The walk keeps a
//! visited set of reference pairs, so comparing cyclic values terminates.

use std::borrow::Cow;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::capability::equal_capability;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Numeric, NumericType, RecordValue, Value};

/// Strict structural equality.
///
/// Nil only equals nil of the same type (the untyped nil only equals
/// itself). Nil collections never equal empty ones. Floats use IEEE
/// equality, so `NaN != NaN`. Records and opaque values with a registered
/// `Equal` capability compare through it.
pub fn equal_deep(a: &Value, b: &Value) -> bool {
    DeepEq::default().eq(a, b)
}

#[derive(Default)]
struct DeepEq {
    visited: FxHashSet<(usize, usize, String)>,
}

impl DeepEq {
    fn eq(&mut self, a: &Value, b: &Value) -> bool {
        ensure_sufficient_stack(|| self.eq_inner(a, b))
    }

    /// Compare one of several possible partners. Reference pairs assumed
    /// equal during a failed attempt are forgotten so they cannot vouch
    /// for a later candidate.
    fn eq_candidate(&mut self, a: &Value, b: &Value) -> bool {
        let saved = self.visited.clone();
        if self.eq(a, b) {
            return true;
        }
        self.visited = saved;
        false
    }

    fn eq_inner(&mut self, a: &Value, b: &Value) -> bool {
        if matches!(a, Value::Nil) || matches!(b, Value::Nil) {
            return matches!((a, b), (Value::Nil, Value::Nil));
        }

        if let (Some(x), Some(y)) = (byte_view(a), byte_view(b)) {
            return x == y;
        }

        if a.kind() != b.kind() || a.type_name() != b.type_name() {
            return false;
        }

        match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Int(x), Value::Int(y)) => x.raw() == y.raw(),
            (Value::Uint(x), Value::Uint(y)) => x.raw() == y.raw(),
            #[allow(clippy::float_cmp, reason = "IEEE equality is the contract")]
            (Value::Float(x), Value::Float(y)) => x.raw() == y.raw(),
            (Value::Str(x), Value::Str(y)) => x == y,
            (Value::Seq(x), Value::Seq(y)) => match (x.items(), y.items()) {
                (None, None) => true,
                (Some(xs), Some(ys)) => self.eq_slices(xs, ys),
                _ => false,
            },
            (Value::Set(x), Value::Set(y)) => match (x.items(), y.items()) {
                (None, None) => true,
                (Some(xs), Some(ys)) => {
                    xs.len() == ys.len()
                        && xs.iter().all(|i| ys.iter().any(|j| self.eq_candidate(i, j)))
                        && ys.iter().all(|j| xs.iter().any(|i| self.eq_candidate(i, j)))
                }
                _ => false,
            },
            (Value::Map(x), Value::Map(y)) => match (x.entries(), y.entries()) {
                (None, None) => true,
                (Some(xs), Some(ys)) => {
                    xs.len() == ys.len()
                        && xs.iter().all(|(k, v)| {
                            ys.iter()
                                .find(|(k2, _)| self.eq_candidate(k, k2))
                                .is_some_and(|(_, v2)| self.eq(v, v2))
                        })
                }
                _ => false,
            },
            (Value::Record(x), Value::Record(y)) => match equal_capability(x.type_name()) {
                Some(equal) => equal(a, b),
                None => self.eq_fields(x, y),
            },
            (Value::Ref(x), Value::Ref(y)) => {
                let (Some(xa), Some(ya)) = (x.addr(), y.addr()) else {
                    return x.is_nil() && y.is_nil();
                };
                if xa == ya {
                    return true;
                }
                let key = (xa.min(ya), xa.max(ya), x.type_name().to_owned());
                if !self.visited.insert(key) {
                    return true;
                }
                // Referents are snapshotted so no lock is held while recursing.
                match (x.load(), y.load()) {
                    (Some(xv), Some(yv)) => self.eq(&xv, &yv),
                    _ => false,
                }
            }
            (Value::Func(x), Value::Func(y)) => x.is_nil() && y.is_nil(),
            (Value::Chan(x), Value::Chan(y)) => x.same_handle(y),
            (Value::Opaque(x), Value::Opaque(y)) => match equal_capability(x.type_name()) {
                Some(equal) => equal(a, b),
                None => x.ptr_eq(y),
            },
            _ => false,
        }
    }

    fn eq_slices(&mut self, xs: &[Value], ys: &[Value]) -> bool {
        xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| self.eq(x, y))
    }

    fn eq_fields(&mut self, x: &RecordValue, y: &RecordValue) -> bool {
        x.fields().len() == y.fields().len()
            && x.fields().iter().all(|f| {
                y.get(f.name())
                    .is_some_and(|other| self.eq(f.value(), other))
            })
    }
}

/// Byte content of a byte-like value: the bytes kind, or a `Vec<u8>`
/// sequence. `Some(None)` is the nil byte sequence.
fn byte_view(v: &Value) -> Option<Option<Cow<'_, [u8]>>> {
    match v {
        Value::Bytes(b) => Some(b.as_deref().map(Cow::Borrowed)),
        Value::Seq(s) => s.as_bytes().map(|b| b.map(Cow::Owned)),
        _ => None,
    }
}

/// Loose equality: `equal_deep`, or equal after converting `expected` to
/// `actual`'s type (or the reverse) where a conversion exists.
///
/// Conversions:
/// - numeric to numeric, widening the narrower operand (integers meet
///   floats in the float's type) so overflow cannot produce false
///   positives;
/// - string to bytes and valid UTF-8 bytes to string;
/// - record to record of another nominal type with the same field names
///   and field types.
pub fn equal_values(expected: &Value, actual: &Value) -> bool {
    if equal_deep(expected, actual) {
        return true;
    }
    if let (Some(e), Some(a)) = (expected.as_numeric(), actual.as_numeric()) {
        return numeric_equal(e, a);
    }
    match convert_to(expected, actual) {
        Some(converted) => equal_deep(&converted, actual),
        None => false,
    }
}

/// Compare in the wider operand's type. An integer against a float is
/// compared in the float's type so fractions are never truncated away.
fn numeric_equal(expected: Numeric, actual: Numeric) -> bool {
    let (et, at) = (expected.numeric_type(), actual.numeric_type());
    let target = match (et, at) {
        (NumericType::Float(_), NumericType::Int(_) | NumericType::Uint(_)) => et,
        (NumericType::Int(_) | NumericType::Uint(_), NumericType::Float(_)) => at,
        _ if et.bits() >= at.bits() => et,
        _ => at,
    };
    expected.convert(target) == actual.convert(target)
}

/// Convert `v` to the type of `like`, for the non-numeric conversions.
fn convert_to(v: &Value, like: &Value) -> Option<Value> {
    match (v, like) {
        (Value::Str(s), Value::Bytes(_)) => Some(Value::bytes(s.as_bytes())),
        (Value::Str(s), Value::Seq(seq)) if seq.as_bytes().is_some() => {
            Some(Value::bytes(s.as_bytes()))
        }
        (Value::Bytes(Some(b)), Value::Str(_)) => {
            std::str::from_utf8(b).ok().map(Value::string)
        }
        (Value::Record(r), Value::Record(target)) if same_layout(r, target) => Some(
            Value::Record(RecordValue::new(target.type_name(), r.fields().to_vec())),
        ),
        _ => None,
    }
}

fn same_layout(a: &RecordValue, b: &RecordValue) -> bool {
    a.fields().len() == b.fields().len()
        && a.fields().iter().zip(b.fields()).all(|(x, y)| {
            x.name() == y.name() && x.value().type_name() == y.value().type_name()
        })
}

/// `equal_deep` over copies of both operands with hidden fields removed.
pub fn equal_exported(a: &Value, b: &Value) -> bool {
    equal_deep(&clone_exported(a), &clone_exported(b))
}

/// Copy of `v` without hidden record fields, at any depth.
///
/// References are copied into fresh cells; aliasing (including cycles) in
/// the original is preserved in the copy.
pub fn clone_exported(v: &Value) -> Value {
    ExportedClone::default().clone_value(v)
}

#[derive(Default)]
struct ExportedClone {
    cells: FxHashMap<usize, Arc<RwLock<Value>>>,
}

impl ExportedClone {
    fn clone_value(&mut self, v: &Value) -> Value {
        ensure_sufficient_stack(|| self.clone_inner(v))
    }

    fn clone_inner(&mut self, v: &Value) -> Value {
        match v {
            Value::Seq(s) => {
                let items = s
                    .items()
                    .map(|items| items.iter().map(|i| self.clone_value(i)).collect());
                Value::Seq(s.with_items(items))
            }
            Value::Set(s) => {
                let items = s
                    .items()
                    .map(|items| items.iter().map(|i| self.clone_value(i)).collect());
                Value::Set(s.with_items(items))
            }
            Value::Map(m) => {
                let entries = m.entries().map(|entries| {
                    entries
                        .iter()
                        .map(|(k, v)| (self.clone_value(k), self.clone_value(v)))
                        .collect()
                });
                Value::Map(m.with_entries(entries))
            }
            Value::Record(r) => {
                let fields = r
                    .fields()
                    .iter()
                    .filter(|f| f.is_exported())
                    .map(|f| f.with_value(self.clone_value(f.value())))
                    .collect();
                Value::Record(r.with_fields(fields))
            }
            Value::Ref(r) => {
                let (Some(addr), Some(referent)) = (r.addr(), r.load()) else {
                    return v.clone();
                };
                if let Some(cell) = self.cells.get(&addr) {
                    return Value::pointer_cell(r.type_name(), Arc::clone(cell));
                }
                let cell = Arc::new(RwLock::new(Value::Nil));
                self.cells.insert(addr, Arc::clone(&cell));
                let copied = self.clone_value(&referent);
                *cell.write() = copied;
                Value::pointer_cell(r.type_name(), cell)
            }
            _ => v.clone(),
        }
    }
}
