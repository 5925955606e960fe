//! Native ordering over the totally-ordered kinds.

use std::cmp::Ordering;

use crate::value::{Kind, Value};

/// Why two values could not be ordered.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    /// Operands of different types (widths count: `i32` vs `i64` is a mismatch).
    #[error("cannot compare {left} with {right}")]
    KindMismatch { left: String, right: String },
    /// The kind has no native order.
    #[error("values of kind {kind} are not orderable")]
    NotOrderable { kind: Kind },
    /// At least one operand is NaN.
    #[error("not comparable: NaN has no order")]
    NotComparable,
}

/// Order two values of an identical orderable type.
pub fn compare(a: &Value, b: &Value) -> Result<Ordering, CompareError> {
    if a.kind() != b.kind() || a.type_name() != b.type_name() {
        return Err(CompareError::KindMismatch {
            left: a.type_name().to_owned(),
            right: b.type_name().to_owned(),
        });
    }
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.raw().cmp(&y.raw())),
        (Value::Uint(x), Value::Uint(y)) => Ok(x.raw().cmp(&y.raw())),
        (Value::Float(x), Value::Float(y)) => x
            .raw()
            .partial_cmp(&y.raw())
            .ok_or(CompareError::NotComparable),
        (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
        _ => Err(CompareError::NotOrderable { kind: a.kind() }),
    }
}
