//! The value universe compared by the engine.
//!
//! # Construction
//!
//! Rust values enter the universe through [`ToValue`](crate::ToValue);
//! shapes that have no direct Rust counterpart (nil collections, records,
//! shared cells, channels) are built with the factories on `Value`:
//!
//! ```text
//! let n = 30i32.to_value();                         // i32(30)
//! let user = Value::record("User")
//!     .field("Name", "John")
//!     .field("Age", 30i32)
//!     .build();
//! let none: Value = Value::nil_seq("Vec<u8>");      // nil, not empty
//! ```
//!
//! # Nil
//!
//! `Value::Nil` is the untyped nil. Collections, byte sequences, references,
//! callables and channels additionally have a *typed* nil, which remembers its
//! declared type. [`Value::is_nil`] is true for both.
//!
//! # Thread Safety
//!
//! All payloads are behind `Arc`; `Ref` cells use `parking_lot::RwLock`.
//! `Value` is `Send + Sync` and cheap to clone.

mod composite;
mod kind;
mod render;
mod scalar;
mod type_name;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

pub use composite::{
    ChanValue, Channel, Field, FuncValue, MapValue, NativeFn, OpaqueValue, RecordBuilder,
    RecordValue, RefValue, SeqValue, SetValue,
};
pub use kind::Kind;
pub use scalar::{
    FloatValue, FloatWidth, IntValue, IntWidth, Numeric, NumericType, UintValue, UintWidth,
};
pub use type_name::{simple_type_name, type_name_matches};

/// Type name of the generic list built by [`Value::list`].
pub const LIST_TYPE: &str = "Vec<Value>";

/// Type name of byte sequences.
pub const BYTES_TYPE: &str = "Bytes";

/// Type name of strings.
pub const STRING_TYPE: &str = "String";

/// A value of any kind the engine knows how to compare.
#[derive(Clone)]
pub enum Value {
    /// Untyped nil.
    Nil,
    Bool(bool),
    /// Signed integer of a declared width.
    Int(IntValue),
    /// Unsigned integer of a declared width.
    Uint(UintValue),
    /// Float of a declared width.
    Float(FloatValue),
    Str(Arc<str>),
    /// Byte sequence. `None` is the nil byte sequence, distinct from empty.
    Bytes(Option<Arc<[u8]>>),
    Seq(SeqValue),
    Map(MapValue),
    Set(SetValue),
    /// Record with named fields.
    Record(RecordValue),
    /// Shared mutable cell; its address is the aliasing key.
    Ref(RefValue),
    Func(FuncValue),
    Chan(ChanValue),
    /// User payload the engine cannot look inside.
    Opaque(OpaqueValue),
}

// Factories

impl Value {
    /// Convert any [`ToValue`](crate::ToValue) into a value.
    #[inline]
    pub fn of<T: crate::ToValue + ?Sized>(v: &T) -> Self {
        v.to_value()
    }

    /// `i64` scalar.
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(IntValue::new(n, IntWidth::I64))
    }

    /// `u64` scalar.
    #[inline]
    pub fn uint(n: u64) -> Self {
        Value::Uint(UintValue::new(n, UintWidth::U64))
    }

    /// `f64` scalar.
    #[inline]
    pub fn float(n: f64) -> Self {
        Value::Float(FloatValue::new(n, FloatWidth::F64))
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    #[inline]
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    #[inline]
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = b.into();
        Value::Bytes(Some(bytes.into()))
    }

    /// The nil byte sequence.
    #[inline]
    pub fn nil_bytes() -> Self {
        Value::Bytes(None)
    }

    /// Heterogeneous list typed `Vec<Value>`.
    pub fn list(items: Vec<Value>) -> Self {
        Value::Seq(SeqValue::new(LIST_TYPE, items))
    }

    /// Sequence with an explicit type name.
    pub fn seq(type_name: impl Into<Arc<str>>, items: Vec<Value>) -> Self {
        Value::Seq(SeqValue::new(type_name, items))
    }

    /// Nil sequence of a type.
    pub fn nil_seq(type_name: impl Into<Arc<str>>) -> Self {
        Value::Seq(SeqValue::nil(type_name))
    }

    pub fn map(type_name: impl Into<Arc<str>>, entries: Vec<(Value, Value)>) -> Self {
        Value::Map(MapValue::new(type_name, entries))
    }

    /// Nil mapping of a type.
    pub fn nil_map(type_name: impl Into<Arc<str>>) -> Self {
        Value::Map(MapValue::nil(type_name))
    }

    pub fn set(type_name: impl Into<Arc<str>>, items: Vec<Value>) -> Self {
        Value::Set(SetValue::new(type_name, items))
    }

    /// Start building a record of the named type.
    pub fn record(type_name: impl Into<Arc<str>>) -> RecordBuilder {
        RecordBuilder::new(type_name)
    }

    /// Start building a record named after the Rust type `T`.
    pub fn record_of<T: ?Sized>() -> RecordBuilder {
        RecordBuilder::new(std::any::type_name::<T>())
    }

    /// Fresh shared cell holding `referent`, typed `&<referent type>`.
    pub fn pointer(referent: Value) -> Self {
        let type_name = format!("&{}", referent.type_name());
        Value::Ref(RefValue::new(type_name, referent))
    }

    /// Fresh shared cell with an explicit type name.
    pub fn pointer_to(type_name: impl Into<Arc<str>>, referent: Value) -> Self {
        Value::Ref(RefValue::new(type_name, referent))
    }

    /// Reference sharing an existing cell.
    pub fn pointer_cell(type_name: impl Into<Arc<str>>, cell: Arc<RwLock<Value>>) -> Self {
        Value::Ref(RefValue::from_cell(type_name, cell))
    }

    pub fn nil_pointer(type_name: impl Into<Arc<str>>) -> Self {
        Value::Ref(RefValue::nil(type_name))
    }

    pub fn func(
        type_name: impl Into<Arc<str>>,
        f: impl Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    ) -> Self {
        Value::Func(FuncValue::new(type_name, f))
    }

    pub fn nil_func(type_name: impl Into<Arc<str>>) -> Self {
        Value::Func(FuncValue::nil(type_name))
    }

    /// New channel; `capacity == None` is unbounded.
    pub fn channel(type_name: impl Into<Arc<str>>, capacity: Option<usize>) -> Self {
        Value::Chan(ChanValue::new(type_name, capacity))
    }

    pub fn nil_chan(type_name: impl Into<Arc<str>>) -> Self {
        Value::Chan(ChanValue::nil(type_name))
    }

    /// Wrap a user value the engine compares by identity or by its
    /// registered `Equal` capability.
    pub fn opaque<T: Any + Send + Sync + fmt::Debug>(data: T) -> Self {
        Value::Opaque(OpaqueValue::new(data))
    }
}

// Introspection

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::Bytes(_) => Kind::Bytes,
            Value::Seq(_) => Kind::Seq,
            Value::Map(_) => Kind::Map,
            Value::Set(_) => Kind::Set,
            Value::Record(_) => Kind::Record,
            Value::Ref(_) => Kind::Ref,
            Value::Func(_) => Kind::Func,
            Value::Chan(_) => Kind::Chan,
            Value::Opaque(_) => Kind::Opaque,
        }
    }

    /// Declared type name, fully qualified where known.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(v) => v.width().type_name(),
            Value::Uint(v) => v.width().type_name(),
            Value::Float(v) => v.width().type_name(),
            Value::Str(_) => STRING_TYPE,
            Value::Bytes(_) => BYTES_TYPE,
            Value::Seq(s) => s.type_name(),
            Value::Map(m) => m.type_name(),
            Value::Set(s) => s.type_name(),
            Value::Record(r) => r.type_name(),
            Value::Ref(r) => r.type_name(),
            Value::Func(f) => f.type_name(),
            Value::Chan(c) => c.type_name(),
            Value::Opaque(o) => o.type_name(),
        }
    }

    /// Type name with module paths stripped.
    pub fn simple_type_name(&self) -> String {
        simple_type_name(self.type_name())
    }

    /// True for the untyped nil and for the nil of any kind that has one.
    pub fn is_nil(&self) -> bool {
        match self {
            Value::Nil | Value::Bytes(None) => true,
            Value::Seq(s) => s.is_nil(),
            Value::Map(m) => m.is_nil(),
            Value::Set(s) => s.is_nil(),
            Value::Ref(r) => r.is_nil(),
            Value::Func(f) => f.is_nil(),
            Value::Chan(c) => c.is_nil(),
            _ => false,
        }
    }

    /// Whether the value's kind has a nil element at all.
    pub fn is_nillable(&self) -> bool {
        matches!(
            self,
            Value::Nil
                | Value::Bytes(_)
                | Value::Seq(_)
                | Value::Map(_)
                | Value::Set(_)
                | Value::Ref(_)
                | Value::Func(_)
                | Value::Chan(_)
        )
    }

    /// Length of strings (in bytes), byte sequences, collections and channel
    /// buffers. `None` for kinds without a length.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.len()),
            Value::Bytes(b) => Some(b.as_ref().map_or(0, |b| b.len())),
            Value::Seq(s) => Some(s.len()),
            Value::Map(m) => Some(m.len()),
            Value::Set(s) => Some(s.len()),
            Value::Chan(c) => Some(c.len()),
            _ => None,
        }
    }

    /// Pointer identity: both operands are non-nil references (or callables,
    /// or channels) to the same underlying object.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Ref(a), Value::Ref(b)) => {
                a.addr().is_some() && a.addr() == b.addr() && a.type_name() == b.type_name()
            }
            (Value::Func(a), Value::Func(b)) => a.addr().is_some() && a.addr() == b.addr(),
            (Value::Chan(a), Value::Chan(b)) => !a.is_nil() && a.same_handle(b),
            (Value::Opaque(a), Value::Opaque(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Whether [`same`](Value::same) is meaningful for this kind.
    pub fn is_pointer_like(&self) -> bool {
        matches!(
            self,
            Value::Ref(_) | Value::Func(_) | Value::Chan(_) | Value::Opaque(_)
        )
    }
}

// Accessors

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Signed integer of any width.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(v.raw()),
            _ => None,
        }
    }

    /// Unsigned integer of any width.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint(v) => Some(v.raw()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(v.raw()),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<Numeric> {
        match self {
            Value::Int(v) => Some(Numeric::Int(*v)),
            Value::Uint(v) => Some(Numeric::Uint(*v)),
            Value::Float(v) => Some(Numeric::Float(*v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Bytes of a non-nil byte sequence.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(Some(b)) => Some(b),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&SeqValue> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetValue> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_ref_value(&self) -> Option<&RefValue> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncValue> {
        match self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_chan(&self) -> Option<&ChanValue> {
        match self {
            Value::Chan(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueValue> {
        match self {
            Value::Opaque(o) => Some(o),
            _ => None,
        }
    }

    /// Field of a record by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_record()?.get(name)
    }

    /// Decode into a Rust type.
    pub fn get<T: crate::FromValue>(&self) -> Option<T> {
        T::from_value(self)
    }
}

impl PartialEq for Value {
    /// Structural equality, see [`equal_deep`](crate::equal_deep).
    fn eq(&self, other: &Self) -> bool {
        crate::equal::equal_deep(self, other)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
