//! Composite value payloads: collections, records, references, callables,
//! channels and opaque user data.
//!
//! Every collection distinguishes the nil collection (`items == None`) from
//! the empty one. Payloads are shared through `Arc`, so cloning a `Value` never
//! copies its children.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::RwLock;

use super::Value;
use crate::capability::{self, EqualFn};
use crate::convert::ToValue;
use crate::equal::equal_deep;

/// Signature of a native callable stored in a `Func` value.
pub type NativeFn = dyn Fn(&[Value]) -> Vec<Value> + Send + Sync;

// SeqValue

/// Ordered sequence (`Vec`, slice, array, tuple).
#[derive(Clone, Debug)]
pub struct SeqValue {
    type_name: Arc<str>,
    items: Option<Arc<[Value]>>,
}

impl SeqValue {
    pub fn new(type_name: impl Into<Arc<str>>, items: Vec<Value>) -> Self {
        SeqValue {
            type_name: type_name.into(),
            items: Some(items.into()),
        }
    }

    /// The nil sequence of a type. Not equal to the empty sequence.
    pub fn nil(type_name: impl Into<Arc<str>>) -> Self {
        SeqValue {
            type_name: type_name.into(),
            items: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn items(&self) -> Option<&[Value]> {
        self.items.as_deref()
    }

    pub fn is_nil(&self) -> bool {
        self.items.is_none()
    }

    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, |items| items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View a `Vec<u8>` sequence as raw bytes.
    ///
    /// Returns `None` when the sequence is not a byte sequence at all, and
    /// `Some(None)` for the nil byte sequence.
    pub fn as_bytes(&self) -> Option<Option<Vec<u8>>> {
        if &*self.type_name != "Vec<u8>" {
            return None;
        }
        let Some(items) = &self.items else {
            return Some(None);
        };
        let mut bytes = Vec::with_capacity(items.len());
        for item in items.iter() {
            match item {
                Value::Uint(v) if v.width() == super::UintWidth::U8 => {
                    bytes.push(u8::try_from(v.raw()).ok()?);
                }
                _ => return None,
            }
        }
        Some(Some(bytes))
    }

    pub(crate) fn with_items(&self, items: Option<Vec<Value>>) -> Self {
        SeqValue {
            type_name: Arc::clone(&self.type_name),
            items: items.map(Into::into),
        }
    }
}

// MapValue

/// Key/value mapping. Entries keep insertion order; lookups use `equal_deep`.
#[derive(Clone, Debug)]
pub struct MapValue {
    type_name: Arc<str>,
    entries: Option<Arc<[(Value, Value)]>>,
}

impl MapValue {
    pub fn new(type_name: impl Into<Arc<str>>, entries: Vec<(Value, Value)>) -> Self {
        MapValue {
            type_name: type_name.into(),
            entries: Some(entries.into()),
        }
    }

    /// The nil mapping of a type. Not equal to the empty mapping.
    pub fn nil(type_name: impl Into<Arc<str>>) -> Self {
        MapValue {
            type_name: type_name.into(),
            entries: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn entries(&self) -> Option<&[(Value, Value)]> {
        self.entries.as_deref()
    }

    pub fn is_nil(&self) -> bool {
        self.entries.is_none()
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a key by structural equality.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries()?
            .iter()
            .find(|(k, _)| equal_deep(k, key))
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    pub(crate) fn with_entries(&self, entries: Option<Vec<(Value, Value)>>) -> Self {
        MapValue {
            type_name: Arc::clone(&self.type_name),
            entries: entries.map(Into::into),
        }
    }
}

// SetValue

/// Unordered collection of distinct values.
#[derive(Clone, Debug)]
pub struct SetValue {
    type_name: Arc<str>,
    items: Option<Arc<[Value]>>,
}

impl SetValue {
    pub fn new(type_name: impl Into<Arc<str>>, items: Vec<Value>) -> Self {
        SetValue {
            type_name: type_name.into(),
            items: Some(items.into()),
        }
    }

    pub fn nil(type_name: impl Into<Arc<str>>) -> Self {
        SetValue {
            type_name: type_name.into(),
            items: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn items(&self) -> Option<&[Value]> {
        self.items.as_deref()
    }

    pub fn is_nil(&self) -> bool {
        self.items.is_none()
    }

    pub fn len(&self) -> usize {
        self.items.as_ref().map_or(0, |items| items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, item: &Value) -> bool {
        self.items()
            .is_some_and(|items| items.iter().any(|i| equal_deep(i, item)))
    }

    pub(crate) fn with_items(&self, items: Option<Vec<Value>>) -> Self {
        SetValue {
            type_name: Arc::clone(&self.type_name),
            items: items.map(Into::into),
        }
    }
}

// RecordValue

/// One named field of a record.
#[derive(Clone, Debug)]
pub struct Field {
    name: Arc<str>,
    value: Value,
    exported: bool,
}

impl Field {
    pub fn new(name: impl Into<Arc<str>>, value: Value, exported: bool) -> Self {
        Field {
            name: name.into(),
            value,
            exported,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Hidden fields are skipped by `equal_exported`.
    pub fn is_exported(&self) -> bool {
        self.exported
    }

    pub(crate) fn with_value(&self, value: Value) -> Self {
        Field {
            name: Arc::clone(&self.name),
            value,
            exported: self.exported,
        }
    }
}

/// Record with named fields and a nominal type.
#[derive(Clone, Debug)]
pub struct RecordValue {
    type_name: Arc<str>,
    fields: Arc<[Field]>,
}

impl RecordValue {
    pub fn new(type_name: impl Into<Arc<str>>, fields: Vec<Field>) -> Self {
        RecordValue {
            type_name: type_name.into(),
            fields: fields.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| f.name() == name)
            .map(Field::value)
    }

    pub(crate) fn with_fields(&self, fields: Vec<Field>) -> Self {
        RecordValue {
            type_name: Arc::clone(&self.type_name),
            fields: fields.into(),
        }
    }
}

/// Builder returned by [`Value::record`].
///
/// ```text
/// let user = Value::record("User")
///     .field("Name", "ada")
///     .hidden("session", 42u64)
///     .build();
/// ```
#[must_use]
pub struct RecordBuilder {
    type_name: Arc<str>,
    fields: Vec<Field>,
    equal: Option<EqualFn>,
}

impl RecordBuilder {
    pub(crate) fn new(type_name: impl Into<Arc<str>>) -> Self {
        RecordBuilder {
            type_name: type_name.into(),
            fields: Vec::new(),
            equal: None,
        }
    }

    /// Add an exported field.
    pub fn field(mut self, name: impl Into<Arc<str>>, value: impl ToValue) -> Self {
        self.fields.push(Field::new(name, value.to_value(), true));
        self
    }

    /// Add a hidden (unexported) field.
    pub fn hidden(mut self, name: impl Into<Arc<str>>, value: impl ToValue) -> Self {
        self.fields.push(Field::new(name, value.to_value(), false));
        self
    }

    /// Declare the nominal `Equal` capability of this record's type.
    ///
    /// The capability is registered process-wide on `build()`; every record of
    /// the same type compares through it instead of field-by-field descent.
    pub fn equal_by(mut self, equal: EqualFn) -> Self {
        self.equal = Some(equal);
        self
    }

    pub fn build(self) -> Value {
        if let Some(equal) = self.equal {
            capability::register_equal(&self.type_name, equal);
        }
        Value::Record(RecordValue {
            type_name: self.type_name,
            fields: self.fields.into(),
        })
    }
}

// RefValue

/// Shared, mutable reference cell. The cell address is the aliasing key.
#[derive(Clone)]
pub struct RefValue {
    type_name: Arc<str>,
    cell: Option<Arc<RwLock<Value>>>,
}

impl RefValue {
    pub fn new(type_name: impl Into<Arc<str>>, referent: Value) -> Self {
        RefValue {
            type_name: type_name.into(),
            cell: Some(Arc::new(RwLock::new(referent))),
        }
    }

    /// Wrap an existing cell, e.g. to build self-referential values.
    pub fn from_cell(type_name: impl Into<Arc<str>>, cell: Arc<RwLock<Value>>) -> Self {
        RefValue {
            type_name: type_name.into(),
            cell: Some(cell),
        }
    }

    pub fn nil(type_name: impl Into<Arc<str>>) -> Self {
        RefValue {
            type_name: type_name.into(),
            cell: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_nil(&self) -> bool {
        self.cell.is_none()
    }

    pub fn cell(&self) -> Option<&Arc<RwLock<Value>>> {
        self.cell.as_ref()
    }

    /// Snapshot of the referent. The lock is released before returning.
    pub fn load(&self) -> Option<Value> {
        self.cell.as_ref().map(|cell| cell.read().clone())
    }

    /// Replace the referent. Returns `false` for a nil reference.
    pub fn store(&self, value: Value) -> bool {
        match &self.cell {
            Some(cell) => {
                *cell.write() = value;
                true
            }
            None => false,
        }
    }

    /// Address of the cell, `None` for nil.
    pub fn addr(&self) -> Option<usize> {
        self.cell
            .as_ref()
            .map(|cell| Arc::as_ptr(cell).cast::<()>() as usize)
    }
}

impl fmt::Debug for RefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.addr() {
            Some(addr) => write!(f, "RefValue({} @ {addr:#x})", self.type_name),
            None => write!(f, "RefValue({} nil)", self.type_name),
        }
    }
}

// FuncValue

/// Callable value. Two callables are equal only when both are nil.
#[derive(Clone)]
pub struct FuncValue {
    type_name: Arc<str>,
    func: Option<Arc<NativeFn>>,
}

impl FuncValue {
    pub fn new(
        type_name: impl Into<Arc<str>>,
        func: impl Fn(&[Value]) -> Vec<Value> + Send + Sync + 'static,
    ) -> Self {
        FuncValue {
            type_name: type_name.into(),
            func: Some(Arc::new(func)),
        }
    }

    pub fn from_arc(type_name: impl Into<Arc<str>>, func: Arc<NativeFn>) -> Self {
        FuncValue {
            type_name: type_name.into(),
            func: Some(func),
        }
    }

    pub fn nil(type_name: impl Into<Arc<str>>) -> Self {
        FuncValue {
            type_name: type_name.into(),
            func: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_nil(&self) -> bool {
        self.func.is_none()
    }

    /// Invoke the callable; `None` when nil.
    pub fn call(&self, args: &[Value]) -> Option<Vec<Value>> {
        self.func.as_ref().map(|func| func(args))
    }

    pub(crate) fn addr(&self) -> Option<usize> {
        self.func
            .as_ref()
            .map(|func| Arc::as_ptr(func).cast::<()>() as usize)
    }
}

impl fmt::Debug for FuncValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FuncValue({}", self.type_name)?;
        if self.is_nil() {
            write!(f, " nil")?;
        }
        write!(f, ")")
    }
}

// ChanValue

/// The two ends of a channel of values.
pub struct Channel {
    sender: Sender<Value>,
    receiver: Receiver<Value>,
}

/// Channel handle. Equal iff both refer to the same channel (or both nil).
#[derive(Clone)]
pub struct ChanValue {
    type_name: Arc<str>,
    handle: Option<Arc<Channel>>,
}

impl ChanValue {
    /// Create a channel; `capacity == None` is unbounded.
    pub fn new(type_name: impl Into<Arc<str>>, capacity: Option<usize>) -> Self {
        let (sender, receiver) = match capacity {
            Some(cap) => channel::bounded(cap),
            None => channel::unbounded(),
        };
        ChanValue {
            type_name: type_name.into(),
            handle: Some(Arc::new(Channel { sender, receiver })),
        }
    }

    pub fn nil(type_name: impl Into<Arc<str>>) -> Self {
        ChanValue {
            type_name: type_name.into(),
            handle: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_nil(&self) -> bool {
        self.handle.is_none()
    }

    /// Number of queued values.
    pub fn len(&self) -> usize {
        self.handle.as_ref().map_or(0, |h| h.receiver.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Send a value; `false` for a nil channel or when every receiver is gone.
    pub fn send(&self, value: Value) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|h| h.sender.send(value).is_ok())
    }

    pub fn try_recv(&self) -> Option<Value> {
        self.handle.as_ref()?.receiver.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Value> {
        match self.handle.as_ref()?.receiver.recv_timeout(timeout) {
            Ok(value) => Some(value),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn same_handle(&self, other: &ChanValue) -> bool {
        match (&self.handle, &other.handle) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn addr(&self) -> Option<usize> {
        self.handle
            .as_ref()
            .map(|h| Arc::as_ptr(h).cast::<()>() as usize)
    }
}

impl fmt::Debug for ChanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.addr() {
            Some(addr) => write!(f, "ChanValue({} @ {addr:#x})", self.type_name),
            None => write!(f, "ChanValue({} nil)", self.type_name),
        }
    }
}

// OpaqueValue

/// User-defined value the engine cannot look inside.
///
/// Compared through a registered `Equal` capability when the type has one,
/// otherwise by identity.
#[derive(Clone)]
pub struct OpaqueValue {
    type_name: Arc<str>,
    data: Arc<dyn Any + Send + Sync>,
    repr: Arc<str>,
}

impl OpaqueValue {
    pub fn new<T: Any + Send + Sync + fmt::Debug>(data: T) -> Self {
        let repr: Arc<str> = format!("{data:?}").into();
        OpaqueValue {
            type_name: std::any::type_name::<T>().into(),
            data: Arc::new(data),
            repr,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The `Debug` rendering captured at construction.
    pub fn repr(&self) -> &str {
        &self.repr
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &OpaqueValue) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueValue({}: {})", self.type_name, self.repr)
    }
}
