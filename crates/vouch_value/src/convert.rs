//! Bridging Rust values into and out of the value universe.
//!
//! [`ToValue`] maps a Rust value onto a [`Value`] and names its type.
//! Sequence-like containers (`Vec`, slices, arrays, `VecDeque`) all map to
//! sequences named `Vec<T>`, so `vec![1, 2]` and `[1, 2]` compare equal.
//!
//! [`FromValue`] is the inverse used by typed predicates and argument
//! accessors. Decoding is strict about widths: an `i64` value never decodes
//! as `i32`.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::value::{
    FloatValue, FloatWidth, IntValue, IntWidth, UintValue, UintWidth, Value, BYTES_TYPE,
    STRING_TYPE,
};

/// Conversion of a Rust value into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;

    /// Type name recorded on values of this type.
    fn value_type() -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }
}

/// Decoding of a [`Value`] into a Rust type.
pub trait FromValue: Sized {
    /// Whether nil values decode (to `None`, or to `Value::Nil`).
    const ADMITS_NIL: bool = false;

    fn from_value(value: &Value) -> Option<Self>;
}

/// Byte-sequence newtype. `Vec<u8>` maps to a sequence of `u8`; wrap it in
/// `Bytes` to get the dedicated bytes kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Bytes(v)
    }
}

impl From<&[u8]> for Bytes {
    fn from(v: &[u8]) -> Self {
        Bytes(v.to_vec())
    }
}

impl ToValue for Bytes {
    fn to_value(&self) -> Value {
        Value::Bytes(Some(Arc::from(self.0.as_slice())))
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Borrowed(BYTES_TYPE)
    }
}

impl FromValue for Bytes {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bytes().map(|b| Bytes(b.to_vec()))
    }
}

// Scalars

macro_rules! int_value {
    ($($t:ty => $w:ident),* $(,)?) => {$(
        impl ToValue for $t {
            #[inline]
            fn to_value(&self) -> Value {
                Value::Int(IntValue::new(i64::from(*self), IntWidth::$w))
            }
        }

        impl FromValue for $t {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Int(v) if v.width() == IntWidth::$w => <$t>::try_from(v.raw()).ok(),
                    _ => None,
                }
            }
        }
    )*};
}

int_value!(i8 => I8, i16 => I16, i32 => I32, i64 => I64);

impl ToValue for isize {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Int(IntValue::new(
            i64::try_from(*self).unwrap_or(i64::MAX),
            IntWidth::Isize,
        ))
    }
}

impl FromValue for isize {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) if v.width() == IntWidth::Isize => isize::try_from(v.raw()).ok(),
            _ => None,
        }
    }
}

macro_rules! uint_value {
    ($($t:ty => $w:ident),* $(,)?) => {$(
        impl ToValue for $t {
            #[inline]
            fn to_value(&self) -> Value {
                Value::Uint(UintValue::new(u64::from(*self), UintWidth::$w))
            }
        }

        impl FromValue for $t {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Uint(v) if v.width() == UintWidth::$w => <$t>::try_from(v.raw()).ok(),
                    _ => None,
                }
            }
        }
    )*};
}

uint_value!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);

impl ToValue for usize {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Uint(UintValue::new(
            u64::try_from(*self).unwrap_or(u64::MAX),
            UintWidth::Usize,
        ))
    }
}

impl FromValue for usize {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Uint(v) if v.width() == UintWidth::Usize => usize::try_from(v.raw()).ok(),
            _ => None,
        }
    }
}

impl ToValue for f32 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(FloatValue::new(f64::from(*self), FloatWidth::F32))
    }
}

impl FromValue for f32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "F32 values hold an exactly representable f32"
    )]
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) if v.width() == FloatWidth::F32 => Some(v.raw() as f32),
            _ => None,
        }
    }
}

impl ToValue for f64 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::float(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) if v.width() == FloatWidth::F64 => Some(v.raw()),
            _ => None,
        }
    }
}

impl ToValue for bool {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::string(self)
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Borrowed(STRING_TYPE)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::string(self.as_str())
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Borrowed(STRING_TYPE)
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::string(self.to_string())
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Borrowed(STRING_TYPE)
    }
}

// Values and wrappers

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Borrowed("Value")
    }
}

impl FromValue for Value {
    const ADMITS_NIL: bool = true;

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::Nil
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Borrowed("()")
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn value_type() -> Cow<'static, str> {
        T::value_type()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn value_type() -> Cow<'static, str> {
        T::value_type()
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn value_type() -> Cow<'static, str> {
        T::value_type()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Nil,
        }
    }

    fn value_type() -> Cow<'static, str> {
        T::value_type()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const ADMITS_NIL: bool = true;

    fn from_value(value: &Value) -> Option<Self> {
        if value.is_nil() && !T::ADMITS_NIL {
            return Some(None);
        }
        T::from_value(value).map(Some)
    }
}

// Sequences

fn seq_type<T: ToValue>() -> String {
    format!("Vec<{}>", T::value_type())
}

fn seq_of<'a, T: ToValue + 'a>(items: impl Iterator<Item = &'a T>) -> Value {
    Value::seq(seq_type::<T>(), items.map(ToValue::to_value).collect())
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        seq_of(self.iter())
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Owned(seq_type::<T>())
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        seq_of(self.iter())
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Owned(seq_type::<T>())
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        seq_of(self.iter())
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Owned(seq_type::<T>())
    }
}

impl<T: ToValue> ToValue for VecDeque<T> {
    fn to_value(&self) -> Value {
        seq_of(self.iter())
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Owned(seq_type::<T>())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_seq()?.items()?.iter().map(T::from_value).collect()
    }
}

// Mappings and sets

fn map_type<K: ToValue, V: ToValue>() -> String {
    format!("Map<{}, {}>", K::value_type(), V::value_type())
}

fn set_type<T: ToValue>() -> String {
    format!("Set<{}>", T::value_type())
}

impl<K: ToValue, V: ToValue, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        let entries = self
            .iter()
            .map(|(k, v)| (k.to_value(), v.to_value()))
            .collect();
        Value::map(map_type::<K, V>(), entries)
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Owned(map_type::<K, V>())
    }
}

impl<K: ToValue, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        let entries = self
            .iter()
            .map(|(k, v)| (k.to_value(), v.to_value()))
            .collect();
        Value::map(map_type::<K, V>(), entries)
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Owned(map_type::<K, V>())
    }
}

impl<T: ToValue, S> ToValue for HashSet<T, S> {
    fn to_value(&self) -> Value {
        Value::set(set_type::<T>(), self.iter().map(ToValue::to_value).collect())
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Owned(set_type::<T>())
    }
}

impl<T: ToValue> ToValue for BTreeSet<T> {
    fn to_value(&self) -> Value {
        Value::set(set_type::<T>(), self.iter().map(ToValue::to_value).collect())
    }

    fn value_type() -> Cow<'static, str> {
        Cow::Owned(set_type::<T>())
    }
}

// Tuples

macro_rules! tuple_value {
    ($($name:ident . $idx:tt),+) => {
        impl<$($name: ToValue),+> ToValue for ($($name,)+) {
            fn to_value(&self) -> Value {
                Value::seq(Self::value_type(), vec![$(self.$idx.to_value()),+])
            }

            fn value_type() -> Cow<'static, str> {
                let parts: Vec<Cow<'static, str>> = vec![$($name::value_type()),+];
                Cow::Owned(format!("({})", parts.join(", ")))
            }
        }
    };
}

tuple_value!(A.0);
tuple_value!(A.0, B.1);
tuple_value!(A.0, B.1, C.2);
tuple_value!(A.0, B.1, C.2, D.3);
tuple_value!(A.0, B.1, C.2, D.3, E.4);
tuple_value!(A.0, B.1, C.2, D.3, E.4, F.5);

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalars_keep_their_width() {
        assert_eq!(1i32.to_value().type_name(), "i32");
        assert_eq!(1u8.to_value().type_name(), "u8");
        assert_eq!(1.5f32.to_value().type_name(), "f32");
        assert_eq!("x".to_value().type_name(), "String");
    }

    #[test]
    fn borrowed_strings_name_like_owned_ones() {
        assert_eq!(vec!["a"].to_value().type_name(), "Vec<String>");
        assert_eq!(vec!["a".to_owned()].to_value().type_name(), "Vec<String>");
    }

    #[test]
    fn sequence_like_containers_share_a_type() {
        let v = vec![1i32, 2];
        let a = [1i32, 2];
        let d: VecDeque<i32> = v.iter().copied().collect();
        assert_eq!(v.to_value().type_name(), "Vec<i32>");
        assert_eq!(a.to_value().type_name(), "Vec<i32>");
        assert_eq!(d.to_value().type_name(), "Vec<i32>");
        assert_eq!(v.as_slice().to_value().type_name(), "Vec<i32>");
    }

    #[test]
    fn maps_and_sets_name_their_parameters() {
        let mut m = BTreeMap::new();
        m.insert("k".to_owned(), 1u16);
        assert_eq!(m.to_value().type_name(), "Map<String, u16>");
        let s: BTreeSet<bool> = [true].into_iter().collect();
        assert_eq!(s.to_value().type_name(), "Set<bool>");
    }

    #[test]
    fn option_maps_none_to_nil() {
        let none: Option<i32> = None;
        assert!(none.to_value().is_nil());
        assert_eq!(Some(3i32).to_value().as_i64(), Some(3));
    }

    #[test]
    fn decoding_is_strict_about_width() {
        assert_eq!(i32::from_value(&7i32.to_value()), Some(7));
        assert_eq!(i32::from_value(&7i64.to_value()), None);
        assert_eq!(u64::from_value(&7i64.to_value()), None);
    }

    #[test]
    fn option_decodes_nil() {
        assert_eq!(Option::<i32>::from_value(&Value::Nil), Some(None));
        assert_eq!(Option::<i32>::from_value(&4i32.to_value()), Some(Some(4)));
        assert!(Option::<i32>::ADMITS_NIL);
        assert!(!i32::ADMITS_NIL);
    }

    #[test]
    fn bytes_newtype_maps_to_bytes_kind() {
        let v = Bytes(b"hi".to_vec()).to_value();
        assert_eq!(v.as_bytes(), Some(&b"hi"[..]));
        assert_eq!(Bytes::from_value(&v), Some(Bytes(b"hi".to_vec())));
    }

    #[test]
    fn tuples_are_sequences() {
        let v = (1i32, "a").to_value();
        assert_eq!(v.type_name(), "(i32, String)");
        assert_eq!(v.len(), Some(2));
    }

    #[test]
    fn vec_round_trips_through_from_value() {
        let v = vec![1u32, 2, 3].to_value();
        assert_eq!(Vec::<u32>::from_value(&v), Some(vec![1, 2, 3]));
    }
}
