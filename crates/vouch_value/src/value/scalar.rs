//! Numeric scalars with an explicit width.
//!
//! The engine compares *types*, not just magnitudes: `i32(1)` and `i64(1)` are
//! different values under `equal_deep`. Each scalar therefore carries its
//! declared width next to a widened raw representation. The raw value always
//! fits the width; constructors truncate exactly like an `as` cast would.

use std::fmt;

/// Declared width of a signed integer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
    Isize,
}

impl IntWidth {
    pub const fn type_name(self) -> &'static str {
        match self {
            IntWidth::I8 => "i8",
            IntWidth::I16 => "i16",
            IntWidth::I32 => "i32",
            IntWidth::I64 => "i64",
            IntWidth::Isize => "isize",
        }
    }

    /// Storage size in bits.
    pub const fn bits(self) -> u32 {
        match self {
            IntWidth::I8 => 8,
            IntWidth::I16 => 16,
            IntWidth::I32 => 32,
            IntWidth::I64 | IntWidth::Isize => 64,
        }
    }
}

/// Declared width of an unsigned integer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UintWidth {
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl UintWidth {
    pub const fn type_name(self) -> &'static str {
        match self {
            UintWidth::U8 => "u8",
            UintWidth::U16 => "u16",
            UintWidth::U32 => "u32",
            UintWidth::U64 => "u64",
            UintWidth::Usize => "usize",
        }
    }

    /// Storage size in bits.
    pub const fn bits(self) -> u32 {
        match self {
            UintWidth::U8 => 8,
            UintWidth::U16 => 16,
            UintWidth::U32 => 32,
            UintWidth::U64 | UintWidth::Usize => 64,
        }
    }
}

/// Declared width of a float.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    F32,
    F64,
}

impl FloatWidth {
    pub const fn type_name(self) -> &'static str {
        match self {
            FloatWidth::F32 => "f32",
            FloatWidth::F64 => "f64",
        }
    }

    /// Storage size in bits.
    pub const fn bits(self) -> u32 {
        match self {
            FloatWidth::F32 => 32,
            FloatWidth::F64 => 64,
        }
    }
}

/// Signed integer scalar.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntValue {
    raw: i64,
    width: IntWidth,
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "truncation to the declared width is the point of the constructor"
)]
impl IntValue {
    /// Create a scalar, truncating `raw` to `width` the way `as` does.
    pub const fn new(raw: i64, width: IntWidth) -> Self {
        let raw = match width {
            IntWidth::I8 => raw as i8 as i64,
            IntWidth::I16 => raw as i16 as i64,
            IntWidth::I32 => raw as i32 as i64,
            IntWidth::I64 | IntWidth::Isize => raw,
        };
        IntValue { raw, width }
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.raw
    }

    #[inline]
    pub const fn width(self) -> IntWidth {
        self.width
    }
}

impl fmt::Display for IntValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Unsigned integer scalar.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UintValue {
    raw: u64,
    width: UintWidth,
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "truncation to the declared width is the point of the constructor"
)]
impl UintValue {
    /// Create a scalar, truncating `raw` to `width` the way `as` does.
    pub const fn new(raw: u64, width: UintWidth) -> Self {
        let raw = match width {
            UintWidth::U8 => raw as u8 as u64,
            UintWidth::U16 => raw as u16 as u64,
            UintWidth::U32 => raw as u32 as u64,
            UintWidth::U64 | UintWidth::Usize => raw,
        };
        UintValue { raw, width }
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.raw
    }

    #[inline]
    pub const fn width(self) -> UintWidth {
        self.width
    }
}

impl fmt::Display for UintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Floating-point scalar. `F32` values hold an exactly representable `f32`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FloatValue {
    raw: f64,
    width: FloatWidth,
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "rounding to f32 is the point of the constructor"
)]
impl FloatValue {
    pub fn new(raw: f64, width: FloatWidth) -> Self {
        let raw = match width {
            FloatWidth::F32 => f64::from(raw as f32),
            FloatWidth::F64 => raw,
        };
        FloatValue { raw, width }
    }

    #[inline]
    pub const fn raw(self) -> f64 {
        self.raw
    }

    #[inline]
    pub const fn width(self) -> FloatWidth {
        self.width
    }

    #[inline]
    pub fn is_nan(self) -> bool {
        self.raw.is_nan()
    }
}

impl fmt::Display for FloatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keep a trailing `.0` on whole numbers so floats never render like ints.
        if self.raw.is_finite() && self.raw.fract() == 0.0 && self.raw.abs() < 1e16 {
            write!(f, "{:.1}", self.raw)
        } else {
            write!(f, "{}", self.raw)
        }
    }
}

/// A numeric scalar of any family, used by the conversion relation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Numeric {
    Int(IntValue),
    Uint(UintValue),
    Float(FloatValue),
}

/// Target of a numeric conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NumericType {
    Int(IntWidth),
    Uint(UintWidth),
    Float(FloatWidth),
}

impl NumericType {
    pub const fn bits(self) -> u32 {
        match self {
            NumericType::Int(w) => w.bits(),
            NumericType::Uint(w) => w.bits(),
            NumericType::Float(w) => w.bits(),
        }
    }
}

impl Numeric {
    pub const fn numeric_type(self) -> NumericType {
        match self {
            Numeric::Int(v) => NumericType::Int(v.width()),
            Numeric::Uint(v) => NumericType::Uint(v.width()),
            Numeric::Float(v) => NumericType::Float(v.width()),
        }
    }

    /// Convert to `target` with `as`-cast semantics (wrapping for integers,
    /// saturating float-to-int, rounding int-to-float).
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "numeric conversion follows `as` semantics by definition"
    )]
    pub fn convert(self, target: NumericType) -> Numeric {
        match (self, target) {
            (Numeric::Int(v), NumericType::Int(w)) => Numeric::Int(IntValue::new(v.raw(), w)),
            (Numeric::Int(v), NumericType::Uint(w)) => {
                Numeric::Uint(UintValue::new(v.raw() as u64, w))
            }
            (Numeric::Int(v), NumericType::Float(w)) => {
                Numeric::Float(FloatValue::new(v.raw() as f64, w))
            }
            (Numeric::Uint(v), NumericType::Int(w)) => {
                Numeric::Int(IntValue::new(v.raw() as i64, w))
            }
            (Numeric::Uint(v), NumericType::Uint(w)) => Numeric::Uint(UintValue::new(v.raw(), w)),
            (Numeric::Uint(v), NumericType::Float(w)) => {
                Numeric::Float(FloatValue::new(v.raw() as f64, w))
            }
            (Numeric::Float(v), NumericType::Int(w)) => {
                Numeric::Int(IntValue::new(v.raw() as i64, w))
            }
            (Numeric::Float(v), NumericType::Uint(w)) => {
                Numeric::Uint(UintValue::new(v.raw() as u64, w))
            }
            (Numeric::Float(v), NumericType::Float(w)) => {
                Numeric::Float(FloatValue::new(v.raw(), w))
            }
        }
    }
}
