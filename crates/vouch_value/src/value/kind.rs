use std::fmt;

/// Coarse classification of a [`Value`](super::Value).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Bool,
    Int,
    Uint,
    Float,
    Str,
    Bytes,
    Seq,
    Map,
    Set,
    Record,
    Ref,
    Func,
    Chan,
    Opaque,
}

impl Kind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Str => "string",
            Kind::Bytes => "bytes",
            Kind::Seq => "sequence",
            Kind::Map => "mapping",
            Kind::Set => "set",
            Kind::Record => "record",
            Kind::Ref => "pointer",
            Kind::Func => "func",
            Kind::Chan => "chan",
            Kind::Opaque => "opaque",
        }
    }

    /// Kinds whose values have children the diff walk descends into.
    pub const fn is_structured(self) -> bool {
        matches!(self, Kind::Seq | Kind::Map | Kind::Set | Kind::Record)
    }

    /// Kinds with a native total order (NaN aside).
    pub const fn is_ordered(self) -> bool {
        matches!(self, Kind::Int | Kind::Uint | Kind::Float | Kind::Str)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
