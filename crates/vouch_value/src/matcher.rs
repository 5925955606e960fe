//! Argument matchers.
//!
//! A matcher is a predicate over one value with a human-readable
//! description. Matchers are what mock expectations hold per argument.

use std::fmt;
use std::sync::Arc;

use crate::convert::FromValue;
use crate::equal::equal_deep;
use crate::value::{type_name_matches, Value};

/// A predicate over a single value.
#[derive(Clone)]
pub enum Matcher {
    /// Matches every value.
    Anything,
    /// Matches values `equal_deep` to the literal.
    Literal(Value),
    /// Matches values whose type name (full or simple) equals the name.
    AnyOfType(Arc<str>),
    /// User predicate over a typed argument.
    Predicate(Predicate),
}

/// Typed user predicate, built by [`matched_by`].
#[derive(Clone)]
pub struct Predicate {
    param_type: Arc<str>,
    admits_nil: bool,
    /// `None` when the value does not decode as the parameter type.
    f: Arc<dyn Fn(&Value) -> Option<bool> + Send + Sync>,
}

impl Predicate {
    pub fn param_type(&self) -> &str {
        &self.param_type
    }

    pub fn admits_nil(&self) -> bool {
        self.admits_nil
    }
}

/// Misuse detected while matching.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// A nil argument reached a predicate whose parameter cannot hold nil.
    #[error("cannot pass nil to a matcher taking `{param_type}`")]
    MatcherTypeMismatch { param_type: String },
}

/// Matcher accepting every value.
pub fn anything() -> Matcher {
    Matcher::Anything
}

/// Matcher accepting values of the named type.
pub fn any_of_type(type_name: impl Into<Arc<str>>) -> Matcher {
    Matcher::AnyOfType(type_name.into())
}

/// Matcher accepting values of the Rust type `T`.
pub fn is_type<T: crate::ToValue>() -> Matcher {
    Matcher::AnyOfType(Arc::from(T::value_type().as_ref()))
}

/// Matcher from a unary predicate. Values that do not decode as `T` do not
/// match; the untyped nil is an error unless `T` admits nil (`Option<_>`,
/// `Value`).
pub fn matched_by<T, F>(predicate: F) -> Matcher
where
    T: FromValue + 'static,
    F: Fn(T) -> bool + Send + Sync + 'static,
{
    Matcher::Predicate(Predicate {
        param_type: Arc::from(std::any::type_name::<T>()),
        admits_nil: T::ADMITS_NIL,
        f: Arc::new(move |v: &Value| T::from_value(v).map(&predicate)),
    })
}

impl Matcher {
    /// Decide whether `value` satisfies the matcher.
    pub fn matches(&self, value: &Value) -> Result<bool, MatchError> {
        match_value(self, value)
    }

    /// Whether this matcher is a literal holding a non-nil callable.
    pub fn is_raw_callable(&self) -> bool {
        matches!(self, Matcher::Literal(Value::Func(f)) if !f.is_nil())
    }
}

/// Dispatch on the matcher form.
pub fn match_value(matcher: &Matcher, value: &Value) -> Result<bool, MatchError> {
    match matcher {
        Matcher::Anything => Ok(true),
        Matcher::Literal(expected) => Ok(equal_deep(expected, value)),
        Matcher::AnyOfType(name) => Ok(type_name_matches(value.type_name(), name)),
        Matcher::Predicate(p) => {
            if matches!(value, Value::Nil) && !p.admits_nil {
                return Err(MatchError::MatcherTypeMismatch {
                    param_type: p.param_type.to_string(),
                });
            }
            Ok((p.f)(value).unwrap_or(false))
        }
    }
}

impl From<Value> for Matcher {
    fn from(v: Value) -> Self {
        Matcher::Literal(v)
    }
}

/// Conversion into a [`Matcher`]. Matchers convert as themselves; any
/// other value becomes a literal.
pub trait IntoMatcher {
    fn into_matcher(self) -> Matcher;
}

impl IntoMatcher for Matcher {
    fn into_matcher(self) -> Matcher {
        self
    }
}

impl<T: crate::ToValue> IntoMatcher for T {
    fn into_matcher(self) -> Matcher {
        Matcher::Literal(self.to_value())
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Anything => f.write_str("<anything>"),
            Matcher::Literal(v) => write!(f, "{v}"),
            Matcher::AnyOfType(name) => write!(f, "<any {name}>"),
            Matcher::Predicate(p) => write!(f, "<matched_by fn({}) -> bool>", p.param_type),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Literal(v) => write!(f, "Literal({v:?})"),
            other => fmt::Display::fmt(other, f),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::ToValue;

    #[test]
    fn literal_uses_deep_equality() {
        let m = Matcher::from(5i32.to_value());
        assert_eq!(m.matches(&5i32.to_value()), Ok(true));
        assert_eq!(m.matches(&5i64.to_value()), Ok(false));
    }

    #[test]
    fn any_of_type_accepts_simple_or_full_names() {
        let rec = Value::record("my_app::Request").field("host", "x").build();
        assert_eq!(any_of_type("Request").matches(&rec), Ok(true));
        assert_eq!(any_of_type("my_app::Request").matches(&rec), Ok(true));
        assert_eq!(any_of_type("Response").matches(&rec), Ok(false));
        assert_eq!(is_type::<i32>().matches(&1i32.to_value()), Ok(true));
    }

    #[test]
    fn predicate_runs_on_decodable_values() {
        let m = matched_by(|n: i32| n > 10);
        assert_eq!(m.matches(&11i32.to_value()), Ok(true));
        assert_eq!(m.matches(&9i32.to_value()), Ok(false));
        // Wrong type is simply not a match.
        assert_eq!(m.matches(&"11".to_value()), Ok(false));
    }

    #[test]
    fn nil_into_non_nillable_predicate_is_an_error() {
        let m = matched_by(|s: String| s.is_empty());
        assert_eq!(
            m.matches(&Value::Nil),
            Err(MatchError::MatcherTypeMismatch {
                param_type: "alloc::string::String".to_owned()
            })
        );
    }

    #[test]
    fn nil_into_option_predicate_is_invoked() {
        let m = matched_by(|s: Option<String>| s.is_none());
        assert_eq!(m.matches(&Value::Nil), Ok(true));
        assert_eq!(m.matches(&"x".to_value()), Ok(false));
    }

    #[test]
    fn values_and_matchers_convert() {
        assert!(matches!(5i32.into_matcher(), Matcher::Literal(_)));
        assert!(matches!(anything().into_matcher(), Matcher::Anything));
    }

    #[test]
    fn anything_matches_nil() {
        assert_eq!(anything().matches(&Value::Nil), Ok(true));
    }

    #[test]
    fn raw_callables_are_flagged() {
        let f = Value::func("fn()", |_| Vec::new());
        assert!(Matcher::from(f).is_raw_callable());
        assert!(!Matcher::from(Value::nil_func("fn()")).is_raw_callable());
        assert!(!anything().is_raw_callable());
    }
}
