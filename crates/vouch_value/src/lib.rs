//! Value universe and structural equality engine for vouch.
//!
//! This crate is the pure, stateless core shared by the assertion catalogue
//! and the mock argument matcher:
//!
//! - [`Value`]: a tagged union over every kind the engine compares, with
//!   [`ToValue`]/[`FromValue`] bridging to Rust types.
//! - [`equal_deep`], [`equal_values`], [`equal_exported`]: the three
//!   equivalence relations.
//! - [`diff_structured`]: path-addressed differences between two values.
//! - [`Matcher`]/[`match_value`]: argument matchers.
//! - [`compare`]: native ordering over the ordered kinds.

mod capability;
mod convert;
mod diff;
mod equal;
mod matcher;
mod order;
mod stack;
pub mod value;

pub use capability::{equal_capability, has_equal, register_equal, register_opaque_equal, EqualFn};
pub use convert::{Bytes, FromValue, ToValue};
pub use diff::{diff_structured, render_differences, Difference, Path, Segment, Snapshot};
pub use equal::{clone_exported, equal_deep, equal_exported, equal_values};
pub use matcher::{
    any_of_type, anything, is_type, match_value, matched_by, IntoMatcher, MatchError, Matcher,
    Predicate,
};
pub use order::{compare, CompareError};
pub use value::{Kind, Value};
