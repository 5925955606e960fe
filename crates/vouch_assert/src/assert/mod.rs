//! Non-fatal assertions.
//!
//! Each failing assertion marks the caller as a helper, reports exactly one
//! diagnostic and returns `false`. Misuse (a non-collection passed to
//! `contains`, a callable passed to `equal`) is reported the same way.

use std::panic::Location;

use crate::context::TestingT;
use crate::diagnostic::Diagnostic;

mod collect;
mod collection;
mod equality;
mod error;
mod eventually;
mod misc;
mod nil;
mod order;
mod panic;
mod time;

pub use collect::CollectT;
pub use collection::{contains, elements_match, not_contains, subset};
pub use equality::{
    equal, equal_exported, equal_values, exactly, not_equal, not_equal_values, not_same, same,
};
pub use error::{
    equal_error, error, error_as, error_contains, error_is, find_error, no_error, not_error_is,
    MaybeError,
};
pub use eventually::{eventually, eventually_with_t, never};
pub use misc::{condition, fail, fail_now};
pub use nil::{empty, is_false, is_true, len, nil, not_empty, not_nil};
pub use order::{
    greater, greater_or_equal, is_decreasing, is_increasing, is_non_decreasing,
    is_non_increasing, less, less_or_equal,
};
pub use panic::{not_panics, panics, panics_with_value};
pub use time::{within_duration, Moment};

/// Report `diag` at the caller's call site and return `false`.
///
/// Building block for assertions defined outside this crate.
#[track_caller]
pub fn report<T: TestingT + ?Sized>(t: &T, diag: Diagnostic) -> bool {
    let location = Location::caller();
    tracing::debug!(%location, "assertion failed");
    t.helper();
    t.error(&diag.at(location).to_string());
    false
}
