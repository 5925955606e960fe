//! Assertion catalogue for vouch.
//!
//! Every assertion takes the test context first and an optional message
//! last, returns `true` on success, and on failure reports one
//! [`Diagnostic`] through [`TestingT::error`]:
//!
//! ```ignore
//! use vouch_assert::assert;
//!
//! assert::equal(t, 42, answer(), ());
//! assert::contains(t, "hello world", "world", "greeting");
//! ```
//!
//! [`require`] holds the fail-fast variants, which additionally stop the
//! test. [`Assertions`] and [`Requirements`] bind a context once so the
//! context argument can be dropped.

#[macro_use]
mod forward;

pub mod assert;
mod context;
mod diagnostic;
mod recorder;
pub mod require;
mod wrapper;

pub use assert::{find_error, report, CollectT, MaybeError, Moment};
pub use context::{
    abort, abort_skipped, is_aborted, panic_message, skipped_reason, FailNow, TestAborted,
    TestContext, TestSkipped, TestingT,
};
pub use diagnostic::{render_pair, Diagnostic, Label, Message};
pub use recorder::Recorder;
pub use wrapper::{Assertions, Requirements};
