//! Assertions, mocks and test suites.
//!
//! `vouch` bundles the toolkit's crates behind one dependency:
//!
//! - [`value`]: the value universe with deep equality, diffs and matchers.
//! - [`assert`] and [`require`]: the assertion catalogue, non-fatal and
//!   fail-fast.
//! - [`mock`]: expectation-driven test doubles.
//! - [`suite`]: test suites with lifecycle hooks.
//!
//! Most tests only need the prelude:
//!
//! ```ignore
//! use vouch::prelude::*;
//!
//! #[derive(Default)]
//! struct Accounts {
//!     store: Mock,
//! }
//!
//! impl Suite for Accounts {
//!     fn methods(m: &mut Methods<Self>) {
//!         m.add("SetupTest", |s, t| s.store.test(t.clone()))
//!             .add("TestOpen", |s, t| {
//!                 s.store.on("Insert", matchers![anything()]).returns(args![1u64]);
//!                 assert::equal(t, 1u64, s.store.called("Insert", args!["alice"]).uint(0), ());
//!                 s.store.assert_expectations(t);
//!             });
//!     }
//! }
//!
//! #[test]
//! fn accounts() {
//!     run_suite(Accounts::default());
//! }
//! ```

pub use vouch_assert::{assert, require};
pub use vouch_mock::{args, matchers};
pub use vouch_mock as mock;
pub use vouch_suite as suite;
pub use vouch_value as value;

pub use vouch_assert::{
    Assertions, CollectT, Diagnostic, FailNow, Message, Recorder, Requirements, TestContext,
    TestingT,
};
pub use vouch_mock::{Arguments, ExpectationHandle, FuncMock, Mock};
pub use vouch_suite::{
    run_suite, run_suite_parallel, Methods, RunOptions, Suite, SuiteExt, SuiteSummary, T,
};
pub use vouch_value::{FromValue, ToValue, Value};

/// The names a test file usually needs.
pub mod prelude {
    pub use crate::{args, matchers};
    pub use vouch_assert::{
        assert, require, Assertions, FailNow, Recorder, Requirements, TestContext, TestingT,
    };
    pub use vouch_mock::{assert_expectations_for_objects, Arguments, FuncMock, Mock};
    pub use vouch_suite::{run_suite, run_suite_parallel, Methods, Suite, SuiteExt, T};
    pub use vouch_value::{any_of_type, anything, is_type, matched_by, ToValue, Value};
}
