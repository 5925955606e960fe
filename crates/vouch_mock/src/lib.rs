//! Mock objects for vouch.
//!
//! A hand-written test double embeds a [`Mock`] and forwards each method
//! to [`Mock::called`]; the test registers expectations with [`Mock::on`]
//! and checks them with [`Mock::assert_expectations`]:
//!
//! ```ignore
//! struct StoreMock(Mock);
//!
//! impl Store for StoreMock {
//!     fn get(&self, key: &str) -> Option<i64> {
//!         self.0.called("Get", args![key]).typed(0)
//!     }
//! }
//!
//! let store = StoreMock(Mock::new());
//! store.0.on("Get", matchers!["a"]).returns(args![Some(1)]).once();
//! ```
//!
//! Arguments are matched by deep equality, by [`any_of_type`], by
//! [`anything`], or by a predicate built with [`matched_by`].

mod arguments;
mod error;
mod func;
mod mock;

pub use arguments::Arguments;
pub use error::MockError;
pub use func::{FuncMock, FUNC_METHOD};
pub use mock::{
    assert_expectations_for_objects, Call, ExpectationHandle, ExpectationState, Mock,
};
pub use vouch_value::{
    any_of_type, anything, is_type, matched_by, IntoMatcher, MatchError, Matcher, ToValue,
    Value,
};

/// Argument or return values: `args![1, "a", Value::Nil]`.
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::ToValue::to_value(&$arg)),+]
    };
}

/// Argument matchers: plain values match by deep equality, matchers are
/// used as given. `matchers!["a", anything(), is_type::<i64>()]`.
#[macro_export]
macro_rules! matchers {
    () => {
        ::std::vec::Vec::<$crate::Matcher>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::IntoMatcher::into_matcher($arg)),+]
    };
}
