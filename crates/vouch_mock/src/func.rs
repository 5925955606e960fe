//! Mocks standing in for a single function value.

use std::panic::Location;
use std::sync::Arc;

use vouch_value::{Matcher, Value};

use crate::arguments::Arguments;
use crate::error::MockError;
use crate::mock::{fatal_for, ExpectationHandle, Mock};

/// Method name function mocks record their calls under.
pub const FUNC_METHOD: &str = "func";

/// A mock of one function type with a fixed number of results.
///
/// Every expectation must return exactly `return_arity` values; this is
/// checked when `returns` is configured and again at each call.
#[derive(Debug)]
pub struct FuncMock {
    mock: Arc<Mock>,
    type_name: Arc<str>,
    return_arity: usize,
}

impl FuncMock {
    pub fn new(type_name: impl Into<Arc<str>>, return_arity: usize) -> Self {
        FuncMock {
            mock: Arc::new(Mock::new()),
            type_name: type_name.into(),
            return_arity,
        }
    }

    #[track_caller]
    pub fn on(&self, args: Vec<Matcher>) -> ExpectationHandle {
        self.mock.register(
            FUNC_METHOD,
            args,
            Some((Arc::clone(&self.type_name), self.return_arity)),
            Location::caller(),
        )
    }

    /// Invoke the mocked function directly.
    #[track_caller]
    pub fn call(&self, args: Vec<Value>) -> Arguments {
        call_checked(&self.mock, &self.type_name, self.return_arity, args)
    }

    /// A function value dispatching to this mock, for code under test that
    /// takes a callable.
    pub fn func(&self) -> Value {
        let mock = Arc::clone(&self.mock);
        let type_name = Arc::clone(&self.type_name);
        let arity = self.return_arity;
        Value::func(Arc::clone(&self.type_name), move |args: &[Value]| {
            call_checked(&mock, &type_name, arity, args.to_vec()).into_vec()
        })
    }

    /// The underlying mock, for verification.
    pub fn mock(&self) -> &Mock {
        &self.mock
    }
}

#[track_caller]
fn call_checked(mock: &Mock, type_name: &str, arity: usize, args: Vec<Value>) -> Arguments {
    let out = mock.called(FUNC_METHOD, args);
    if out.len() != arity {
        fatal_for(
            mock,
            &MockError::ReturnArity {
                func: type_name.to_owned(),
                expected: arity,
                given: out.len(),
            },
        );
    }
    out
}
