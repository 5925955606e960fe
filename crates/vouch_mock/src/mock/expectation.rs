//! Registered expectations and the handles that configure them.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::Receiver;
use parking_lot::Mutex;
use vouch_value::{Matcher, Value};

use super::{fatal, MockState};
use crate::arguments::Arguments;
use crate::error::MockError;

pub(crate) type Waiter = Arc<dyn Fn() + Send + Sync>;
pub(crate) type Callback = Arc<dyn Fn(&Arguments) + Send + Sync>;

/// Where an expectation is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExpectationState {
    /// Registered and not yet called.
    Registered,
    /// Called at least once with calls left (or unlimited).
    PartiallyConsumed,
    /// The call budget is used up; further matching calls fail.
    Exhausted,
}

pub(crate) struct Expectation {
    pub(crate) id: usize,
    pub(crate) method: String,
    pub(crate) args: Vec<Matcher>,
    pub(crate) returns: Vec<Value>,
    /// Calls left; 0 means unlimited unless `exhausted`.
    pub(crate) repeatability: usize,
    pub(crate) exhausted: bool,
    pub(crate) total_calls: usize,
    pub(crate) optional: bool,
    pub(crate) wait_until: Option<Waiter>,
    pub(crate) wait_time: Option<Duration>,
    pub(crate) run: Option<Callback>,
    pub(crate) panic_msg: Option<String>,
    /// Ids of expectations that must be called first.
    pub(crate) requires: Vec<usize>,
    pub(crate) location: &'static Location<'static>,
}

impl Expectation {
    pub(crate) fn new(
        id: usize,
        method: &str,
        args: Vec<Matcher>,
        location: &'static Location<'static>,
    ) -> Self {
        Expectation {
            id,
            method: method.to_owned(),
            args,
            returns: Vec::new(),
            repeatability: 0,
            exhausted: false,
            total_calls: 0,
            optional: false,
            wait_until: None,
            wait_time: None,
            run: None,
            panic_msg: None,
            requires: Vec::new(),
            location,
        }
    }

    /// `Method(arg, arg)` as registered.
    pub(crate) fn signature(&self) -> String {
        let args: Vec<String> = self.args.iter().map(ToString::to_string).collect();
        format!("{}({})", self.method, args.join(", "))
    }

    pub(crate) fn state(&self) -> ExpectationState {
        if self.exhausted {
            ExpectationState::Exhausted
        } else if self.total_calls > 0 {
            ExpectationState::PartiallyConsumed
        } else {
            ExpectationState::Registered
        }
    }

    /// Why the expectation is not satisfied, if it is not.
    pub(crate) fn unmet_reason(&self) -> Option<String> {
        if self.optional {
            return None;
        }
        if self.total_calls == 0 {
            return Some("never called".to_owned());
        }
        if !self.exhausted && self.repeatability > 0 {
            return Some(format!(
                "called {} time(s), expected {}",
                self.total_calls,
                self.total_calls + self.repeatability
            ));
        }
        None
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation")
            .field("signature", &self.signature())
            .field("repeatability", &self.repeatability)
            .field("total_calls", &self.total_calls)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

/// Configures one registered expectation.
///
/// Every method takes and returns the handle so calls chain:
///
/// ```ignore
/// mock.on("Fetch", matchers!["a"]).returns(args![1, Value::Nil]).once();
/// ```
#[derive(Clone)]
pub struct ExpectationHandle {
    state: Arc<Mutex<MockState>>,
    id: usize,
    method: Arc<str>,
    /// Function type name and result count, for function mocks.
    return_arity: Option<(Arc<str>, usize)>,
}

impl ExpectationHandle {
    pub(crate) fn new(
        state: Arc<Mutex<MockState>>,
        id: usize,
        method: &str,
        return_arity: Option<(Arc<str>, usize)>,
    ) -> Self {
        ExpectationHandle {
            state,
            id,
            method: Arc::from(method),
            return_arity,
        }
    }

    /// Apply `f` to the expectation; a handle whose expectation is gone
    /// is fatal.
    fn update(self, f: impl FnOnce(&mut Expectation)) -> Self {
        let mut state = self.state.lock();
        if let Some(expectation) = state.expectation_mut(self.id) {
            f(expectation);
            drop(state);
            return self;
        }
        let test = state.test.clone();
        drop(state);
        fatal(
            test,
            &MockError::Unset {
                method: self.method.to_string(),
            },
        )
    }

    /// Values handed back to the caller.
    pub fn returns(self, values: Vec<Value>) -> Self {
        if let Some((func, expected)) = &self.return_arity {
            if values.len() != *expected {
                let test = self.state.lock().test.clone();
                fatal(
                    test,
                    &MockError::ReturnArity {
                        func: func.to_string(),
                        expected: *expected,
                        given: values.len(),
                    },
                );
            }
        }
        self.update(|e| e.returns = values)
    }

    /// Allow exactly `n` more matching calls; 0 allows any number.
    pub fn times(self, n: usize) -> Self {
        self.update(|e| {
            e.repeatability = n;
            e.exhausted = false;
        })
    }

    pub fn once(self) -> Self {
        self.times(1)
    }

    pub fn twice(self) -> Self {
        self.times(2)
    }

    /// Mark the expectation optional: `assert_expectations` ignores it.
    pub fn maybe(self) -> Self {
        self.update(|e| e.optional = true)
    }

    /// Block each matching call until `rx` yields a value or disconnects.
    pub fn wait_until<T: Send + 'static>(self, rx: Receiver<T>) -> Self {
        let waiter: Waiter = Arc::new(move || {
            if let Err(err) = rx.recv() {
                tracing::trace!(error = %err, "wait_until sender dropped, releasing call");
            }
        });
        self.update(|e| e.wait_until = Some(waiter))
    }

    /// Delay each matching call by `delay`.
    pub fn after(self, delay: Duration) -> Self {
        self.update(|e| e.wait_time = Some(delay))
    }

    /// Run `f` with the call's arguments before returning. Reference
    /// arguments can be written through to emulate out-parameters.
    pub fn run(self, f: impl Fn(&Arguments) + Send + Sync + 'static) -> Self {
        let callback: Callback = Arc::new(f);
        self.update(|e| e.run = Some(callback))
    }

    /// Panic with `msg` on each matching call, after recording it.
    pub fn panic_with(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.update(|e| e.panic_msg = Some(msg))
    }

    /// Require every one of `prior` to have been called before this
    /// expectation may match.
    pub fn not_before(self, prior: &[&ExpectationHandle]) -> Self {
        if prior.iter().any(|p| !Arc::ptr_eq(&p.state, &self.state)) {
            let test = self.state.lock().test.clone();
            fatal(test, &MockError::ForeignHandle);
        }
        let ids: Vec<usize> = prior.iter().map(|p| p.id).collect();
        self.update(|e| e.requires.extend(ids))
    }

    /// Remove the expectation. Later updates through any clone of this
    /// handle are fatal.
    pub fn unset(self) {
        let mut state = self.state.lock();
        let before = state.expected.len();
        state.expected.retain(|e| e.id != self.id);
        let removed = state.expected.len() != before;
        let test = state.test.clone();
        drop(state);
        if !removed {
            fatal(
                test,
                &MockError::Unset {
                    method: self.method.to_string(),
                },
            );
        }
        tracing::trace!(method = %self.method, "expectation unset");
    }

    /// `None` once the expectation has been unset.
    pub fn state(&self) -> Option<ExpectationState> {
        self.state
            .lock()
            .expectation_mut(self.id)
            .map(|e| e.state())
    }

    /// Matching calls dispatched to this expectation so far.
    pub fn calls(&self) -> usize {
        self.state
            .lock()
            .expectation_mut(self.id)
            .map_or(0, |e| e.total_calls)
    }
}

impl fmt::Debug for ExpectationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectationHandle")
            .field("id", &self.id)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}
