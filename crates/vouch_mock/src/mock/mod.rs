//! The mock object.
//!
//! A [`Mock`] holds expectations registered with [`Mock::on`] and the calls
//! recorded by [`Mock::called`]. Dispatch takes the lock only to select an
//! expectation and record the call; waits, callbacks and panics configured
//! on the expectation run after it is released.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::thread;

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use rustc_hash::FxHashMap;
use vouch_assert::FailNow;
use vouch_value::{MatchError, Matcher, Value};

use crate::arguments::{diff_args, Arguments};
use crate::error::MockError;

mod expectation;
mod verify;

pub use expectation::{ExpectationHandle, ExpectationState};
pub use verify::assert_expectations_for_objects;

use expectation::{Callback, Expectation, Waiter};

type SharedTest = Arc<dyn FailNow + Send + Sync>;

/// A call received by a mock.
#[derive(Clone, Debug)]
pub struct Call {
    pub method: String,
    pub arguments: Arguments,
    pub location: &'static Location<'static>,
}

#[derive(Default)]
pub(crate) struct MockState {
    pub(crate) expected: Vec<Expectation>,
    pub(crate) calls: Vec<Call>,
    test_data: Option<FxHashMap<String, Value>>,
    pub(crate) test: Option<SharedTest>,
    next_id: usize,
}

impl MockState {
    pub(crate) fn expectation_mut(&mut self, id: usize) -> Option<&mut Expectation> {
        self.expected.iter_mut().find(|e| e.id == id)
    }

    /// First expectation for `method` accepting `args`, skipping exhausted
    /// ones.
    fn find_expected(&self, method: &str, args: &[Value]) -> Result<Selection, MatchError> {
        let mut exhausted = None;
        for (i, e) in self.expected.iter().enumerate() {
            if e.method != method {
                continue;
            }
            let (_, differences) = diff_args(&e.args, args)?;
            if differences > 0 {
                continue;
            }
            if !e.exhausted {
                return Ok(Selection::Ready(i));
            }
            exhausted.get_or_insert(i);
        }
        Ok(exhausted.map_or(Selection::None, Selection::Exhausted))
    }

    /// Expectation for `method` with the fewest mismatching arguments,
    /// and its rendered comparison.
    fn find_closest(&self, method: &str, args: &[Value]) -> Option<(String, String)> {
        self.expected
            .iter()
            .filter(|e| e.method == method)
            .filter_map(|e| {
                let (rendered, differences) = diff_args(&e.args, args).ok()?;
                Some((differences, e, rendered))
            })
            .min_by_key(|(differences, _, _)| *differences)
            .map(|(_, e, rendered)| (e.signature(), rendered))
    }

    /// First expectation `index` depends on that has not been called.
    fn unmet_requirement(&self, index: usize) -> Option<String> {
        self.expected[index].requires.iter().find_map(|id| {
            let prior = self.expected.iter().find(|e| e.id == *id)?;
            (prior.total_calls == 0).then(|| prior.signature())
        })
    }
}

enum Selection {
    Ready(usize),
    Exhausted(usize),
    None,
}

/// What a dispatched call does once the lock is released.
struct Plan {
    returns: Vec<Value>,
    wait_until: Option<Waiter>,
    wait_time: Option<std::time::Duration>,
    run: Option<Callback>,
    panic_msg: Option<String>,
}

/// Stop the test for mock misuse: through the attached context if there
/// is one, otherwise by panicking.
pub(crate) fn fatal(test: Option<SharedTest>, err: &MockError) -> ! {
    tracing::debug!(error = %err, "mock failure");
    match test {
        Some(t) => {
            t.helper();
            t.error(&err.to_string());
            t.fail_now()
        }
        None => panic!("{err}"),
    }
}

pub(crate) fn fatal_for(mock: &Mock, err: &MockError) -> ! {
    let test = mock.state.lock().test.clone();
    fatal(test, err)
}

fn render_call(method: &str, args: &[Value]) -> String {
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    format!("{method}({})", args.join(", "))
}

/// Records expectations and calls for one mocked object.
///
/// ```ignore
/// let mock = Mock::new();
/// mock.on("Get", matchers!["key"]).returns(args![42]).once();
///
/// let out = mock.called("Get", args!["key"]);
/// assert_eq!(out.int(0), 42);
/// mock.assert_expectations(t);
/// ```
#[derive(Default)]
pub struct Mock {
    state: Arc<Mutex<MockState>>,
}

impl Mock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the test context that misuse and unexpected calls are
    /// reported through. Without one they panic.
    pub fn test(&self, t: impl FailNow + Send + Sync + 'static) {
        self.state.lock().test = Some(Arc::new(t));
    }

    /// Free-form per-mock state, created on first access.
    pub fn test_data(&self) -> MappedMutexGuard<'_, FxHashMap<String, Value>> {
        MutexGuard::map(self.state.lock(), |s| {
            s.test_data.get_or_insert_with(FxHashMap::default)
        })
    }

    /// Register an expectation for `method` called with arguments accepted
    /// by `args`.
    #[track_caller]
    pub fn on(&self, method: &str, args: Vec<Matcher>) -> ExpectationHandle {
        self.register(method, args, None, Location::caller())
    }

    pub(crate) fn register(
        &self,
        method: &str,
        args: Vec<Matcher>,
        return_arity: Option<(Arc<str>, usize)>,
        location: &'static Location<'static>,
    ) -> ExpectationHandle {
        let mut state = self.state.lock();
        if args.iter().any(Matcher::is_raw_callable) {
            let test = state.test.clone();
            drop(state);
            fatal(
                test,
                &MockError::RawCallable {
                    method: method.to_owned(),
                },
            );
        }
        let id = state.next_id;
        state.next_id += 1;
        state
            .expected
            .push(Expectation::new(id, method, args, location));
        drop(state);
        tracing::trace!(method, id, "expectation registered");
        ExpectationHandle::new(Arc::clone(&self.state), id, method, return_arity)
    }

    /// Dispatch a call to `method`: select the first expectation accepting
    /// `args`, record the call, then wait, run the callback and hand back
    /// the expectation's return values.
    ///
    /// A call no expectation accepts is fatal.
    #[track_caller]
    pub fn called(&self, method: &str, args: Vec<Value>) -> Arguments {
        let location = Location::caller();
        let plan = self.select(method, &args, location);

        if let Some(msg) = plan.panic_msg {
            panic!("{msg}");
        }
        if let Some(wait) = plan.wait_until {
            wait();
        } else if let Some(delay) = plan.wait_time {
            thread::sleep(delay);
        }
        if let Some(run) = plan.run {
            run(&Arguments::new(args));
        }
        Arguments::new(plan.returns)
    }

    fn select(&self, method: &str, args: &[Value], location: &'static Location<'static>) -> Plan {
        let mut state = self.state.lock();
        let selection = state.find_expected(method, args);
        let index = match selection {
            Ok(Selection::Ready(i)) => i,
            Ok(Selection::Exhausted(i)) => {
                let err = MockError::Exhausted {
                    call: render_call(method, args),
                    times: state.expected[i].total_calls,
                };
                let test = state.test.clone();
                drop(state);
                fatal(test, &err)
            }
            Ok(Selection::None) => {
                let call = render_call(method, args);
                let err = match state.find_closest(method, args) {
                    Some((closest, diff)) => MockError::NoMatch {
                        call,
                        closest,
                        diff,
                    },
                    None => MockError::UnknownMethod {
                        method: method.to_owned(),
                        call,
                    },
                };
                let test = state.test.clone();
                drop(state);
                fatal(test, &err)
            }
            Err(source) => {
                let err = MockError::Matcher {
                    call: render_call(method, args),
                    source,
                };
                let test = state.test.clone();
                drop(state);
                fatal(test, &err)
            }
        };

        if let Some(required) = state.unmet_requirement(index) {
            let err = MockError::OutOfOrder {
                call: render_call(method, args),
                required,
            };
            let test = state.test.clone();
            drop(state);
            fatal(test, &err);
        }

        let e = &mut state.expected[index];
        e.total_calls += 1;
        match e.repeatability {
            0 => {}
            1 => {
                e.repeatability = 0;
                e.exhausted = true;
            }
            n => e.repeatability = n - 1,
        }
        let plan = Plan {
            returns: e.returns.clone(),
            wait_until: e.wait_until.clone(),
            wait_time: e.wait_time,
            run: e.run.clone(),
            panic_msg: e.panic_msg.clone(),
        };
        tracing::trace!(method, calls = e.total_calls, "mock call dispatched");
        state.calls.push(Call {
            method: method.to_owned(),
            arguments: Arguments::new(args.to_vec()),
            location,
        });
        plan
    }

    /// Whether a call to `method` with `args` would currently be accepted.
    pub fn is_method_callable(&self, method: &str, args: &[Value]) -> bool {
        matches!(
            self.state.lock().find_expected(method, args),
            Ok(Selection::Ready(_))
        )
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Mock")
            .field("expected", &state.expected)
            .field("calls", &state.calls.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
