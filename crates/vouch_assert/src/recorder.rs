//! A capturing test context.
//!
//! [`Recorder`] keeps every reported failure and log line instead of
//! forwarding them to a host. It is what the crate's own tests (and mock
//! tests downstream) assert against.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use parking_lot::Mutex;

use crate::context::{
    abort, abort_skipped, is_aborted, panic_message, skipped_reason, FailNow, TestContext,
    TestingT,
};

type Cleanup = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct State {
    errors: Vec<String>,
    logs: Vec<String>,
    helpers: usize,
    failed: bool,
    skipped: Option<String>,
    cleanups: Vec<Cleanup>,
}

/// Test context that records instead of reporting.
pub struct Recorder {
    name: String,
    state: Mutex<State>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::named("Recorder")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Recorder {
            name: name.into(),
            state: Mutex::default(),
        }
    }

    /// Diagnostics reported so far.
    pub fn errors(&self) -> Vec<String> {
        self.state.lock().errors.clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.state.lock().logs.clone()
    }

    /// How many times a failing assertion marked itself as a helper.
    pub fn helper_calls(&self) -> usize {
        self.state.lock().helpers
    }

    pub fn skip_reason(&self) -> Option<String> {
        self.state.lock().skipped.clone()
    }

    /// Run `f`, absorbing a stop or skip of this test. Returns `None` if
    /// the test was stopped; other panics keep unwinding.
    pub fn catch<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(r) => Some(r),
            Err(payload) if is_aborted(&*payload) || skipped_reason(&*payload).is_some() => None,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Run registered cleanups, last registered first.
    pub fn finish(&self) {
        let cleanups = std::mem::take(&mut self.state.lock().cleanups);
        for cleanup in cleanups.into_iter().rev() {
            cleanup();
        }
    }

    fn absorb(&self, payload: Box<dyn Any + Send>) {
        if let Some(reason) = skipped_reason(&*payload) {
            self.state.lock().skipped = Some(reason.to_owned());
        } else if !is_aborted(&*payload) {
            let mut state = self.state.lock();
            state.failed = true;
            state.errors.push(format!("panic: {}", panic_message(&*payload)));
        }
    }
}

impl TestingT for Recorder {
    fn error(&self, message: &str) {
        let mut state = self.state.lock();
        state.failed = true;
        state.errors.push(message.to_owned());
    }

    fn helper(&self) {
        self.state.lock().helpers += 1;
    }
}

impl FailNow for Recorder {
    fn fail_now(&self) -> ! {
        self.state.lock().failed = true;
        abort()
    }
}

impl TestContext for Recorder {
    fn log(&self, message: &str) {
        self.state.lock().logs.push(message.to_owned());
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn failed(&self) -> bool {
        self.state.lock().failed
    }

    fn run(&self, name: &str, body: &mut dyn FnMut(&Self)) -> bool {
        let child = Recorder::named(format!("{}/{name}", self.name));
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| body(&child))) {
            child.absorb(payload);
        }
        child.finish();
        let passed = !child.failed();
        let mut state = self.state.lock();
        for error in child.errors() {
            state.errors.push(format!("{}: {error}", child.name));
        }
        if !passed {
            state.failed = true;
        }
        passed
    }

    fn skip(&self, reason: &str) -> ! {
        self.state.lock().skipped = Some(reason.to_owned());
        abort_skipped(reason)
    }

    fn cleanup(&self, f: Box<dyn FnOnce() + Send>) {
        self.state.lock().cleanups.push(f);
    }

    fn is_skipped(&self) -> bool {
        self.state.lock().skipped.is_some()
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        self.finish();
    }
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Recorder")
            .field("name", &self.name)
            .field("errors", &state.errors)
            .field("failed", &state.failed)
            .finish_non_exhaustive()
    }
}
