//! The runner's test context.

use std::any::Any;
use std::ffi::OsString;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use vouch_assert::{
    abort, abort_skipped, is_aborted, panic_message, skipped_reason, FailNow, TestContext,
    TestingT,
};

use crate::stats::{TestOutcome, TestResult};

type Cleanup = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct State {
    errors: Vec<String>,
    logs: Vec<String>,
    failed: bool,
    skipped: Option<String>,
    parallel: bool,
    cleanups: Vec<Cleanup>,
    temp_dir: Option<tempfile::TempDir>,
    subtests: Vec<TestResult>,
}

struct Inner {
    name: String,
    /// Set for tests fanned out by `run_parallel`.
    parallel_allowed: bool,
    deadline: Option<Instant>,
    started: Instant,
    state: Mutex<State>,
}

/// Test context handed to suites, hooks and subtests.
///
/// Cloning is cheap and yields a handle to the same test.
#[derive(Clone)]
pub struct T {
    inner: Arc<Inner>,
}

impl T {
    /// Root context for a suite run.
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), false, None)
    }

    fn build(name: String, parallel_allowed: bool, deadline: Option<Instant>) -> Self {
        T {
            inner: Arc::new(Inner {
                name,
                parallel_allowed,
                deadline,
                started: Instant::now(),
                state: Mutex::default(),
            }),
        }
    }

    /// Context for a subtest named `parent/name`.
    pub(crate) fn child(&self, name: &str) -> Self {
        self.test_child(name, self.inner.parallel_allowed, self.inner.deadline)
    }

    /// Context for a suite test named `parent/name`.
    pub(crate) fn test_child(
        &self,
        name: &str,
        parallel_allowed: bool,
        deadline: Option<Instant>,
    ) -> Self {
        Self::build(
            format!("{}/{name}", self.inner.name),
            parallel_allowed,
            deadline,
        )
    }

    /// Whether the test opted into parallel execution.
    pub fn is_parallel(&self) -> bool {
        self.inner.state.lock().parallel
    }

    /// Failures reported so far.
    pub fn errors(&self) -> Vec<String> {
        self.inner.state.lock().errors.clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.inner.state.lock().logs.clone()
    }

    pub fn skip_reason(&self) -> Option<String> {
        self.inner.state.lock().skipped.clone()
    }

    /// Results of the subtests run under this context.
    pub fn subtests(&self) -> Vec<TestResult> {
        self.inner.state.lock().subtests.clone()
    }

    /// Run `f` inside a failure barrier. Returns `false` if `f` stopped,
    /// skipped or panicked; a panic is reported as a failure of this test
    /// with `what` naming the step.
    pub(crate) fn guard(&self, what: &str, f: impl FnOnce()) -> bool {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(()) => true,
            Err(payload) => {
                self.absorb(what, payload);
                false
            }
        }
    }

    fn absorb(&self, what: &str, payload: Box<dyn Any + Send>) {
        if let Some(reason) = skipped_reason(&*payload) {
            self.inner.state.lock().skipped = Some(reason.to_owned());
        } else if !is_aborted(&*payload) {
            let message = format!("{what} panicked: {}", panic_message(&*payload));
            tracing::debug!(test = %self.inner.name, %message, "panic recovered");
            self.error(&message);
        }
    }

    /// Run registered cleanups, last registered first, then remove the
    /// temporary directory. The runner does this for every context it
    /// creates; call it on a root context when done with it.
    pub fn finish(&self) {
        loop {
            let Some(cleanup) = self.inner.state.lock().cleanups.pop() else {
                break;
            };
            self.guard("cleanup", cleanup);
        }
        let temp_dir = self.inner.state.lock().temp_dir.take();
        if let Some(dir) = temp_dir {
            if let Err(err) = dir.close() {
                tracing::warn!(test = %self.inner.name, %err, "could not remove temp dir");
            }
        }
    }

    /// Summarise this context as a finished test.
    pub(crate) fn result(&self, short_name: &str) -> TestResult {
        let state = self.inner.state.lock();
        let outcome = if let Some(reason) = &state.skipped {
            if state.failed {
                TestOutcome::Failed(state.errors.join("\n"))
            } else {
                TestOutcome::Skipped(reason.clone())
            }
        } else if state.failed {
            TestOutcome::Failed(state.errors.join("\n"))
        } else {
            TestOutcome::Passed
        };
        TestResult {
            name: short_name.to_owned(),
            outcome,
            duration: self.inner.started.elapsed(),
            logs: state.logs.clone(),
            subtests: state.subtests.clone(),
        }
    }

    /// Record a finished child and propagate its failure.
    pub(crate) fn adopt(&self, child: &T, short_name: &str) -> bool {
        let result = child.result(short_name);
        let passed = !result.outcome.is_failed();
        let mut state = self.inner.state.lock();
        if !passed {
            state.failed = true;
        }
        state.subtests.push(result);
        passed
    }
}

impl TestingT for T {
    fn error(&self, message: &str) {
        tracing::debug!(test = %self.inner.name, "failure reported");
        let mut state = self.inner.state.lock();
        state.failed = true;
        state.errors.push(message.to_owned());
    }
}

impl FailNow for T {
    fn fail_now(&self) -> ! {
        self.inner.state.lock().failed = true;
        abort()
    }
}

impl TestContext for T {
    fn log(&self, message: &str) {
        tracing::info!(test = %self.inner.name, "{message}");
        self.inner.state.lock().logs.push(message.to_owned());
    }

    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn failed(&self) -> bool {
        self.inner.state.lock().failed
    }

    fn run(&self, name: &str, body: &mut dyn FnMut(&Self)) -> bool {
        let child = self.child(name);
        tracing::debug!(test = %child.inner.name, "subtest started");
        child.guard("subtest", || body(&child));
        child.finish();
        self.adopt(&child, name)
    }

    fn skip(&self, reason: &str) -> ! {
        self.inner.state.lock().skipped = Some(reason.to_owned());
        abort_skipped(reason)
    }

    fn cleanup(&self, f: Box<dyn FnOnce() + Send>) {
        self.inner.state.lock().cleanups.push(f);
    }

    fn is_skipped(&self) -> bool {
        self.inner.state.lock().skipped.is_some()
    }

    fn set_parallel(&self) -> bool {
        if !self.inner.parallel_allowed {
            return false;
        }
        self.inner.state.lock().parallel = true;
        true
    }

    fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    fn temp_dir(&self) -> Option<PathBuf> {
        let mut state = self.inner.state.lock();
        if let Some(dir) = &state.temp_dir {
            return Some(dir.path().to_path_buf());
        }
        match tempfile::Builder::new().prefix("vouch-").tempdir() {
            Ok(dir) => {
                let path = dir.path().to_path_buf();
                state.temp_dir = Some(dir);
                Some(path)
            }
            Err(err) => {
                tracing::warn!(test = %self.inner.name, %err, "could not create temp dir");
                None
            }
        }
    }

    /// Refused for tests that run in parallel, since the environment is
    /// process-wide.
    fn set_env(&self, key: &str, value: &str) -> bool {
        if self.inner.parallel_allowed {
            tracing::warn!(test = %self.inner.name, key, "set_env refused in a parallel test");
            return false;
        }
        let previous: Option<OsString> = std::env::var_os(key);
        std::env::set_var(key, value);
        let key = key.to_owned();
        self.cleanup(Box::new(move || match previous {
            Some(value) => std::env::set_var(&key, value),
            None => std::env::remove_var(&key),
        }));
        true
    }
}

impl fmt::Debug for T {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("T")
            .field("name", &self.inner.name)
            .field("failed", &state.failed)
            .field("errors", &state.errors)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
