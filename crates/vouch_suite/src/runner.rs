//! Suite execution.
//!
//! Per test the hooks run as
//! `SetupTest → BeforeTest → Test* → AfterTest → TearDownTest`. A step that
//! stops or panics skips the steps after it, except `TearDownTest`, which
//! always runs. `SetupSuite` and `TearDownSuite` bracket all tests, and
//! `HandleStats` runs last.

use std::time::Instant;

use parking_lot::Mutex;
use rayon::prelude::*;
use vouch_assert::{TestContext, TestingT};

use crate::context::T;
use crate::methods::{Lifecycle, Methods, Suite};
use crate::options::RunOptions;
use crate::stats::{SuiteInformation, SuiteSummary, TestResult};

/// Everything shared by the tests of one run.
struct Run<'a, S> {
    methods: &'a Methods<S>,
    lifecycle: Lifecycle,
    suite_name: String,
    stats: Mutex<SuiteInformation>,
    deadline: Option<Instant>,
}

/// Invoke the hook registered as `name`, if any, inside a failure
/// barrier. Returns `false` only if the hook stopped or panicked.
pub(crate) fn call_hook<S>(methods: &Methods<S>, suite: &mut S, t: &T, name: &str) -> bool {
    match methods.get(name) {
        Some(hook) => t.guard(name, || hook(suite, t)),
        None => true,
    }
}

impl<S: Suite> Run<'_, S> {
    fn run_test(&self, suite: &mut S, parent: &T, test_name: &str, parallel: bool) -> TestResult {
        let t = parent.test_child(test_name, parallel, self.deadline);
        self.stats.lock().start(test_name);
        tracing::debug!(test = %t.name(), "test started");

        suite.set_t(&t);
        let mut ok = call_hook(self.methods, suite, &t, "SetupTest");
        if ok {
            if let Some(before) = &self.methods.before_test {
                ok = t.guard("BeforeTest", || before(suite, &t, &self.suite_name, test_name));
            }
        }
        if ok {
            if let Some(test) = self.methods.get(test_name) {
                ok = t.guard("test", || test(suite, &t));
            }
        }
        if ok {
            if let Some(after) = &self.methods.after_test {
                ok = t.guard("AfterTest", || after(suite, &t, &self.suite_name, test_name));
            }
        }
        if !ok {
            tracing::debug!(test = %t.name(), "remaining hooks skipped");
        }
        if self.lifecycle.contains(Lifecycle::TEARDOWN_TEST) {
            call_hook(self.methods, suite, &t, "TearDownTest");
        }
        suite.set_t(parent);

        t.finish();
        self.stats.lock().end(test_name, !t.failed());
        parent.adopt(&t, test_name);
        let result = t.result(test_name);
        tracing::info!(test = %t.name(), outcome = ?result.outcome, "test finished");
        result
    }
}

/// Run the suite's tests one after another.
///
/// Each test gets its own context, a child of `t`. Returns the per-test
/// results; failures are also reported on `t`.
pub fn run<S: Suite>(t: &T, suite: &mut S, options: &RunOptions) -> SuiteSummary {
    run_with(t, suite, options, |run, t, suite, tests| {
        tests
            .iter()
            .map(|name| run.run_test(suite, t, name, false))
            .collect()
    })
}

/// Run the suite's tests concurrently, each on its own copy of the suite.
///
/// `SetupSuite`, `TearDownSuite` and `HandleStats` run once on `suite`.
/// Tests are filtered before the suite is copied.
pub fn run_parallel<S: Suite + Clone + Send>(
    t: &T,
    suite: &mut S,
    options: &RunOptions,
) -> SuiteSummary {
    run_with(t, suite, options, |run, t, suite, tests| {
        let mut jobs: Vec<(&str, S)> = tests
            .iter()
            .map(|name| (name.as_str(), suite.clone()))
            .collect();

        rayon::ThreadPoolBuilder::new()
            .stack_size(options.stack_size())
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| {
                    jobs.par_iter_mut()
                        .map(|(name, copy)| run.run_test(copy, t, name, true))
                        .collect::<Vec<_>>()
                })
            })
            .unwrap_or_else(|e| {
                tracing::warn!("failed to create thread pool ({e}), running sequentially");
                jobs.iter_mut()
                    .map(|(name, copy)| run.run_test(copy, t, name, true))
                    .collect()
            })
    })
}

fn run_with<S: Suite>(
    t: &T,
    suite: &mut S,
    options: &RunOptions,
    fan_out: impl FnOnce(&Run<'_, S>, &T, &mut S, &[String]) -> Vec<TestResult>,
) -> SuiteSummary {
    let start = Instant::now();
    let methods = Methods::<S>::of();
    let suite_name = S::name();
    let mut summary = SuiteSummary::new(&suite_name);

    if !methods.errors().is_empty() {
        for err in methods.errors() {
            t.error(&err.to_string());
        }
        summary.suite_hooks_failed = true;
        return summary;
    }

    let tests: Vec<String> = methods
        .tests()
        .filter(|name| options.admits(name))
        .map(str::to_owned)
        .collect();
    if tests.is_empty() {
        tracing::warn!(suite = %suite_name, "no tests to run");
        return summary;
    }
    tracing::info!(suite = %suite_name, tests = tests.len(), "suite started");

    let run = Run {
        methods: &methods,
        lifecycle: methods.lifecycle(),
        suite_name,
        stats: Mutex::new(SuiteInformation::new()),
        deadline: options.test_deadline(),
    };

    suite.set_t(t);
    let setup_ok = call_hook(&methods, suite, t, "SetupSuite");
    if setup_ok {
        for result in fan_out(&run, t, suite, &tests) {
            summary.add(result);
        }
    } else {
        tracing::debug!(suite = %run.suite_name, "SetupSuite failed, tests skipped");
        for name in &tests {
            summary.add(TestResult::skipped(name, "SetupSuite failed"));
        }
    }
    suite.set_t(t);
    let teardown_ok = call_hook(&methods, suite, t, "TearDownSuite");

    let Run {
        suite_name, stats, ..
    } = run;
    let mut stats = stats.into_inner();
    stats.end = Some(Instant::now());
    let stats_ok = match &methods.handle_stats {
        Some(handle) => t.guard("HandleStats", || handle(suite, t, &suite_name, &stats)),
        None => true,
    };

    summary.suite_hooks_failed = !(setup_ok && teardown_ok && stats_ok);
    summary.duration = start.elapsed();
    tracing::info!(
        suite = %suite_name,
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        "suite finished"
    );
    summary
}

/// Subtests of a suite test.
pub trait SuiteExt: Suite {
    /// Run `body` as a subtest of `t`, wrapped in the suite's
    /// `SetupSubTest`/`TearDownSubTest` hooks. Returns whether the
    /// subtest passed.
    fn subtest(&mut self, t: &T, name: &str, body: impl FnMut(&mut Self, &T)) -> bool;
}

impl<S: Suite> SuiteExt for S {
    fn subtest(&mut self, t: &T, name: &str, mut body: impl FnMut(&mut Self, &T)) -> bool {
        let methods = Methods::<S>::of();
        let passed = t.run(name, &mut |child: &T| {
            self.set_t(child);
            if call_hook(&methods, self, child, "SetupSubTest") {
                child.guard("subtest", || body(self, child));
            }
            call_hook(&methods, self, child, "TearDownSubTest");
        });
        self.set_t(t);
        passed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
