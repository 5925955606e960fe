//! Per-test timing and outcomes.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

/// Timing and verdict of one suite test, as handed to `HandleStats`.
#[derive(Clone, Debug)]
pub struct TestInformation {
    pub test_name: String,
    /// Taken before `SetupTest`.
    pub start: Instant,
    /// Taken after `TearDownTest`.
    pub end: Option<Instant>,
    pub passed: bool,
}

impl TestInformation {
    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end.duration_since(self.start))
    }
}

/// Aggregated statistics of one suite run.
#[derive(Clone, Debug)]
pub struct SuiteInformation {
    pub start: Instant,
    pub end: Option<Instant>,
    pub test_stats: FxHashMap<String, TestInformation>,
}

impl SuiteInformation {
    pub(crate) fn new() -> Self {
        SuiteInformation {
            start: Instant::now(),
            end: None,
            test_stats: FxHashMap::default(),
        }
    }

    pub(crate) fn start(&mut self, test_name: &str) {
        self.test_stats.insert(
            test_name.to_owned(),
            TestInformation {
                test_name: test_name.to_owned(),
                start: Instant::now(),
                end: None,
                passed: false,
            },
        );
    }

    pub(crate) fn end(&mut self, test_name: &str, passed: bool) {
        if let Some(stats) = self.test_stats.get_mut(test_name) {
            stats.end = Some(Instant::now());
            stats.passed = passed;
        }
    }

    /// Whether every recorded test passed.
    pub fn passed(&self) -> bool {
        self.test_stats.values().all(|s| s.passed)
    }
}

/// Outcome of a single test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    /// Failed with the reported diagnostics, one per line.
    Failed(String),
    /// Skipped with a reason.
    Skipped(String),
}

impl TestOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TestOutcome::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, TestOutcome::Skipped(_))
    }
}

/// Result of one test or subtest.
#[derive(Clone, Debug)]
pub struct TestResult {
    pub name: String,
    pub outcome: TestOutcome,
    pub duration: Duration,
    pub logs: Vec<String>,
    pub subtests: Vec<TestResult>,
}

impl TestResult {
    #[cold]
    pub(crate) fn skipped(name: &str, reason: impl Into<String>) -> Self {
        TestResult {
            name: name.to_owned(),
            outcome: TestOutcome::Skipped(reason.into()),
            duration: Duration::ZERO,
            logs: Vec::new(),
            subtests: Vec::new(),
        }
    }
}

/// Report of one suite run.
#[derive(Clone, Debug, Default)]
pub struct SuiteSummary {
    pub suite: String,
    /// Test results in run order (completion order in parallel mode).
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// A suite-level hook (`SetupSuite`, `TearDownSuite`, `HandleStats`)
    /// failed or panicked.
    pub suite_hooks_failed: bool,
    pub duration: Duration,
}

impl SuiteSummary {
    pub(crate) fn new(suite: &str) -> Self {
        SuiteSummary {
            suite: suite.to_owned(),
            ..SuiteSummary::default()
        }
    }

    pub(crate) fn add(&mut self, result: TestResult) {
        match &result.outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed(_) => self.failed += 1,
            TestOutcome::Skipped(_) => self.skipped += 1,
        }
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.suite_hooks_failed
    }

    pub fn result(&self, name: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.name == name)
    }
}
