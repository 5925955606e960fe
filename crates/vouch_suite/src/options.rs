//! Run configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Environment variable holding a substring filter over test names.
pub const RUN_FILTER_ENV: &str = "VOUCH_RUN";

/// Worker stack size for parallel runs: 8 MiB, room for deep structural
/// comparisons in debug builds.
pub const DEFAULT_STACK_SIZE: usize = 8 * 1024 * 1024;

type Filter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Options for [`run`](crate::run) and [`run_parallel`](crate::run_parallel).
#[derive(Clone)]
pub struct RunOptions {
    filter: Option<Filter>,
    substring: Option<String>,
    ignore_filter: bool,
    parallel_stack_size: usize,
    deadline: Option<Instant>,
}

impl RunOptions {
    /// Admit every test.
    pub fn new() -> Self {
        RunOptions {
            filter: None,
            substring: None,
            ignore_filter: false,
            parallel_stack_size: DEFAULT_STACK_SIZE,
            deadline: None,
        }
    }

    /// Options with the substring filter from `VOUCH_RUN`, if set.
    pub fn from_env() -> Self {
        let options = Self::new();
        match std::env::var(RUN_FILTER_ENV) {
            Ok(pattern) if !pattern.is_empty() => options.filter_substring(pattern),
            _ => options,
        }
    }

    /// Admit only tests whose name satisfies `filter`.
    pub fn filter(mut self, filter: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Admit only tests whose name contains `pattern`.
    pub fn filter_substring(mut self, pattern: impl Into<String>) -> Self {
        self.substring = Some(pattern.into());
        self
    }

    /// Disable both filters.
    pub fn ignore_filter(mut self, ignore: bool) -> Self {
        self.ignore_filter = ignore;
        self
    }

    pub fn parallel_stack_size(mut self, bytes: usize) -> Self {
        self.parallel_stack_size = bytes;
        self
    }

    /// Deadline reported to every test through `TestContext::deadline`.
    pub fn deadline(mut self, at: Instant) -> Self {
        self.deadline = Some(at);
        self
    }

    /// Whether the test named `name` runs.
    pub fn admits(&self, name: &str) -> bool {
        if self.ignore_filter {
            return true;
        }
        let by_substring = self
            .substring
            .as_deref()
            .is_none_or(|pattern| name.contains(pattern));
        by_substring && self.filter.as_ref().is_none_or(|f| f(name))
    }

    pub(crate) fn stack_size(&self) -> usize {
        self.parallel_stack_size
    }

    pub(crate) fn test_deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .field("substring", &self.substring)
            .field("ignore_filter", &self.ignore_filter)
            .field("parallel_stack_size", &self.parallel_stack_size)
            .field("deadline", &self.deadline)
            .finish()
    }
}
