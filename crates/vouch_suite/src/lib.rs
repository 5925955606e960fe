//! Suite runner for vouch.
//!
//! A suite is a value whose named methods are tests and lifecycle hooks
//! (see [`Methods`]). [`run`] executes the tests in order, [`run_parallel`]
//! runs each on its own copy of the suite. Every hook and test runs inside
//! a failure barrier: a panic fails that test, not the process.
//!
//! ```ignore
//! #[test]
//! fn accounts() {
//!     vouch_suite::run_suite(Accounts::default());
//! }
//! ```
//!
//! Set `VOUCH_RUN` to run only tests whose name contains its value, and
//! `RUST_LOG` (e.g. `RUST_LOG=vouch_suite=debug`) to trace the lifecycle.

mod context;
mod error;
mod methods;
mod options;
mod runner;
mod stats;

use std::sync::Once;

pub use context::T;
pub use error::SuiteError;
pub use methods::{classify, Lifecycle, MethodKind, Methods, Suite};
pub use options::{RunOptions, DEFAULT_STACK_SIZE, RUN_FILTER_ENV};
pub use runner::{run, run_parallel, SuiteExt};
pub use stats::{SuiteInformation, SuiteSummary, TestInformation, TestOutcome, TestResult};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Only installs a subscriber if `RUST_LOG`
/// is set; `VOUCH_LOG_TREE=1` switches to indented tree output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());
        let installed = if std::env::var_os("VOUCH_LOG_TREE").is_some() {
            registry
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_test_writer().with_target(true))
                .try_init()
        };
        if installed.is_err() {
            tracing::debug!("a tracing subscriber is already installed");
        }
    });
}

/// Run `suite` sequentially under a fresh root context, for use inside a
/// `#[test]` function. Filters come from `VOUCH_RUN`.
///
/// # Panics
/// If any test or suite hook failed, with every failure in the message.
pub fn run_suite<S: Suite>(mut suite: S) -> SuiteSummary {
    init_tracing();
    let t = T::new(S::name());
    let summary = run(&t, &mut suite, &RunOptions::from_env());
    finish_root(&t, &summary);
    summary
}

/// Like [`run_suite`], with each test on its own copy of the suite.
///
/// # Panics
/// If any test or suite hook failed.
pub fn run_suite_parallel<S: Suite + Clone + Send>(mut suite: S) -> SuiteSummary {
    init_tracing();
    let t = T::new(S::name());
    let summary = run_parallel(&t, &mut suite, &RunOptions::from_env());
    finish_root(&t, &summary);
    summary
}

fn finish_root(t: &T, summary: &SuiteSummary) {
    use vouch_assert::TestContext;

    t.finish();
    if t.failed() || summary.has_failures() {
        let err = SuiteError::Failed {
            suite: summary.suite.clone(),
            failed: summary.failed,
            report: render_failures(t),
        };
        panic!("{err}");
    }
}

fn render_failures(t: &T) -> String {
    let mut out = t.errors();
    for result in t.subtests() {
        collect_failures(&result, &mut Vec::new(), &mut out);
    }
    out.join("\n")
}

fn collect_failures(result: &TestResult, path: &mut Vec<String>, out: &mut Vec<String>) {
    path.push(result.name.clone());
    if let TestOutcome::Failed(message) = &result.outcome {
        if !message.is_empty() {
            out.push(format!("--- FAIL: {}\n{message}", path.join("/")));
        }
    }
    for sub in &result.subtests {
        collect_failures(sub, path, out);
    }
    path.pop();
}
