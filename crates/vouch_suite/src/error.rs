/// Suite registration and run errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SuiteError {
    #[error("suite method `{name}` is registered more than once")]
    DuplicateMethod { name: String },

    /// A hook with extra arguments was registered through `Methods::add`.
    #[error("`{name}` takes extra arguments; register it with Methods::{registrar}")]
    ReservedName {
        name: String,
        registrar: &'static str,
    },

    /// Raised by `run_suite` when the run did not pass.
    #[error("suite {suite} failed: {failed} failing test(s)\n{report}")]
    Failed {
        suite: String,
        failed: usize,
        report: String,
    },
}
