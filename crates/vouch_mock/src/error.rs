use vouch_value::MatchError;

/// Misuse of a mock, or a call the mock was not told to expect.
///
/// These stop the test: through the attached context when there is one,
/// otherwise by panicking with the rendered error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    /// No expectation names the method.
    #[error(
        "mock: unexpected call to {call}\n\n\
         no expectation is registered for {method}; register one with on(\"{method}\", ...)"
    )]
    UnknownMethod { method: String, call: String },

    /// Expectations name the method but none accepts the arguments.
    #[error(
        "mock: unexpected call to {call}\n\n\
         the closest call registered is\n\n\t{closest}\n\n{diff}"
    )]
    NoMatch {
        call: String,
        closest: String,
        diff: String,
    },

    /// The matching expectation has used up its call budget.
    #[error(
        "mock: unexpected call to {call}\n\n\
         the method has been called over {times} time(s)"
    )]
    Exhausted { call: String, times: usize },

    /// An ordering constraint registered with `not_before` is unmet.
    #[error("mock: unexpected call to {call}\n\nit must be preceded by {required}")]
    OutOfOrder { call: String, required: String },

    #[error("mock: invalid matcher for {call}: {source}")]
    Matcher {
        call: String,
        #[source]
        source: MatchError,
    },

    /// A raw callable was passed where a matcher belongs.
    #[error(
        "mock: cannot use a func in expectations for {method}; \
         use matched_by or any_of_type instead"
    )]
    RawCallable { method: String },

    #[error("mock: {func} returns {expected} value(s), but {given} were registered")]
    ReturnArity {
        func: String,
        expected: usize,
        given: usize,
    },

    /// A handle whose expectation was removed with `unset`.
    #[error("mock: expectation for {method} was already unset")]
    Unset { method: String },

    #[error("mock: not_before requires expectations from the same mock")]
    ForeignHandle,
}
