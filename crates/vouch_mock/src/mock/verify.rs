//! Assertions over what a mock received.

use vouch_assert::{report, Diagnostic, Message, TestingT};
use vouch_value::Matcher;

use super::{render_call, Mock};
use crate::arguments::diff_args;

impl Mock {
    /// Asserts that every mandatory expectation was called, and that every
    /// bounded one used its whole call budget. Optional expectations are
    /// exempt.
    #[track_caller]
    pub fn assert_expectations(&self, t: &(impl TestingT + ?Sized)) -> bool {
        let state = self.state.lock();
        let total = state.expected.len();
        let mut unmet = Vec::new();
        for e in &state.expected {
            match e.unmet_reason() {
                Some(reason) => unmet.push(format!(
                    "{} registered at {}: {reason}",
                    e.signature(),
                    e.location
                )),
                None => tracing::debug!(expectation = %e.signature(), "expectation met"),
            }
        }
        drop(state);
        if unmet.is_empty() {
            return true;
        }
        report(
            t,
            Diagnostic::new(format!(
                "{} out of {total} expectation(s) were met",
                total - unmet.len()
            ))
            .with_label("Unmet", unmet.join("\n")),
        )
    }

    /// Asserts that `method` was called with arguments accepted by `args`.
    #[track_caller]
    pub fn assert_called(
        &self,
        t: &(impl TestingT + ?Sized),
        method: &str,
        args: Vec<Matcher>,
        msg: impl Into<Message>,
    ) -> bool {
        if self.was_called_with(method, &args) {
            return true;
        }
        report(
            t,
            Diagnostic::new("Should have called with given arguments")
                .with_label("Expected", expected_call(method, &args))
                .with_label("Actual", self.calls_to(method))
                .with_message(&msg.into()),
        )
    }

    /// Asserts that `method` was never called with arguments accepted by
    /// `args`.
    #[track_caller]
    pub fn assert_not_called(
        &self,
        t: &(impl TestingT + ?Sized),
        method: &str,
        args: Vec<Matcher>,
        msg: impl Into<Message>,
    ) -> bool {
        if !self.was_called_with(method, &args) {
            return true;
        }
        report(
            t,
            Diagnostic::new("Should not have called with given arguments")
                .with_label("Expected", expected_call(method, &args))
                .with_label("Actual", self.calls_to(method))
                .with_message(&msg.into()),
        )
    }

    /// Asserts that `method` was called exactly `expected` times, whatever
    /// the arguments.
    #[track_caller]
    pub fn assert_number_of_calls(
        &self,
        t: &(impl TestingT + ?Sized),
        method: &str,
        expected: usize,
        msg: impl Into<Message>,
    ) -> bool {
        let actual = self
            .state
            .lock()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .count();
        if actual == expected {
            return true;
        }
        report(
            t,
            Diagnostic::new(format!(
                "Expected number of calls ({expected}) does not match the actual number of calls ({actual})."
            ))
            .with_message(&msg.into()),
        )
    }

    fn was_called_with(&self, method: &str, args: &[Matcher]) -> bool {
        self.state.lock().calls.iter().any(|c| {
            c.method == method
                && diff_args(args, &c.arguments).is_ok_and(|(_, differences)| differences == 0)
        })
    }

    fn calls_to(&self, method: &str) -> String {
        let state = self.state.lock();
        let calls: Vec<String> = state
            .calls
            .iter()
            .filter(|c| c.method == method)
            .map(|c| render_call(&c.method, &c.arguments))
            .collect();
        if calls.is_empty() {
            "<no calls>".to_owned()
        } else {
            calls.join("\n")
        }
    }
}

fn expected_call(method: &str, args: &[Matcher]) -> String {
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    format!("{method}({})", args.join(", "))
}

/// Runs [`Mock::assert_expectations`] on every mock, reporting each one
/// that fails.
#[track_caller]
pub fn assert_expectations_for_objects(t: &(impl TestingT + ?Sized), mocks: &[&Mock]) -> bool {
    let mut ok = true;
    for mock in mocks {
        ok &= mock.assert_expectations(t);
    }
    ok
}
