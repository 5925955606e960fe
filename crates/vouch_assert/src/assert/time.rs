use std::fmt::Debug;
use std::time::{Duration, Instant, SystemTime};

use super::report;
use crate::context::TestingT;
use crate::diagnostic::{Diagnostic, Message};

/// A point in time that [`within_duration`] can measure distances between.
pub trait Moment: Copy + Debug {
    /// Absolute distance between two moments.
    fn distance(self, other: Self) -> Duration;
}

impl Moment for Instant {
    fn distance(self, other: Self) -> Duration {
        if self >= other {
            self - other
        } else {
            other - self
        }
    }
}

impl Moment for SystemTime {
    fn distance(self, other: Self) -> Duration {
        self.duration_since(other)
            .unwrap_or_else(|earlier| earlier.duration())
    }
}

/// Asserts `|expected - actual| <= delta`.
#[track_caller]
pub fn within_duration<M: Moment>(
    t: &(impl TestingT + ?Sized),
    expected: M,
    actual: M,
    delta: Duration,
    msg: impl Into<Message>,
) -> bool {
    let dt = expected.distance(actual);
    if dt <= delta {
        return true;
    }
    report(
        t,
        Diagnostic::new(format!(
            "Max difference between {expected:?} and {actual:?} allowed is {delta:?}, but difference was {dt:?}"
        ))
        .with_message(&msg.into()),
    )
}
