//! Fail-fast assertions.
//!
//! Each function reports exactly like its counterpart in
//! [`assert`](crate::assert) and then calls [`FailNow::fail_now`], so the
//! test stops at the first failed requirement.

use crate::context::FailNow;
use crate::diagnostic::Message;

catalogue!(require);

/// Fail-fast [`assert::error_as`](crate::assert::error_as).
#[track_caller]
pub fn error_as<E: std::error::Error + 'static>(
    t: &(impl FailNow + ?Sized),
    err: &(impl crate::MaybeError + ?Sized),
    msg: impl Into<Message>,
) {
    if !crate::assert::error_as::<E>(t, err, msg) {
        t.fail_now();
    }
}

/// Reports `failure` and stops the test.
#[track_caller]
pub fn fail_now(t: &(impl FailNow + ?Sized), failure: &str, msg: impl Into<Message>) -> ! {
    crate::assert::fail_now(t, failure, msg)
}
