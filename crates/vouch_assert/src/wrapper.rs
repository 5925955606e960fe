use crate::context::{FailNow, TestingT};
use crate::diagnostic::Message;

/// Assertions bound to one test context.
///
/// ```ignore
/// let check = Assertions::new(t);
/// check.equal(42, answer(), ());
/// check.contains(&names, "alice", "alice registered");
/// ```
pub struct Assertions<'t, T: ?Sized> {
    t: &'t T,
}

impl<'t, T: TestingT + ?Sized> Assertions<'t, T> {
    pub fn new(t: &'t T) -> Self {
        Assertions { t }
    }

    /// Fail-fast view over the same context.
    pub fn require(&self) -> Requirements<'t, T>
    where
        T: FailNow,
    {
        Requirements { t: self.t }
    }

    catalogue!(assertions);

    /// See [`assert::error_as`](crate::assert::error_as).
    #[track_caller]
    pub fn error_as<E: std::error::Error + 'static>(
        &self,
        err: &(impl crate::MaybeError + ?Sized),
        msg: impl Into<Message>,
    ) -> bool {
        crate::assert::error_as::<E>(self.t, err, msg)
    }
}

/// Fail-fast assertions bound to one test context.
pub struct Requirements<'t, T: ?Sized> {
    t: &'t T,
}

impl<'t, T: FailNow + ?Sized> Requirements<'t, T> {
    pub fn new(t: &'t T) -> Self {
        Requirements { t }
    }

    catalogue!(requirements);

    /// See [`require::error_as`](crate::require::error_as).
    #[track_caller]
    pub fn error_as<E: std::error::Error + 'static>(
        &self,
        err: &(impl crate::MaybeError + ?Sized),
        msg: impl Into<Message>,
    ) {
        crate::require::error_as::<E>(self.t, err, msg);
    }

    #[track_caller]
    pub fn fail_now(&self, failure: &str, msg: impl Into<Message>) -> ! {
        crate::require::fail_now(self.t, failure, msg)
    }
}
