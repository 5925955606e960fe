use std::panic;

use parking_lot::Mutex;

use crate::context::{FailNow, TestingT};

/// Collector context handed to an [`eventually_with_t`](super::eventually_with_t)
/// condition. It accumulates the failures of one tick; a fresh collector
/// is used for every tick.
#[derive(Debug, Default)]
pub struct CollectT {
    state: Mutex<CollectState>,
}

#[derive(Debug, Default)]
struct CollectState {
    errors: Vec<String>,
    failed: bool,
}

/// Unwind payload of [`CollectT::fail_now`]; ends the current tick only.
#[derive(Debug)]
pub(crate) struct CollectAborted;

/// Outcome of one tick.
#[derive(Debug, Default)]
pub(crate) struct TickReport {
    pub errors: Vec<String>,
    pub failed: bool,
}

impl CollectT {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything was reported during this tick.
    pub fn failed(&self) -> bool {
        let state = self.state.lock();
        state.failed || !state.errors.is_empty()
    }

    pub fn errors(&self) -> Vec<String> {
        self.state.lock().errors.clone()
    }

    /// Run `condition` against a fresh collector. A [`CollectT::fail_now`]
    /// inside the condition ends the tick; any other panic keeps unwinding.
    pub(crate) fn run_tick(condition: &mut (impl FnMut(&CollectT) + ?Sized)) -> TickReport {
        let collect = CollectT::new();
        if let Err(payload) = panic::catch_unwind(panic::AssertUnwindSafe(|| condition(&collect))) {
            if !payload.is::<CollectAborted>() {
                panic::resume_unwind(payload);
            }
        }
        let state = collect.state.into_inner();
        TickReport {
            failed: state.failed || !state.errors.is_empty(),
            errors: state.errors,
        }
    }
}

impl TestingT for CollectT {
    fn error(&self, message: &str) {
        self.state.lock().errors.push(message.to_owned());
    }
}

impl FailNow for CollectT {
    fn fail_now(&self) -> ! {
        self.state.lock().failed = true;
        panic::resume_unwind(Box::new(CollectAborted))
    }
}
