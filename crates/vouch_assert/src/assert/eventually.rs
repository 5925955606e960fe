//! Polling assertions.
//!
//! The condition runs on a dedicated worker thread. The caller's thread
//! owns the clock: it requests one evaluation per tick over a channel and
//! waits on a `select!` over the deadline, the ticker and the worker's
//! results. At most one evaluation is in flight at a time.
//!
//! A condition that panics or stops its test kills the worker; the closed
//! result channel is reported as "Condition exited unexpectedly". The panic
//! itself is not caught, so its message still reaches the panic hook. A
//! condition that hangs past the deadline is left running.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, after, never as idle_channel, select, tick as ticker};

use super::collect::{CollectT, TickReport};
use super::report;
use crate::context::TestingT;
use crate::diagnostic::{Diagnostic, Message};

/// How a polling loop ended.
#[derive(Debug, PartialEq, Eq)]
enum Polled {
    /// `done` accepted a result.
    Satisfied,
    TimedOut,
    /// The worker died before reporting.
    Exited,
    /// The worker thread could not be spawned.
    Unavailable(String),
}

/// Evaluate `condition` immediately, then once per `tick`, until `done`
/// accepts a result or `wait_for` elapses.
fn poll<R, C, D>(wait_for: Duration, tick: Duration, mut condition: C, mut done: D) -> Polled
where
    R: Send + 'static,
    C: FnMut() -> R + Send + 'static,
    D: FnMut(R) -> bool,
{
    let (request_tx, request_rx) = channel::bounded::<()>(1);
    let (result_tx, result_rx) = channel::bounded::<R>(1);
    let spawned = thread::Builder::new()
        .name("vouch-eventually".to_owned())
        .spawn(move || {
            for () in request_rx {
                if result_tx.send(condition()).is_err() {
                    break;
                }
            }
        });
    if let Err(err) = spawned {
        return Polled::Unavailable(err.to_string());
    }

    let deadline = after(wait_for);
    let ticks = ticker(tick.max(Duration::from_millis(1)));
    let idle = idle_channel::<Instant>();
    let mut pending = request_tx.send(()).is_ok();
    loop {
        select! {
            recv(deadline) -> _ => return Polled::TimedOut,
            recv(if pending { &idle } else { &ticks }) -> _ => {
                pending = request_tx.send(()).is_ok();
            }
            recv(result_rx) -> result => match result {
                Ok(value) => {
                    pending = false;
                    if done(value) {
                        return Polled::Satisfied;
                    }
                }
                Err(_) => {
                    tracing::debug!("condition worker exited without a result");
                    return Polled::Exited;
                }
            },
        }
    }
}

#[track_caller]
fn report_abnormal(t: &(impl TestingT + ?Sized), polled: Polled, msg: Message) -> bool {
    let diag = match polled {
        Polled::Unavailable(err) => {
            Diagnostic::new(format!("Condition could not be evaluated: {err}"))
        }
        _ => Diagnostic::new("Condition exited unexpectedly"),
    };
    report(t, diag.with_message(&msg))
}

/// Asserts that `condition` returns `true` within `wait_for`, checking
/// every `tick`. The first check happens immediately.
#[track_caller]
pub fn eventually(
    t: &(impl TestingT + ?Sized),
    condition: impl FnMut() -> bool + Send + 'static,
    wait_for: Duration,
    tick: Duration,
    msg: impl Into<Message>,
) -> bool {
    match poll(wait_for, tick, condition, |ok| ok) {
        Polled::Satisfied => true,
        Polled::TimedOut => report(
            t,
            Diagnostic::new("Condition never satisfied").with_message(&msg.into()),
        ),
        abnormal => report_abnormal(t, abnormal, msg.into()),
    }
}

/// Asserts that `condition` does not return `true` within `wait_for`,
/// checking every `tick`.
#[track_caller]
pub fn never(
    t: &(impl TestingT + ?Sized),
    condition: impl FnMut() -> bool + Send + 'static,
    wait_for: Duration,
    tick: Duration,
    msg: impl Into<Message>,
) -> bool {
    match poll(wait_for, tick, condition, |ok| ok) {
        Polled::TimedOut => true,
        Polled::Satisfied => report(
            t,
            Diagnostic::new("Condition satisfied").with_message(&msg.into()),
        ),
        abnormal => report_abnormal(t, abnormal, msg.into()),
    }
}

/// Like [`eventually`], but the condition reports through a [`CollectT`].
/// A tick succeeds when it finishes without reporting anything. On timeout
/// the failures of the last completed tick are replayed on `t`.
#[track_caller]
pub fn eventually_with_t(
    t: &(impl TestingT + ?Sized),
    mut condition: impl FnMut(&CollectT) + Send + 'static,
    wait_for: Duration,
    tick: Duration,
    msg: impl Into<Message>,
) -> bool {
    let mut last = TickReport::default();
    let polled = poll(
        wait_for,
        tick,
        move || CollectT::run_tick(&mut condition),
        |outcome: TickReport| {
            let ok = !outcome.failed;
            last = outcome;
            ok
        },
    );
    match polled {
        Polled::Satisfied => true,
        Polled::TimedOut => {
            for error in &last.errors {
                t.error(error);
            }
            report(
                t,
                Diagnostic::new("Condition never satisfied").with_message(&msg.into()),
            )
        }
        abnormal => report_abnormal(t, abnormal, msg.into()),
    }
}
