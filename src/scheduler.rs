//! One-shot deferred execution.
//!
//! The dispatcher hands delayed work (the host restart) to a
//! [`DeferredRunner`]; this module provides the thread-backed runner used
//! in production.
//!
//! ```text
//! ┌──────────────┐  schedule_once   ┌───────────────────────┐
//! │  Dispatcher  │ ───────────────▶ │    ThreadScheduler    │
//! │  (returns    │                  │  spawn "deferred-…"   │
//! │   at once)   │                  │  sleep(delay)         │
//! └──────────────┘                  │  action()  ── once ── │
//!                                   └───────────────────────┘
//! ```
//!
//! Each submission gets its own thread, so a pending restart never delays
//! instruction handling.  There is no cancellation: once scheduled, the
//! action runs.  Before the process exits, [`ThreadScheduler::wait_idle`]
//! joins every timer thread so an accepted action is never dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{error, info, warn};

use crate::app::ports::{DeferredAction, DeferredRunner};
use crate::error::ScheduleError;

/// Runs each deferred action on a dedicated thread.
#[derive(Debug, Default, Clone)]
pub struct ThreadScheduler {
    /// Actions scheduled but not yet run.
    pending: Arc<AtomicUsize>,
    timers: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions still waiting for their delay to elapse.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Block until every scheduled action has run.  Returns how many timer
    /// threads were joined.
    pub fn wait_idle(&self) -> usize {
        let timers: Vec<_> = self
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        let joined = timers.len();
        for timer in timers {
            if timer.join().is_err() {
                warn!("Scheduler: a deferred action panicked");
            }
        }
        joined
    }
}

impl DeferredRunner for ThreadScheduler {
    fn schedule_once(
        &self,
        label: &'static str,
        delay: Duration,
        action: DeferredAction,
    ) -> Result<(), ScheduleError> {
        let pending = Arc::clone(&self.pending);
        pending.fetch_add(1, Ordering::AcqRel);

        let spawned = thread::Builder::new()
            .name(format!("deferred-{label}"))
            .spawn({
                let pending = Arc::clone(&pending);
                move || {
                    thread::sleep(delay);
                    info!("Scheduler: '{}' fired after {:?}", label, delay);
                    pending.fetch_sub(1, Ordering::AcqRel);
                    action();
                }
            });

        match spawned {
            Ok(timer) => {
                let mut timers = self.timers.lock().unwrap_or_else(PoisonError::into_inner);
                timers.retain(|t| !t.is_finished());
                timers.push(timer);
                info!("Scheduler: '{}' scheduled in {:?}", label, delay);
                Ok(())
            }
            Err(e) => {
                pending.fetch_sub(1, Ordering::AcqRel);
                error!("Scheduler: '{}' could not start timer thread: {}", label, e);
                Err(ScheduleError::SpawnFailed)
            }
        }
    }
}
