//! Simulation-wide cancellation.
//!
//! A [`StopSignal`] is raised once, by an external controller or by the
//! ferry when the trip limit is reached, and observed by every actor:
//!
//! - actors sleeping through a simulated delay use [`StopSignal::sleep`],
//!   which returns early when the signal is raised;
//! - actors blocked on another primitive's condition variable are woken
//!   through that primitive's [`StopListener`] implementation and re-check
//!   [`StopSignal::is_raised`] under the primitive's own lock.
//!
//! The flag is set *before* listeners are notified, and each listener
//! notifies while holding its own mutex, so a waiter that saw the flag clear
//! under that mutex is guaranteed to be parked when the wake-up arrives.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, Weak};
use std::time::{Duration, Instant};

use crate::lock;

/// Why the run was stopped early.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopCause {
    /// Raised from outside the core (CLI quit command, a test, …).
    External,
    /// The configured departure limit was reached.
    TripLimit,
    /// An actor thread panicked or could not be spawned.
    ActorFailed,
}

/// A primitive with waiters that must be woken when the stop signal rises.
pub trait StopListener: Send + Sync {
    /// Wake every waiter so it re-checks the stop flag.  Implementations must
    /// notify while holding the mutex their waiters block on.
    fn wake_all(&self);
}

/// Outcome of an interruptible sleep.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Sleep {
    /// The full duration elapsed.
    Completed,
    /// The stop signal was raised first.
    Interrupted,
}

struct StopInner {
    raised:    AtomicBool,
    cause:     Mutex<Option<StopCause>>,
    sleepers:  Condvar,
    listeners: Mutex<Vec<Weak<dyn StopListener>>>,
}

/// Cloneable handle to the run's cancellation flag.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<StopInner>,
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StopInner {
                raised:    AtomicBool::new(false),
                cause:     Mutex::new(None),
                sleepers:  Condvar::new(),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Register a primitive to be woken when the signal rises.
    ///
    /// Only a weak reference is kept; dropped primitives are skipped.
    pub fn register(&self, listener: &Arc<dyn StopListener>) {
        lock(&self.inner.listeners).push(Arc::downgrade(listener));
    }

    /// Raise the signal.  Returns `true` for the call that actually raised it;
    /// later calls keep the first cause.
    pub fn raise(&self, cause: StopCause) -> bool {
        {
            let mut first = lock(&self.inner.cause);
            if first.is_some() {
                return false;
            }
            *first = Some(cause);
            self.inner.raised.store(true, Ordering::SeqCst);
            self.inner.sleepers.notify_all();
        }

        let listeners: Vec<Arc<dyn StopListener>> = lock(&self.inner.listeners)
            .iter()
            .filter_map(Weak::upgrade)
            .collect();
        for listener in listeners {
            listener.wake_all();
        }
        tracing::debug!(?cause, "stop signal raised");
        true
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.inner.raised.load(Ordering::SeqCst)
    }

    /// The cause of the first `raise`, if any.
    pub fn cause(&self) -> Option<StopCause> {
        *lock(&self.inner.cause)
    }

    /// Sleep for `duration` unless the signal rises first.
    pub fn sleep(&self, duration: Duration) -> Sleep {
        let deadline = Instant::now() + duration;
        let mut guard = lock(&self.inner.cause);
        loop {
            if guard.is_some() {
                return Sleep::Interrupted;
            }
            let now = Instant::now();
            if now >= deadline {
                return Sleep::Completed;
            }
            guard = match self.inner.sleepers.wait_timeout(guard, deadline - now) {
                Ok((g, _)) => g,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }
}
