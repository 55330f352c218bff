//! Cancellation tokens for the repaint loop.
//!
//! A [`CancellationToken`] is shared between whoever may abort the run and
//! the writer waiting in `start`. Cancelling drops the token's internal
//! sender, which disconnects its channel; the repaint loop selects on that
//! channel next to its ticker, so cancellation wakes it immediately.
//!
//! # Example
//!
//! ```
//! use spark_progress::{CancelCause, CancellationToken};
//!
//! let token = CancellationToken::new();
//! let handle = token.clone();
//! handle.cancel_with("interrupted");
//!
//! assert!(token.is_cancelled());
//! assert_eq!(token.cause(), Some(CancelCause::Reason("interrupted".into())));
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

use crate::error::CancelCause;

struct State {
    /// Dropped on cancel to disconnect `Inner::signal`.
    trigger: Option<Sender<()>>,
    cause: Option<CancelCause>,
}

struct Inner {
    state: Mutex<State>,
    signal: Receiver<()>,
    deadline: Option<Instant>,
}

/// Cloneable handle that signals cancellation to every clone.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    /// A token that only fires when cancelled explicitly.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A token that also fires once `deadline` passes.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::build(Some(deadline))
    }

    /// A token that also fires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    fn build(deadline: Option<Instant>) -> Self {
        let (trigger, signal) = crossbeam_channel::bounded(0);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    trigger: Some(trigger),
                    cause: None,
                }),
                signal,
                deadline,
            }),
        }
    }

    /// Cancel without a reason.
    pub fn cancel(&self) {
        self.fire(CancelCause::Cancelled);
    }

    /// Cancel with a reason reported to whoever awaits the writer.
    pub fn cancel_with(&self, reason: impl Into<String>) {
        self.fire(CancelCause::Reason(reason.into()));
    }

    /// Record `cause` and wake every waiter. The first cause wins.
    pub(crate) fn fire(&self, cause: CancelCause) {
        let mut state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.cause.is_none() {
            state.cause = Some(cause);
        }
        state.trigger.take();
    }

    /// Why the token fired, if it has.
    pub fn cause(&self) -> Option<CancelCause> {
        let state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cause) = &state.cause {
            return Some(cause.clone());
        }
        drop(state);

        if self.inner.deadline.is_some_and(|d| Instant::now() >= d) {
            self.fire(CancelCause::DeadlineExceeded);
            return self.cause();
        }
        None
    }

    pub fn is_cancelled(&self) -> bool {
        self.cause().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Channel that disconnects on cancellation, for use in `select!`.
    pub fn signal(&self) -> &Receiver<()> {
        &self.inner.signal
    }

    /// Channel that fires at the deadline, or never.
    pub fn deadline_signal(&self) -> Receiver<Instant> {
        match self.inner.deadline {
            Some(deadline) => crossbeam_channel::at(deadline),
            None => crossbeam_channel::never(),
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cause", &self.cause())
            .field("deadline", &self.inner.deadline)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
