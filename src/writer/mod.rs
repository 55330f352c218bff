//! Progress writers - where events end up.
//!
//! Two implementations share the [`Writer`] trait:
//!
//! - **TTY** ([`TtyWriter`]): keeps every event in an [`EventStore`] and
//!   redraws the whole block in place on a fixed interval.
//! - **Plain** ([`PlainWriter`]): prints one line per event as it arrives,
//!   for pipes and CI logs where cursor control would be garbage.
//!
//! Both follow the same lifecycle: producers call [`Writer::event`] from any
//! thread, one thread blocks in [`Writer::start`], and [`Writer::stop`] or a
//! cancelled [`CancellationToken`] makes `start` return.
//!
//! [`EventStore`]: crate::store::EventStore

pub mod plain;
pub mod tty;

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender};

use crate::cancel::CancellationToken;
use crate::config::{ProgressConfig, ProgressMode};
use crate::error::{CancelCause, Error, Result};
use crate::event::Event;

pub use plain::PlainWriter;
pub use tty::TtyWriter;

/// Common interface of the progress writers.
pub trait Writer: Send + Sync {
    /// Block until stopped or cancelled.
    ///
    /// Returns `Ok(())` after [`stop`](Writer::stop) and the cancellation
    /// cause when `cancel` fires. A writer runs once: calling `start` again
    /// after it returned gives [`Error::AlreadyStopped`].
    fn start(&self, cancel: &CancellationToken) -> Result<()>;

    /// Ask `start` to return. Calling it again is a no-op.
    fn stop(&self);

    /// Report an event. Callable from any thread at any time.
    fn event(&self, event: Event);
}

/// Build the writer selected by `config.mode`, writing to `out`.
///
/// Nothing is known about an arbitrary `out`, so [`ProgressMode::Auto`] gives
/// the plain writer here. [`stdout_writer`] resolves `Auto` against stdout.
pub fn new_writer(config: ProgressConfig, out: impl Write + Send + 'static) -> Arc<dyn Writer> {
    let writer: Arc<dyn Writer> = match config.mode {
        ProgressMode::Tty => Arc::new(TtyWriter::new(out, config)),
        ProgressMode::Plain | ProgressMode::Auto => Arc::new(PlainWriter::new(out)),
    };
    writer
}

/// Build the writer selected by `config.mode` on stdout, picking the TTY
/// writer for `Auto` when stdout is a terminal.
pub fn stdout_writer(config: ProgressConfig) -> Arc<dyn Writer> {
    let mode = config.mode.resolve();
    new_writer(config.with_mode(mode), std::io::stdout())
}

// =============================================================================
// Stop signal
// =============================================================================

/// One-shot stop request shared by the writers.
///
/// Also records whether `start` already ran, since a writer runs once.
pub(crate) struct StopSignal {
    requested: AtomicBool,
    claimed: AtomicBool,
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl StopSignal {
    pub(crate) fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(1);
        Self {
            requested: AtomicBool::new(false),
            claimed: AtomicBool::new(false),
            tx,
            rx,
        }
    }

    /// Post the stop request; only the first call does anything.
    pub(crate) fn request(&self) -> bool {
        if self.requested.swap(true, Ordering::AcqRel) {
            return false;
        }
        // Capacity 1 and a single send: cannot be full
        let _ = self.tx.try_send(());
        true
    }

    pub(crate) fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }

    /// Claim the single run of the writer.
    pub(crate) fn claim(&self) -> Result<()> {
        if self.claimed.swap(true, Ordering::AcqRel) {
            return Err(Error::AlreadyStopped);
        }
        Ok(())
    }
}

/// The error `start` returns once `cancel` fired.
pub(crate) fn cancelled(cancel: &CancellationToken) -> Error {
    Error::Cancelled(cancel.cause().unwrap_or(CancelCause::Cancelled))
}
