//! TTY writer - redraws the progress block in place.
//!
//! Unlike [`PlainWriter`](super::PlainWriter), the TTY writer never scrolls:
//! every repaint climbs back over the block it wrote last time and writes the
//! whole block again.
//!
//! # Repaint
//!
//! 1. Skip entirely while no event is known
//! 2. Climb `previous lines + 1` rows (the header), to column 0
//! 3. Hide the cursor until the frame is written
//! 4. Header `[+] Running <done>/<previous lines>`
//! 5. One line per event, in first-seen order, sharing one padding width
//! 6. Remember how many lines were written
//!
//! The frame is rendered to strings under the store's read lock and written
//! after the lock is released, so producers never wait on terminal I/O.

use std::io::{self, BufWriter, Write};
use std::sync::{Mutex, TryLockError};
use std::time::Instant;

use crossbeam_channel::select;
use tracing::{debug, trace, warn};

use super::{StopSignal, Writer, cancelled};
use crate::cancel::CancellationToken;
use crate::config::ProgressConfig;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::layout::{header_text, line_text, status_padding};
use crate::store::EventStore;
use crate::terminal::{CrosstermWidth, HiddenCursor, TerminalWidth, clamp_width, rewind};

/// State only the repaint loop touches.
struct PaintState {
    out: BufWriter<Box<dyn Write + Send>>,
    /// Event lines written by the previous repaint.
    num_lines: usize,
    /// Whether a repaint already happened.
    repeated: bool,
}

/// One rendered frame.
struct Frame {
    /// Width the lines were laid out for.
    width: usize,
    header: String,
    lines: Vec<String>,
}

/// In-place multi-line progress writer.
pub struct TtyWriter {
    store: EventStore,
    paint: Mutex<PaintState>,
    width: Box<dyn TerminalWidth>,
    config: ProgressConfig,
    stop: StopSignal,
}

impl TtyWriter {
    /// Create a writer on `out`, sized by the controlling terminal.
    pub fn new(out: impl Write + Send + 'static, config: ProgressConfig) -> Self {
        Self {
            store: EventStore::new(),
            paint: Mutex::new(PaintState {
                out: BufWriter::new(Box::new(out)),
                num_lines: 0,
                repeated: false,
            }),
            width: Box::new(CrosstermWidth),
            config,
            stop: StopSignal::new(),
        }
    }

    /// Create a writer on stdout.
    pub fn stdout(config: ProgressConfig) -> Self {
        Self::new(io::stdout(), config)
    }

    /// Replace the terminal width source.
    pub fn with_width(mut self, width: impl TerminalWidth + 'static) -> Self {
        self.width = Box::new(width);
        self
    }

    /// The events recorded so far.
    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Render the current snapshot, or `None` when nothing is known yet.
    fn frame(&self, previous_lines: usize, now: Instant) -> Option<Frame> {
        let width = clamp_width(self.width.columns(), self.config.min_width);
        let color = self.config.color;

        self.store.read(|snapshot| {
            if snapshot.is_empty() {
                return None;
            }
            let header = header_text(snapshot.num_done(), previous_lines, color);
            let padding = status_padding(snapshot.iter());
            let lines = snapshot
                .iter()
                .map(|tracked| {
                    line_text(tracked, tracked.spinner.next(), width, padding, now, color)
                })
                .collect();
            Some(Frame {
                width,
                header,
                lines,
            })
        })
    }

    /// One full repaint.
    fn print(&self, state: &mut PaintState) -> io::Result<()> {
        let Some(frame) = self.frame(state.num_lines, Instant::now()) else {
            return Ok(());
        };

        rewind(&mut state.out, state.num_lines, !state.repeated)?;
        state.repeated = true;

        let mut out = HiddenCursor::hide(&mut state.out)?;
        out.write_all(frame.header.as_bytes())?;
        for line in &frame.lines {
            out.write_all(line.as_bytes())?;
        }
        out.finish()?;

        trace!(lines = frame.lines.len(), width = frame.width, "progress repaint");
        state.num_lines = frame.lines.len();
        Ok(())
    }

    /// Repaint, turning a sink failure into the error `start` returns.
    ///
    /// Bytes the sink refused are discarded so they are not retried when the
    /// writer is dropped.
    fn repaint(&self, state: &mut PaintState) -> Result<()> {
        self.print(state).map_err(|err| {
            warn!(error = %err, "progress output failed, stopping renderer");
            discard_pending(&mut state.out);
            Error::Io(err)
        })
    }
}

/// Drop whatever is still buffered for `out`, keeping the sink itself.
fn discard_pending(out: &mut BufWriter<Box<dyn Write + Send>>) {
    let placeholder: Box<dyn Write + Send> = Box::new(io::sink());
    let stale = std::mem::replace(out, BufWriter::new(placeholder));
    let (sink, _unwritten) = stale.into_parts();
    *out = BufWriter::new(sink);
}

impl Writer for TtyWriter {
    fn start(&self, cancel: &CancellationToken) -> Result<()> {
        let mut state = match self.paint.try_lock() {
            Ok(state) => state,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(Error::AlreadyRunning),
        };
        self.stop.claim()?;

        let ticker = crossbeam_channel::tick(self.config.tick_interval);
        let deadline = cancel.deadline_signal();
        debug!(
            interval_ms = self.config.tick_interval.as_millis() as u64,
            "progress renderer started"
        );

        loop {
            select! {
                recv(cancel.signal()) -> _ => {
                    self.repaint(&mut state)?;
                    let err = cancelled(cancel);
                    debug!(cause = %err, "progress renderer cancelled");
                    return Err(err);
                }
                recv(deadline) -> _ => {
                    self.repaint(&mut state)?;
                    let err = cancelled(cancel);
                    debug!(cause = %err, "progress renderer cancelled");
                    return Err(err);
                }
                recv(self.stop.receiver()) -> _ => {
                    self.repaint(&mut state)?;
                    // Cancelled before the stop was seen: report the cause
                    if cancel.is_cancelled() {
                        return Err(cancelled(cancel));
                    }
                    debug!(lines = state.num_lines, "progress renderer stopped");
                    return Ok(());
                }
                recv(ticker) -> _ => self.repaint(&mut state)?,
            }
        }
    }

    fn stop(&self) {
        if !self.stop.request() {
            debug!("progress renderer already asked to stop");
        }
    }

    fn event(&self, event: Event) {
        self.store.record(event);
    }
}

// =============================================================================
// Tests
// =============================================================================
