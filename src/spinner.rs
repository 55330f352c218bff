//! Spinner animation for running events.
//!
//! Each tracked event owns one [`Spinner`]. The repaint loop calls
//! [`Spinner::next`] once per frame; after [`Spinner::stop`] the spinner is
//! frozen on its done glyph so repaints of a finished line are stable.
//!
//! State lives in atomics so a repaint can advance every spinner while only
//! holding the store's read lock.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[cfg(not(windows))]
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
#[cfg(not(windows))]
const DONE: &str = "⠿";

#[cfg(windows)]
const FRAMES: &[&str] = &["-", "\\", "|", "/"];
#[cfg(windows)]
const DONE: &str = "-";

/// Per-event animation cursor.
#[derive(Debug, Default)]
pub struct Spinner {
    index: AtomicUsize,
    stopped: AtomicBool,
}

impl Spinner {
    /// Create a spinner positioned on its first frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame and return it.
    ///
    /// Returns the done glyph, without advancing, once stopped.
    pub fn next(&self) -> &'static str {
        if self.is_stopped() {
            return DONE;
        }
        let i = self.index.fetch_add(1, Ordering::Relaxed);
        FRAMES[(i + 1) % FRAMES.len()]
    }

    /// Current glyph without advancing.
    pub fn current(&self) -> &'static str {
        if self.is_stopped() {
            DONE
        } else {
            FRAMES[self.index.load(Ordering::Relaxed) % FRAMES.len()]
        }
    }

    /// Freeze the spinner on its done glyph.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

// =============================================================================
// Tests
// =============================================================================
