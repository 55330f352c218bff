//! Terminal geometry and cursor control.
//!
//! The renderer never talks to a real terminal directly. It asks a
//! [`TerminalWidth`] for the column count on every repaint and emits
//! crossterm commands into whatever `Write` sink it was given, so tests can
//! inject a fixed width and capture the bytes.

use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

use crossterm::{cursor, queue};

/// Width used when the terminal cannot be queried (pipes, CI).
pub const FALLBACK_WIDTH: u16 = 80;

// =============================================================================
// Terminal Width
// =============================================================================

/// Source of the current terminal width in columns.
pub trait TerminalWidth: Send + Sync {
    /// Current width. May change between calls.
    fn columns(&self) -> u16;
}

/// Queries the controlling terminal through crossterm.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermWidth;

impl TerminalWidth for CrosstermWidth {
    fn columns(&self) -> u16 {
        match crossterm::terminal::size() {
            Ok((width, _)) if width > 0 => width,
            _ => FALLBACK_WIDTH,
        }
    }
}

/// A constant width, for tests and non-interactive output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWidth(pub u16);

impl TerminalWidth for FixedWidth {
    fn columns(&self) -> u16 {
        self.0
    }
}

/// Clamp a reported width to the smallest width the layout handles.
#[inline]
pub fn clamp_width(columns: u16, min: u16) -> usize {
    usize::from(columns.max(min))
}

// =============================================================================
// Cursor
// =============================================================================

/// Move the cursor from the end of the previous block back to its header.
///
/// `previous_lines` is the number of event lines the previous repaint wrote;
/// one more line is climbed for the header. On the first repaint there is no
/// block yet, so the climb is undone by one line down.
pub fn rewind<W: Write>(out: &mut W, previous_lines: usize, first: bool) -> io::Result<()> {
    let up = u16::try_from(previous_lines + 1).unwrap_or(u16::MAX);
    queue!(out, cursor::MoveUp(up))?;
    if first {
        queue!(out, cursor::MoveDown(1))?;
    }
    queue!(out, cursor::MoveToColumn(0))
}

/// Scoped hidden cursor.
///
/// Hides the cursor on creation. [`finish`](Self::finish) shows it again and
/// flushes, reporting errors; if the scope is left any other way the cursor
/// is shown on drop.
pub struct HiddenCursor<'a, W: Write> {
    out: &'a mut W,
    shown: bool,
}

impl<'a, W: Write> HiddenCursor<'a, W> {
    pub fn hide(out: &'a mut W) -> io::Result<Self> {
        queue!(out, cursor::Hide)?;
        Ok(Self { out, shown: false })
    }

    /// Show the cursor and flush the sink.
    pub fn finish(mut self) -> io::Result<()> {
        self.shown = true;
        queue!(self.out, cursor::Show)?;
        self.out.flush()
    }
}

impl<W: Write> Deref for HiddenCursor<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        self.out
    }
}

impl<W: Write> DerefMut for HiddenCursor<'_, W> {
    fn deref_mut(&mut self) -> &mut W {
        self.out
    }
}

impl<W: Write> Drop for HiddenCursor<'_, W> {
    fn drop(&mut self) {
        if self.shown {
            return;
        }
        // Best effort: the sink may be the thing that failed
        let _ = queue!(self.out, cursor::Show);
        let _ = self.out.flush();
    }
}

// =============================================================================
// Tests
// =============================================================================
