//! Line layout for the progress block.
//!
//! Pure functions: given one tracked event, the terminal width and the shared
//! padding width, produce the exact text of its line. All widths are display
//! widths, so wide glyphs and the braille spinner do not skew the columns.
//!
//! A rendered event line looks like
//!
//! ```text
//!  ⠹ web Pulling      layer 3/5                                1.2s
//!  ⠿ database Started ready                                    0.4s
//! ```

use std::time::{Duration, Instant};

use crossterm::style::{Color, Stylize, style};
use unicode_width::UnicodeWidthStr;

use crate::event::EventStatus;
use crate::store::TrackedEvent;

// =============================================================================
// Text measurement
// =============================================================================

/// Display width of a string in terminal columns.
#[inline]
pub fn string_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Width of the `id text` part of a line.
#[inline]
fn label_width(id: &str, text: &str) -> usize {
    string_width(id) + 1 + string_width(text)
}

/// Shared padding width: the widest `id text` among all events.
pub fn status_padding<'a>(events: impl IntoIterator<Item = &'a TrackedEvent>) -> usize {
    events
        .into_iter()
        .map(|t| label_width(&t.event.id, &t.event.text))
        .max()
        .unwrap_or(0)
}

// =============================================================================
// Colors
// =============================================================================

/// Foreground color for a line in the given status.
pub fn status_color(status: EventStatus) -> Color {
    match status {
        EventStatus::Working => Color::White,
        EventStatus::Done => Color::Blue,
        EventStatus::Error => Color::Red,
    }
}

fn paint(text: String, color: Color, enabled: bool) -> String {
    if enabled {
        style(text).with(color).to_string()
    } else {
        text
    }
}

// =============================================================================
// Lines
// =============================================================================

/// Elapsed time as seconds with one decimal, e.g. `3.4s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1}s", elapsed.as_secs_f64())
}

/// Join `left` and `right` so `right` ends at column `width`.
///
/// When `left` is too wide the two are joined by a single space; the line is
/// never truncated and may wrap.
pub fn align(left: &str, right: &str, width: usize) -> String {
    let target = width.saturating_sub(string_width(right) + 1);
    let fill = target.saturating_sub(string_width(left));
    format!("{left}{:fill$} {right}", "")
}

/// Header line, `[+] Running <done>/<total>`, blue once everything is done.
pub fn header_text(done: usize, total: usize, color: bool) -> String {
    let header = format!("[+] Running {done}/{total}");
    let complete = total != 0 && done == total;
    let header = if complete {
        paint(header, Color::Blue, color)
    } else {
        header
    };
    header + "\n"
}

/// One event line, newline-terminated.
///
/// `spinner` is the glyph for this frame; the caller advances the spinner so
/// this stays a pure function of its inputs.
pub fn line_text(
    tracked: &TrackedEvent,
    spinner: &str,
    width: usize,
    padding: usize,
    now: Instant,
    color: bool,
) -> String {
    let event = &tracked.event;
    let pad = padding.saturating_sub(label_width(&event.id, &event.text));

    let left = format!(
        " {spinner} {} {}{:pad$} {}",
        event.id, event.text, "", event.status_text
    );
    let timer = format_elapsed(tracked.elapsed(now));
    let line = align(&left, &timer, width);

    paint(line, status_color(event.status), color) + "\n"
}

// =============================================================================
// Tests
// =============================================================================
