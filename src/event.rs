//! Progress events - the unit of work producers report.
//!
//! An [`Event`] names one tracked operation by `id` and carries its current
//! status and text. Producers send a fresh `Event` every time something
//! changes; the writer merges it with what it already knows about that id.
//!
//! # Example
//!
//! ```
//! use spark_progress::{Event, EventStatus};
//!
//! let e = Event::started("web");
//! assert_eq!(e.status, EventStatus::Done);
//! assert_eq!(e.text, "Started");
//! ```

// =============================================================================
// EventStatus
// =============================================================================

/// Status of a tracked operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventStatus {
    /// Still running. The spinner animates and the timer keeps counting.
    #[default]
    Working,
    /// Finished successfully.
    Done,
    /// Finished with an error.
    Error,
}

impl EventStatus {
    /// `Done` and `Error` are terminal: the timer freezes once either is seen.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

// =============================================================================
// Event
// =============================================================================

/// One state update for a tracked operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Event {
    /// Stable identifier, assigned by the producer.
    pub id: String,
    /// Human-readable description.
    pub text: String,
    /// Current status.
    pub status: EventStatus,
    /// Free-form trailing annotation.
    pub status_text: String,
}

impl Event {
    /// Create an event with an empty status text.
    pub fn new(id: impl Into<String>, status: EventStatus, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            status,
            status_text: String::new(),
        }
    }

    /// Set the trailing status text.
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// A `Working` event.
    pub fn working(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, EventStatus::Working, text)
    }

    /// A `Done` event.
    pub fn done(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, EventStatus::Done, text)
    }

    /// An `Error` event.
    pub fn error(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, EventStatus::Error, text)
    }

    // -------------------------------------------------------------------------
    // Lifecycle helpers
    // -------------------------------------------------------------------------

    pub fn creating(id: impl Into<String>) -> Self {
        Self::working(id, "Creating")
    }

    pub fn created(id: impl Into<String>) -> Self {
        Self::done(id, "Created")
    }

    pub fn starting(id: impl Into<String>) -> Self {
        Self::working(id, "Starting")
    }

    pub fn started(id: impl Into<String>) -> Self {
        Self::done(id, "Started")
    }

    pub fn stopping(id: impl Into<String>) -> Self {
        Self::working(id, "Stopping")
    }

    pub fn stopped(id: impl Into<String>) -> Self {
        Self::done(id, "Stopped")
    }

    pub fn removing(id: impl Into<String>) -> Self {
        Self::working(id, "Removing")
    }

    pub fn removed(id: impl Into<String>) -> Self {
        Self::done(id, "Removed")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!EventStatus::Working.is_terminal());
        assert!(EventStatus::Done.is_terminal());
        assert!(EventStatus::Error.is_terminal());
        assert_eq!(EventStatus::default(), EventStatus::Working);
    }

    #[test]
    fn test_builder() {
        let e = Event::error("db", "Pulling").with_status_text("timeout");
        assert_eq!(e.id, "db");
        assert_eq!(e.text, "Pulling");
        assert_eq!(e.status, EventStatus::Error);
        assert_eq!(e.status_text, "timeout");
    }

    #[test]
    fn test_lifecycle_pairs() {
        let pairs = [
            (Event::creating("x"), Event::created("x")),
            (Event::starting("x"), Event::started("x")),
            (Event::stopping("x"), Event::stopped("x")),
            (Event::removing("x"), Event::removed("x")),
        ];
        for (begin, end) in pairs {
            assert_eq!(begin.status, EventStatus::Working);
            assert_eq!(end.status, EventStatus::Done);
            assert!(begin.status_text.is_empty());
        }
    }
}
