//! Event store - the only state shared between producers and the renderer.
//!
//! Holds one [`TrackedEvent`] per id plus the order ids were first seen in,
//! both behind a single `RwLock`. Producers take the write lock for one full
//! update; the renderer takes the read lock once per repaint, so every line
//! of a frame comes from the same snapshot.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::event::{Event, EventStatus};
use crate::spinner::Spinner;

// =============================================================================
// TrackedEvent
// =============================================================================

/// An event together with the timing and animation state the store owns.
#[derive(Debug)]
pub struct TrackedEvent {
    /// Latest fields reported by the producer.
    pub event: Event,
    /// First time this id was seen. Never overwritten.
    pub start: Instant,
    /// First time this id reached `Done` or `Error`. Set at most once.
    pub end: Option<Instant>,
    /// Animation cursor, stopped together with `end`.
    pub spinner: Spinner,
}

impl TrackedEvent {
    fn new(event: Event, now: Instant) -> Self {
        Self {
            event,
            start: now,
            end: None,
            spinner: Spinner::new(),
        }
    }

    /// Time spent so far, frozen once the event finished.
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.end.unwrap_or(now).saturating_duration_since(self.start)
    }

    /// Apply an update for the same id.
    fn update(&mut self, event: Event, now: Instant) {
        if self.end.is_none() && event.status.is_terminal() {
            self.end = Some(now);
            self.spinner.stop();
        }
        self.event.status = event.status;
        self.event.text = event.text;
        self.event.status_text = event.status_text;
    }
}

// =============================================================================
// EventStore
// =============================================================================

#[derive(Debug, Default)]
struct Inner {
    ids: Vec<String>,
    events: HashMap<String, TrackedEvent>,
}

/// Lock-guarded map of tracked events in first-seen order.
#[derive(Debug, Default)]
pub struct EventStore {
    inner: RwLock<Inner>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge an update into the store.
    ///
    /// An unseen id is appended and starts its timer now. A seen id keeps its
    /// position and start time; the first terminal status freezes its end
    /// time and spinner.
    pub fn record(&self, event: Event) {
        self.record_at(event, Instant::now());
    }

    pub(crate) fn record_at(&self, event: Event, now: Instant) {
        if event.id.is_empty() {
            debug!("recording progress event with an empty id");
        }

        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let inner = &mut *guard;

        match inner.events.get_mut(&event.id) {
            Some(tracked) => tracked.update(event, now),
            None => {
                inner.ids.push(event.id.clone());
                let id = event.id.clone();
                let mut tracked = TrackedEvent::new(event, now);
                // Seen for the first time already finished: nothing ran
                if tracked.event.status.is_terminal() {
                    tracked.end = Some(now);
                    tracked.spinner.stop();
                }
                inner.events.insert(id, tracked);
            }
        }
    }

    /// Run `f` against a consistent snapshot of the store.
    pub fn read<R>(&self, f: impl FnOnce(Snapshot<'_>) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(Snapshot { inner: &*guard })
    }

    /// Number of distinct ids seen.
    pub fn len(&self) -> usize {
        self.read(|s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids in first-seen order.
    pub fn ids(&self) -> Vec<String> {
        self.read(|s| s.iter().map(|t| t.event.id.clone()).collect())
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Read-only view of the store while its read lock is held.
#[derive(Clone, Copy)]
pub struct Snapshot<'a> {
    inner: &'a Inner,
}

impl<'a> Snapshot<'a> {
    /// Tracked events in first-seen order.
    pub fn iter(self) -> impl Iterator<Item = &'a TrackedEvent> {
        let inner = self.inner;
        inner.ids.iter().filter_map(move |id| inner.events.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&'a TrackedEvent> {
        self.inner.events.get(id)
    }

    pub fn len(&self) -> usize {
        self.inner.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.ids.is_empty()
    }

    /// Number of events whose current status is `Done`.
    pub fn num_done(&self) -> usize {
        self.inner
            .events
            .values()
            .filter(|t| t.event.status == EventStatus::Done)
            .count()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_first_seen_order_survives_updates() {
        let store = EventStore::new();
        store.record(Event::working("a", "one"));
        store.record(Event::working("b", "two"));
        store.record(Event::done("a", "one"));
        store.record(Event::working("c", "three"));
        store.record(Event::error("b", "two"));

        assert_eq!(store.ids(), vec!["a", "b", "c"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_update_overwrites_fields() {
        let store = EventStore::new();
        store.record(Event::working("svc", "pulling"));
        store.record(Event::working("svc", "extracting").with_status_text("42%"));

        store.read(|s| {
            let t = s.get("svc").unwrap();
            assert_eq!(t.event.text, "extracting");
            assert_eq!(t.event.status_text, "42%");
            assert!(t.end.is_none());
            assert!(!t.spinner.is_stopped());
        });
    }

    #[test]
    fn test_start_time_never_overwritten() {
        let store = EventStore::new();
        let t0 = Instant::now();
        store.record_at(Event::working("svc", "x"), t0);
        store.record_at(Event::working("svc", "y"), t0 + Duration::from_secs(3));

        store.read(|s| assert_eq!(s.get("svc").unwrap().start, t0));
    }

    #[test]
    fn test_terminal_freeze_is_idempotent() {
        let store = EventStore::new();
        let t0 = Instant::now();
        store.record_at(Event::working("svc", "x"), t0);
        store.record_at(Event::done("svc", "x"), t0 + Duration::from_secs(2));
        store.record_at(Event::working("svc", "x"), t0 + Duration::from_secs(5));
        store.record_at(Event::error("svc", "x"), t0 + Duration::from_secs(9));

        store.read(|s| {
            let t = s.get("svc").unwrap();
            assert_eq!(t.end, Some(t0 + Duration::from_secs(2)));
            assert!(t.spinner.is_stopped());
            assert_eq!(t.event.status, EventStatus::Error);
            // Frozen regardless of when we look
            assert_eq!(t.elapsed(t0 + Duration::from_secs(60)), Duration::from_secs(2));
        });
    }

    #[test]
    fn test_error_freezes_too() {
        let store = EventStore::new();
        let t0 = Instant::now();
        store.record_at(Event::working("svc", "x"), t0);
        store.record_at(Event::error("svc", "x"), t0 + Duration::from_millis(1500));

        store.read(|s| {
            let t = s.get("svc").unwrap();
            assert_eq!(t.elapsed(t0 + Duration::from_secs(10)), Duration::from_millis(1500));
        });
    }

    #[test]
    fn test_first_seen_terminal() {
        let store = EventStore::new();
        let t0 = Instant::now();
        store.record_at(Event::done("svc", "x"), t0);

        store.read(|s| {
            let t = s.get("svc").unwrap();
            assert_eq!(t.elapsed(t0 + Duration::from_secs(1)), Duration::ZERO);
            assert!(t.spinner.is_stopped());
        });
    }

    #[test]
    fn test_num_done() {
        let store = EventStore::new();
        store.record(Event::done("a", ""));
        store.record(Event::error("b", ""));
        store.record(Event::working("c", ""));
        store.record(Event::done("d", ""));

        assert_eq!(store.read(|s| s.num_done()), 2);
    }

    #[test]
    fn test_concurrent_producers() {
        let store = Arc::new(EventStore::new());
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let id = format!("task-{n}");
                    for step in 0..50 {
                        store.record(Event::working(&id, format!("step {step}")));
                    }
                    store.record(Event::done(&id, "finished"));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.len(), 8);
        store.read(|s| {
            assert_eq!(s.num_done(), 8);
            // Each event is whole: final text always pairs with Done
            for t in s.iter() {
                assert_eq!(t.event.text, "finished");
                assert!(t.end.is_some());
            }
        });
    }
}
