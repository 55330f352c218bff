//! # spark-progress
//!
//! Live multi-line terminal progress for concurrent operations.
//!
//! Producers on any number of threads report [`Event`]s ("`web` is now
//! `Working`, text `Pulling`"); one renderer thread repaints a compact block
//! in place, with a spinner and timer per operation and a completion count.
//!
//! ## Architecture
//!
//! ```text
//! producers ──event()──► EventStore (RwLock) ──snapshot──► layout ──► TtyWriter ──► terminal
//!                                                     ▲
//!                                        tick / stop / cancel
//! ```
//!
//! ## Modules
//!
//! - [`event`] - Event and status types
//! - [`store`] - Lock-guarded event store in first-seen order
//! - [`spinner`] - Per-event animation
//! - [`layout`] - Line layout, padding and colors
//! - [`terminal`] - Width sources and cursor control
//! - [`writer`] - TTY and plain writers
//! - [`cancel`] - Cancellation tokens
//! - [`config`] - Writer configuration
//!
//! ## Example
//!
//! ```no_run
//! use spark_progress::{CancellationToken, Event, ProgressConfig, run, stdout_writer};
//!
//! let writer = stdout_writer(ProgressConfig::from_env());
//! run(writer.as_ref(), &CancellationToken::new(), |w| {
//!     w.event(Event::creating("web"));
//!     // ... do the work ...
//!     w.event(Event::created("web"));
//!     Ok::<_, spark_progress::Error>(())
//! })?;
//! # Ok::<_, spark_progress::Error>(())
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod event;
pub mod layout;
pub mod run;
pub mod spinner;
pub mod store;
pub mod terminal;
pub mod writer;

// Re-export commonly used items
pub use cancel::CancellationToken;
pub use config::{ProgressConfig, ProgressMode};
pub use error::{CancelCause, Error, Result};
pub use event::{Event, EventStatus};
pub use run::run;
pub use store::{EventStore, Snapshot, TrackedEvent};
pub use terminal::{CrosstermWidth, FixedWidth, TerminalWidth};
pub use writer::{PlainWriter, TtyWriter, Writer, new_writer, stdout_writer};
