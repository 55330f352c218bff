//! Plain writer for non-interactive output.
//!
//! Each event becomes one line, `<id> <text> <status_text>`, written as soon
//! as it is reported. There is no repaint loop; `start` only waits.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crossbeam_channel::select;
use tracing::{debug, warn};

use super::{StopSignal, Writer, cancelled};
use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::event::Event;

/// Line-per-event writer.
pub struct PlainWriter {
    out: Mutex<Box<dyn Write + Send>>,
    stop: StopSignal,
}

impl PlainWriter {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            stop: StopSignal::new(),
        }
    }
}

/// Text of one plain line, without the newline.
fn plain_line(event: &Event) -> String {
    let line = format!("{} {} {}", event.id, event.text, event.status_text);
    line.trim_end().to_string()
}

impl Writer for PlainWriter {
    fn start(&self, cancel: &CancellationToken) -> Result<()> {
        self.stop.claim()?;
        let deadline = cancel.deadline_signal();
        select! {
            recv(cancel.signal()) -> _ => Err(cancelled(cancel)),
            recv(deadline) -> _ => Err(cancelled(cancel)),
            recv(self.stop.receiver()) -> _ => {
                if cancel.is_cancelled() {
                    return Err(cancelled(cancel));
                }
                debug!("plain progress writer stopped");
                Ok(())
            }
        }
    }

    fn stop(&self) {
        self.stop.request();
    }

    fn event(&self, event: Event) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writeln!(out, "{}", plain_line(&event)) {
            warn!(error = %err, id = %event.id, "dropping progress line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_plain_line() {
        assert_eq!(plain_line(&Event::started("web")), "web Started");
        assert_eq!(
            plain_line(&Event::working("db", "Pulling").with_status_text("3/5")),
            "db Pulling 3/5"
        );
    }

    #[test]
    fn test_events_print_immediately() {
        let capture = Capture::default();
        let writer = PlainWriter::new(capture.clone());
        writer.event(Event::creating("web"));
        writer.event(Event::created("web"));

        let text = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text, "web Creating\nweb Created\n");
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_start_returns_cancel_cause() {
        let writer = PlainWriter::new(Vec::<u8>::new());
        let token = CancellationToken::new();
        token.cancel();
        let err = writer.start(&token).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_second_start_is_rejected() {
        let writer = PlainWriter::new(Vec::<u8>::new());
        writer.stop();
        assert!(writer.start(&CancellationToken::new()).is_ok());
        assert!(matches!(
            writer.start(&CancellationToken::new()),
            Err(crate::error::Error::AlreadyStopped)
        ));
    }

    #[test]
    fn test_broken_sink_does_not_panic() {
        let writer = PlainWriter::new(Broken);
        writer.event(Event::working("a", "b"));
        writer.stop();
        assert!(writer.start(&CancellationToken::new()).is_ok());
    }
}
