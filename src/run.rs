//! Run a piece of work with a progress writer painting alongside it.

use std::thread;

use crate::cancel::CancellationToken;
use crate::error::Error;
use crate::writer::Writer;

/// Stops the writer when dropped, so unwinding out of `f` ends the repaint.
struct StopOnDrop<'a, W: Writer + ?Sized>(&'a W);

impl<W: Writer + ?Sized> Drop for StopOnDrop<'_, W> {
    fn drop(&mut self) {
        self.0.stop();
    }
}

/// Start `writer` on a scoped thread, run `f`, then stop the writer and wait
/// for its final repaint.
///
/// An error from `f` wins over the writer's own error (for example the
/// cancellation cause), since the writer only reports on the work. If `f`
/// panics the writer is still stopped, and the panic continues out of `run`.
///
/// # Example
///
/// ```
/// use spark_progress::{CancellationToken, Event, PlainWriter, Writer, run};
///
/// let writer = PlainWriter::new(std::io::sink());
/// let total = run(&writer, &CancellationToken::new(), |w| {
///     w.event(Event::creating("web"));
///     w.event(Event::created("web"));
///     Ok::<_, spark_progress::Error>(1)
/// })
/// .unwrap();
/// assert_eq!(total, 1);
/// ```
pub fn run<W, T, E, F>(writer: &W, cancel: &CancellationToken, f: F) -> Result<T, E>
where
    W: Writer + ?Sized,
    F: FnOnce(&W) -> Result<T, E>,
    E: From<Error>,
{
    thread::scope(|scope| {
        let painter = scope.spawn(|| writer.start(cancel));

        let stop = StopOnDrop(writer);
        let result = f(writer);
        drop(stop);

        let painted = match painter.join() {
            Ok(painted) => painted,
            Err(panic) => std::panic::resume_unwind(panic),
        };

        let value = result?;
        painted?;
        Ok(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CancelCause;
    use crate::event::Event;
    use crate::writer::PlainWriter;

    #[test]
    fn test_run_returns_value() {
        let writer = PlainWriter::new(std::io::sink());
        let value: Result<u32, Error> = run(&writer, &CancellationToken::new(), |w| {
            w.event(Event::working("a", "b"));
            Ok(7)
        });
        assert_eq!(value.unwrap(), 7);
    }

    #[test]
    fn test_task_error_wins() {
        let writer = PlainWriter::new(std::io::sink());
        let token = CancellationToken::new();
        let result: Result<(), Error> = run(&writer, &token, |_| {
            token.cancel();
            Err(Error::AlreadyRunning)
        });
        assert!(matches!(result, Err(Error::AlreadyRunning)));
    }

    #[test]
    fn test_task_panic_stops_writer() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        thread::spawn(move || {
            let writer = PlainWriter::new(std::io::sink());
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                run(&writer, &CancellationToken::new(), |_| -> Result<(), Error> {
                    panic!("work failed")
                })
            }));
            let _ = tx.send(outcome.is_err());
        });

        let panicked = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("run did not return after the task panicked");
        assert!(panicked);
    }

    #[test]
    fn test_cancellation_surfaces() {
        let writer = PlainWriter::new(std::io::sink());
        let token = CancellationToken::new();
        let result: Result<(), Error> = run(&writer, &token, |_| {
            token.cancel();
            Ok(())
        });
        let err = result.unwrap_err();
        assert_eq!(err.cancel_cause(), Some(&CancelCause::Cancelled));
    }
}
