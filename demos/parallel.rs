//! Parallel Example - several workers reporting into one progress block
//!
//! Spawns a handful of fake provisioning steps on their own threads. Each one
//! reports `Working` updates while it "runs" and finishes `Done` or `Error`.
//! Ctrl-C is not wired up; pass a timeout in seconds to see cancellation.
//!
//! Run with: cargo run --example parallel -- [timeout-seconds]

use std::thread;
use std::time::Duration;

use spark_progress::{CancellationToken, Event, ProgressConfig, run, stdout_writer};
use tracing_subscriber::EnvFilter;

const STEPS: &[(&str, &str, u64)] = &[
    ("network", "Creating", 600),
    ("volume", "Creating", 900),
    ("database", "Pulling", 2400),
    ("cache", "Pulling", 1500),
    ("web", "Building", 3200),
    ("worker", "Building", 2800),
];

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cancel = match std::env::args().nth(1).and_then(|s| s.parse::<u64>().ok()) {
        Some(secs) => CancellationToken::with_timeout(Duration::from_secs(secs)),
        None => CancellationToken::new(),
    };

    let writer = stdout_writer(ProgressConfig::from_env());

    let result = run(writer.as_ref(), &cancel, |w| {
        thread::scope(|scope| {
            for &(id, text, millis) in STEPS {
                scope.spawn(move || {
                    w.event(Event::working(id, text));
                    let ticks = millis / 100;
                    for tick in 1..=ticks {
                        thread::sleep(Duration::from_millis(100));
                        let pct = tick * 100 / ticks;
                        w.event(Event::working(id, text).with_status_text(format!("{pct}%")));
                    }
                    if id == "worker" {
                        w.event(Event::error(id, text).with_status_text("exit code 1"));
                    } else {
                        w.event(Event::done(id, text).with_status_text("done"));
                    }
                });
            }
        });
        Ok::<_, spark_progress::Error>(())
    });

    if let Err(err) = result {
        eprintln!("\n{err}");
        std::process::exit(1);
    }
}
