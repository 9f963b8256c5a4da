use std::{thread, time::Duration};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init();
}

/// Runs `f` on its own thread and fails the test if it does not finish in
/// time, so a livelock shows up as a failure instead of a hung suite.
pub fn run_with_timeout<F>(timeout: Duration, f: F)
where
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = crossbeam::channel::bounded(1);
    thread::spawn(move || {
        f();
        let _ = tx.send(());
    });
    rx.recv_timeout(timeout)
        .unwrap_or_else(|err| panic!("test body did not finish within {timeout:?}: {err}"));
}
