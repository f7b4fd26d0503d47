//! `#[tandem::main]` on a real `fn main`; this target runs without the
//! libtest harness, so a failed assertion fails the test binary.

use std::process::ExitCode;
use std::time::Duration;
use tandem::task::spawn;
use tandem::time::{instrumented, sleep};

#[tandem::main(worker_threads = 2)]
async fn main() -> ExitCode {
    let worker = spawn(async { std::thread::current().name().map(str::to_owned) })
        .await
        .unwrap();

    assert!(
        worker.is_some_and(|name| name.starts_with("tandem-worker-")),
        "body did not run on a tandem worker"
    );

    let ((), elapsed) = instrumented(sleep(Duration::from_millis(10))).await;
    assert!(elapsed >= Duration::from_millis(10));

    ExitCode::SUCCESS
}
