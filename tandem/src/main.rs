//! `tandem`: start two delayed units, wait for both, then wait for a key.

use std::process::ExitCode;
use std::sync::Arc;

use tandem::settings::{Invocation, Settings};
use tandem::unit::Stdout;
use tandem::{RuntimeBuilder, console, joiner};
use tracing::Level;

/// One worker per unit.
const WORKER_THREADS: usize = 2;

fn main() -> ExitCode {
    let settings = match Settings::parse_args(std::env::args().skip(1)) {
        Ok(Invocation::Run(settings)) => settings,
        Ok(Invocation::Help) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}");
            print_usage();
            return ExitCode::from(2);
        }
    };

    init_logging(&settings);

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<(), tandem::Error> {
    let runtime = RuntimeBuilder::new().worker_threads(WORKER_THREADS).build()?;
    let joined = runtime.block_on(joiner::run(settings.build_units(), Arc::new(Stdout)));

    // Workers are stopped before the blocking key read.
    drop(runtime);
    joined?;

    if settings.wait_for_key() {
        console::wait_for_key()?;
    }

    Ok(())
}

fn init_logging(settings: &Settings) {
    let level = if settings.verbose() {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_usage() {
    eprintln!("Usage: tandem [options]");
    eprintln!();
    eprintln!("Runs TaskAsync (10 time units) and TaskAsync2 (5 time units) concurrently,");
    eprintln!("waits for both, then waits for a key press.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --time-unit-ms <N>  Length of one time unit in milliseconds (default 1000)");
    eprintln!("  --no-wait           Exit without waiting for a key press");
    eprintln!("  -v, --verbose       Log runtime activity to stderr");
    eprintln!("  -h, --help          Show this help");
}
