//! Binary entrypoint for the `taskdeck` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Recording and replay are selected in commands::dispatch via
    // TASKDECK_RECORD / TASKDECK_REPLAY.
    match taskdeck::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
