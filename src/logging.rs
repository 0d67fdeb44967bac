//! Diagnostic logging setup.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to a default filter directive.
#[must_use]
pub fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` wins over the `-v` count when set. Calling this more than
/// once is harmless; later calls keep the first subscriber.
///
/// # Errors
///
/// Returns an error string if `RUST_LOG` is set but is not a valid filter.
pub fn init_tracing(verbose: u8) -> Result<(), String> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .map_err(|e| format!("invalid RUST_LOG filter {directives:?}: {e}"))?,
        _ => EnvFilter::new(default_level(verbose)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
    Ok(())
}
