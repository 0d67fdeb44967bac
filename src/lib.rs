//! Core library entry for the `taskdeck` CLI.
//!
//! A client for a REST task service: a typed store client
//! ([`ports::TaskStore`]), the client-side board state built on it
//! ([`board`]), and the command-line front end.

pub mod adapters;
pub mod auth;
pub mod board;
pub mod cancel;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod model;
pub mod ports;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version are not failures.
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    logging::init_tracing(cli.verbose)?;
    commands::dispatch(&cli.command)
}
