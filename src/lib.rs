//! Operating system abstraction layer shell shim.
//!
//! Runs a command in the host command interpreter with its standard output
//! and standard error redirected into a stream held in the OSAL file table.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod file;
pub mod handle_table;
pub mod logging;
pub mod osal;
pub mod ports;

pub use error::{OsalError, OsalResult};
pub use osal::Osal;

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
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli)
}
