//! Command dispatch and handlers.

pub mod config;
pub mod shell;

use std::env;
use std::path::PathBuf;

use crate::cli::{Cli, Command};
use crate::config::OsalConfig;
use crate::osal::Osal;

/// Dispatch a parsed command line to its handler.
///
/// When `OSAL_RECORD` is set to a file path, shell interactions are recorded
/// to a cassette at that path.
///
/// # Errors
///
/// Returns an error string if configuration loading or the handler fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = OsalConfig::load(cli.config.as_deref())?;
    match &cli.command {
        Command::Config => config::run(&config),
        Command::Shell { file, append, command } => {
            let record_to = env::var_os("OSAL_RECORD").map(PathBuf::from);
            let osal = match &record_to {
                Some(path) => Osal::recording(config, path)?,
                None => Osal::live(config)?,
            };

            let result = shell::run(&osal, file, *append, &command.join(" "));

            // Finish recording after the command completes (even on error)
            if record_to.is_some() {
                let path = osal.finish_recording()?;
                eprintln!("Recording saved to: {}", path.display());
            }
            result
        }
    }
}
