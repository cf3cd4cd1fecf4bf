//! Shell backend port: run a host command with output routed to a stream.

use std::fs::File;

use crate::error::OsalResult;

/// Host implementation of the shell-output-to-file operation.
///
/// Abstracting the backend lets the portable layer select a real shell,
/// the no-shell build, or a cassette replay without changing callers.
pub trait ShellBackend: Send + Sync {
    /// Short backend name, used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Runs `command` in the host command interpreter with its standard
    /// output and standard error both written to `file`.
    ///
    /// # Errors
    ///
    /// Returns `OsalError::Error` if the command cannot be started or exits
    /// with a nonzero status, and `OsalError::NotImplemented` if the backend
    /// has no shell.
    fn output_to_file(&self, file: &File, command: &str) -> OsalResult<()>;
}
