//! Backend for hosts built without shell support.

use std::fs::File;

use crate::error::{OsalError, OsalResult};
use crate::ports::shell::ShellBackend;

/// Shell backend that reports the operation as unavailable.
pub struct NoShell;

impl ShellBackend for NoShell {
    fn name(&self) -> &'static str {
        "none"
    }

    fn output_to_file(&self, _file: &File, _command: &str) -> OsalResult<()> {
        Err(OsalError::NotImplemented)
    }
}
