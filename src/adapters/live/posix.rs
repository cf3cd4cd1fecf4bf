//! Live shell backend using `std::process::Command` and the POSIX shell.

use std::fs::{File, Permissions};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use log::{debug, warn};

use crate::error::{OsalError, OsalResult};
use crate::ports::shell::ShellBackend;

/// Runs commands through `<shell> -c`, with both output streams on the target file.
pub struct PosixShell {
    program: PathBuf,
    output_mode: u32,
}

impl PosixShell {
    /// Creates a backend that invokes `program` and sets `output_mode` on the target file.
    pub fn new(program: impl Into<PathBuf>, output_mode: u32) -> Self {
        Self { program: program.into(), output_mode }
    }
}

impl Default for PosixShell {
    fn default() -> Self {
        Self::new("/bin/sh", 0o666)
    }
}

impl ShellBackend for PosixShell {
    fn name(&self) -> &'static str {
        "posix"
    }

    fn output_to_file(&self, file: &File, command: &str) -> OsalResult<()> {
        // The original call ignores the chmod outcome; only the command status counts.
        if let Err(e) = file.set_permissions(Permissions::from_mode(self.output_mode)) {
            warn!("chmod {:o} on shell output stream failed: {e}", self.output_mode);
        }

        let stdout = file.try_clone().map_err(|e| {
            warn!("dup of shell output stream failed: {e}");
            OsalError::Error
        })?;
        let stderr = file.try_clone().map_err(|e| {
            warn!("dup of shell output stream failed: {e}");
            OsalError::Error
        })?;

        let status = Command::new(&self.program)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .map_err(|e| {
                warn!("failed to spawn {}: {e}", self.program.display());
                OsalError::Error
            })?;

        if status.success() {
            Ok(())
        } else {
            debug!("shell command {command:?} finished with {status}");
            Err(OsalError::Error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom, Write};

    fn scratch_file(name: &str) -> (PathBuf, File) {
        let dir = std::env::temp_dir().join(format!("osal_posix_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.txt");
        let file = File::create(&path).unwrap();
        (dir, file)
    }

    #[test]
    fn captures_stdout_and_stderr() {
        let (dir, file) = scratch_file("both");
        let shell = PosixShell::default();
        shell.output_to_file(&file, "echo out; echo err 1>&2").unwrap();

        let content = std::fs::read_to_string(dir.join("out.txt")).unwrap();
        assert_eq!(content, "out\nerr\n");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn nonzero_exit_is_an_error() {
        let (dir, file) = scratch_file("exit");
        let shell = PosixShell::default();
        assert_eq!(shell.output_to_file(&file, "exit 3"), Err(OsalError::Error));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_interpreter_is_an_error() {
        let (dir, file) = scratch_file("missing");
        let shell = PosixShell::new("/nonexistent/osal-sh", 0o666);
        assert_eq!(shell.output_to_file(&file, "true"), Err(OsalError::Error));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn output_lands_at_current_offset() {
        let (dir, mut file) = scratch_file("offset");
        file.write_all(b"head\n").unwrap();
        let shell = PosixShell::default();
        shell.output_to_file(&file, "echo tail").unwrap();

        assert_eq!(file.seek(SeekFrom::Current(0)).unwrap(), 10);
        let content = std::fs::read_to_string(dir.join("out.txt")).unwrap();
        assert_eq!(content, "head\ntail\n");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn output_file_mode_is_relaxed() {
        let (dir, file) = scratch_file("mode");
        file.set_permissions(Permissions::from_mode(0o600)).unwrap();
        PosixShell::default().output_to_file(&file, "true").unwrap();

        let mode = std::fs::metadata(dir.join("out.txt")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o666);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
