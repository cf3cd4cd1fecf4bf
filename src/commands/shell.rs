//! `osal shell` command.

use std::path::Path;

use crate::file::{AccessMode, OpenFlags};
use crate::osal::Osal;

/// Execute the `shell` command.
///
/// Opens `file` as a write-only stream, runs `command` into it, and closes
/// the stream again whatever the outcome.
///
/// # Errors
///
/// Returns an error string naming the OSAL status if the file cannot be
/// opened or the command fails.
pub fn run(osal: &Osal, file: &Path, append: bool, command: &str) -> Result<(), String> {
    let flags = OpenFlags { create: true, truncate: !append, append };
    let id = osal
        .files
        .open_create(file, flags, AccessMode::WriteOnly)
        .map_err(|e| format!("cannot open {}: {e}", file.display()))?;

    let result = osal.shell_output_to_file(id, command);
    let closed = osal.files.close(id);

    result.map_err(|e| format!("shell command failed: {e}"))?;
    closed.map_err(|e| format!("cannot close {}: {e}", file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::noshell::NoShell;
    use crate::config::OsalConfig;

    fn osal() -> Osal {
        let config = OsalConfig { max_path_len: 4096, ..OsalConfig::default() };
        Osal::with_backend(config, Box::new(NoShell)).unwrap()
    }

    #[test]
    fn failure_names_status_and_releases_stream() {
        let path = std::env::temp_dir().join("osal_cmd_shell_noshell.txt");
        let osal = osal();
        let err = run(&osal, &path, false, "echo hi").unwrap_err();
        assert_eq!(err, "shell command failed: OS_ERR_NOT_IMPLEMENTED (-28)");
        assert!(osal.files.open_ids().unwrap().is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unopenable_file_is_reported() {
        let osal = osal();
        let err = run(&osal, Path::new("/nonexistent/dir/out.txt"), false, "true").unwrap_err();
        assert!(err.starts_with("cannot open /nonexistent/dir/out.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn append_keeps_existing_content() {
        let dir = std::env::temp_dir().join("osal_cmd_shell_append");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("log.txt");
        let config = OsalConfig { max_path_len: 4096, ..OsalConfig::default() };
        let osal = Osal::live(config).unwrap();

        run(&osal, &path, false, "echo one").unwrap();
        run(&osal, &path, true, "echo two").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");

        run(&osal, &path, false, "echo three").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "three\n");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
