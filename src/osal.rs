//! Portable API layer bundling the stream table and the shell backend.

use std::path::Path;
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::adapters::live::noshell::NoShell;
use crate::adapters::recording::RecordingShell;
use crate::adapters::replaying::ReplayingShell;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::{BackendKind, OsalConfig};
use crate::error::{OsalError, OsalResult};
use crate::file::FileSubsystem;
use crate::handle_table::ObjectId;
use crate::ports::shell::ShellBackend;

/// One abstraction-layer instance.
///
/// Constructors pick the shell backend (live, recording, replaying); the
/// stream table is always a real [`FileSubsystem`].
pub struct Osal {
    /// Effective configuration.
    pub config: OsalConfig,
    /// Stream table and file operations.
    pub files: FileSubsystem,
    shell: Box<dyn ShellBackend>,
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl Osal {
    /// Creates an instance using the backend named by `config.backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration limits are unusable.
    pub fn live(config: OsalConfig) -> Result<Self, String> {
        let backend = live_backend(&config);
        Self::with_backend(config, backend)
    }

    /// Creates an instance whose shell interactions are written to a
    /// cassette at `path` when the instance is dropped or
    /// [`finish_recording`](Self::finish_recording) is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration limits are unusable.
    pub fn recording(config: OsalConfig, path: &Path) -> Result<Self, String> {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::for_this_host(path, "osal-session")));
        let backend = RecordingShell::new(live_backend(&config), Arc::clone(&recorder));
        let mut osal = Self::with_backend(config, Box::new(backend))?;
        osal.recorder = Some(recorder);
        Ok(osal)
    }

    /// Creates an instance that replays shell outcomes from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be loaded or the configuration is unusable.
    pub fn replaying(config: OsalConfig, path: &Path) -> Result<Self, String> {
        let cassette = crate::cassette::load_cassette(path)?;
        let backend = ReplayingShell::new(CassetteReplayer::new(&cassette));
        Self::with_backend(config, Box::new(backend))
    }

    /// Creates an instance with an explicit shell backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration limits are unusable.
    pub fn with_backend(
        config: OsalConfig,
        shell: Box<dyn ShellBackend>,
    ) -> Result<Self, String> {
        config.validate()?;
        let files = FileSubsystem::new(config.max_open_files, config.max_path_len)
            .map_err(|e| format!("Failed to create stream table: {e}"))?;
        debug!("osal ready with {} shell backend", shell.name());
        Ok(Self { config, files, shell, recorder: None })
    }

    /// Name of the installed shell backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.shell.name()
    }

    /// Runs `cmd` in the host command interpreter with its standard output
    /// and standard error written to the open stream `id`.
    ///
    /// Commands longer than `max_cmd_len` bytes are truncated to fit.
    ///
    /// # Errors
    ///
    /// - `InvalidPointer` if `cmd` is empty or contains NUL.
    /// - `InvalidId` if `id` is not an open stream.
    /// - `Error` if the command cannot be run or exits nonzero.
    /// - `NotImplemented` if the backend has no shell.
    pub fn shell_output_to_file(&self, id: ObjectId, cmd: &str) -> OsalResult<()> {
        if cmd.is_empty() || cmd.contains('\0') {
            return Err(OsalError::InvalidPointer);
        }
        let command = fit_command(cmd, self.config.max_cmd_len);
        if command.len() < cmd.len() {
            warn!(
                "shell command truncated from {} to {} bytes",
                cmd.len(),
                command.len()
            );
        }

        // Run on a duplicate so the table stays unlocked while the command runs.
        let file = self.files.duplicate(id)?;
        let result = self.shell.output_to_file(&file, command);
        debug!("shell output to stream {id}: {command:?} -> {result:?}");
        result
    }

    /// Writes the recorded cassette now instead of on drop.
    ///
    /// # Errors
    ///
    /// Returns an error if this is not a recording instance or the cassette cannot be written.
    pub fn finish_recording(mut self) -> Result<std::path::PathBuf, String> {
        let recorder = self.recorder.take().ok_or("Not a recording session")?;
        // The backend holds the other reference; release it first.
        self.shell = Box::new(NoShell);
        write_cassette(recorder)
    }
}

impl Drop for Osal {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            self.shell = Box::new(NoShell);
            if let Err(e) = write_cassette(recorder) {
                warn!("failed to write cassette: {e}");
            }
        }
    }
}

fn live_backend(config: &OsalConfig) -> Box<dyn ShellBackend> {
    match config.backend {
        #[cfg(unix)]
        BackendKind::Posix => Box::new(crate::adapters::live::posix::PosixShell::new(
            config.shell.clone(),
            config.output_mode,
        )),
        #[cfg(not(unix))]
        BackendKind::Posix => {
            warn!("posix shell backend unavailable on this host, using none");
            Box::new(NoShell)
        }
        BackendKind::None => Box::new(NoShell),
    }
}

fn write_cassette(recorder: Arc<Mutex<CassetteRecorder>>) -> Result<std::path::PathBuf, String> {
    let recorder = Arc::try_unwrap(recorder)
        .map_err(|_| "Recording backend still has references".to_string())?
        .into_inner()
        .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
    recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
}

/// Longest prefix of `cmd` that fits in `max_len` bytes without splitting a char.
fn fit_command(cmd: &str, max_len: usize) -> &str {
    if cmd.len() <= max_len {
        return cmd;
    }
    let mut end = max_len;
    while !cmd.is_char_boundary(end) {
        end -= 1;
    }
    &cmd[..end]
}
