//! Replaying adapter for the `ShellBackend` port.

use std::fs::File;
use std::sync::Mutex;

use log::{debug, warn};

use super::replay_status;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::{OsalError, OsalResult};
use crate::ports::shell::ShellBackend;

/// Replays recorded shell outcomes without running anything.
pub struct ReplayingShell {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingShell {
    /// Creates a replaying backend from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ShellBackend for ReplayingShell {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn output_to_file(&self, _file: &File, command: &str) -> OsalResult<()> {
        let interaction = {
            let mut replayer = self.replayer.lock().map_err(|e| {
                warn!("replayer lock poisoned: {e}");
                OsalError::Error
            })?;
            replayer.next_interaction("shell", "output_to_file")
        };
        let recorded = interaction.input.get("command").and_then(serde_json::Value::as_str);
        if recorded != Some(command) {
            debug!("replaying seq {} for {command:?}, recorded as {recorded:?}", interaction.seq);
        }
        replay_status(&interaction.output).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(outputs: &[serde_json::Value]) -> CassetteReplayer {
        let interactions = outputs
            .iter()
            .zip(0u64..)
            .map(|(output, seq)| Interaction {
                seq,
                port: "shell".into(),
                method: "output_to_file".into(),
                input: json!({"backend": "posix", "command": "true"}),
                output: output.clone(),
            })
            .collect();
        CassetteReplayer::new(&Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            host: "testhost".into(),
            interactions,
        })
    }

    #[test]
    fn replays_recorded_outcomes_in_order() {
        let path = std::env::temp_dir().join("osal_replay_shell_test.txt");
        let file = File::create(&path).unwrap();
        let shell = ReplayingShell::new(make_replayer(&[
            json!({"Ok": null}),
            json!({"Err": -1}),
            json!({"Err": -9999}),
        ]));

        assert_eq!(shell.output_to_file(&file, "true"), Ok(()));
        assert_eq!(shell.output_to_file(&file, "false"), Err(OsalError::Error));
        assert_eq!(shell.output_to_file(&file, "odd"), Err(OsalError::Error));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn replays_not_implemented() {
        let path = std::env::temp_dir().join("osal_replay_shell_noimpl.txt");
        let file = File::create(&path).unwrap();
        let shell = ReplayingShell::new(make_replayer(&[json!({"Err": -28})]));
        assert_eq!(shell.output_to_file(&file, "true"), Err(OsalError::NotImplemented));
        let _ = std::fs::remove_file(&path);
    }
}
