//! Replaying adapters that serve recorded interactions.

pub mod shell;

pub use shell::ReplayingShell;

use crate::error::{OsalError, OsalResult};

/// Decode an output recorded by `recording::record_status`.
///
/// An `Err` code that is not a known status replays as `OsalError::Error`.
pub(crate) fn replay_status(output: &serde_json::Value) -> OsalResult<serde_json::Value> {
    if let Some(err) = output.get("Err") {
        let code = err.as_i64().and_then(|c| i32::try_from(c).ok());
        return Err(code.and_then(OsalError::from_code).unwrap_or(OsalError::Error));
    }
    Ok(output.get("Ok").cloned().unwrap_or(serde_json::Value::Null))
}
