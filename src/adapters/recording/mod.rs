//! Recording adapters that capture backend interactions to cassettes.

pub mod shell;

pub use shell::RecordingShell;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;
use crate::error::OsalResult;

/// Record an `OsalResult` interaction.
///
/// Mirror of `replaying::replay_status`. `Ok(v)` is stored as `{"Ok": v}` and
/// `Err(e)` as `{"Err": <status code>}`.
pub(crate) fn record_status<T, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &OsalResult<T>,
) where
    T: Serialize,
    I: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");
    let output_json = match result {
        Ok(v) => {
            let inner = serde_json::to_value(v).expect("failed to serialize Ok value");
            serde_json::json!({ "Ok": inner })
        }
        Err(e) => serde_json::json!({ "Err": e.code() }),
    };

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input_json, output_json);
}
