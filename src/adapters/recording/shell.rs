//! Recording adapter for the `ShellBackend` port.

use std::fs::File;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_status;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::OsalResult;
use crate::ports::ShellBackend;

/// Records shell outcomes while delegating to an inner backend.
pub struct RecordingShell {
    inner: Box<dyn ShellBackend>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingShell {
    /// Creates a recording backend wrapping the given implementation.
    pub fn new(inner: Box<dyn ShellBackend>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct CommandInput<'a> {
    backend: &'a str,
    command: &'a str,
}

impl ShellBackend for RecordingShell {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn output_to_file(&self, file: &File, command: &str) -> OsalResult<()> {
        let result = self.inner.output_to_file(file, command);
        let input = CommandInput { backend: self.inner.name(), command };
        record_status(&self.recorder, "shell", "output_to_file", &input, &result);
        result
    }
}
