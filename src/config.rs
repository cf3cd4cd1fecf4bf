//! Runtime configuration for the abstraction layer.
//!
//! Values come from built-in defaults, then an optional YAML file, then
//! `OSAL_*` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Which shell backend the live context installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Run commands through the host POSIX shell.
    Posix,
    /// Shell support compiled out; every call reports not implemented.
    None,
}

impl BackendKind {
    fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "posix" => Ok(Self::Posix),
            "none" => Ok(Self::None),
            other => Err(format!("Unknown shell backend {other:?} (expected posix or none)")),
        }
    }
}

impl Default for BackendKind {
    fn default() -> Self {
        if cfg!(unix) {
            Self::Posix
        } else {
            Self::None
        }
    }
}

/// Limits and host settings for the abstraction layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsalConfig {
    /// Longest shell command, in bytes, passed to the interpreter.
    pub max_cmd_len: usize,
    /// Number of slots in the stream table.
    pub max_open_files: usize,
    /// Paths must be shorter than this many bytes.
    pub max_path_len: usize,
    /// Command interpreter invoked as `<shell> -c <command>`.
    pub shell: PathBuf,
    /// Permission bits applied to a stream before shell output is written to it.
    pub output_mode: u32,
    /// Shell backend selection.
    pub backend: BackendKind,
}

impl Default for OsalConfig {
    fn default() -> Self {
        Self {
            max_cmd_len: 1000,
            max_open_files: 50,
            max_path_len: 64,
            shell: PathBuf::from("/bin/sh"),
            output_mode: 0o666,
            backend: BackendKind::default(),
        }
    }
}

impl OsalConfig {
    /// Parses a YAML document. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a value fails validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a YAML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
        Self::from_yaml(&content).map_err(|e| format!("{}: {e}", path.display()))
    }

    /// Resolves the effective configuration.
    ///
    /// The file is `explicit` if given, else `$OSAL_CONFIG`, else `./osal.yaml`
    /// when it exists. Environment overrides are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if a named file is unreadable, or any value is invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self, String> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("OSAL_CONFIG").map(PathBuf::from))
            .or_else(|| Some(PathBuf::from("osal.yaml")).filter(|p| p.exists()));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `OSAL_*` overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if an override value cannot be parsed.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), String> {
        if let Some(v) = lookup("OSAL_MAX_CMD_LEN") {
            self.max_cmd_len = parse_size("OSAL_MAX_CMD_LEN", &v)?;
        }
        if let Some(v) = lookup("OSAL_MAX_OPEN_FILES") {
            self.max_open_files = parse_size("OSAL_MAX_OPEN_FILES", &v)?;
        }
        if let Some(v) = lookup("OSAL_MAX_PATH_LEN") {
            self.max_path_len = parse_size("OSAL_MAX_PATH_LEN", &v)?;
        }
        if let Some(v) = lookup("OSAL_SHELL") {
            self.shell = PathBuf::from(v);
        }
        if let Some(v) = lookup("OSAL_BACKEND") {
            self.backend = BackendKind::parse(&v)?;
        }
        Ok(())
    }

    /// Checks that every limit is usable.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_cmd_len == 0 {
            return Err("max_cmd_len must be at least 1".to_string());
        }
        if self.max_open_files == 0 || self.max_open_files > 0xFFFF {
            return Err(format!(
                "max_open_files must be between 1 and 65535, got {}",
                self.max_open_files
            ));
        }
        if self.max_path_len == 0 {
            return Err("max_path_len must be at least 1".to_string());
        }
        if self.shell.as_os_str().is_empty() {
            return Err("shell must not be empty".to_string());
        }
        if self.output_mode > 0o7777 {
            return Err(format!("output_mode {:o} is not a permission mask", self.output_mode));
        }
        Ok(())
    }

    /// Renders the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, String> {
        serde_yaml::to_string(self).map_err(|e| format!("Failed to serialize config: {e}"))
    }
}

fn parse_size(key: &str, value: &str) -> Result<usize, String> {
    value.trim().parse().map_err(|e| format!("Invalid {key} value {value:?}: {e}"))
}
