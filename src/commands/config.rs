//! `osal config` command.

use crate::config::OsalConfig;

/// Execute the `config` command.
///
/// # Errors
///
/// Returns an error string if the configuration cannot be rendered.
pub fn run(config: &OsalConfig) -> Result<(), String> {
    print!("{}", config.to_yaml()?);
    Ok(())
}
