//! Binary entrypoint for the `osal` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    osal_shell::logging::init_from_env();

    // Recording is handled in commands::dispatch via OSAL_RECORD=<path>.
    match osal_shell::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
