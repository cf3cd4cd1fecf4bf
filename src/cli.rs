//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `osal`.
#[derive(Debug, Parser)]
#[command(name = "osal", version, about = "Run host shell commands into OSAL file streams")]
pub struct Cli {
    /// YAML configuration file (defaults to $OSAL_CONFIG, then ./osal.yaml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a shell command with stdout and stderr written to a file.
    Shell {
        /// Output file, created if missing.
        #[arg(long, short = 'f', value_name = "PATH")]
        file: PathBuf,
        /// Append to the file instead of truncating it.
        #[arg(long)]
        append: bool,
        /// Command words, joined with spaces and handed to the shell.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Print the effective configuration as YAML.
    Config,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_shell_subcommand() {
        let cli = Cli::parse_from(["osal", "shell", "--file", "out.txt", "--", "ls", "-l"]);
        match cli.command {
            Command::Shell { file, append, command } => {
                assert_eq!(file.to_str(), Some("out.txt"));
                assert!(!append);
                assert_eq!(command, vec!["ls", "-l"]);
            }
            Command::Config => panic!("expected shell subcommand"),
        }
    }

    #[test]
    fn parses_append_and_global_config() {
        let cli = Cli::parse_from([
            "osal", "shell", "-f", "o.txt", "--append", "--config", "c.yaml", "date",
        ]);
        assert_eq!(cli.config.as_deref().and_then(|p| p.to_str()), Some("c.yaml"));
        assert!(matches!(cli.command, Command::Shell { append: true, .. }));
    }

    #[test]
    fn shell_requires_a_command() {
        assert!(Cli::try_parse_from(["osal", "shell", "--file", "o.txt"]).is_err());
    }

    #[test]
    fn parses_config_subcommand() {
        let cli = Cli::parse_from(["osal", "config"]);
        assert!(matches!(cli.command, Command::Config));
    }
}
