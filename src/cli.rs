use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "language-detector", version, about = "Text language detection service")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Validate the configuration and load the model artifacts
    Test,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show recent prediction log entries
    Logs(crate::commands::logs::LogsArgs),

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,
}

impl Cli {
    /// Get the command to execute, defaulting to Serve if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::try_parse_from(["language-detector"]).unwrap();
        assert!(matches!(cli.get_command(), Commands::Serve));
        assert_eq!(cli.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["language-detector", "test", "--config", "/etc/ld.toml"])
            .unwrap();
        assert!(matches!(cli.get_command(), Commands::Test));
        assert_eq!(cli.config, PathBuf::from("/etc/ld.toml"));
    }

    #[test]
    fn test_cli_parsing_logs() {
        let cli = Cli::try_parse_from(["language-detector", "logs", "--limit", "3", "-f", "json"])
            .unwrap();

        match cli.get_command() {
            Commands::Logs(args) => {
                assert_eq!(args.limit, 3);
                assert_eq!(args.format, "json");
            }
            other => panic!("Expected Logs command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parsing_config_show() {
        let cli = Cli::try_parse_from(["language-detector", "config", "show"]).unwrap();
        assert!(matches!(
            cli.get_command(),
            Commands::Config {
                action: ConfigCommands::Show
            }
        ));
    }
}
