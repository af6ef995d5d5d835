//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// loadgate - retry commands until external state catches up
#[derive(Parser, Debug)]
#[command(name = "loadgate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors and skip the retry success summary
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding loadgate-runtime.yaml (default: ~/.loadgate)
    #[arg(long, global = true, env = "LOADGATE_CONFIG_DIR")]
    pub config_dir: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Run a command until it succeeds or attempts run out
    Retry(RetryArgs),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective runtime configuration
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Args, Debug)]
pub struct RetryArgs {
    /// Named retry policy to start from
    #[arg(long, default_value = "default")]
    pub operation: String,

    /// Maximum number of attempts (overrides the policy)
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Delay between attempts in milliseconds (overrides the policy)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Command to run, followed by its arguments
    #[arg(required = true, last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_retry() {
        let cli = Cli::try_parse_from([
            "loadgate",
            "-v",
            "retry",
            "--attempts",
            "3",
            "--delay-ms",
            "50",
            "--",
            "curl",
            "-sf",
            "http://localhost:8080/health",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Retry(args) => {
                assert_eq!(args.operation, "default");
                assert_eq!(args.attempts, Some(3));
                assert_eq!(args.delay_ms, Some(50));
                assert_eq!(args.command, vec!["curl", "-sf", "http://localhost:8080/health"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_retry_requires_command() {
        let result = Cli::try_parse_from(["loadgate", "retry", "--attempts", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_show_json() {
        let cli = Cli::try_parse_from(["loadgate", "config", "show", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Show(args)) => {
                assert_eq!(args.format, OutputFormat::Json)
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
