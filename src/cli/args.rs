//! CLI argument parsing with clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use super::enums::Format;

/// Acquire, record and log a fleet of cameras
#[derive(Parser, Debug)]
#[command(name = "multicam-recorder")]
#[command(version, about = "Multi-camera acquisition and recording", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options of a run; also accepted without the `run` subcommand.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RunArgs {
    /// Number of cameras to create
    #[arg(long)]
    pub cameras: Option<usize>,

    /// Record every camera into this directory
    #[arg(long, value_name = "DIR")]
    pub record: Option<PathBuf>,

    /// Video container
    #[arg(long)]
    pub format: Option<Format>,

    /// Write the log transcript into this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Also write the parameter CSV into the log directory
    #[arg(long)]
    pub parameter_log: bool,

    /// Frame tick period in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Stop after this many seconds (default: run until Ctrl+C)
    #[arg(long, value_name = "SECS")]
    pub duration: Option<u64>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the fleet (default)
    Run(RunArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["multicam-recorder"]);
        assert!(args.command.is_none());
        assert!(args.run.cameras.is_none());
        assert!(args.run.record.is_none());
        assert!(args.run.format.is_none());
        assert!(args.run.log_dir.is_none());
        assert!(!args.run.parameter_log);
        assert!(args.run.duration.is_none());
        assert!(args.run.config.is_none());
    }

    #[test]
    fn test_args_top_level_run_flags() {
        let args = Args::parse_from([
            "multicam-recorder",
            "--cameras",
            "3",
            "--record",
            "/tmp/rec",
            "--format",
            "mp4",
            "--duration",
            "10",
        ]);
        assert_eq!(args.run.cameras, Some(3));
        assert_eq!(args.run.record, Some(PathBuf::from("/tmp/rec")));
        assert_eq!(args.run.format, Some(Format::Mp4));
        assert_eq!(args.run.duration, Some(10));
    }

    #[test]
    fn test_args_run_subcommand() {
        let args = Args::parse_from([
            "multicam-recorder",
            "run",
            "--log-dir",
            "logs",
            "--parameter-log",
            "--interval",
            "40",
        ]);
        match args.command {
            Some(Command::Run(run)) => {
                assert_eq!(run.log_dir, Some(PathBuf::from("logs")));
                assert!(run.parameter_log);
                assert_eq!(run.interval, Some(40));
            }
            other => panic!("Expected run command, got {:?}", other),
        }
    }

    #[test]
    fn test_args_zero_interval_rejected() {
        assert!(Args::try_parse_from(["multicam-recorder", "--interval", "0"]).is_err());
    }

    #[test]
    fn test_args_invalid_format_rejected() {
        assert!(Args::try_parse_from(["multicam-recorder", "--format", "mkv"]).is_err());
    }

    #[test]
    fn test_args_config_subcommands() {
        let args = Args::parse_from(["multicam-recorder", "config", "show"]);
        assert!(matches!(
            args.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));

        let args = Args::parse_from(["multicam-recorder", "-c", "my.toml", "config", "init"]);
        assert_eq!(args.run.config, Some(PathBuf::from("my.toml")));
        assert!(matches!(
            args.command,
            Some(Command::Config {
                action: ConfigAction::Init
            })
        ));
    }
}
