use super::commands::config::ConfigCommands;
use super::commands::launch::LaunchCommands;
use super::commands::screens::ScreensCommands;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "school-portal")]
#[command(about = "Terminal front end for the school management portal")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file, overriding the one in the config
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive portal (default)
    Launch(LaunchCommands),
    /// Print a dashboard's screens and bottom navigation
    Screens(ScreensCommands),
    /// Inspect or create the config file
    Config(ConfigCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Role;

    #[test]
    fn test_parses_launch_with_role() {
        let cli = Cli::try_parse_from(["school-portal", "--log-file", "/tmp/p.log", "launch", "--role", "parent"]).unwrap();
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/p.log")));
        match cli.command {
            Some(Commands::Launch(args)) => assert_eq!(args.role, Some(Role::Parent)),
            _ => panic!("expected launch"),
        }
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["school-portal"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_rejects_unknown_role() {
        assert!(Cli::try_parse_from(["school-portal", "screens", "--role", "janitor"]).is_err());
    }
}
