use anyhow::Result;
use clap::Parser;
use log::info;

use school_portal::cli::commands::{config_command, launch_command, launch::LaunchCommands, screens_command};
use school_portal::cli::{Cli, Commands};
use school_portal::config::Config;
use school_portal::tui::init_runtime_config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Initialize logger to file (truncate on each run)
    let log_path = cli.log_file.clone().unwrap_or_else(|| config.log_file.clone());
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting school-portal");
    init_runtime_config(config.runtime_config());

    match cli.command {
        None => launch_command(LaunchCommands::default(), &config).await,
        Some(Commands::Launch(args)) => launch_command(args, &config).await,
        Some(Commands::Screens(args)) => screens_command(args, &config),
        Some(Commands::Config(args)) => config_command(args, &config, cli.config.as_deref()),
    }
}
