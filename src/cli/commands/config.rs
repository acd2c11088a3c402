use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use std::path::Path;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommands {
    /// Print the effective config as TOML
    Show,
    /// Print where the config file lives
    Path,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

pub fn config_command(args: ConfigCommands, config: &Config, path: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigSubcommands::Show => {
            print!("{}", config.to_toml()?);
        }
        ConfigSubcommands::Path => {
            let path = match path {
                Some(path) => path.to_path_buf(),
                None => Config::get_config_path()?,
            };
            println!("{}", path.display());
        }
        ConfigSubcommands::Init { force } => {
            let target = match path {
                Some(path) => path.to_path_buf(),
                None => Config::get_config_path()?,
            };
            if target.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", target.display());
            }
            let written = Config::default().save(Some(&target))?;
            println!(
                "{} Wrote default config to {}",
                "✓".bright_green().bold(),
                written.display().to_string().bright_green()
            );
        }
    }
    Ok(())
}
