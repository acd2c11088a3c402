use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use crate::config::Config;
use crate::dashboard::{Dashboard, Role};
use crate::store::Stores;

#[derive(Args, Debug)]
pub struct ScreensCommands {
    /// Dashboard to describe
    #[arg(long, value_enum)]
    pub role: Role,
}

pub fn screens_command(args: ScreensCommands, config: &Config) -> Result<()> {
    let dashboard = Dashboard::build(args.role.default_context(), Stores::seeded(), &config.dashboard_options())
        .with_context(|| format!("Failed to build the {} dashboard", args.role))?;

    println!("{} {}", "Dashboard".bold(), args.role.label().bright_cyan().bold());
    println!();
    println!("{}", "Bottom navigation".bold());
    for (i, destination) in dashboard.destinations().iter().enumerate() {
        println!(
            "  {} {:<12} {}",
            (i + 1).to_string().bright_yellow(),
            destination.label,
            destination.screen.as_str().dimmed()
        );
    }

    println!();
    println!("{}", "Registered screens".bold());
    for screen in dashboard.registry().screens() {
        let Some(descriptor) = dashboard.registry().get(screen) else {
            continue;
        };
        let kind = if descriptor.loader.is_deferred() {
            "deferred".yellow()
        } else {
            "ready".green()
        };
        let fixed = if descriptor.fixed_params.is_empty() {
            String::new()
        } else {
            serde_json::to_string(descriptor.fixed_params.as_map())?
        };
        println!("  {:<16} {:<9} {}", screen.as_str(), kind, fixed.dimmed());
    }

    println!();
    println!(
        "{} {} searchable entries",
        "✓".bright_green().bold(),
        dashboard.catalog().len()
    );
    Ok(())
}
