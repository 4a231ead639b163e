//! Initialize a Forage project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<PathBuf>, force: bool) -> Result<()> {
    let base_path = match path {
        Some(p) => p,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };

    println!("{} Initializing Forage project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config_path = base_path.join(CONFIG_FILE);
    if config_path.exists() && !force {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    } else {
        Config::default().save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    }

    println!();
    println!("{} Forage project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} forage distribute", "1.".blue());
    println!("  {} forage select scenario.json", "2.".blue());

    Ok(())
}
