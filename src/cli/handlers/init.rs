use crate::config::{CONFIG_FILE_NAME, DatabaseSettings, PantryConfig};
use crate::error::PantryError;
use crate::storage::SqliteStore;
use anyhow::{Context, Result};
use colored::Colorize;

pub fn handle_init(database_path: Option<String>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config_path = cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        return Err(PantryError::AlreadyInitialized(config_path.display().to_string()).into());
    }

    let config = PantryConfig {
        database: database_path
            .map(|path| DatabaseSettings { path })
            .unwrap_or_default(),
        ..Default::default()
    };

    let db_path = config.database_path(&cwd);
    SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to create database {}", db_path.display()))?;

    config.save(&config_path)?;

    println!(
        "{} pantry project in {}",
        "Initialized".green(),
        cwd.display()
    );
    println!("  Config:   {}", config_path.display());
    println!("  Database: {}", db_path.display());

    Ok(())
}
