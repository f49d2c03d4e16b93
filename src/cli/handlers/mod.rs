mod init;
mod migrate;
mod mutate;
mod query;
mod serve;

pub use init::handle_init;
pub use migrate::handle_migrate;
pub use mutate::handle_mutate;
pub use query::handle_query;
pub use serve::handle_serve;

use crate::config::PantryConfig;
use crate::error::PantryError;
use crate::storage::SqliteStore;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Common context passed to all command handlers
pub struct CommandContext {
    pub config: PantryConfig,
    pub root: PathBuf,
    /// `--database` given on the command line, resolved against the working directory
    pub database_override: Option<PathBuf>,
}

impl CommandContext {
    /// Resolve configuration from `--config`, an upward search from `cwd`, or
    /// defaults when only `--database` is given.
    pub fn load(cwd: &Path, config: Option<&str>, database: Option<&str>) -> Result<Self> {
        let database_override = database.map(|d| cwd.join(d));

        let (config, root) = match config {
            Some(path) => PantryConfig::load_from(&cwd.join(path))
                .with_context(|| format!("Failed to load config from {}", path))?,
            None => match PantryConfig::load(cwd) {
                Ok(found) => found,
                Err(PantryError::NotInitialized) if database_override.is_some() => {
                    (PantryConfig::default(), cwd.to_path_buf())
                }
                Err(e) => return Err(e).context("Failed to load pantry configuration"),
            },
        };

        Ok(Self {
            config,
            root,
            database_override,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_override
            .clone()
            .unwrap_or_else(|| self.config.database_path(&self.root))
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.config.log_path(&self.root)
    }

    pub fn open_store(&self) -> Result<SqliteStore> {
        let path = self.database_path();
        SqliteStore::open(&path)
            .with_context(|| format!("Failed to open database {}", path.display()))
    }
}
