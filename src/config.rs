use crate::error::{PantryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".pantry.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PantryConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file, relative to the directory holding the config file
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_database_path() -> String {
    "pantry.db".to_string()
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Optional JSON log file (rotated daily); stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl PantryConfig {
    /// Find `.pantry.toml` upward from `start_path` and load it.
    ///
    /// Returns the config and the directory it was found in.
    pub fn load(start_path: &Path) -> Result<(Self, PathBuf)> {
        let config_path = Self::find_config_file(start_path)?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<(Self, PathBuf)> {
        let content = std::fs::read_to_string(config_path)?;
        let config: PantryConfig = toml::from_str(&content)?;
        let project_root = config_path
            .parent()
            .ok_or_else(|| PantryError::Config("Config file has no parent directory".to_string()))?
            .to_path_buf();
        Ok((config, project_root))
    }

    pub fn find_config_file(start_path: &Path) -> Result<PathBuf> {
        let mut current = start_path.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(config_path);
            }
            if !current.pop() {
                return Err(PantryError::NotInitialized);
            }
        }
    }

    pub fn database_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.database.path)
    }

    pub fn log_path(&self, project_root: &Path) -> Option<PathBuf> {
        self.log.file.as_ref().map(|f| project_root.join(f))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = PantryConfig::default();
        assert_eq!(config.database.path, "pantry.db");
        assert_eq!(config.server.addr(), "127.0.0.1:4000");
        assert_eq!(config.log.file, None);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: PantryConfig = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.path, "pantry.db");
    }

    #[test]
    fn test_load_searches_upward() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[database]\npath = \"data/kitchen.db\"\n",
        )
        .unwrap();

        let (config, root) = PantryConfig::load(&nested).unwrap();
        assert_eq!(root, temp_dir.path());
        assert_eq!(
            config.database_path(&root),
            temp_dir.path().join("data").join("kitchen.db")
        );
    }

    #[test]
    fn test_load_without_config_is_not_initialized() {
        let temp_dir = TempDir::new().unwrap();
        let err = PantryConfig::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, PantryError::NotInitialized));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        let mut config = PantryConfig::default();
        config.log.file = Some("logs/pantry.log".to_string());

        config.save(&path).unwrap();
        let (loaded, root) = PantryConfig::load_from(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(
            loaded.log_path(&root),
            Some(temp_dir.path().join("logs").join("pantry.log"))
        );
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[server\nport = ").unwrap();

        let err = PantryConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, PantryError::TomlParse(_)));
    }
}
