//! CLI configuration: where the tracker database and log files live.
//!
//! Read from `config.toml` in the platform config directory, or from the
//! directory named by `MEDTRACK_CONFIG_PATH`. A missing file means defaults.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "medtrack";
const CONFIG_PATH_ENV: &str = "MEDTRACK_CONFIG_PATH";
const DB_FILE_NAME: &str = "medtrack.sqlite3";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `trace|debug|info|warn|error`; build-mode default when unset.
    pub level: Option<String>,
    /// Absolute directory for rolling log files.
    pub dir: Option<PathBuf>,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME).context("Could not determine home directory")
}

pub fn get_config_dir() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    Ok(project_dirs()?.config_dir().to_path_buf())
}

pub fn get_config_file() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

fn get_data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

pub fn get_db_path(config: &Config) -> Result<PathBuf> {
    if let Some(path) = &config.storage.db_path {
        return Ok(path.clone());
    }
    Ok(get_data_dir()?.join(DB_FILE_NAME))
}

pub fn get_log_dir(config: &Config) -> Result<PathBuf> {
    if let Some(path) = &config.logging.dir {
        return Ok(path.clone());
    }
    Ok(get_data_dir()?.join("logs"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_file()?)
}

pub fn load_config_from(config_file: &Path) -> Result<Config> {
    if !config_file.exists() {
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(config_file)
        .with_context(|| format!("Failed to read config file: {}", config_file.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", config_file.display()))
}

#[cfg(test)]
mod tests {
    use super::{get_db_path, get_log_dir, load_config_from, Config};
    use std::path::PathBuf;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_fills_remaining_sections_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "[storage]\ndb_path = \"/data/family.sqlite3\"\n").unwrap();

        let config = load_config_from(&file).unwrap();

        assert_eq!(
            get_db_path(&config).unwrap(),
            PathBuf::from("/data/family.sqlite3")
        );
        assert_eq!(config.logging.level, None);
    }

    #[test]
    fn explicit_log_dir_wins() {
        let mut config = Config::default();
        config.logging.dir = Some(PathBuf::from("/var/log/medtrack"));
        assert_eq!(
            get_log_dir(&config).unwrap(),
            PathBuf::from("/var/log/medtrack")
        );
    }

    #[test]
    fn malformed_file_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "[storage\n").unwrap();

        let err = load_config_from(&file).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
