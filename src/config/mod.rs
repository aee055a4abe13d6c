use std::path::PathBuf;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,
    /// Directory where uploaded property images are copied
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,
    /// File receiving the tracing output while the terminal UI owns stdout
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,
    /// Log every SQL statement at debug level
    #[serde(default)]
    pub log_sql: bool,
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("realty_manager.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first when the file exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}
