use crate::error::AppError;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub uri: Secret<String>,
    pub db_name: String,
}

/// Startup CSV import source. `csv_path = None` skips the import.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    pub csv_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = get_env("PORT", Some("8080"))?
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid PORT: {}", e)))?;

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                uri: Secret::new(get_env("MONGODB_URI", None)?),
                db_name: get_env("DATABASE_NAME", Some("payments"))?,
            },
            import: ImportConfig {
                csv_path: env::var("CSV_FILE_PATH").ok(),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but not set",
                key
            ))),
        },
    }
}
