use crate::error::{AppError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::ConfigError(format!(
                "Invalid STORE_BACKEND value: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
    pub backend: StoreBackend,
}

/// `None` means any origin is accepted.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Option<Vec<String>>,
}

impl CorsConfig {
    fn parse(value: &str) -> Self {
        let origins: Vec<String> = value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            Self {
                allowed_origins: None,
            }
        } else {
            Self {
                allowed_origins: Some(origins),
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "mongodb://localhost:27017".to_string(),
                name: "appdb".to_string(),
                backend: StoreBackend::MongoDb,
            },
            cors: CorsConfig {
                allowed_origins: None,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or(defaults.server.host),
                port: match env::var("PORT") {
                    Ok(port) => port
                        .parse()
                        .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                    Err(_) => defaults.server.port,
                },
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                name: env::var("DATABASE_NAME").unwrap_or(defaults.database.name),
                backend: match env::var("STORE_BACKEND") {
                    Ok(backend) => StoreBackend::parse(&backend)?,
                    Err(_) => defaults.database.backend,
                },
            },
            cors: CorsConfig::parse(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string())),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
