use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub request: RequestConfig,
    pub mock: MockConfig,
}

/// Backend selection for the API facade
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub use_mock: bool,
    /// Bearer token seeded into storage at start-up.
    pub token: Option<String>,
}

/// Durable client storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
}

/// Mock provider configuration
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url =
            env::var("KG_API_BASE_URL").unwrap_or_else(|_| ApiConfig::default().base_url);
        if base_url.trim().is_empty() {
            return Err(AppError::Config {
                message: "KG_API_BASE_URL must not be empty".to_string(),
            });
        }

        let api = ApiConfig {
            base_url,
            use_mock: env::var("KG_USE_MOCK")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            token: env::var("KG_API_TOKEN").ok().filter(|t| !t.is_empty()),
        };

        let storage = StorageConfig {
            path: PathBuf::from(
                env::var("KG_STORAGE_PATH").unwrap_or_else(|_| "./data/kg-explorer.db".to_string()),
            ),
            max_connections: env::var("KG_STORAGE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10000),
        };

        let mock = MockConfig {
            delay_ms: env::var("MOCK_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(500),
        };

        Ok(Config {
            api,
            storage,
            logging,
            request,
            mock,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            use_mock: false,
            token: None,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout_ms: 10000 }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self { delay_ms: 500 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("off"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ApiConfig::default().base_url, "http://localhost:8000");
        assert!(!ApiConfig::default().use_mock);
        assert_eq!(RequestConfig::default().timeout_ms, 10000);
        assert_eq!(MockConfig::default().delay_ms, 500);
    }
}
