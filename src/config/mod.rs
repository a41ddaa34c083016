#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

use crate::utils::error::{FlightError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;
pub const DEFAULT_ERROR_BODY_LIMIT: usize = 8 << 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub sources: SourcesConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub flights: SourceEndpoint,
    pub flight_to_book: SourceEndpoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEndpoint {
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_error_body_limit")]
    pub error_body_limit: usize,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_error_body_limit() -> usize {
    DEFAULT_ERROR_BODY_LIMIT
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            error_body_limit: DEFAULT_ERROR_BODY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    pub fn new(flights_url: impl Into<String>, flight_to_book_url: impl Into<String>) -> Self {
        Self {
            sources: SourcesConfig {
                flights: SourceEndpoint {
                    endpoint: flights_url.into(),
                },
                flight_to_book: SourceEndpoint {
                    endpoint: flight_to_book_url.into(),
                },
            },
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FlightError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FlightError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FLIGHTS_HOST})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            FlightError::ConfigValidationError {
                field: "environment".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Builds the endpoints from `JSERVER1_NAME`/`JSERVER1_PORT` (flights)
    /// and `JSERVER2_NAME`/`JSERVER2_PORT` (flight_to_book).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let endpoint = |name_key: &str, port_key: &str, path: &str| -> Result<String> {
            let name = lookup(name_key).filter(|v| !v.is_empty());
            let port = lookup(port_key).filter(|v| !v.is_empty());
            let name = validation::validate_required_field(name_key, &name)?;
            let port = validation::validate_required_field(port_key, &port)?;
            Ok(format!("http://{}:{}/{}", name, port, path))
        };

        let mut config = Self::new(
            endpoint("JSERVER1_NAME", "JSERVER1_PORT", "flights")?,
            endpoint("JSERVER2_NAME", "JSERVER2_PORT", "flight_to_book")?,
        );

        if let Some(timeout) = lookup("HTTP_TIMEOUT_SECONDS") {
            config.http.timeout_seconds =
                timeout
                    .parse()
                    .map_err(|_| FlightError::InvalidConfigValueError {
                        field: "HTTP_TIMEOUT_SECONDS".to_string(),
                        value: timeout.clone(),
                        reason: "Expected a whole number of seconds".to_string(),
                    })?;
        }

        Ok(config)
    }

    pub fn flights_url(&self) -> &str {
        &self.sources.flights.endpoint
    }

    pub fn flight_to_book_url(&self) -> &str {
        &self.sources.flight_to_book.endpoint
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    pub fn error_body_limit(&self) -> usize {
        self.http.error_body_limit
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("sources.flights.endpoint", self.flights_url())?;
        validation::validate_url(
            "sources.flight_to_book.endpoint",
            self.flight_to_book_url(),
        )?;
        validation::validate_range("http.timeout_seconds", self.http.timeout_seconds, 1, 300)?;
        validation::validate_positive_number("http.error_body_limit", self.http.error_body_limit, 1)?;
        Ok(())
    }
}
