use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlightError {
    #[error("Decode error ({source_name}): {message}")]
    Decode { source_name: String, message: String },

    #[error("Upstream request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("flight not found")]
    FlightNotFound,

    #[error("flights not found")]
    FlightsNotFound,

    #[error("operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Upstream,
    Decode,
    NotFound,
    Cancelled,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FlightError {
    pub fn decode(source_name: &str, message: impl Into<String>) -> Self {
        FlightError::Decode {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    pub fn transport(url: &str, message: impl Into<String>) -> Self {
        FlightError::Transport {
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// Decode and transport failures abort any aggregate call they occur in.
    pub fn is_hard(&self) -> bool {
        matches!(
            self,
            FlightError::Decode { .. } | FlightError::Transport { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FlightError::FlightNotFound | FlightError::FlightsNotFound
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FlightError::Transport { .. } => ErrorCategory::Upstream,
            FlightError::Decode { .. } | FlightError::SerializationError(_) => {
                ErrorCategory::Decode
            }
            FlightError::FlightNotFound | FlightError::FlightsNotFound => ErrorCategory::NotFound,
            FlightError::Cancelled => ErrorCategory::Cancelled,
            FlightError::ConfigValidationError { .. }
            | FlightError::InvalidConfigValueError { .. }
            | FlightError::MissingConfigError { .. } => ErrorCategory::Configuration,
            FlightError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Upstream | ErrorCategory::Cancelled => ErrorSeverity::Medium,
            ErrorCategory::Decode | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FlightError::Decode { source_name, .. } => {
                format!("The '{}' provider returned data that could not be read", source_name)
            }
            FlightError::Transport { url, .. } => {
                format!("Could not reach the flight provider at {}", url)
            }
            FlightError::FlightNotFound => "No matching flight was found".to_string(),
            FlightError::FlightsNotFound => "No matching flights were found".to_string(),
            FlightError::Cancelled => "The request was cancelled".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Upstream => "Check that both provider endpoints are up and reachable",
            ErrorCategory::Decode => "Verify the provider payload matches the expected schema",
            ErrorCategory::NotFound => "Try a different identifier or search criteria",
            ErrorCategory::Cancelled => "Re-run the command",
            ErrorCategory::Configuration => "Review the configuration file and environment",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, FlightError>;
