use thiserror::Error;

#[derive(Error, Debug)]
pub enum BiggError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Not found: {url}")]
    NotFound { url: String },

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid {field} '{value}': {reason}")]
    InvalidIdentifier {
        field: String,
        value: String,
        reason: String,
    },

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
    Network,
    Api,
    Data,
    Storage,
    Input,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BiggError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BiggError::Transport(_) => ErrorCategory::Network,
            BiggError::NotFound { .. } | BiggError::HttpStatus { .. } => ErrorCategory::Api,
            BiggError::MalformedResponse { .. }
            | BiggError::Serialization(_)
            | BiggError::Csv(_) => ErrorCategory::Data,
            BiggError::Io(_) => ErrorCategory::Storage,
            BiggError::InvalidIdentifier { .. } => ErrorCategory::Input,
            BiggError::ConfigValidationError { .. }
            | BiggError::InvalidConfigValueError { .. }
            | BiggError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BiggError::NotFound { .. } => ErrorSeverity::Low,
            BiggError::Transport(_) | BiggError::HttpStatus { .. } => ErrorSeverity::Medium,
            BiggError::MalformedResponse { .. }
            | BiggError::Serialization(_)
            | BiggError::Csv(_)
            | BiggError::InvalidIdentifier { .. } => ErrorSeverity::High,
            BiggError::Io(_)
            | BiggError::ConfigValidationError { .. }
            | BiggError::InvalidConfigValueError { .. }
            | BiggError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BiggError::NotFound { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your network connection and the configured API URL",
            ErrorCategory::Api => "Check that the identifier exists in BiGG (ids are case sensitive)",
            ErrorCategory::Data => "The server response did not match the expected format; check the API version",
            ErrorCategory::Storage => "Check that the output directory exists and is writable",
            ErrorCategory::Input => "Identifiers must be non-empty and contain no whitespace or '/'",
            ErrorCategory::Configuration => "Fix the configuration file or command line options",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BiggError::Transport(_) => "Could not reach the BiGG server".to_string(),
            BiggError::NotFound { url } => format!("Nothing found at {}", url),
            BiggError::HttpStatus { status, .. } => {
                format!("The BiGG server answered with status {}", status)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BiggError>;
