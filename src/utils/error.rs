use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Fetch failed for {url}: {message}")]
    FetchError { url: String, message: String },

    #[error("Invalid selector '{expr}': {message}")]
    SelectorError { expr: String, message: String },

    #[error("Authorization failed: {message}")]
    AuthError { message: String },

    #[error("Sending reply failed with status {status}: {message}")]
    SendError { status: u16, message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid chat payload: {message}")]
    PayloadError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
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
    Parsing,
    Authentication,
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

impl MenuError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MenuError::FetchError { .. } | MenuError::ApiError(_) | MenuError::SendError { .. } => {
                ErrorCategory::Network
            }
            MenuError::SelectorError { .. }
            | MenuError::SerializationError(_)
            | MenuError::PayloadError { .. } => ErrorCategory::Parsing,
            MenuError::AuthError { .. } => ErrorCategory::Authentication,
            MenuError::ConfigValidationError { .. }
            | MenuError::InvalidConfigValueError { .. }
            | MenuError::MissingConfigError { .. } => ErrorCategory::Configuration,
            MenuError::IoError(_) => ErrorCategory::System,
        }
    }

    /// 單一網站或單一星期的失敗只會讓答案變少，不會中斷請求
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MenuError::FetchError { .. } | MenuError::SelectorError { .. } => ErrorSeverity::Low,
            MenuError::PayloadError { .. } => ErrorSeverity::Low,
            MenuError::ApiError(_) | MenuError::SendError { .. } => ErrorSeverity::Medium,
            MenuError::AuthError { .. } | MenuError::SerializationError(_) => ErrorSeverity::High,
            MenuError::ConfigValidationError { .. }
            | MenuError::InvalidConfigValueError { .. }
            | MenuError::MissingConfigError { .. }
            | MenuError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.severity() <= ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MenuError::FetchError { .. } => "Check that the site URL is reachable from this host",
            MenuError::SelectorError { .. } => {
                "Fix the day path expression in the site list; only a subset of XPath is supported"
            }
            MenuError::AuthError { .. } => "Verify the bot client id, secret and auth URL",
            MenuError::SendError { .. } => "Check the messaging API URL and activity endpoint",
            MenuError::ApiError(_) => "Check network connectivity and retry",
            MenuError::IoError(_) => "Check that the file exists and is readable",
            MenuError::SerializationError(_) | MenuError::PayloadError { .. } => {
                "Check that the payload is valid JSON in the expected shape"
            }
            MenuError::ConfigValidationError { .. }
            | MenuError::InvalidConfigValueError { .. }
            | MenuError::MissingConfigError { .. } => "Review the settings and site list files",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MenuError::FetchError { url, .. } => format!("Could not load menu page {}", url),
            MenuError::SelectorError { expr, .. } => format!("Menu selector '{}' is invalid", expr),
            MenuError::AuthError { .. } => "Could not obtain a bot access token".to_string(),
            MenuError::SendError { status, .. } => {
                format!("Messaging API rejected the reply (HTTP {})", status)
            }
            MenuError::ConfigValidationError { field, .. }
            | MenuError::InvalidConfigValueError { field, .. }
            | MenuError::MissingConfigError { field } => {
                format!("Configuration problem in '{}'", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MenuError>;
