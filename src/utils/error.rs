use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// 取得 discovery document 或 access token 失敗
    #[error("{message}")]
    AccessTokenError { status: Option<u16>, message: String },

    /// REST API 回傳非成功狀態碼
    #[error("{message}")]
    RestApiError { api_path: String, message: String },

    #[error("Unexpected response from {api_path}: {message}")]
    UnexpectedResponseError { api_path: String, message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Api,
    Network,
    Data,
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

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::AccessTokenError { .. } => ErrorCategory::Authentication,
            ClientError::RestApiError { .. } => ErrorCategory::Api,
            ClientError::HttpError(_) => ErrorCategory::Network,
            ClientError::UnexpectedResponseError { .. } | ClientError::SerializationError(_) => {
                ErrorCategory::Data
            }
            ClientError::UrlError(_)
            | ClientError::ConfigError { .. }
            | ClientError::ConfigValidationError { .. }
            | ClientError::MissingConfigError { .. }
            | ClientError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ClientError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Authentication | ErrorCategory::Api | ErrorCategory::Data => {
                ErrorSeverity::High
            }
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 根據嚴重程度決定 CLI 的退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// The failing request URL, when the error came from a REST call.
    pub fn api_path(&self) -> Option<&str> {
        match self {
            ClientError::RestApiError { api_path, .. }
            | ClientError::UnexpectedResponseError { api_path, .. } => Some(api_path),
            ClientError::HttpError(e) => e.url().map(|u| u.as_str()),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        format!("Failed to complete: {}", self)
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ClientError::AccessTokenError { status: Some(400), .. }
            | ClientError::AccessTokenError { status: Some(401), .. } => {
                "Check the client id, client secret and scope registered for this REST API client"
            }
            ClientError::AccessTokenError { .. } => {
                "Check that the domain points at an iSAMS host and that its /auth endpoint is reachable"
            }
            ClientError::RestApiError { .. } => {
                "Check that the API client has been granted the humanresources scopes it needs"
            }
            ClientError::UnexpectedResponseError { .. } | ClientError::SerializationError(_) => {
                "The server returned a payload this client does not understand; check the API version"
            }
            ClientError::HttpError(_) => "Check network connectivity and try again",
            ClientError::IoError(_) => "Check file permissions and paths",
            _ => "Review the configuration file and command line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
