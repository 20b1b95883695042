use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocalisError {
    #[error("Metering API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Metering API error: {status} - {detail}")]
    MeteringApi { status: u16, detail: String },

    #[error("Unexpected metering response: {detail}")]
    UnexpectedResponse { detail: String },

    #[error("Metering operation not implemented: {operation}")]
    NotImplemented { operation: String },

    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Insufficient credits: need {needed}, have {available}")]
    InsufficientCredits { needed: u64, available: u64 },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Email delivery failed: {message}")]
    EmailError { message: String },
}

pub type Result<T> = std::result::Result<T, VocalisError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Upstream,
    Validation,
    Storage,
    Notification,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl VocalisError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_)
            | Self::MeteringApi { .. }
            | Self::UnexpectedResponse { .. }
            | Self::NotImplemented { .. } => ErrorCategory::Upstream,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::UrlParse(_) => ErrorCategory::Configuration,
            Self::ValidationError { .. }
            | Self::InsufficientCredits { .. }
            | Self::Unauthorized { .. }
            | Self::NotFound { .. } => ErrorCategory::Validation,
            Self::DatabaseError(_) | Self::IoError(_) => ErrorCategory::Storage,
            Self::EmailError { .. } => ErrorCategory::Notification,
            Self::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError { .. }
            | Self::InsufficientCredits { .. }
            | Self::Unauthorized { .. }
            | Self::NotFound { .. } => ErrorSeverity::Low,
            Self::EmailError { .. } => ErrorSeverity::Medium,
            Self::Http(_)
            | Self::MeteringApi { .. }
            | Self::UnexpectedResponse { .. }
            | Self::NotImplemented { .. }
            | Self::SerializationError(_) => ErrorSeverity::High,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::UrlParse(_)
            | Self::DatabaseError(_)
            | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Http(_) | Self::MeteringApi { .. } => {
                "Check network connectivity and the Metronome API status, then retry"
            }
            Self::UnexpectedResponse { .. } => {
                "The Metronome API returned an unexpected shape; check for API changes"
            }
            Self::NotImplemented { .. } => {
                "Set metronome.api_key so the real metering client replaces the stub"
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::UrlParse(_) => {
                "Fix the configuration file or the referenced environment variables"
            }
            Self::ValidationError { .. } => "Correct the request fields and resubmit",
            Self::InsufficientCredits { .. } => "Purchase more credits or enable auto-recharge",
            Self::Unauthorized { .. } => "Verify the shared webhook secret on both sides",
            Self::NotFound { .. } => "Verify the identifier and try again",
            Self::DatabaseError(_) | Self::IoError(_) => {
                "Check disk space and file permissions for the data directory"
            }
            Self::EmailError { .. } => "Verify the email provider settings and API key",
            Self::SerializationError(_) => "Report this; a payload could not be encoded or decoded",
        }
    }

    /// Message safe to show to an end user (no internal detail).
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Http(_) | Self::MeteringApi { .. } | Self::UnexpectedResponse { .. } => {
                "The billing service could not be reached. Please try again shortly.".to_string()
            }
            Self::NotImplemented { .. } => "Metering integration not implemented".to_string(),
            Self::ValidationError { message } => message.clone(),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid {field}: {reason}")
            }
            Self::InsufficientCredits { needed, available } => {
                format!("Insufficient credits: need {needed}, have {available}")
            }
            Self::Unauthorized { .. } => "Unauthorized".to_string(),
            Self::NotFound { resource } => format!("{resource} not found"),
            _ => "Something went wrong on our side. Please try again.".to_string(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::InsufficientCredits { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::NotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
            Self::Http(_) | Self::MeteringApi { .. } | Self::UnexpectedResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for VocalisError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("❌ {} (category: {:?})", self, self.category());
        } else {
            tracing::warn!("⚠️ {}", self);
        }
        let body = Json(serde_json::json!({ "error": self.user_friendly_message() }));
        (status, body).into_response()
    }
}
