//! Error types and handling for the `AirDash` application

use std::collections::HashMap;
use thiserror::Error;

/// Machine-readable classification of upstream API failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Transport failure or unexpected HTTP status
    ApiNetworkError,
    /// Response body could not be decoded
    ApiInvalidResponse,
    /// Geocoding miss or HTTP 404
    ApiLocationNotFound,
    /// HTTP 429 from the service
    ApiRateLimit,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ApiNetworkError => "api_network_error",
            ErrorCode::ApiInvalidResponse => "api_invalid_response",
            ErrorCode::ApiLocationNotFound => "api_location_not_found",
            ErrorCode::ApiRateLimit => "api_rate_limit",
        }
    }
}

/// Main error type for the `AirDash` application
#[derive(Error, Debug)]
pub enum AirDashError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api {
        message: String,
        code: ErrorCode,
        context: HashMap<String, String>,
    },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AirDashError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error classified as a network failure
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::api_with_context(message, ErrorCode::ApiNetworkError, HashMap::new())
    }

    /// Create a new API error with an error code and diagnostic context
    pub fn api_with_context<S: Into<String>>(
        message: S,
        code: ErrorCode,
        context: HashMap<String, String>,
    ) -> Self {
        Self::Api {
            message: message.into(),
            code,
            context,
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Error code for API failures, `None` for everything else
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            AirDashError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AirDashError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file.")
            }
            AirDashError::Api {
                code: ErrorCode::ApiLocationNotFound,
                message,
                ..
            } => message.clone(),
            AirDashError::Api {
                code: ErrorCode::ApiRateLimit,
                ..
            } => "The air quality service is rate limiting requests. Please try again later."
                .to_string(),
            AirDashError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            AirDashError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            AirDashError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

/// User-facing text for any error in an `anyhow` chain
#[must_use]
pub fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<AirDashError>() {
        Some(e) => e.user_message(),
        None => err.to_string(),
    }
}
