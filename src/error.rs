//! Error types for the payment client
//!
//! Every failure surfaced by the client falls into one of three categories:
//! validation errors caught before a request is sent, business errors reported
//! by the backend, and network errors. None of them are retried.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Message shown when the payment service cannot be reached
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to reach the payment service. Please check your connection and try again.";

/// Result type for client operations
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Error)]
pub enum AppErrorKind {
    /// Request rejected client-side, nothing was sent
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Error payload returned by the backend
    #[error("{message}")]
    Business {
        message: String,
        details: Option<Value>,
        status: Option<u16>,
    },

    /// Transport failure, timeout or undecodable response
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub context: Option<String>,
}

impl AppError {
    pub fn new(kind: AppErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Validation {
            field: field.into(),
            message: message.into(),
        })
    }

    pub fn business(message: impl Into<String>, details: Option<Value>, status: Option<u16>) -> Self {
        Self::new(AppErrorKind::Business {
            message: message.into(),
            details,
            status,
        })
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Network {
            message: message.into(),
        })
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Configuration {
            message: message.into(),
        })
    }

    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind, AppErrorKind::Validation { .. })
    }

    pub fn is_business(&self) -> bool {
        matches!(self.kind, AppErrorKind::Business { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self.kind, AppErrorKind::Network { .. })
    }

    /// Text suitable for showing to the customer.
    ///
    /// Backend messages are passed through verbatim; network failures collapse
    /// to the generic connectivity message.
    pub fn user_message(&self) -> String {
        match &self.kind {
            AppErrorKind::Validation { message, .. } => message.clone(),
            AppErrorKind::Business { message, .. } => message.clone(),
            AppErrorKind::Network { .. } => CONNECTIVITY_MESSAGE.to_string(),
            AppErrorKind::Configuration { message } => message.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{} ({})", self.kind, context),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::network(format!("request timed out: {}", err))
        } else if err.is_decode() {
            AppError::network(format!("invalid response body: {}", err))
        } else {
            AppError::network(format!("request error: {}", err))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::network(format!("JSON error: {}", err))
    }
}
