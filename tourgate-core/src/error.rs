//! Unified error handling for the core crate
//!
//! Structured error types with context and recovery suggestions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

pub type TourgateResult<T> = Result<T, TourgateError>;

/// Error context providing additional information for debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the core crate
#[derive(Error, Debug)]
pub enum TourgateError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        /// Environment variable or field that failed
        key: Option<String>,
        context: ErrorContext,
    },

    #[error("Logging setup error: {message}")]
    Logging {
        message: String,
        context: ErrorContext,
    },
}

impl TourgateError {
    /// Build a configuration error for a specific environment key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        TourgateError::Config {
            message: message.into(),
            key: Some(key.to_string()),
            context: ErrorContext::new("config")
                .with_operation("load")
                .with_suggestion(&format!("Check the value of {}", key)),
        }
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            TourgateError::Config { context, .. } | TourgateError::Logging { context, .. } => {
                context
            }
        }
    }

    /// Log the error with its tracking id
    pub fn log(&self) {
        error!(
            error_id = %self.context().error_id,
            error = %self,
            "Core error occurred"
        );
    }
}
