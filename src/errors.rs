// ABOUTME: Unified error handling with structured error codes for the planning engine
// ABOUTME: Maps domain failures onto stable codes and HTTP-compatible statuses
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Error Handling
//!
//! Every fallible operation returns [`AppResult`]. Errors carry a stable
//! [`ErrorCode`] so callers can branch on category without string matching,
//! plus optional context (user, resource) and a source chain for logs.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Result type used throughout the engine
pub type AppResult<T> = Result<T, AppError>;

/// Stable error codes, grouped by category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Operation not permitted for this user
    #[serde(rename = "auth_permission_denied")]
    PermissionDenied = 1004,

    /// Request input failed validation
    #[serde(rename = "validation_invalid_input")]
    InvalidInput = 3000,

    /// A required field is absent
    #[serde(rename = "validation_missing_field")]
    MissingRequiredField = 3001,

    /// A numeric value is outside its accepted range
    #[serde(rename = "validation_out_of_range")]
    ValueOutOfRange = 3003,

    /// The requested resource does not exist
    #[serde(rename = "resource_not_found")]
    ResourceNotFound = 4000,

    /// An upstream dependency failed
    #[serde(rename = "external_service_error")]
    ExternalServiceError = 5000,

    /// Unclassified internal failure
    #[serde(rename = "internal_error")]
    InternalError = 9000,

    /// Storage layer failure
    #[serde(rename = "internal_database_error")]
    DatabaseError = 9001,
}

impl ErrorCode {
    /// HTTP status code this error maps to at the API boundary
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::ValueOutOfRange => 400,
            Self::PermissionDenied => 403,
            Self::ResourceNotFound => 404,
            Self::ExternalServiceError => 502,
            Self::InternalError | Self::DatabaseError => 500,
        }
    }

    /// Human-readable description of the error category
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::PermissionDenied => "Permission denied",
            Self::InvalidInput => "Invalid input provided",
            Self::MissingRequiredField => "Required field is missing",
            Self::ValueOutOfRange => "Value is outside the accepted range",
            Self::ResourceNotFound => "Resource not found",
            Self::ExternalServiceError => "External service error",
            Self::InternalError => "Internal error",
            Self::DatabaseError => "Database error",
        }
    }
}

/// Optional structured context attached to an error
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// User involved in the failing operation
    pub user_id: Option<Uuid>,
    /// Identifier of the resource involved
    pub resource_id: Option<String>,
}

/// Application error with a stable code, message, and optional context
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AppError {
    /// Stable error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Structured context for logs and API responses
    pub context: ErrorContext,
    /// Underlying cause, when one exists
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create an error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Invalid input
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing required field
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("required field missing: {field}"),
        )
    }

    /// Value outside its accepted range
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Resource does not exist
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorCode::ResourceNotFound, format!("{resource} not found"))
    }

    /// Operation not permitted
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Storage layer failure
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Unclassified internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Attach the user involved in the operation
    #[must_use]
    pub const fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.context.user_id = Some(user_id);
        self
    }

    /// Attach the identifier of the resource involved
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Attach the underlying cause
    #[must_use]
    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// HTTP status code this error maps to
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::not_found("Row").with_source(error),
            other => Self::database(other.to_string()).with_source(other),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self {
            code: ErrorCode::InternalError,
            message: error.to_string(),
            context: ErrorContext::default(),
            source: Some(error.into()),
        }
    }
}
