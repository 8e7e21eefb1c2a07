// ABOUTME: Unified error handling for the workout session engine
// ABOUTME: Defines ErrorCode, AppError, AppResult and the mapping from session errors to codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error handling
//!
//! Every fallible operation in the session engine returns [`AppResult`].
//! Rejected inputs raised by the state machine are [`SessionError`]s and keep
//! their typed form as the source of the [`AppError`] they convert into, so
//! callers can match on the code and still downcast to the session failure.

mod session;

pub use session::SessionError;

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Stable error codes surfaced by the session engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Account tier or device permission does not allow the action
    PermissionDenied = 1004,
    /// Input failed validation
    InvalidInput = 3000,
    /// Numeric input outside the accepted range
    ValueOutOfRange = 3003,
    /// Input not accepted in the current session state
    InvalidTransition = 3004,
    /// Workout or record does not exist
    ResourceNotFound = 4000,
    /// Camera or stream cannot be used right now
    ResourceUnavailable = 4003,
    /// Log store, achievement service or loader failed
    ExternalServiceError = 5000,
    /// Timing or template settings are inconsistent
    ConfigInvalid = 6002,
    /// Runtime plumbing failed
    InternalError = 9000,
    /// Media upload failed
    StorageError = 9002,
}

impl ErrorCode {
    /// Short text shown ahead of the error message
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Not allowed",
            Self::InvalidInput => "Invalid input",
            Self::ValueOutOfRange => "Value out of range",
            Self::InvalidTransition => "Not available at this point of the workout",
            Self::ResourceNotFound => "Not found",
            Self::ResourceUnavailable => "Temporarily unavailable",
            Self::ExternalServiceError => "Service error",
            Self::ConfigInvalid => "Invalid configuration",
            Self::InternalError => "Internal error",
            Self::StorageError => "Upload failed",
        }
    }
}

impl SessionError {
    /// Code reported when this error crosses the runtime boundary
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidTransition { .. } | Self::NoPendingLog => ErrorCode::InvalidTransition,
            Self::ExerciseOutOfRange { .. } => ErrorCode::ResourceNotFound,
            Self::ExerciseAlreadyCompleted { .. } | Self::StageIncomplete { .. } => {
                ErrorCode::InvalidInput
            }
            Self::RecordingNotPermitted | Self::PhotoNotPermitted => ErrorCode::PermissionDenied,
            Self::InvalidWeight { .. } => ErrorCode::ValueOutOfRange,
        }
    }
}

/// Error type returned by collaborators and the session runtime
#[derive(Debug)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Underlying typed error, if any
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl AppError {
    /// Create an error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Named resource was not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Permission refused by the account tier or the device
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Device or stream unavailable
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceUnavailable, message)
    }

    /// Collaborator failure, prefixed with the collaborator name
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Upload failure
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Runtime failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The session error this was converted from, if any
    #[must_use]
    pub fn session_error(&self) -> Option<&SessionError> {
        self.source.as_deref()?.downcast_ref::<SessionError>()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

/// Result alias used across the engine
pub type AppResult<T> = Result<T, AppError>;

impl From<SessionError> for AppError {
    fn from(error: SessionError) -> Self {
        Self {
            code: error.code(),
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::InvalidTransition).unwrap();
        assert_eq!(json, "\"INVALID_TRANSITION\"");
        let json = serde_json::to_string(&ErrorCode::ConfigInvalid).unwrap();
        assert_eq!(json, "\"CONFIG_INVALID\"");
    }

    #[test]
    fn test_session_error_conversion_keeps_source() {
        let error = AppError::from(SessionError::RecordingNotPermitted);
        assert_eq!(error.code, ErrorCode::PermissionDenied);
        assert!(error.source().is_some());
        assert_eq!(
            error.session_error(),
            Some(&SessionError::RecordingNotPermitted)
        );
    }

    #[test]
    fn test_plain_errors_have_no_session_source() {
        let error = AppError::storage("bucket offline");
        assert!(error.session_error().is_none());
        assert_eq!(error.to_string(), "Upload failed: bucket offline");
    }
}
