//! Domain-level error envelope.
//!
//! Transport agnostic: the HTTP adapter maps these into response payloads
//! and status codes. Callers distinguish failure categories by [`ErrorCode`]
//! rather than by matching message strings, which keeps the injected-failure
//! path testable.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested record does not exist.
    NotFound,
    /// The simulated backend injected a transient failure; retrying may
    /// succeed.
    Unavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use userdesk::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "not_found")]
    code: ErrorCode,
    #[schema(example = "User with ID 99 not found.")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The supplied message was empty after trimming.
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Create a new error, panicking if validation fails.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Error raised when the fault injector fails an operation before it
    /// reaches the record store.
    ///
    /// The operation name feeds the retry hint in the message, e.g.
    /// `injected("fetch users")` yields
    /// `"Failed to fetch users. Please try again."`.
    pub fn injected(operation: impl AsRef<str>) -> Self {
        let operation = operation.as_ref();
        Self::new(
            ErrorCode::Unavailable,
            format!("Failed to {operation}. Please try again."),
        )
        .with_details(json!({ "operation": operation, "code": "injected_failure" }))
    }

    /// Whether this error came from the fault injector.
    #[must_use]
    pub fn is_injected(&self) -> bool {
        self.code == ErrorCode::Unavailable
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_rejects_blank_messages() {
        assert_eq!(
            Error::try_new(ErrorCode::NotFound, "   "),
            Err(ErrorValidationError::EmptyMessage)
        );
    }

    #[test]
    fn injected_errors_carry_the_operation() {
        let err = Error::injected("delete user with ID 7");
        assert!(err.is_injected());
        assert_eq!(
            err.message(),
            "Failed to delete user with ID 7. Please try again."
        );
        let details = err.details().expect("details present");
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("injected_failure")
        );
    }

    #[test]
    fn serialises_snake_case_codes() {
        let err = Error::invalid_request("bad");
        let value = serde_json::to_value(&err).expect("serialise error");
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some("invalid_request")
        );
        assert!(value.get("details").is_none());
    }
}
