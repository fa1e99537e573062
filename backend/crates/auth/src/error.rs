//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
///
/// Validation-shaped errors map deterministically to 4xx status codes and
/// are never retried. Dependency failures map to 503 and are the only class
/// eligible for a bounded retry.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login failed - deliberately uniform, regardless of cause
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer token on a guarded request
    #[error("Authentication required")]
    Unauthenticated,

    /// Access token signature valid but past its expiry
    #[error("Access token expired")]
    ExpiredToken,

    /// Token signature invalid or payload unparseable
    #[error("Invalid token")]
    InvalidToken,

    /// Token carries no subject claim
    #[error("Token has no subject")]
    MissingSubject,

    /// No refresh record for this user
    #[error("No active session")]
    NoSession,

    /// Identity provider rejected the stored refresh artifact
    #[error("Session is no longer valid")]
    InvalidSession,

    /// No stored challenge for this ceremony (unknown, consumed, or
    /// scoped to a different user)
    #[error("No pending challenge for this ceremony")]
    NoPendingChallenge,

    /// Client echoed a challenge that does not match the stored one
    #[error("Challenge does not match")]
    ChallengeMismatch,

    /// Stored challenge outlived its TTL
    #[error("Challenge expired")]
    ChallengeExpired,

    /// clientDataJSON failed to decode or parse
    #[error("Malformed client data")]
    MalformedClientData,

    /// Request field validation error
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Credential ID already registered
    #[error("Credential is already registered")]
    CredentialInUse,

    /// Identity provider transport failure or 5xx
    #[error("Identity provider unavailable")]
    IdentityProviderUnavailable,

    /// Session/credential store unreachable
    #[error("Store unavailable")]
    StoreUnavailable,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::Unauthenticated
            | AuthError::ExpiredToken
            | AuthError::InvalidToken
            | AuthError::MissingSubject
            | AuthError::NoSession
            | AuthError::InvalidSession => StatusCode::UNAUTHORIZED,
            AuthError::NoPendingChallenge
            | AuthError::ChallengeMismatch
            | AuthError::ChallengeExpired
            | AuthError::MalformedClientData
            | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::CredentialInUse => StatusCode::CONFLICT,
            AuthError::IdentityProviderUnavailable
            | AuthError::StoreUnavailable
            | AuthError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials
            | AuthError::Unauthenticated
            | AuthError::ExpiredToken
            | AuthError::InvalidToken
            | AuthError::MissingSubject
            | AuthError::NoSession
            | AuthError::InvalidSession => ErrorKind::Unauthorized,
            AuthError::NoPendingChallenge
            | AuthError::ChallengeMismatch
            | AuthError::ChallengeExpired
            | AuthError::MalformedClientData
            | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::CredentialInUse => ErrorKind::Conflict,
            AuthError::IdentityProviderUnavailable
            | AuthError::StoreUnavailable
            | AuthError::Database(_) => ErrorKind::ServiceUnavailable,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Whether this error came from an external dependency
    ///
    /// Only this class is eligible for a single bounded retry; validation
    /// errors must never be retried.
    pub fn is_dependency_failure(&self) -> bool {
        matches!(
            self,
            AuthError::IdentityProviderUnavailable
                | AuthError::StoreUnavailable
                | AuthError::Database(_)
        )
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::IdentityProviderUnavailable | AuthError::StoreUnavailable => {
                tracing::error!(error = %self, "Auth dependency unavailable");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::ChallengeMismatch => {
                tracing::warn!("WebAuthn challenge mismatch");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::ExpiredToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::NoPendingChallenge.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::ChallengeExpired.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::CredentialInUse.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::IdentityProviderUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AuthError::StoreUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_retry_eligibility() {
        assert!(AuthError::StoreUnavailable.is_dependency_failure());
        assert!(AuthError::IdentityProviderUnavailable.is_dependency_failure());
        assert!(!AuthError::InvalidCredentials.is_dependency_failure());
        assert!(!AuthError::ChallengeMismatch.is_dependency_failure());
    }
}
