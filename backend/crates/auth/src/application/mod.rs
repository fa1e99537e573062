//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod issue_ceremony;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod token;
pub mod verify_ceremony;

use std::time::Duration;

use crate::error::AuthResult;

// Re-exports
pub use config::AuthConfig;
pub use issue_ceremony::{
    IssueAuthenticationOutput, IssueCeremonyUseCase, IssueRegistrationOutput,
};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use refresh::{RefreshOutput, RefreshUseCase};
pub use token::TokenService;
pub use verify_ceremony::{AuthenticationVerifyInput, RegistrationVerifyInput, VerifyCeremonyUseCase};

/// Backoff before the single permitted retry of a dependency call
const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Retry a dependency call at most once
///
/// Validation-shaped errors pass through untouched; only dependency
/// failures (provider/store unavailable) are retried, and only once.
pub(crate) async fn retry_once<T, F, Fut>(op: F) -> AuthResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = AuthResult<T>>,
{
    match op().await {
        Err(e) if e.is_dependency_failure() => {
            tracing::warn!(error = %e, "Dependency call failed, retrying once");
            tokio::time::sleep(RETRY_BACKOFF).await;
            op().await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_once_on_dependency_failure() {
        let calls = AtomicU32::new(0);
        let result: AuthResult<u32> = retry_once(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(AuthError::StoreUnavailable)
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_retry_for_validation_errors() {
        let calls = AtomicU32::new(0);
        let result: AuthResult<u32> = retry_once(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AuthError::InvalidCredentials) }
        })
        .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_failure_surfaces() {
        let result: AuthResult<u32> =
            retry_once(|| async { Err(AuthError::IdentityProviderUnavailable) }).await;
        assert!(matches!(result, Err(AuthError::IdentityProviderUnavailable)));
    }
}
