use std::sync::Arc;

use crate::application::retry_once;
use crate::application::token::TokenService;
use crate::domain::audit::{AuditEvent, AuditEventKind, AuditSink};
use crate::domain::provider::IdentityProvider;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

pub struct RefreshOutput {
    pub access_token: String,
}

/// Access-token refresh use case
///
/// Loads the stored refresh session, renews it with the identity
/// provider and issues a fresh access token. A rejected renewal means
/// the stored session is stale; the caller has to log in again.
pub struct RefreshUseCase<P, S>
where
    P: IdentityProvider,
    S: SessionRepository,
{
    provider: Arc<P>,
    sessions: Arc<S>,
    tokens: Arc<TokenService>,
    audit: Arc<dyn AuditSink>,
}

impl<P, S> RefreshUseCase<P, S>
where
    P: IdentityProvider,
    S: SessionRepository,
{
    pub fn new(
        provider: Arc<P>,
        sessions: Arc<S>,
        tokens: Arc<TokenService>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            provider,
            sessions,
            tokens,
            audit,
        }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<RefreshOutput> {
        let record = retry_once(|| self.sessions.load(user_id))
            .await?
            .ok_or(AuthError::NoSession)?;

        retry_once(|| self.provider.renew(&record.provider_artifact))
            .await
            .map_err(|e| {
                if e.is_dependency_failure() {
                    e
                } else {
                    tracing::info!(user_id = %user_id, error = %e, "Refresh session rejected by identity provider");
                    AuthError::InvalidSession
                }
            })?;

        let access_token = self.tokens.issue_access(user_id)?;

        self.audit.emit(AuditEvent::succeeded(
            AuditEventKind::TokenRefreshed,
            user_id.clone(),
        ));
        tracing::debug!(user_id = %user_id, "Access token refreshed");

        Ok(RefreshOutput { access_token })
    }
}
