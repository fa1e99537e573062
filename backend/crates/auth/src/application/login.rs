use std::sync::Arc;

use platform::clock::Clock;

use crate::application::retry_once;
use crate::application::token::TokenService;
use crate::domain::audit::{AuditEvent, AuditEventKind, AuditSink};
use crate::domain::entity::RefreshRecord;
use crate::domain::provider::IdentityProvider;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginOutput {
    pub access_token: String,
    pub refresh_token: String,
}

/// Password login use case
///
/// Verifies credentials against the identity provider, persists the
/// refresh session and issues the local token pair. Every credential
/// verification failure collapses to `InvalidCredentials` so responses
/// do not reveal whether an account exists.
pub struct LoginUseCase<P, S>
where
    P: IdentityProvider,
    S: SessionRepository,
{
    provider: Arc<P>,
    sessions: Arc<S>,
    tokens: Arc<TokenService>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
}

impl<P, S> LoginUseCase<P, S>
where
    P: IdentityProvider,
    S: SessionRepository,
{
    pub fn new(
        provider: Arc<P>,
        sessions: Arc<S>,
        tokens: Arc<TokenService>,
        audit: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            sessions,
            tokens,
            audit,
            clock,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let identity = retry_once(|| self.provider.verify_password(&email, &input.password))
            .await
            .map_err(|e| {
                if e.is_dependency_failure() {
                    e
                } else {
                    tracing::info!(error = %e, "Login rejected by identity provider");
                    AuthError::InvalidCredentials
                }
            })?;

        let record = RefreshRecord::new(
            identity.user_id.clone(),
            identity.refresh_artifact,
            self.clock.now(),
        );
        // A session that cannot be persisted must fail the login; a
        // store outage stays a 503 and is never downgraded to 401.
        retry_once(|| self.sessions.save(&record)).await?;

        let access_token = self.tokens.issue_access(&identity.user_id)?;
        let refresh_token = self.tokens.issue_refresh(&identity.user_id)?;

        self.audit.emit(AuditEvent::succeeded(
            AuditEventKind::LoginSuccessful,
            identity.user_id.clone(),
        ));
        tracing::info!(user_id = %identity.user_id, "User logged in");

        Ok(LoginOutput {
            access_token,
            refresh_token,
        })
    }
}
