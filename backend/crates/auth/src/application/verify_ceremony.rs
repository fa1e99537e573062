use std::sync::Arc;

use platform::clock::Clock;
use platform::crypto;
use serde::Deserialize;

use crate::application::config::AuthConfig;
use crate::application::retry_once;
use crate::domain::audit::{AuditEvent, AuditEventKind, AuditSink};
use crate::domain::entity::{CeremonyType, WebAuthnCredential};
use crate::domain::repository::{ChallengeRepository, CredentialRepository};
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};
use kernel::id::CeremonyId;

pub struct RegistrationVerifyInput {
    pub ceremony_id: CeremonyId,
    pub client_data_json: String,
    pub credential_id: String,
    pub public_key: String,
}

pub struct AuthenticationVerifyInput {
    pub ceremony_id: CeremonyId,
    pub client_data_json: String,
}

/// The subset of the WebAuthn client data we verify
#[derive(Deserialize)]
struct ClientData {
    challenge: String,
}

/// WebAuthn ceremony verification use case
///
/// Consumes the stored challenge before any other check, so a
/// ceremony response can be attempted at most once. Whatever the
/// outcome, a second attempt with the same ceremony ID finds no
/// pending challenge.
pub struct VerifyCeremonyUseCase<C, K>
where
    C: ChallengeRepository,
    K: CredentialRepository,
{
    challenges: Arc<C>,
    credentials: Arc<K>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
    config: Arc<AuthConfig>,
}

impl<C, K> VerifyCeremonyUseCase<C, K>
where
    C: ChallengeRepository,
    K: CredentialRepository,
{
    pub fn new(
        challenges: Arc<C>,
        credentials: Arc<K>,
        audit: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            challenges,
            credentials,
            audit,
            clock,
            config,
        }
    }

    pub async fn execute_registration(
        &self,
        user_id: &UserId,
        input: RegistrationVerifyInput,
    ) -> AuthResult<()> {
        if let Err(e) = self
            .verify(
                user_id,
                input.ceremony_id,
                CeremonyType::Registration,
                &input.client_data_json,
            )
            .await
        {
            return Err(self.reject(AuditEventKind::WebauthnRegister, user_id, e));
        }

        let credential = WebAuthnCredential::new(
            input.credential_id,
            user_id.clone(),
            input.public_key,
            self.clock.now(),
        );
        retry_once(|| self.credentials.create(&credential)).await?;

        self.audit.emit(AuditEvent::succeeded(
            AuditEventKind::WebauthnRegister,
            user_id.clone(),
        ));
        tracing::info!(user_id = %user_id, "WebAuthn credential registered");

        Ok(())
    }

    pub async fn execute_authentication(
        &self,
        user_id: &UserId,
        input: AuthenticationVerifyInput,
    ) -> AuthResult<()> {
        if let Err(e) = self
            .verify(
                user_id,
                input.ceremony_id,
                CeremonyType::Authentication,
                &input.client_data_json,
            )
            .await
        {
            return Err(self.reject(AuditEventKind::WebauthnAuth, user_id, e));
        }

        self.audit.emit(AuditEvent::succeeded(
            AuditEventKind::WebauthnAuth,
            user_id.clone(),
        ));
        tracing::info!(user_id = %user_id, "WebAuthn authentication verified");

        Ok(())
    }

    /// Record a rejected ceremony attempt and hand the error back.
    ///
    /// Dependency outages are not audited: nothing about the attempt
    /// was judged, the store just could not answer.
    fn reject(&self, kind: AuditEventKind, user_id: &UserId, error: AuthError) -> AuthError {
        if !error.is_dependency_failure() {
            self.audit.emit(AuditEvent::failed(kind, user_id.clone()));
        }
        error
    }

    async fn verify(
        &self,
        user_id: &UserId,
        ceremony_id: CeremonyId,
        ceremony_type: CeremonyType,
        client_data_json: &str,
    ) -> AuthResult<()> {
        // Consume first. The challenge is gone after this point even
        // when verification fails below.
        let challenge = retry_once(|| self.challenges.consume(ceremony_id))
            .await?
            .ok_or(AuthError::NoPendingChallenge)?;

        // A challenge issued for another user or another ceremony type
        // is as good as absent.
        if !challenge.is_for(user_id, ceremony_type) {
            tracing::warn!(
                user_id = %user_id,
                ceremony_id = %ceremony_id,
                "Consumed challenge was issued for a different scope"
            );
            return Err(AuthError::NoPendingChallenge);
        }

        if challenge.is_expired_at(self.clock.now(), self.config.challenge_ttl_chrono()) {
            return Err(AuthError::ChallengeExpired);
        }

        let raw = crypto::from_base64_any(client_data_json)
            .map_err(|_| AuthError::MalformedClientData)?;
        let client_data: ClientData =
            serde_json::from_slice(&raw).map_err(|_| AuthError::MalformedClientData)?;
        let presented = crypto::from_base64_any(&client_data.challenge)
            .map_err(|_| AuthError::MalformedClientData)?;

        if !crypto::constant_time_eq(&presented, &challenge.challenge) {
            return Err(AuthError::ChallengeMismatch);
        }

        Ok(())
    }
}
