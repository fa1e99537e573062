use std::sync::Arc;

use platform::clock::Clock;
use platform::random::RandomSource;

use crate::application::retry_once;
use crate::domain::entity::{CeremonyType, WebAuthnChallenge};
use crate::domain::repository::{ChallengeRepository, CredentialRepository};
use crate::domain::value_object::UserId;
use crate::error::AuthResult;
use kernel::id::CeremonyId;

/// Challenge byte length for WebAuthn ceremonies
const CHALLENGE_LEN: usize = 32;

pub struct IssueRegistrationOutput {
    pub ceremony_id: CeremonyId,
    pub challenge: Vec<u8>,
}

pub struct IssueAuthenticationOutput {
    pub ceremony_id: CeremonyId,
    pub challenge: Vec<u8>,
    pub credential_ids: Vec<String>,
}

/// WebAuthn ceremony issuance use case
///
/// Generates a fresh random challenge, stores it keyed by ceremony ID
/// and returns the material the client needs to run the ceremony.
/// Issuing a new ceremony never disturbs other in-flight ceremonies
/// for the same user.
pub struct IssueCeremonyUseCase<C, K>
where
    C: ChallengeRepository,
    K: CredentialRepository,
{
    challenges: Arc<C>,
    credentials: Arc<K>,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
}

impl<C, K> IssueCeremonyUseCase<C, K>
where
    C: ChallengeRepository,
    K: CredentialRepository,
{
    pub fn new(
        challenges: Arc<C>,
        credentials: Arc<K>,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            challenges,
            credentials,
            random,
            clock,
        }
    }

    pub async fn execute_registration(
        &self,
        user_id: &UserId,
    ) -> AuthResult<IssueRegistrationOutput> {
        let challenge = self
            .issue(user_id, CeremonyType::Registration)
            .await?;
        Ok(IssueRegistrationOutput {
            ceremony_id: challenge.ceremony_id,
            challenge: challenge.challenge,
        })
    }

    pub async fn execute_authentication(
        &self,
        user_id: &UserId,
    ) -> AuthResult<IssueAuthenticationOutput> {
        let challenge = self
            .issue(user_id, CeremonyType::Authentication)
            .await?;
        let credential_ids = retry_once(|| self.credentials.list_for_user(user_id))
            .await?
            .into_iter()
            .map(|c| c.credential_id)
            .collect();
        Ok(IssueAuthenticationOutput {
            ceremony_id: challenge.ceremony_id,
            challenge: challenge.challenge,
            credential_ids,
        })
    }

    async fn issue(
        &self,
        user_id: &UserId,
        ceremony_type: CeremonyType,
    ) -> AuthResult<WebAuthnChallenge> {
        let bytes = self.random.bytes(CHALLENGE_LEN);
        let challenge =
            WebAuthnChallenge::new(user_id.clone(), ceremony_type, bytes, self.clock.now());

        retry_once(|| self.challenges.create(&challenge)).await?;

        tracing::debug!(
            user_id = %user_id,
            ceremony_id = %challenge.ceremony_id,
            ceremony_type = %ceremony_type,
            "WebAuthn challenge issued"
        );

        Ok(challenge)
    }
}
