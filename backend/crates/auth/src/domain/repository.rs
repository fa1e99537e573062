//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::CeremonyId;

use crate::domain::entity::{RefreshRecord, WebAuthnChallenge, WebAuthnCredential};
use crate::domain::value_object::UserId;
use crate::error::AuthResult;

/// Refresh session repository trait
///
/// One record per user identity; no optimistic concurrency token.
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Upsert the record for its user (last-write-wins)
    async fn save(&self, record: &RefreshRecord) -> AuthResult<()>;

    /// Load the record for a user
    async fn load(&self, user_id: &UserId) -> AuthResult<Option<RefreshRecord>>;

    /// Delete the record for a user; absence is not an error
    async fn delete(&self, user_id: &UserId) -> AuthResult<()>;
}

/// WebAuthn challenge repository trait
#[trait_variant::make(ChallengeRepository: Send)]
pub trait LocalChallengeRepository {
    /// Persist a freshly issued challenge
    async fn create(&self, challenge: &WebAuthnChallenge) -> AuthResult<()>;

    /// Consume a challenge atomically (delete and return if present)
    ///
    /// The delete happens regardless of what the caller does with the
    /// returned challenge - this is what enforces single use.
    async fn consume(&self, ceremony_id: CeremonyId) -> AuthResult<Option<WebAuthnChallenge>>;
}

/// WebAuthn credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Persist a credential created by a successful registration ceremony
    async fn create(&self, credential: &WebAuthnCredential) -> AuthResult<()>;

    /// All credentials registered for a user
    async fn list_for_user(&self, user_id: &UserId) -> AuthResult<Vec<WebAuthnCredential>>;
}
