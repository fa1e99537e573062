//! In-Memory Repository Implementations
//!
//! Single-process store for local development and tests. Shares the
//! repository semantics of the PostgreSQL store, including delete-on-read
//! challenge consumption.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::domain::entity::{RefreshRecord, WebAuthnChallenge, WebAuthnCredential};
use crate::domain::repository::{ChallengeRepository, CredentialRepository, SessionRepository};
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};
use kernel::id::CeremonyId;

#[derive(Default)]
pub struct InMemoryAuthStore {
    sessions: RwLock<HashMap<String, RefreshRecord>>,
    challenges: RwLock<HashMap<Uuid, WebAuthnChallenge>>,
    credentials: RwLock<HashMap<String, WebAuthnCredential>>,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> AuthError {
        AuthError::Internal("in-memory store lock poisoned".to_string())
    }
}

impl SessionRepository for InMemoryAuthStore {
    async fn save(&self, record: &RefreshRecord) -> AuthResult<()> {
        self.sessions
            .write()
            .map_err(|_| Self::poisoned())?
            .insert(record.user_id.as_str().to_string(), record.clone());
        Ok(())
    }

    async fn load(&self, user_id: &UserId) -> AuthResult<Option<RefreshRecord>> {
        Ok(self
            .sessions
            .read()
            .map_err(|_| Self::poisoned())?
            .get(user_id.as_str())
            .cloned())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<()> {
        self.sessions
            .write()
            .map_err(|_| Self::poisoned())?
            .remove(user_id.as_str());
        Ok(())
    }
}

impl ChallengeRepository for InMemoryAuthStore {
    async fn create(&self, challenge: &WebAuthnChallenge) -> AuthResult<()> {
        self.challenges
            .write()
            .map_err(|_| Self::poisoned())?
            .insert(challenge.ceremony_id.into_uuid(), challenge.clone());
        Ok(())
    }

    async fn consume(&self, ceremony_id: CeremonyId) -> AuthResult<Option<WebAuthnChallenge>> {
        Ok(self
            .challenges
            .write()
            .map_err(|_| Self::poisoned())?
            .remove(&ceremony_id.into_uuid()))
    }
}

impl CredentialRepository for InMemoryAuthStore {
    async fn create(&self, credential: &WebAuthnCredential) -> AuthResult<()> {
        let mut credentials = self.credentials.write().map_err(|_| Self::poisoned())?;
        if credentials.contains_key(&credential.credential_id) {
            return Err(AuthError::CredentialInUse);
        }
        credentials.insert(credential.credential_id.clone(), credential.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> AuthResult<Vec<WebAuthnCredential>> {
        let mut found: Vec<WebAuthnCredential> = self
            .credentials
            .read()
            .map_err(|_| Self::poisoned())?
            .values()
            .filter(|c| c.user_id == *user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::CeremonyType;
    use chrono::Utc;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_session_roundtrip() {
        let store = InMemoryAuthStore::new();
        let record = RefreshRecord::new(
            user("u-1"),
            crate::domain::value_object::ProviderRefreshArtifact::new("artifact").unwrap(),
            Utc::now(),
        );

        store.save(&record).await.unwrap();
        let loaded = store.load(&user("u-1")).await.unwrap().unwrap();
        assert_eq!(loaded.provider_artifact.as_str(), "artifact");

        store.delete(&user("u-1")).await.unwrap();
        assert!(store.load(&user("u-1")).await.unwrap().is_none());
        // Deleting again is fine
        store.delete(&user("u-1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_challenge_consume_is_single_use() {
        let store = InMemoryAuthStore::new();
        let challenge = WebAuthnChallenge::new(
            user("u-1"),
            CeremonyType::Registration,
            vec![1u8; 32],
            Utc::now(),
        );
        ChallengeRepository::create(&store, &challenge).await.unwrap();

        let first = ChallengeRepository::consume(&store, challenge.ceremony_id)
            .await
            .unwrap();
        assert!(first.is_some());
        let second = ChallengeRepository::consume(&store, challenge.ceremony_id)
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_challenges_do_not_clobber() {
        let store = InMemoryAuthStore::new();
        let a = WebAuthnChallenge::new(
            user("u-1"),
            CeremonyType::Registration,
            vec![1u8; 32],
            Utc::now(),
        );
        let b = WebAuthnChallenge::new(
            user("u-1"),
            CeremonyType::Registration,
            vec![2u8; 32],
            Utc::now(),
        );
        ChallengeRepository::create(&store, &a).await.unwrap();
        ChallengeRepository::create(&store, &b).await.unwrap();

        let got_a = ChallengeRepository::consume(&store, a.ceremony_id)
            .await
            .unwrap()
            .unwrap();
        let got_b = ChallengeRepository::consume(&store, b.ceremony_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got_a.challenge, vec![1u8; 32]);
        assert_eq!(got_b.challenge, vec![2u8; 32]);
    }

    #[tokio::test]
    async fn test_credentials_scoped_per_user() {
        let store = InMemoryAuthStore::new();
        let now = Utc::now();
        CredentialRepository::create(
            &store,
            &WebAuthnCredential::new("cred-1".into(), user("u-1"), "pk-1".into(), now),
        )
        .await
        .unwrap();
        CredentialRepository::create(
            &store,
            &WebAuthnCredential::new("cred-2".into(), user("u-2"), "pk-2".into(), now),
        )
        .await
        .unwrap();

        let mine = store.list_for_user(&user("u-1")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].credential_id, "cred-1");
    }

    #[tokio::test]
    async fn test_duplicate_credential_id_is_rejected() {
        let store = InMemoryAuthStore::new();
        let now = Utc::now();
        CredentialRepository::create(
            &store,
            &WebAuthnCredential::new("cred-1".into(), user("u-1"), "pk-1".into(), now),
        )
        .await
        .unwrap();

        let taken = CredentialRepository::create(
            &store,
            &WebAuthnCredential::new("cred-1".into(), user("u-2"), "pk-2".into(), now),
        )
        .await;
        assert!(matches!(taken, Err(AuthError::CredentialInUse)));

        // The original owner keeps the credential
        let mine = store.list_for_user(&user("u-1")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(store.list_for_user(&user("u-2")).await.unwrap().is_empty());
    }
}
