//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{CeremonyType, RefreshRecord, WebAuthnChallenge, WebAuthnCredential};
use crate::domain::repository::{ChallengeRepository, CredentialRepository, SessionRepository};
use crate::domain::value_object::{ProviderRefreshArtifact, UserId};
use crate::error::{AuthError, AuthResult};
use kernel::id::CeremonyId;

/// PostgreSQL-backed auth store
#[derive(Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete challenges issued before the cutoff
    pub async fn cleanup_expired_challenges(&self, cutoff: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM webauthn_challenges WHERE issued_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted > 0 {
            tracing::info!(challenges = deleted, "Cleaned up expired WebAuthn challenges");
        }

        Ok(deleted)
    }
}

impl SessionRepository for PgAuthStore {
    async fn save(&self, record: &RefreshRecord) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_records (user_id, provider_artifact, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET
                provider_artifact = EXCLUDED.provider_artifact,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(record.user_id.as_str())
        .bind(record.provider_artifact.as_str())
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(user_id = %record.user_id, "Refresh record saved");
        Ok(())
    }

    async fn load(&self, user_id: &UserId) -> AuthResult<Option<RefreshRecord>> {
        let row = sqlx::query_as::<_, RefreshRecordRow>(
            r#"
            SELECT user_id, provider_artifact, created_at
            FROM refresh_records
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(RefreshRecordRow::into_record).transpose()
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<()> {
        sqlx::query("DELETE FROM refresh_records WHERE user_id = $1")
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await?;

        tracing::debug!(user_id = %user_id, "Refresh record deleted");
        Ok(())
    }
}

impl ChallengeRepository for PgAuthStore {
    async fn create(&self, challenge: &WebAuthnChallenge) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO webauthn_challenges (
                ceremony_id,
                user_id,
                ceremony_type,
                challenge,
                issued_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(challenge.ceremony_id.as_uuid())
        .bind(challenge.user_id.as_str())
        .bind(challenge.ceremony_type.code())
        .bind(&challenge.challenge)
        .bind(challenge.issued_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            ceremony_id = %challenge.ceremony_id,
            user_id = %challenge.user_id,
            "WebAuthn challenge stored"
        );
        Ok(())
    }

    async fn consume(&self, ceremony_id: CeremonyId) -> AuthResult<Option<WebAuthnChallenge>> {
        // Single-use is enforced here: the row is gone after this call
        // whatever the verifier decides about it.
        let row = sqlx::query_as::<_, ChallengeRow>(
            r#"
            DELETE FROM webauthn_challenges
            WHERE ceremony_id = $1
            RETURNING ceremony_id, user_id, ceremony_type, challenge, issued_at
            "#,
        )
        .bind(ceremony_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ChallengeRow::into_challenge).transpose()
    }
}

impl CredentialRepository for PgAuthStore {
    async fn create(&self, credential: &WebAuthnCredential) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO webauthn_credentials (credential_id, user_id, public_key, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&credential.credential_id)
        .bind(credential.user_id.as_str())
        .bind(&credential.public_key)
        .bind(credential.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            // Unique violation on the primary key: the credential ID is taken
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AuthError::CredentialInUse
            }
            _ => AuthError::from(e),
        })?;

        tracing::info!(user_id = %credential.user_id, "WebAuthn credential stored");
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> AuthResult<Vec<WebAuthnCredential>> {
        let rows = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT credential_id, user_id, public_key, created_at
            FROM webauthn_credentials
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CredentialRow::into_credential).collect()
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct RefreshRecordRow {
    user_id: String,
    provider_artifact: String,
    created_at: DateTime<Utc>,
}

impl RefreshRecordRow {
    fn into_record(self) -> AuthResult<RefreshRecord> {
        Ok(RefreshRecord {
            user_id: UserId::new(self.user_id)
                .map_err(|e| AuthError::Internal(format!("corrupt refresh record: {e}")))?,
            provider_artifact: ProviderRefreshArtifact::new(self.provider_artifact)
                .map_err(|e| AuthError::Internal(format!("corrupt refresh record: {e}")))?,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ChallengeRow {
    ceremony_id: Uuid,
    user_id: String,
    ceremony_type: String,
    challenge: Vec<u8>,
    issued_at: DateTime<Utc>,
}

impl ChallengeRow {
    fn into_challenge(self) -> AuthResult<WebAuthnChallenge> {
        Ok(WebAuthnChallenge {
            ceremony_id: CeremonyId::from_uuid(self.ceremony_id),
            user_id: UserId::new(self.user_id)
                .map_err(|e| AuthError::Internal(format!("corrupt challenge row: {e}")))?,
            ceremony_type: CeremonyType::from_code(&self.ceremony_type).ok_or_else(|| {
                AuthError::Internal(format!("unknown ceremony type: {}", self.ceremony_type))
            })?,
            challenge: self.challenge,
            issued_at: self.issued_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    credential_id: String,
    user_id: String,
    public_key: String,
    created_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> AuthResult<WebAuthnCredential> {
        Ok(WebAuthnCredential {
            credential_id: self.credential_id,
            user_id: UserId::new(self.user_id)
                .map_err(|e| AuthError::Internal(format!("corrupt credential row: {e}")))?,
            public_key: self.public_key,
            created_at: self.created_at,
        })
    }
}
