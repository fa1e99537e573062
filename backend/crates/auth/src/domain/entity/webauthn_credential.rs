//! WebAuthn Credential Entity
//!
//! A durable registered authenticator. Many-to-one with an identity (a user
//! may register several authenticators); a credential ID maps to exactly one
//! user for its lifetime. Created only by a successful registration
//! ceremony; revocation is an external account-lifecycle concern.

use chrono::{DateTime, Utc};

use crate::domain::value_object::UserId;

/// Registered public-key credential
#[derive(Debug, Clone)]
pub struct WebAuthnCredential {
    /// Authenticator-assigned credential ID (opaque, base64url from clients)
    pub credential_id: String,
    pub user_id: UserId,
    /// Opaque public key material as supplied by the client
    pub public_key: String,
    pub created_at: DateTime<Utc>,
}

impl WebAuthnCredential {
    pub fn new(
        credential_id: String,
        user_id: UserId,
        public_key: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            credential_id,
            user_id,
            public_key,
            created_at: now,
        }
    }
}
