//! WebAuthn Challenge Entity
//!
//! A transient one-time challenge for a registration or authentication
//! ceremony. Keyed by a fresh ceremony ID so concurrent ceremonies for the
//! same user never clobber each other; lookups are still scoped by
//! `(user_id, ceremony_type)` for authorization. Consumed (deleted)
//! unconditionally by the matching verify call, whatever the outcome.

use chrono::{DateTime, Duration, Utc};
use kernel::id::CeremonyId;

use crate::domain::value_object::UserId;

/// Which half of the WebAuthn protocol a challenge belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeremonyType {
    Registration,
    Authentication,
}

impl CeremonyType {
    /// Stable code for persistence
    pub const fn code(&self) -> &'static str {
        match self {
            CeremonyType::Registration => "registration",
            CeremonyType::Authentication => "authentication",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "registration" => Some(CeremonyType::Registration),
            "authentication" => Some(CeremonyType::Authentication),
            _ => None,
        }
    }
}

impl std::fmt::Display for CeremonyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Pending ceremony challenge
#[derive(Debug, Clone)]
pub struct WebAuthnChallenge {
    pub ceremony_id: CeremonyId,
    pub user_id: UserId,
    pub ceremony_type: CeremonyType,
    /// 32 cryptographically random bytes
    pub challenge: Vec<u8>,
    pub issued_at: DateTime<Utc>,
}

impl WebAuthnChallenge {
    pub fn new(
        user_id: UserId,
        ceremony_type: CeremonyType,
        challenge: Vec<u8>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            ceremony_id: CeremonyId::new(),
            user_id,
            ceremony_type,
            challenge,
            issued_at: now,
        }
    }

    /// An over-age challenge is treated the same as an absent one
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.issued_at > ttl
    }

    /// Whether this challenge belongs to the given ceremony
    pub fn is_for(&self, user_id: &UserId, ceremony_type: CeremonyType) -> bool {
        self.user_id == *user_id && self.ceremony_type == ceremony_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(ceremony_type: CeremonyType) -> WebAuthnChallenge {
        WebAuthnChallenge::new(
            UserId::new("u-1").unwrap(),
            ceremony_type,
            vec![7u8; 32],
            Utc::now(),
        )
    }

    #[test]
    fn test_ceremony_type_code_roundtrip() {
        for ty in [CeremonyType::Registration, CeremonyType::Authentication] {
            assert_eq!(CeremonyType::from_code(ty.code()), Some(ty));
        }
        assert_eq!(CeremonyType::from_code("attestation"), None);
    }

    #[test]
    fn test_expiry_boundary() {
        let ch = challenge(CeremonyType::Registration);
        let ttl = Duration::minutes(5);
        assert!(!ch.is_expired_at(ch.issued_at + ttl, ttl));
        assert!(ch.is_expired_at(ch.issued_at + ttl + Duration::seconds(1), ttl));
    }

    #[test]
    fn test_scoping() {
        let ch = challenge(CeremonyType::Registration);
        let owner = UserId::new("u-1").unwrap();
        let other = UserId::new("u-2").unwrap();
        assert!(ch.is_for(&owner, CeremonyType::Registration));
        assert!(!ch.is_for(&owner, CeremonyType::Authentication));
        assert!(!ch.is_for(&other, CeremonyType::Registration));
    }
}
