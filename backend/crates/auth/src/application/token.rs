//! Token Service
//!
//! Signs and verifies the two locally-minted JWT kinds (HS256): short-lived
//! access tokens and longer-lived refresh tokens, each against its own
//! secret. Stateless - pure functions over injected secrets, TTLs, and
//! clock. Expiry is checked against the injected clock, never against
//! claims supplied by the caller.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use platform::clock::Clock;
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    exp: i64,
}

/// Issues and verifies access/refresh JWTs
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(&config.access_secret),
            access_decoding: DecodingKey::from_secret(&config.access_secret),
            refresh_encoding: EncodingKey::from_secret(&config.refresh_secret),
            refresh_decoding: DecodingKey::from_secret(&config.refresh_secret),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            clock,
        }
    }

    /// Issue a short-lived access token
    pub fn issue_access(&self, user_id: &UserId) -> AuthResult<String> {
        self.issue(user_id, &self.access_encoding, self.access_ttl)
    }

    /// Issue a locally-minted refresh token
    ///
    /// Distinct from the provider's refresh artifact: this one is returned
    /// to the client and only ever presented back to the refresh endpoint.
    pub fn issue_refresh(&self, user_id: &UserId) -> AuthResult<String> {
        self.issue(user_id, &self.refresh_encoding, self.refresh_ttl)
    }

    /// Verify an access token and return its subject
    pub fn verify(&self, token: &str) -> AuthResult<UserId> {
        self.decode(token, &self.access_decoding)
    }

    /// Verify a locally-minted refresh token and return its subject
    ///
    /// Used only by the refresh endpoint; request guards verify access
    /// tokens exclusively.
    pub fn verify_refresh(&self, token: &str) -> AuthResult<UserId> {
        self.decode(token, &self.refresh_decoding)
    }

    fn issue(&self, user_id: &UserId, key: &EncodingKey, ttl: Duration) -> AuthResult<String> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid token TTL: {e}")))?;
        let claims = Claims {
            sub: Some(user_id.as_str().to_string()),
            exp: (self.clock.now() + ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    fn decode(&self, token: &str, key: &DecodingKey) -> AuthResult<UserId> {
        // Expiry is validated manually against the injected clock
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<Claims>(token, key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        if data.claims.exp < self.clock.now().timestamp() {
            return Err(AuthError::ExpiredToken);
        }

        let sub = match data.claims.sub {
            Some(sub) if !sub.is_empty() => sub,
            _ => return Err(AuthError::MissingSubject),
        };

        UserId::new(sub).map_err(|_| AuthError::MissingSubject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::clock::ManualClock;

    fn service_with_clock() -> (TokenService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let service = TokenService::new(&AuthConfig::with_random_secrets(), clock.clone());
        (service, clock)
    }

    #[test]
    fn test_access_round_trip() {
        let (service, _clock) = service_with_clock();
        let user_id = UserId::new("u-42").unwrap();

        let token = service.issue_access(&user_id).unwrap();
        assert_eq!(service.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_refresh_round_trip() {
        let (service, _clock) = service_with_clock();
        let user_id = UserId::new("u-42").unwrap();

        let token = service.issue_refresh(&user_id).unwrap();
        assert_eq!(service.verify_refresh(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expired_access_token() {
        let (service, clock) = service_with_clock();
        let user_id = UserId::new("u-42").unwrap();

        let token = service.issue_access(&user_id).unwrap();
        clock.advance(chrono::Duration::minutes(16));

        assert!(matches!(
            service.verify(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let (service, _clock) = service_with_clock();
        let (other, _clock2) = service_with_clock();
        let user_id = UserId::new("u-42").unwrap();

        // Signed with a different access secret
        let token = other.issue_access(&user_id).unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let (service, _clock) = service_with_clock();
        let user_id = UserId::new("u-42").unwrap();

        let refresh = service.issue_refresh(&user_id).unwrap();
        assert!(matches!(
            service.verify(&refresh),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let (service, _clock) = service_with_clock();
        assert!(matches!(
            service.verify("not.a.jwt"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_missing_subject() {
        let clock = Arc::new(ManualClock::starting_now());
        let config = AuthConfig::with_random_secrets();
        let service = TokenService::new(&config, clock.clone());

        // Sign a subject-less payload with the real access secret
        let claims = Claims {
            sub: None,
            exp: (clock.now() + chrono::Duration::minutes(15)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&config.access_secret),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(AuthError::MissingSubject)
        ));
    }
}
