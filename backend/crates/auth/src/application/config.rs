//! Application Configuration
//!
//! Configuration for the Auth application layer. Secrets and TTLs are
//! explicitly constructed and injected; there is no package-level state.

use std::time::Duration;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for access tokens
    pub access_secret: Vec<u8>,
    /// HMAC secret for locally-minted refresh tokens (independent of the
    /// access secret and of the provider's own refresh artifact)
    pub refresh_secret: Vec<u8>,
    /// Access token lifetime (15 minutes)
    pub access_ttl: Duration,
    /// Local refresh token lifetime (14 days)
    pub refresh_ttl: Duration,
    /// WebAuthn relying party ID (domain)
    pub rp_id: String,
    /// WebAuthn relying party display name
    pub rp_name: String,
    /// Pending challenge lifetime (5 minutes)
    pub challenge_ttl: Duration,
    /// Client-side ceremony timeout advertised in options (ms)
    pub ceremony_timeout_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: vec![0u8; 32],
            refresh_secret: vec![0u8; 32],
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(14 * 24 * 3600),
            rp_id: "localhost".to_string(),
            rp_name: "localhost".to_string(),
            challenge_ttl: Duration::from_secs(5 * 60),
            ceremony_timeout_ms: 60_000,
        }
    }
}

impl AuthConfig {
    /// Create config with random secrets (for development)
    pub fn with_random_secrets() -> Self {
        Self {
            access_secret: platform::crypto::random_bytes(32),
            refresh_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Development config: random secrets, local relying party
    pub fn development() -> Self {
        Self {
            rp_id: "localhost".to_string(),
            rp_name: "Development".to_string(),
            ..Self::with_random_secrets()
        }
    }

    /// Challenge TTL as a chrono duration for timestamp arithmetic
    pub fn challenge_ttl_chrono(&self) -> chrono::Duration {
        // Duration::from_std only fails on overflow; TTLs are bounded
        chrono::Duration::from_std(self.challenge_ttl)
            .unwrap_or_else(|_| chrono::Duration::minutes(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_ttl, Duration::from_secs(900));
        assert_eq!(config.challenge_ttl, Duration::from_secs(300));
        assert_eq!(config.ceremony_timeout_ms, 60_000);
    }

    #[test]
    fn test_random_secrets_differ() {
        let config = AuthConfig::with_random_secrets();
        assert_ne!(config.access_secret, config.refresh_secret);
        assert_eq!(config.access_secret.len(), 32);
    }
}
