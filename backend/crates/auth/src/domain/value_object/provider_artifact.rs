//! Provider Refresh Artifact Value Object
//!
//! The refresh token issued by the identity provider itself. Named
//! distinctly from our locally-minted refresh JWT so the two are never
//! confused: this one is persisted in the session store and replayed to the
//! provider on renewal; it is never handed to clients.

use std::fmt;

use thiserror::Error;

/// Opaque provider-issued refresh artifact
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderRefreshArtifact(String);

#[derive(Debug, Clone, Error)]
pub enum ProviderArtifactError {
    #[error("Provider refresh artifact must not be empty")]
    Empty,
}

impl ProviderRefreshArtifact {
    pub fn new(value: impl Into<String>) -> Result<Self, ProviderArtifactError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ProviderArtifactError::Empty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Redacted: the artifact is a bearer secret and must not leak into logs
impl fmt::Debug for ProviderRefreshArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProviderRefreshArtifact(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        assert!(ProviderRefreshArtifact::new("").is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let artifact = ProviderRefreshArtifact::new("pa-secret-1").unwrap();
        let debug = format!("{artifact:?}");
        assert!(!debug.contains("pa-secret-1"));
    }
}
