//! User ID Value Object
//!
//! Opaque stable subject identifier minted by the identity provider.
//! This core never creates or deletes identities, it only carries them.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque subject identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

#[derive(Debug, Clone, Error)]
pub enum UserIdError {
    #[error("User ID must not be empty")]
    Empty,
    #[error("User ID must not contain whitespace")]
    Whitespace,
}

impl UserId {
    /// Create from a provider-issued subject string
    pub fn new(value: impl Into<String>) -> Result<Self, UserIdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(UserIdError::Empty);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(UserIdError::Whitespace);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_opaque_ids() {
        assert!(UserId::new("u-42").is_ok());
        assert!(UserId::new("0fC3kPqX9sT1").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(UserId::new(""), Err(UserIdError::Empty)));
    }

    #[test]
    fn test_rejects_whitespace() {
        assert!(matches!(UserId::new("u 42"), Err(UserIdError::Whitespace)));
    }
}
