//! Email Value Object

use std::fmt;

use thiserror::Error;

/// Login email address, lightly validated and lowercased
///
/// Full validation is the identity provider's job; this only rejects inputs
/// that cannot possibly be an address so they never reach the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

#[derive(Debug, Clone, Error)]
pub enum EmailError {
    #[error("Email must contain a local part and a domain")]
    MissingParts,
    #[error("Email must not contain whitespace")]
    Whitespace,
}

impl Email {
    pub fn new(value: &str) -> Result<Self, EmailError> {
        let value = value.trim();
        if value.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }
        match value.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(value.to_lowercase()))
            }
            _ => Err(EmailError::MissingParts),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email_lowercased() {
        let email = Email::new("A@B.com").unwrap();
        assert_eq!(email.as_str(), "a@b.com");
    }

    #[test]
    fn test_rejects_missing_parts() {
        assert!(Email::new("no-at-sign").is_err());
        assert!(Email::new("@domain").is_err());
        assert!(Email::new("local@").is_err());
    }

    #[test]
    fn test_rejects_inner_whitespace() {
        assert!(Email::new("a b@c.com").is_err());
    }
}
