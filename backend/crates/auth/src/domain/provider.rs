//! Identity Provider Port
//!
//! The third-party identity provider owns password verification and the
//! provider-side refresh artifact. This core only talks to it through this
//! narrow interface.

use crate::domain::value_object::{Email, ProviderRefreshArtifact, UserId};
use crate::error::AuthResult;

/// Identity as asserted by the provider after password verification
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    pub user_id: UserId,
    pub refresh_artifact: ProviderRefreshArtifact,
}

/// External identity provider
///
/// Errors: a rejected password or unknown account surfaces as
/// `InvalidCredentials`, a rejected artifact as `InvalidSession`, and any
/// transport failure as `IdentityProviderUnavailable`. Implementations must
/// never succeed without the provider actually having verified the input.
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Verify an email/password pair
    async fn verify_password(&self, email: &Email, password: &str)
    -> AuthResult<ProviderIdentity>;

    /// Check that a stored refresh artifact is still honored
    async fn renew(&self, artifact: &ProviderRefreshArtifact) -> AuthResult<()>;
}
