//! HTTP Identity Provider Client
//!
//! Talks to the external identity provider over HTTPS. Credential
//! verification exchanges an email/password for the provider's user ID and
//! refresh artifact; renewal proves a stored artifact is still honoured.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::provider::{IdentityProvider, ProviderIdentity};
use crate::domain::value_object::{Email, ProviderRefreshArtifact, UserId};
use crate::error::{AuthError, AuthResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct HttpIdentityProviderConfig {
    /// Base URL of the provider, e.g. `https://identitytoolkit.example.com`
    pub base_url: String,
    pub api_key: String,
}

pub struct HttpIdentityProvider {
    client: reqwest::Client,
    config: HttpIdentityProviderConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    refresh_token: String,
}

#[derive(Serialize)]
struct RenewRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

impl HttpIdentityProvider {
    pub fn new(config: HttpIdentityProviderConfig) -> AuthResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}?key={}",
            self.config.base_url.trim_end_matches('/'),
            path,
            self.config.api_key
        )
    }

    /// 4xx means the provider understood and refused; anything else is an
    /// availability problem on the dependency side.
    fn rejection_or_unavailable(status: reqwest::StatusCode) -> AuthError {
        if status.is_client_error() {
            AuthError::InvalidCredentials
        } else {
            tracing::error!(status = %status, "Identity provider returned an unexpected status");
            AuthError::IdentityProviderUnavailable
        }
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn verify_password(&self, email: &Email, password: &str) -> AuthResult<ProviderIdentity> {
        let response = self
            .client
            .post(self.endpoint("v1/accounts:signInWithPassword"))
            .json(&SignInRequest {
                email: email.as_str(),
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Identity provider request failed");
                AuthError::IdentityProviderUnavailable
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::rejection_or_unavailable(status));
        }

        let body: SignInResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Identity provider returned an unreadable body");
            AuthError::IdentityProviderUnavailable
        })?;

        Ok(ProviderIdentity {
            user_id: UserId::new(body.local_id)
                .map_err(|e| AuthError::Internal(format!("provider returned bad user id: {e}")))?,
            refresh_artifact: ProviderRefreshArtifact::new(body.refresh_token).map_err(|e| {
                AuthError::Internal(format!("provider returned bad refresh artifact: {e}"))
            })?,
        })
    }

    async fn renew(&self, artifact: &ProviderRefreshArtifact) -> AuthResult<()> {
        let response = self
            .client
            .post(self.endpoint("v1/token"))
            .json(&RenewRequest {
                grant_type: "refresh_token",
                refresh_token: artifact.as_str(),
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Identity provider request failed");
                AuthError::IdentityProviderUnavailable
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.is_client_error() {
            Err(AuthError::InvalidSession)
        } else {
            tracing::error!(status = %status, "Identity provider returned an unexpected status");
            Err(AuthError::IdentityProviderUnavailable)
        }
    }
}
