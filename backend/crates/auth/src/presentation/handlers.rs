//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use std::sync::Arc;

use platform::clock::Clock;
use platform::crypto;
use platform::random::RandomSource;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::application::{
    AuthenticationVerifyInput, IssueCeremonyUseCase, LoginInput, LoginUseCase, LogoutUseCase,
    RefreshUseCase, RegistrationVerifyInput, VerifyCeremonyUseCase,
};
use crate::domain::audit::AuditSink;
use crate::domain::provider::IdentityProvider;
use crate::domain::repository::{ChallengeRepository, CredentialRepository, SessionRepository};
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AllowCredentialDto, AuthenticationOptionsRequest, AuthenticationOptionsResponse,
    AuthenticationVerifyRequest, LoginRequest, LoginResponse, PubKeyCredParamDto,
    RefreshRequest, RefreshResponse, RegistrationOptionsResponse, RegistrationVerifyRequest,
    RpDto, UserEntityDto, VerifyResponse,
};
use crate::presentation::middleware::CurrentUser;
use kernel::id::CeremonyId;

/// Shared state for auth handlers
pub struct AuthAppState<R, P>
where
    R: SessionRepository + ChallengeRepository + CredentialRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    pub store: Arc<R>,
    pub provider: Arc<P>,
    pub tokens: Arc<TokenService>,
    pub audit: Arc<dyn AuditSink>,
    pub clock: Arc<dyn Clock>,
    pub random: Arc<dyn RandomSource>,
    pub config: Arc<AuthConfig>,
}

// Manual impl: derive(Clone) would demand R: Clone and P: Clone
impl<R, P> Clone for AuthAppState<R, P>
where
    R: SessionRepository + ChallengeRepository + CredentialRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            provider: self.provider.clone(),
            tokens: self.tokens.clone(),
            audit: self.audit.clone(),
            clock: self.clock.clone(),
            random: self.random.clone(),
            config: self.config.clone(),
        }
    }
}

fn parse_ceremony_id(raw: &str) -> AuthResult<CeremonyId> {
    CeremonyId::parse(raw).map_err(|_| AuthError::Validation("invalid ceremony id".to_string()))
}

fn parse_user_id(raw: &str) -> AuthResult<UserId> {
    UserId::new(raw).map_err(|e| AuthError::Validation(e.to_string()))
}

// ============================================================================
// Login / Refresh / Logout
// ============================================================================

/// POST /api/auth/login
pub async fn login<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: SessionRepository + ChallengeRepository + CredentialRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.provider.clone(),
        state.store.clone(),
        state.tokens.clone(),
        state.audit.clone(),
        state.clock.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        access_token: output.access_token,
        refresh_token: output.refresh_token,
    }))
}

/// POST /api/auth/refresh
///
/// The body carries the local refresh token; the subject comes from its
/// verified claims, never from a caller-supplied user ID.
pub async fn refresh<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<RefreshResponse>>
where
    R: SessionRepository + ChallengeRepository + CredentialRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let user_id = state.tokens.verify_refresh(&req.refresh_token)?;

    let use_case = RefreshUseCase::new(
        state.provider.clone(),
        state.store.clone(),
        state.tokens.clone(),
        state.audit.clone(),
    );

    let output = use_case.execute(&user_id).await?;

    Ok(Json(RefreshResponse {
        access_token: output.access_token,
    }))
}

/// POST /api/auth/logout (guarded)
pub async fn logout<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Extension(current): Extension<CurrentUser>,
) -> AuthResult<StatusCode>
where
    R: SessionRepository + ChallengeRepository + CredentialRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case = LogoutUseCase::new(state.store.clone(), state.audit.clone());
    use_case.execute(&current.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// WebAuthn Registration
// ============================================================================

/// POST /api/auth/webauthn/register/options (guarded)
pub async fn registration_options<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Extension(current): Extension<CurrentUser>,
) -> AuthResult<Json<RegistrationOptionsResponse>>
where
    R: SessionRepository + ChallengeRepository + CredentialRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case = IssueCeremonyUseCase::new(
        state.store.clone(),
        state.store.clone(),
        state.random.clone(),
        state.clock.clone(),
    );

    let output = use_case.execute_registration(&current.0).await?;

    Ok(Json(RegistrationOptionsResponse {
        ceremony_id: output.ceremony_id.to_string(),
        challenge: crypto::to_base64(&output.challenge),
        rp: RpDto {
            id: state.config.rp_id.clone(),
            name: state.config.rp_name.clone(),
        },
        user: UserEntityDto {
            id: current.0.as_str().to_string(),
            name: current.0.as_str().to_string(),
            display_name: current.0.as_str().to_string(),
        },
        pub_key_cred_params: vec![PubKeyCredParamDto::es256()],
        timeout: state.config.ceremony_timeout_ms,
    }))
}

/// POST /api/auth/webauthn/register/verify (guarded)
pub async fn registration_verify<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<RegistrationVerifyRequest>,
) -> AuthResult<Json<VerifyResponse>>
where
    R: SessionRepository + ChallengeRepository + CredentialRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let ceremony_id = parse_ceremony_id(&req.ceremony_id)?;

    let use_case = VerifyCeremonyUseCase::new(
        state.store.clone(),
        state.store.clone(),
        state.audit.clone(),
        state.clock.clone(),
        state.config.clone(),
    );

    use_case
        .execute_registration(
            &current.0,
            RegistrationVerifyInput {
                ceremony_id,
                client_data_json: req.response.client_data_json,
                credential_id: req.id,
                public_key: req.response.public_key,
            },
        )
        .await?;

    Ok(Json(VerifyResponse { verified: true }))
}

// ============================================================================
// WebAuthn Authentication
// ============================================================================

/// POST /api/auth/webauthn/authenticate/options
pub async fn authentication_options<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Json(req): Json<AuthenticationOptionsRequest>,
) -> AuthResult<Json<AuthenticationOptionsResponse>>
where
    R: SessionRepository + ChallengeRepository + CredentialRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let user_id = parse_user_id(&req.user_id)?;

    let use_case = IssueCeremonyUseCase::new(
        state.store.clone(),
        state.store.clone(),
        state.random.clone(),
        state.clock.clone(),
    );

    let output = use_case.execute_authentication(&user_id).await?;

    Ok(Json(AuthenticationOptionsResponse {
        ceremony_id: output.ceremony_id.to_string(),
        challenge: crypto::to_base64(&output.challenge),
        allow_credentials: output
            .credential_ids
            .into_iter()
            .map(|id| AllowCredentialDto {
                ty: "public-key",
                id,
            })
            .collect(),
        timeout: state.config.ceremony_timeout_ms,
    }))
}

/// POST /api/auth/webauthn/authenticate/verify
pub async fn authentication_verify<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Json(req): Json<AuthenticationVerifyRequest>,
) -> AuthResult<Json<VerifyResponse>>
where
    R: SessionRepository + ChallengeRepository + CredentialRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let ceremony_id = parse_ceremony_id(&req.ceremony_id)?;
    let user_id = parse_user_id(&req.user_id)?;

    let use_case = VerifyCeremonyUseCase::new(
        state.store.clone(),
        state.store.clone(),
        state.audit.clone(),
        state.clock.clone(),
        state.config.clone(),
    );

    use_case
        .execute_authentication(
            &user_id,
            AuthenticationVerifyInput {
                ceremony_id,
                client_data_json: req.response.client_data_json,
            },
        )
        .await?;

    Ok(Json(VerifyResponse { verified: true }))
}
