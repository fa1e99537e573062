//! Auth Router

use axum::{Router, middleware, routing::post};
use std::sync::Arc;

use platform::clock::Clock;
use platform::random::RandomSource;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::audit::AuditSink;
use crate::domain::provider::IdentityProvider;
use crate::domain::repository::{ChallengeRepository, CredentialRepository, SessionRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthGuardState, require_bearer_auth};

/// Create the auth router for any store/provider implementation
///
/// Login, refresh, and the post-login authentication ceremony are open;
/// logout and the registration ceremony require a valid bearer token.
pub fn auth_router<R, P>(
    store: Arc<R>,
    provider: Arc<P>,
    tokens: Arc<TokenService>,
    audit: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    config: Arc<AuthConfig>,
) -> Router
where
    R: SessionRepository + ChallengeRepository + CredentialRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let state = AuthAppState {
        store,
        provider,
        tokens: tokens.clone(),
        audit,
        clock,
        random,
        config,
    };

    let guard = AuthGuardState { tokens };

    let open = Router::new()
        .route("/login", post(handlers::login::<R, P>))
        .route("/refresh", post(handlers::refresh::<R, P>))
        .route(
            "/webauthn/authenticate/options",
            post(handlers::authentication_options::<R, P>),
        )
        .route(
            "/webauthn/authenticate/verify",
            post(handlers::authentication_verify::<R, P>),
        );

    let guarded = Router::new()
        .route("/logout", post(handlers::logout::<R, P>))
        .route(
            "/webauthn/register/options",
            post(handlers::registration_options::<R, P>),
        )
        .route(
            "/webauthn/register/verify",
            post(handlers::registration_verify::<R, P>),
        )
        .layer(middleware::from_fn(move |req, next| {
            require_bearer_auth(guard.clone(), req, next)
        }));

    open.merge(guarded).with_state(state)
}
