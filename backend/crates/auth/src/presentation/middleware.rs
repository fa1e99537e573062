//! Auth Middleware
//!
//! Bearer-token guard for protected routes.

use axum::body::Body;
use axum::http::{Method, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::token::TokenService;
use crate::domain::value_object::UserId;
use crate::error::AuthError;

/// Authenticated identity stored in request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

/// Guard state
#[derive(Clone)]
pub struct AuthGuardState {
    pub tokens: Arc<TokenService>,
}

/// Middleware that requires a valid bearer access token
///
/// CORS pre-flight requests pass through unauthenticated and get no
/// identity extension; guarded handlers must not assume one is present on
/// OPTIONS. The guard does no I/O beyond signature math.
pub async fn require_bearer_auth(
    state: AuthGuardState,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let token = match bearer_token(&req) {
        Some(token) => token,
        None => return Err(AuthError::Unauthenticated.into_response()),
    };

    let user_id = match state.tokens.verify(&token) {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::debug!(error = %e, "Bearer token rejected");
            return Err(e.into_response());
        }
    };

    req.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(req).await)
}

fn bearer_token(req: &Request<Body>) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use axum::Router;
    use axum::extract::Extension;
    use axum::http::StatusCode;
    use axum::routing::any;
    use platform::clock::ManualClock;
    use tower::util::ServiceExt;

    fn guarded_app(tokens: Arc<TokenService>) -> Router {
        let state = AuthGuardState { tokens };

        async fn whoami(current: Option<Extension<CurrentUser>>) -> String {
            match current {
                Some(Extension(user)) => user.0.as_str().to_string(),
                None => "anonymous".to_string(),
            }
        }

        Router::new().route("/guarded", any(whoami)).layer(
            axum::middleware::from_fn(move |req, next| {
                require_bearer_auth(state.clone(), req, next)
            }),
        )
    }

    fn token_service() -> Arc<TokenService> {
        let config = AuthConfig::with_random_secrets();
        Arc::new(TokenService::new(&config, Arc::new(ManualClock::starting_now())))
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_is_401() {
        let app = guarded_app(token_service());
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/guarded")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_header_is_401() {
        let app = guarded_app(token_service());
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/guarded")
                    .header(header::AUTHORIZATION, "Token abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bad_token_is_401() {
        let app = guarded_app(token_service());
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/guarded")
                    .header(header::AUTHORIZATION, "Bearer not.a.jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_sets_identity() {
        let tokens = token_service();
        let app = guarded_app(tokens.clone());
        let jwt = tokens
            .issue_access(&UserId::new("u-42").unwrap())
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/guarded")
                    .header(header::AUTHORIZATION, format!("Bearer {jwt}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "u-42");
    }

    #[tokio::test]
    async fn test_options_passes_through_without_identity() {
        let app = guarded_app(token_service());
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/guarded")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous");
    }
}
