//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::infra::{HttpIdentityProvider, HttpIdentityProviderConfig, TracingAuditSink};
use auth::{AuthConfig, PgAuthStore, TokenService, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use platform::clock::{Clock, SystemClock};
use platform::random::OsRandomSource;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info,audit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_config = Arc::new(load_auth_config()?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Startup cleanup: remove expired WebAuthn challenges
    // Errors here should not prevent server startup
    let store = Arc::new(PgAuthStore::new(pool.clone()));
    let cutoff = clock.now() - auth_config.challenge_ttl_chrono();
    match store.cleanup_expired_challenges(cutoff).await {
        Ok(challenges) => {
            tracing::info!(
                challenges_deleted = challenges,
                "WebAuthn challenge cleanup completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "WebAuthn challenge cleanup failed, continuing anyway"
            );
        }
    }

    let provider = Arc::new(HttpIdentityProvider::new(HttpIdentityProviderConfig {
        base_url: env::var("IDENTITY_PROVIDER_URL")
            .expect("IDENTITY_PROVIDER_URL must be set in environment"),
        api_key: env::var("IDENTITY_PROVIDER_API_KEY")
            .expect("IDENTITY_PROVIDER_API_KEY must be set in environment"),
    })?);
    let tokens = Arc::new(TokenService::new(&auth_config, clock.clone()));

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api/auth",
            auth_router(
                store,
                provider,
                tokens,
                Arc::new(TracingAuditSink),
                clock,
                Arc::new(OsRandomSource),
                auth_config,
            ),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31113));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Assemble the auth configuration from the environment
///
/// Secrets are mandatory in release builds; debug builds fall back to
/// per-process random secrets so local runs need no setup.
fn load_auth_config() -> anyhow::Result<AuthConfig> {
    let base = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        let access_secret = decode_secret("ACCESS_TOKEN_SECRET")?;
        let refresh_secret = decode_secret("REFRESH_TOKEN_SECRET")?;
        AuthConfig {
            access_secret,
            refresh_secret,
            ..AuthConfig::default()
        }
    };

    Ok(AuthConfig {
        access_ttl: env_duration_secs("ACCESS_TOKEN_TTL_SECS", base.access_ttl),
        refresh_ttl: env_duration_secs("REFRESH_TOKEN_TTL_SECS", base.refresh_ttl),
        challenge_ttl: env_duration_secs("WEBAUTHN_CHALLENGE_TTL_SECS", base.challenge_ttl),
        rp_id: env::var("WEBAUTHN_RP_ID").unwrap_or(base.rp_id),
        rp_name: env::var("WEBAUTHN_RP_NAME").unwrap_or(base.rp_name),
        ..base
    })
}

fn decode_secret(name: &str) -> anyhow::Result<Vec<u8>> {
    let raw = env::var(name)
        .unwrap_or_else(|_| panic!("{name} must be set in production"));
    let bytes = Engine::decode(&general_purpose::STANDARD, &raw)?;
    anyhow::ensure!(bytes.len() >= 32, "{name} must decode to at least 32 bytes");
    Ok(bytes)
}

fn env_duration_secs(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
