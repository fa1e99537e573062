//! Auth (Authentication/Session) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository/provider/audit ports
//! - `application/` - Use cases, token service, configuration
//! - `infra/` - Database, HTTP provider, and audit implementations
//! - `presentation/` - HTTP handlers, DTOs, router, guard middleware
//!
//! ## Features
//! - Email/password login against an external identity provider
//! - HS256 access/refresh JWT issuance and verification
//! - Refresh session records, one per user identity
//! - WebAuthn registration/authentication ceremonies
//!
//! ## Security Model
//! - Access and refresh tokens signed with independent secrets
//! - Token expiry derived from the injected clock, never from claims
//! - Ceremony challenges are single-use (delete-on-read) and TTL-bounded
//! - Login failures are uniform to avoid account-existence leakage

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token::TokenService;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthStore;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::memory::InMemoryAuthStore;
    pub use crate::infra::postgres::PgAuthStore as AuthStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
