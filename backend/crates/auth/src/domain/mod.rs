//! Domain Layer
//!
//! Contains entities, value objects, and the ports to external
//! collaborators (stores, identity provider, audit log).

pub mod audit;
pub mod entity;
pub mod provider;
pub mod repository;
pub mod value_object;

// Re-exports
pub use audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditSink};
pub use entity::{CeremonyType, RefreshRecord, WebAuthnChallenge, WebAuthnCredential};
pub use provider::{IdentityProvider, ProviderIdentity};
pub use repository::{ChallengeRepository, CredentialRepository, SessionRepository};
