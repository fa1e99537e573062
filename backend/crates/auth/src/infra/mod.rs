//! Infrastructure Layer
//!
//! Concrete implementations of the domain ports.

pub mod audit;
pub mod memory;
pub mod postgres;
pub mod provider;

pub use audit::TracingAuditSink;
pub use memory::InMemoryAuthStore;
pub use postgres::PgAuthStore;
pub use provider::{HttpIdentityProvider, HttpIdentityProviderConfig};
