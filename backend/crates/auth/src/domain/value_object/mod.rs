pub mod email;
pub mod provider_artifact;
pub mod user_id;

pub use email::Email;
pub use provider_artifact::ProviderRefreshArtifact;
pub use user_id::UserId;
