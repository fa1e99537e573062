pub mod refresh_record;
pub mod webauthn_challenge;
pub mod webauthn_credential;

pub use refresh_record::RefreshRecord;
pub use webauthn_challenge::{CeremonyType, WebAuthnChallenge};
pub use webauthn_credential::WebAuthnCredential;
