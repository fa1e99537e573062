//! Audit Sink Port
//!
//! Append-only record of security-relevant events. Emission is
//! fire-and-forget: the trait is infallible and synchronous at the call
//! site, so it can never block or alter the primary result. A store-backed
//! sink would spawn its write internally.

use crate::domain::value_object::UserId;

/// Identity-affecting state transitions this core records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventKind {
    LoginSuccessful,
    TokenRefreshed,
    UserLoggedOut,
    WebauthnRegister,
    WebauthnAuth,
}

impl AuditEventKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AuditEventKind::LoginSuccessful => "login_successful",
            AuditEventKind::TokenRefreshed => "token_refreshed",
            AuditEventKind::UserLoggedOut => "user_logged_out",
            AuditEventKind::WebauthnRegister => "webauthn_register",
            AuditEventKind::WebauthnAuth => "webauthn_auth",
        }
    }
}

/// Whether the recorded operation completed or was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    Success,
    Failure,
}

impl AuditOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "success",
            AuditOutcome::Failure => "failure",
        }
    }
}

/// One audit record
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub kind: AuditEventKind,
    pub user_id: UserId,
    pub outcome: AuditOutcome,
}

impl AuditEvent {
    pub fn succeeded(kind: AuditEventKind, user_id: UserId) -> Self {
        Self {
            kind,
            user_id,
            outcome: AuditOutcome::Success,
        }
    }

    pub fn failed(kind: AuditEventKind, user_id: UserId) -> Self {
        Self {
            kind,
            user_id,
            outcome: AuditOutcome::Failure,
        }
    }
}

/// External audit log
pub trait AuditSink: Send + Sync {
    fn emit(&self, event: AuditEvent);
}
