use std::sync::Arc;

use crate::application::retry_once;
use crate::domain::audit::{AuditEvent, AuditEventKind, AuditSink};
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::UserId;
use crate::error::AuthResult;

/// Logout use case
///
/// Deletes the stored refresh session. Deleting a session that does
/// not exist succeeds; logout is idempotent.
pub struct LogoutUseCase<S>
where
    S: SessionRepository,
{
    sessions: Arc<S>,
    audit: Arc<dyn AuditSink>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(sessions: Arc<S>, audit: Arc<dyn AuditSink>) -> Self {
        Self { sessions, audit }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<()> {
        retry_once(|| self.sessions.delete(user_id)).await?;

        self.audit.emit(AuditEvent::succeeded(
            AuditEventKind::UserLoggedOut,
            user_id.clone(),
        ));
        tracing::info!(user_id = %user_id, "User logged out");

        Ok(())
    }
}
