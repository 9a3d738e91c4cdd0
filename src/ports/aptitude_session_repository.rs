//! Aptitude session repository port.

use async_trait::async_trait;

use crate::domain::aptitude::AptitudeSession;
use crate::domain::foundation::{DomainError, SessionId, Timestamp};

/// Persistence for aptitude sessions.
///
/// Writes are optimistic: `update` only succeeds when the stored document
/// still carries the version the caller loaded.
#[async_trait]
pub trait AptitudeSessionRepository: Send + Sync {
    /// Store a new session.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` if the id is already taken
    /// - `StorageError` on persistence failure
    async fn save(&self, session: &AptitudeSession) -> Result<(), DomainError>;

    /// Replace a stored session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    /// - `ConcurrentModification` if the stored version differs from `session.version()`
    /// - `StorageError` on persistence failure
    async fn update(&self, session: &AptitudeSession) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<AptitudeSession>, DomainError>;

    /// Active sessions last updated before `cutoff`.
    async fn find_stale(&self, cutoff: &Timestamp) -> Result<Vec<AptitudeSession>, DomainError>;

    /// Remove a session. Missing ids are not an error.
    async fn delete(&self, id: &SessionId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aptitude_session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn AptitudeSessionRepository) {}
    }
}
