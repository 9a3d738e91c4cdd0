//! Aptitude session command and query handlers.

mod complete_session;
mod engine;
mod expire_stale_sessions;
mod get_session;
mod session_locks;
mod start_session;
mod submit_response;

pub use complete_session::{CompleteSessionCommand, CompleteSessionHandler, CompleteSessionResult};
pub use engine::{AptitudeEngine, Collaborators};
pub use expire_stale_sessions::{ExpireStaleSessionsHandler, ExpiryReport};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use session_locks::{SessionGuard, SessionLocks};
pub use start_session::{StartSessionCommand, StartSessionHandler};
pub use submit_response::{SubmitResponseCommand, SubmitResponseHandler, SubmitResponseResult};

use crate::domain::aptitude::{AptitudeError, AptitudeSession};
use crate::domain::foundation::{SessionId, UserId};
use crate::ports::{AgentError, AptitudeSessionRepository};

/// Loads a session the caller owns. Foreign sessions look missing.
async fn load_owned(
    sessions: &dyn AptitudeSessionRepository,
    user_id: &UserId,
    session_id: &SessionId,
) -> Result<AptitudeSession, AptitudeError> {
    let session = sessions
        .find_by_id(session_id)
        .await?
        .ok_or(AptitudeError::NotFound(*session_id))?;
    session.authorize(user_id)?;
    Ok(session)
}

/// Only reachable when a collaborator is wired without the fallback decorator.
fn upstream_failure(operation: &str, err: AgentError) -> AptitudeError {
    tracing::error!(operation, error = %err, "collaborator failed without fallback");
    AptitudeError::infrastructure(format!("{} failed: {}", operation, err))
}
