//! GetSessionHandler - owner-scoped session read.

use std::sync::Arc;

use super::load_owned;
use crate::domain::aptitude::{AptitudeError, AptitudeSession};
use crate::domain::foundation::{SessionId, UserId};
use crate::ports::AptitudeSessionRepository;

#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub user_id: UserId,
    pub session_id: SessionId,
}

pub struct GetSessionHandler {
    sessions: Arc<dyn AptitudeSessionRepository>,
}

impl GetSessionHandler {
    pub fn new(sessions: Arc<dyn AptitudeSessionRepository>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<AptitudeSession, AptitudeError> {
        load_owned(self.sessions.as_ref(), &query.user_id, &query.session_id).await
    }
}
