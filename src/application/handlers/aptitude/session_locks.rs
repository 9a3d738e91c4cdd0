//! Per-session lock registry.
//!
//! Submit, complete and the expiry sweep take the session's lock for the
//! whole load-mutate-persist cycle, so two writers for one session never
//! interleave. Different sessions proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError, Weak};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::SessionId;

/// Dead entries are purged once the map grows beyond this.
const PRUNE_THRESHOLD: usize = 64;

#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: StdMutex<HashMap<SessionId, Weak<Mutex<()>>>>,
}

/// Held for the duration of one session mutation.
#[derive(Debug)]
pub struct SessionGuard {
    _guard: OwnedMutexGuard<()>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, session_id: &SessionId) -> SessionGuard {
        let mutex = {
            let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);

            let mutex = map
                .get(session_id)
                .and_then(Weak::upgrade)
                .unwrap_or_else(|| {
                    let fresh = Arc::new(Mutex::new(()));
                    map.insert(*session_id, Arc::downgrade(&fresh));
                    fresh
                });

            if map.len() > PRUNE_THRESHOLD {
                map.retain(|_, weak| weak.strong_count() > 0);
            }
            mutex
        };

        SessionGuard {
            _guard: mutex.lock_owned().await,
        }
    }

    /// Entries currently tracked, live or not.
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
