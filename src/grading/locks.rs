use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::store::RespondentId;

/// One async mutex per respondent, created on first use.
///
/// Held for the whole write (load, score, cascade, commit) so two edits by the
/// same respondent cannot interleave their cache read-modify-write.
#[derive(Debug, Default)]
pub struct RespondentLocks {
    locks: Mutex<HashMap<RespondentId, Arc<AsyncMutex<()>>>>,
}

impl RespondentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, respondent_id: RespondentId) -> Arc<AsyncMutex<()>> {
        Arc::clone(self.locks.lock().entry(respondent_id).or_default())
    }

    pub async fn acquire(&self, respondent_id: RespondentId) -> OwnedMutexGuard<()> {
        self.slot(respondent_id).lock_owned().await
    }

    /// Non-blocking variant, mostly for tests.
    pub fn try_acquire(&self, respondent_id: RespondentId) -> Option<OwnedMutexGuard<()>> {
        self.slot(respondent_id).try_lock_owned().ok()
    }

    /// Drops the entry for a respondent that no longer exists.
    pub fn forget(&self, respondent_id: RespondentId) {
        self.locks.lock().remove(&respondent_id);
    }

    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}
