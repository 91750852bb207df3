//! Ids handed from one screen to the next through the session store.

use std::sync::Arc;

use crate::domain::types::{ClientId, JobId};
use crate::storage::{ACTIVE_CLIENT_KEY, ACTIVE_JOB_KEY, SessionStore};

#[derive(Clone)]
pub struct ContextHandoff {
    store: Arc<dyn SessionStore>,
}

impl ContextHandoff {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn set_active_client(&self, id: &ClientId) {
        self.store.set(ACTIVE_CLIENT_KEY, id.as_str());
    }

    /// Client selected last, if any. Blank stored values read as absent.
    pub fn active_client(&self) -> Option<ClientId> {
        self.store
            .get(ACTIVE_CLIENT_KEY)
            .and_then(|value| ClientId::new(value).ok())
    }

    pub fn set_active_job(&self, id: &JobId) {
        self.store.set(ACTIVE_JOB_KEY, id.as_str());
    }

    pub fn active_job(&self) -> Option<JobId> {
        self.store
            .get(ACTIVE_JOB_KEY)
            .and_then(|value| JobId::new(value).ok())
    }

    pub fn clear(&self) {
        self.store.remove(ACTIVE_CLIENT_KEY);
        self.store.remove(ACTIVE_JOB_KEY);
    }
}
