//! Session-wide state passed explicitly to every screen.

use std::sync::Arc;

use crate::services::handoff::ContextHandoff;
use crate::services::session::SessionGate;
use crate::storage::{MemorySessionStore, SessionStore};

pub struct AppContext {
    pub session: SessionGate,
    pub handoff: ContextHandoff,
}

impl AppContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            session: SessionGate::new(store.clone()),
            handoff: ContextHandoff::new(store),
        }
    }

    /// Context backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// Ends the session and forgets the handed-off ids.
    pub fn logout(&mut self) {
        self.session.logout();
        self.handoff.clear();
    }
}
