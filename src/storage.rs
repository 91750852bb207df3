//! Session-scoped key/value storage.
//!
//! Holds the authenticated marker and the ids handed from one screen to the
//! next. Values live as long as the store; nothing is written to disk.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Key under which the authenticated marker is persisted.
pub const AUTHENTICATED_KEY: &str = "isAuthenticated";
/// Key of the client selected on the clients screen.
pub const ACTIVE_CLIENT_KEY: &str = "activeClientId";
/// Key of the job selected on the jobs screen.
pub const ACTIVE_JOB_KEY: &str = "activeJobId";

/// String key/value store scoped to one operator session.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_values<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> T {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut values)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.with_values(|values| values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        self.with_values(|values| {
            values.insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) {
        self.with_values(|values| {
            values.remove(key);
        });
    }

    fn clear(&self) {
        self.with_values(HashMap::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get(ACTIVE_CLIENT_KEY), None);

        store.set(ACTIVE_CLIENT_KEY, "1");
        assert_eq!(store.get(ACTIVE_CLIENT_KEY).as_deref(), Some("1"));

        store.remove(ACTIVE_CLIENT_KEY);
        assert_eq!(store.get(ACTIVE_CLIENT_KEY), None);
    }

    #[test]
    fn clear_drops_every_key() {
        let store = MemorySessionStore::new();
        store.set(AUTHENTICATED_KEY, "true");
        store.set(ACTIVE_JOB_KEY, "3");

        store.clear();

        assert_eq!(store.get(AUTHENTICATED_KEY), None);
        assert_eq!(store.get(ACTIVE_JOB_KEY), None);
    }
}
