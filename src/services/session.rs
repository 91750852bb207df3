//! Authenticated/not-authenticated gate for the operator session.

use std::sync::Arc;

use crate::forms::login::{LoginForm, LoginPayload};
use crate::repository::Authenticator;
use crate::routes::Route;
use crate::storage::{AUTHENTICATED_KEY, SessionStore};

const AUTHENTICATED_MARKER: &str = "true";

pub struct SessionGate {
    store: Arc<dyn SessionStore>,
    authenticated: bool,
}

impl SessionGate {
    /// Builds the gate, restoring the flag persisted by an earlier login.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let authenticated = store.get(AUTHENTICATED_KEY).as_deref() == Some(AUTHENTICATED_MARKER);
        Self {
            store,
            authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Attempts a login. Blank credentials are rejected without contacting the
    /// API; any failure leaves the session untouched.
    pub async fn login<A>(&mut self, auth: &A, form: &LoginForm) -> bool
    where
        A: Authenticator + ?Sized,
    {
        let payload = match LoginPayload::try_from(form) {
            Ok(payload) => payload,
            Err(_) => return false,
        };

        match auth.authenticate(payload).await {
            Ok(()) => {
                self.authenticated = true;
                self.store.set(AUTHENTICATED_KEY, AUTHENTICATED_MARKER);
                log::info!("Operator logged in");
                true
            }
            Err(e) => {
                log::error!("Login failed: {e}");
                false
            }
        }
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
        self.store.remove(AUTHENTICATED_KEY);
    }

    /// Redirects to the login route while unauthenticated.
    pub fn require(&self) -> Result<(), Route> {
        if self.authenticated {
            Ok(())
        } else {
            Err(Route::Login)
        }
    }
}
