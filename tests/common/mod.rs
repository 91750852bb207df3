//! Helpers shared by the integration tests.
#![allow(dead_code)]

use lavori_backoffice::context::AppContext;
use lavori_backoffice::dto::notification::Notification;
use lavori_backoffice::forms::login::LoginForm;
use lavori_backoffice::repository::InMemoryRepository;
use lavori_backoffice::services::ScreenEvent;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "password";

/// Seeded repository accepting [`USERNAME`]/[`PASSWORD`].
pub fn seeded_repo() -> InMemoryRepository {
    InMemoryRepository::seeded()
        .unwrap()
        .with_credentials(USERNAME, PASSWORD)
}

pub fn credentials() -> LoginForm {
    LoginForm {
        username: USERNAME.to_string(),
        password: PASSWORD.to_string(),
    }
}

/// Context logged in against `repo`.
pub async fn logged_in(repo: &InMemoryRepository) -> AppContext {
    let mut ctx = AppContext::in_memory();
    assert!(ctx.session.login(repo, &credentials()).await);
    ctx
}

/// Notifications among `events`, in order.
pub fn notifications(events: Vec<ScreenEvent>) -> Vec<Notification> {
    events
        .into_iter()
        .filter_map(|event| match event {
            ScreenEvent::Notified(notification) => Some(notification),
            ScreenEvent::StateChanged { .. } => None,
        })
        .collect()
}
