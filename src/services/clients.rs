//! Clients screen: the root of the clients → jobs → payments chain.

use std::path::{Path, PathBuf};

use crate::context::AppContext;
use crate::domain::client::{Client, ClientFields};
use crate::domain::types::ClientId;
use crate::dto::notification::Notification;
use crate::forms::FormError;
use crate::forms::client::ClientForm;
use crate::repository::DocumentReader;
use crate::repository::errors::RepositoryError;
use crate::routes::Route;
use crate::services::screen::{Screen, ScreenController, ScreenError, failure};

pub type ClientsScreen = ScreenController<Client>;

impl Screen for Client {
    type Form = ClientForm;

    const LABEL: &'static str = "Cliente";
    const PLURAL: &'static str = "clienti";
    const SEARCHABLE: bool = true;
    const MISSING_SCOPE: &'static str = "";

    fn blank_form() -> ClientForm {
        ClientForm::default()
    }

    fn edit_form(&self) -> ClientForm {
        ClientForm::from(self)
    }

    fn payload(form: &ClientForm, _scope: &()) -> Result<ClientFields, FormError> {
        ClientFields::try_from(form)
    }

    fn search_haystack(&self) -> Vec<String> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.mobile_phone.clone(),
        ]
    }

    fn resolve_scope(_ctx: &AppContext, _explicit: Option<()>) -> Option<()> {
        Some(())
    }
}

impl ScreenController<Client> {
    /// Hands the client off to the jobs screen.
    pub fn select(&self, ctx: &AppContext, id: &ClientId) -> Result<Route, ScreenError> {
        let client = self.find(id)?;
        ctx.handoff.set_active_client(&client.id);
        Ok(Route::Jobs {
            client_id: Some(client.id.clone()),
        })
    }

    /// Downloads the client's PDF into `downloads_dir`. Only notifies; the
    /// screen state is not touched.
    pub async fn generate_document<R>(
        &mut self,
        repo: &R,
        id: &ClientId,
        downloads_dir: &Path,
    ) -> Result<Option<PathBuf>, ScreenError>
    where
        R: DocumentReader + ?Sized,
    {
        let name = self.find(id)?.full_name();

        match save_document(repo, id, downloads_dir).await {
            Ok(path) => {
                log::info!("Saved client document to {}", path.display());
                self.notify(Notification::success(format!("PDF generato per {name}")));
                Ok(Some(path))
            }
            Err(e) => {
                log::error!("Failed to generate document for client {id}: {e}");
                self.notify(failure(
                    "Errore durante la generazione del PDF",
                    &e,
                    format!("Impossibile generare il PDF per {name}"),
                ));
                Ok(None)
            }
        }
    }
}

async fn save_document<R>(
    repo: &R,
    id: &ClientId,
    downloads_dir: &Path,
) -> Result<PathBuf, RepositoryError>
where
    R: DocumentReader + ?Sized,
{
    let bytes = repo.client_document(id.clone()).await?;
    tokio::fs::create_dir_all(downloads_dir).await?;
    let path = downloads_dir.join(format!("cliente_{id}.pdf"));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::screen::ScreenEvent;
    use crate::storage::{AUTHENTICATED_KEY, MemorySessionStore, SessionStore};

    fn client(id: &str, first_name: &str, last_name: &str, email: &str) -> Client {
        Client {
            id: ClientId::new(id).unwrap(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            mobile_phone: "333-1234567".to_string(),
        }
    }

    fn loaded_screen(ctx: &AppContext) -> ClientsScreen {
        let mut screen = ClientsScreen::mount(ctx).unwrap();
        let (ticket, _) = screen.begin_load().unwrap();
        screen
            .finish_load(
                ticket,
                Ok(vec![
                    client("1", "Mario", "Rossi", "mario.rossi@email.it"),
                    client("2", "Giuseppe", "Verdi", "giuseppe.verdi@email.it"),
                ]),
            )
            .unwrap();
        screen
    }

    fn logged_in() -> AppContext {
        let store = Arc::new(MemorySessionStore::new());
        store.set(AUTHENTICATED_KEY, "true");
        AppContext::new(store)
    }

    #[test]
    fn search_matches_any_field_ignoring_case() {
        let ctx = logged_in();
        let mut screen = loaded_screen(&ctx);

        screen.set_search("VERDI");
        let names: Vec<_> = screen.filtered().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(names, ["2"]);

        screen.set_search("email.it");
        assert_eq!(screen.filtered().len(), 2);

        screen.set_search("");
        assert_eq!(screen.filtered().len(), 2);
    }

    #[test]
    fn select_hands_off_the_client() {
        let ctx = logged_in();
        let screen = loaded_screen(&ctx);
        let id = ClientId::new("2").unwrap();

        let route = screen.select(&ctx, &id).unwrap();

        assert_eq!(
            route,
            Route::Jobs {
                client_id: Some(id.clone())
            }
        );
        assert_eq!(ctx.handoff.active_client(), Some(id));
        assert!(matches!(
            screen.select(&ctx, &ClientId::new("9").unwrap()),
            Err(ScreenError::UnknownRecord(_))
        ));
    }

    #[tokio::test]
    async fn document_is_saved_under_the_client_id() {
        let ctx = logged_in();
        let mut screen = loaded_screen(&ctx);
        let dir = tempfile::tempdir().unwrap();
        let mut repo = MockRepository::new();
        repo.expect_client_document()
            .withf(|id| id.as_str() == "1")
            .returning(|_| Ok(b"%PDF-1.4".to_vec()));
        let state_before = screen.state();
        screen.drain_events();

        let path = screen
            .generate_document(&repo, &ClientId::new("1").unwrap(), dir.path())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(path, dir.path().join("cliente_1.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
        assert_eq!(screen.state(), state_before);
        let events = screen.drain_events();
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn document_failure_only_notifies() {
        let ctx = logged_in();
        let mut screen = loaded_screen(&ctx);
        let dir = tempfile::tempdir().unwrap();
        let mut repo = MockRepository::new();
        repo.expect_client_document().returning(|_| {
            Err(RepositoryError::Status {
                status: 500,
                message: None,
            })
        });
        screen.drain_events();

        let saved = screen
            .generate_document(&repo, &ClientId::new("2").unwrap(), dir.path())
            .await
            .unwrap();

        assert_eq!(saved, None);
        assert!(!dir.path().join("cliente_2.pdf").exists());
        match screen.drain_events().as_slice() {
            [ScreenEvent::Notified(notification)] => {
                assert!(notification.is_error());
                assert_eq!(
                    notification.description.as_deref(),
                    Some("Impossibile generare il PDF per Giuseppe Verdi")
                );
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }
}
