//! Generic controller behind the clients, jobs and payments screens.
//!
//! A controller caches one collection, owns the create/edit form and the
//! delete confirmation, and records what happened as [`ScreenEvent`]s for the
//! presentation layer to drain. Every remote call is split in a `begin_*`
//! half that hands out a [`Ticket`] and a `finish_*` half that applies the
//! result. Unmounting bumps the generation so a late result is dropped.
//!
//! Remote failures never surface as `Err`: they end up as notifications.
//! `ScreenError` is reserved for triggers fired from the wrong state.

use std::fmt::Debug;

use thiserror::Error;

use crate::context::AppContext;
use crate::domain::Resource;
use crate::dto::notification::Notification;
use crate::forms::FormError;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ResourceReader, ResourceWriter};
use crate::routes::Route;

/// Per-resource behaviour plugged into [`ScreenController`].
pub trait Screen: Resource {
    type Form: Clone + Debug + Send + Sync;

    /// Singular noun used in notifications, e.g. `Cliente`.
    const LABEL: &'static str;
    /// Plural noun, lowercase.
    const PLURAL: &'static str;
    /// Whether the screen offers a search box.
    const SEARCHABLE: bool;
    /// Shown when the screen is opened without its parent record.
    const MISSING_SCOPE: &'static str;

    fn blank_form() -> Self::Form;

    fn edit_form(&self) -> Self::Form;

    fn payload(form: &Self::Form, scope: &Self::Scope) -> Result<Self::Fields, FormError>;

    /// Texts matched by the search box.
    fn search_haystack(&self) -> Vec<String>;

    /// Picks the explicit route parameter, else whatever the previous screen
    /// handed off.
    fn resolve_scope(ctx: &AppContext, explicit: Option<Self::Scope>) -> Option<Self::Scope>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalMode {
    Create,
    Edit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenState {
    Idle,
    Loading,
    ModalOpen(ModalMode),
    Submitting,
    DeleteConfirmPending,
    Deleting,
    /// The parent record is missing. Terminal.
    Blocked,
}

impl ScreenState {
    fn is_busy(self) -> bool {
        matches!(
            self,
            ScreenState::Loading | ScreenState::Submitting | ScreenState::Deleting
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenEvent {
    StateChanged { from: ScreenState, to: ScreenState },
    Notified(Notification),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScreenError {
    #[error("screen is blocked: its parent record is missing")]
    Blocked,

    #[error("an operation is already in progress")]
    Busy,

    #[error("action not allowed while {0:?}")]
    InvalidTransition(ScreenState),

    #[error("record {0} is not on screen")]
    UnknownRecord(String),

    #[error("result belongs to an unmounted screen")]
    Stale,
}

/// Proof that a `begin_*` call happened on the current mount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct Ticket {
    pub(crate) generation: u64,
}

/// Edit target and form data, present or absent together.
#[derive(Clone, Debug)]
pub struct FormSession<E: Screen> {
    pub target: Option<E::Id>,
    pub data: E::Form,
}

impl<E: Screen> FormSession<E> {
    pub fn mode(&self) -> ModalMode {
        if self.target.is_some() {
            ModalMode::Edit
        } else {
            ModalMode::Create
        }
    }
}

/// Write to perform for a submitted form.
#[derive(Clone, Debug)]
pub enum WriteRequest<E: Resource> {
    Create(E::Fields),
    Update(E::Id, E::Fields),
}

pub struct ScreenController<E: Screen> {
    scope: Option<E::Scope>,
    state: ScreenState,
    items: Vec<E>,
    search: String,
    form: Option<FormSession<E>>,
    pending_delete: Option<E::Id>,
    generation: u64,
    events: Vec<ScreenEvent>,
}

impl<E: Screen> ScreenController<E> {
    /// Mounts the screen using the handed-off parent record. The screen starts
    /// idle and empty; call [`load`](Self::load) or use
    /// [`mount_and_load`](Self::mount_and_load).
    pub fn mount(ctx: &AppContext) -> Result<Self, Route> {
        Self::mount_with(ctx, None)
    }

    /// Mounts the screen. Redirects to login while unauthenticated; a missing
    /// parent record yields a blocked screen that never calls the API.
    pub fn mount_with(ctx: &AppContext, explicit: Option<E::Scope>) -> Result<Self, Route> {
        ctx.session.require()?;

        let scope = E::resolve_scope(ctx, explicit);
        let mut controller = Self {
            scope,
            state: ScreenState::Idle,
            items: Vec::new(),
            search: String::new(),
            form: None,
            pending_delete: None,
            generation: 0,
            events: Vec::new(),
        };

        if controller.scope.is_none() {
            log::error!("{} screen opened without its parent record", E::LABEL);
            controller.transition(ScreenState::Blocked);
            controller.notify(Notification::error(
                "Impossibile aprire la pagina",
                E::MISSING_SCOPE,
            ));
        }

        Ok(controller)
    }

    /// Mounts the screen and lists its records right away, which is how a
    /// screen is normally opened. [`mount_with`](Self::mount_with) leaves the
    /// first [`load`](Self::load) to the caller. A blocked screen is returned
    /// without any request.
    pub async fn mount_and_load<R>(
        ctx: &AppContext,
        explicit: Option<E::Scope>,
        repo: &R,
    ) -> Result<Self, Route>
    where
        R: ResourceReader<E> + ?Sized,
    {
        let mut controller = Self::mount_with(ctx, explicit)?;
        if controller.state != ScreenState::Blocked {
            if let Err(e) = controller.load(repo).await {
                log::warn!("Initial {} load refused: {e}", E::PLURAL);
            }
        }
        Ok(controller)
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn scope(&self) -> Option<&E::Scope> {
        self.scope.as_ref()
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn form(&self) -> Option<&FormSession<E>> {
        self.form.as_ref()
    }

    /// Mutable access to the form data while the modal is open.
    pub fn form_mut(&mut self) -> Option<&mut E::Form> {
        match self.state {
            ScreenState::ModalOpen(_) => self.form.as_mut().map(|session| &mut session.data),
            _ => None,
        }
    }

    pub fn pending_delete(&self) -> Option<&E::Id> {
        self.pending_delete.as_ref()
    }

    pub fn drain_events(&mut self) -> Vec<ScreenEvent> {
        std::mem::take(&mut self.events)
    }

    // Loading

    pub fn begin_load(&mut self) -> Result<(Ticket, E::Scope), ScreenError> {
        self.guard(|state| state == ScreenState::Idle)?;
        let scope = self.scope.clone().ok_or(ScreenError::Blocked)?;
        self.transition(ScreenState::Loading);
        Ok((self.ticket(), scope))
    }

    /// Replaces the collection with `result`. A failed list empties it.
    pub fn finish_load(
        &mut self,
        ticket: Ticket,
        result: RepositoryResult<Vec<E>>,
    ) -> Result<(), ScreenError> {
        self.check_ticket(ticket)?;
        self.guard(|state| state == ScreenState::Loading)?;

        match result {
            Ok(records) => {
                self.items = match self.scope.as_ref() {
                    Some(scope) => records
                        .into_iter()
                        .filter(|record| record.belongs_to(scope))
                        .collect(),
                    None => Vec::new(),
                };
            }
            Err(e) => {
                log::error!("Failed to list {}: {e}", E::PLURAL);
                self.items.clear();
                self.notify(failure(
                    "Errore durante il caricamento dei dati",
                    &e,
                    format!("Impossibile recuperare i {}", E::PLURAL),
                ));
            }
        }

        self.transition(ScreenState::Idle);
        Ok(())
    }

    pub async fn load<R>(&mut self, repo: &R) -> Result<(), ScreenError>
    where
        R: ResourceReader<E> + ?Sized,
    {
        let (ticket, scope) = self.begin_load()?;
        let result = repo.list(&scope).await;
        self.finish_load(ticket, result)
    }

    // Create / edit modal

    pub fn open_create(&mut self) -> Result<(), ScreenError> {
        self.guard(|state| state == ScreenState::Idle)?;
        self.form = Some(FormSession {
            target: None,
            data: E::blank_form(),
        });
        self.transition(ScreenState::ModalOpen(ModalMode::Create));
        Ok(())
    }

    pub fn open_edit(&mut self, id: &E::Id) -> Result<(), ScreenError> {
        self.guard(|state| state == ScreenState::Idle)?;
        let record = self.find(id)?;
        self.form = Some(FormSession {
            target: Some(id.clone()),
            data: record.edit_form(),
        });
        self.transition(ScreenState::ModalOpen(ModalMode::Edit));
        Ok(())
    }

    /// Cancels the modal and discards the form.
    pub fn close_modal(&mut self) -> Result<(), ScreenError> {
        self.guard(|state| matches!(state, ScreenState::ModalOpen(_)))?;
        self.form = None;
        self.transition(ScreenState::Idle);
        Ok(())
    }

    /// Converts the form into a write. An invalid form keeps the modal open,
    /// emits a warning and returns `None`.
    pub fn begin_submit(&mut self) -> Result<Option<(Ticket, WriteRequest<E>)>, ScreenError> {
        self.guard(|state| matches!(state, ScreenState::ModalOpen(_)))?;
        let (Some(session), Some(scope)) = (self.form.as_ref(), self.scope.as_ref()) else {
            return Err(ScreenError::InvalidTransition(self.state));
        };

        let target = session.target.clone();
        let fields = match E::payload(&session.data, scope) {
            Ok(fields) => fields,
            Err(e) => {
                log::warn!("Rejected {} form: {e}", E::LABEL);
                self.notify(Notification::warning("Dati non validi", describe_form_error(&e)));
                return Ok(None);
            }
        };

        let request = match target {
            Some(id) => WriteRequest::Update(id, fields),
            None => WriteRequest::Create(fields),
        };
        self.transition(ScreenState::Submitting);
        Ok(Some((self.ticket(), request)))
    }

    /// Closes the modal whatever the outcome. Returns whether the write went
    /// through, in which case the caller re-lists.
    pub fn finish_submit(
        &mut self,
        ticket: Ticket,
        result: RepositoryResult<()>,
    ) -> Result<bool, ScreenError> {
        self.check_ticket(ticket)?;
        self.guard(|state| state == ScreenState::Submitting)?;

        let mode = self
            .form
            .take()
            .map(|session| session.mode())
            .unwrap_or(ModalMode::Create);
        self.transition(ScreenState::Idle);

        match result {
            Ok(()) => {
                let verb = match mode {
                    ModalMode::Create => "aggiunto",
                    ModalMode::Edit => "aggiornato",
                };
                log::info!("{} {verb}", E::LABEL);
                self.notify(Notification::success(format!(
                    "{} {verb} con successo!",
                    E::LABEL
                )));
                Ok(true)
            }
            Err(e) => {
                log::error!("Failed to save {}: {e}", E::LABEL);
                self.notify(failure(
                    "Errore durante il salvataggio",
                    &e,
                    format!("Impossibile salvare il {}", E::LABEL.to_lowercase()),
                ));
                Ok(false)
            }
        }
    }

    /// Submits the form and re-lists after a successful write.
    pub async fn submit<R>(&mut self, repo: &R) -> Result<bool, ScreenError>
    where
        R: ResourceReader<E> + ResourceWriter<E> + ?Sized,
    {
        let Some((ticket, request)) = self.begin_submit()? else {
            return Ok(false);
        };
        let result = match &request {
            WriteRequest::Create(fields) => repo.create(fields).await,
            WriteRequest::Update(id, fields) => repo.update(id, fields).await,
        };
        let written = self.finish_submit(ticket, result)?;
        if written {
            self.load(repo).await?;
        }
        Ok(written)
    }

    // Delete with confirmation

    pub fn request_delete(&mut self, id: &E::Id) -> Result<(), ScreenError> {
        self.guard(|state| state == ScreenState::Idle)?;
        self.find(id)?;
        self.pending_delete = Some(id.clone());
        self.transition(ScreenState::DeleteConfirmPending);
        Ok(())
    }

    pub fn cancel_delete(&mut self) -> Result<(), ScreenError> {
        self.guard(|state| state == ScreenState::DeleteConfirmPending)?;
        self.pending_delete = None;
        self.transition(ScreenState::Idle);
        Ok(())
    }

    pub fn begin_delete(&mut self) -> Result<(Ticket, E::Id), ScreenError> {
        self.guard(|state| state == ScreenState::DeleteConfirmPending)?;
        let id = self
            .pending_delete
            .clone()
            .ok_or(ScreenError::InvalidTransition(self.state))?;
        self.transition(ScreenState::Deleting);
        Ok((self.ticket(), id))
    }

    /// Local state is left alone; a successful delete is followed by a re-list.
    pub fn finish_delete(
        &mut self,
        ticket: Ticket,
        result: RepositoryResult<()>,
    ) -> Result<bool, ScreenError> {
        self.check_ticket(ticket)?;
        self.guard(|state| state == ScreenState::Deleting)?;
        self.pending_delete = None;
        self.transition(ScreenState::Idle);

        match result {
            Ok(()) => {
                log::info!("{} eliminato", E::LABEL);
                self.notify(Notification::success(format!(
                    "{} eliminato con successo!",
                    E::LABEL
                )));
                Ok(true)
            }
            Err(e) => {
                log::error!("Failed to delete {}: {e}", E::LABEL);
                self.notify(failure(
                    "Errore durante l'eliminazione",
                    &e,
                    format!("Impossibile eliminare il {}", E::LABEL.to_lowercase()),
                ));
                Ok(false)
            }
        }
    }

    pub async fn confirm_delete<R>(&mut self, repo: &R) -> Result<bool, ScreenError>
    where
        R: ResourceReader<E> + ResourceWriter<E> + ?Sized,
    {
        let (ticket, id) = self.begin_delete()?;
        let result = repo.delete(&id).await;
        let deleted = self.finish_delete(ticket, result)?;
        if deleted {
            self.load(repo).await?;
        }
        Ok(deleted)
    }

    // Derived views

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Records matching the search box, case-insensitively, in list order.
    pub fn filtered(&self) -> Vec<&E> {
        if !E::SEARCHABLE || self.search.is_empty() {
            return self.items.iter().collect();
        }
        let needle = self.search.to_lowercase();
        self.items
            .iter()
            .filter(|record| {
                record
                    .search_haystack()
                    .iter()
                    .any(|text| text.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Detaches the screen. Results of calls started before are dropped.
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.form = None;
        self.pending_delete = None;
        if self.state != ScreenState::Blocked {
            self.transition(ScreenState::Idle);
        }
    }

    pub(crate) fn find(&self, id: &E::Id) -> Result<&E, ScreenError> {
        self.items
            .iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| ScreenError::UnknownRecord(id.to_string()))
    }

    pub(crate) fn notify(&mut self, notification: Notification) {
        self.events.push(ScreenEvent::Notified(notification));
    }

    fn ticket(&self) -> Ticket {
        Ticket {
            generation: self.generation,
        }
    }

    fn check_ticket(&self, ticket: Ticket) -> Result<(), ScreenError> {
        if ticket.generation != self.generation {
            log::debug!("Dropping stale {} result", E::LABEL);
            return Err(ScreenError::Stale);
        }
        Ok(())
    }

    fn guard(&self, allowed: impl Fn(ScreenState) -> bool) -> Result<(), ScreenError> {
        if allowed(self.state) {
            return Ok(());
        }
        Err(match self.state {
            ScreenState::Blocked => ScreenError::Blocked,
            state if state.is_busy() => ScreenError::Busy,
            state => ScreenError::InvalidTransition(state),
        })
    }

    fn transition(&mut self, to: ScreenState) {
        let from = self.state;
        if from != to {
            self.state = to;
            self.events.push(ScreenEvent::StateChanged { from, to });
        }
    }
}

/// Error notification carrying the server message when there is one.
pub(crate) fn failure(title: &str, err: &RepositoryError, fallback: String) -> Notification {
    let description = err
        .server_message()
        .map(str::to_string)
        .unwrap_or(fallback);
    Notification::error(title, description)
}

fn describe_form_error(err: &FormError) -> String {
    match err {
        FormError::Validation(_) => "Compila tutti i campi obbligatori".to_string(),
        FormError::InvalidDate(value) => format!("Data non valida: {value}"),
        FormError::InvalidAmount(value) => format!("Importo non valido: {value}"),
        FormError::InvalidStatus(value) => format!("Stato non valido: {value}"),
    }
}
