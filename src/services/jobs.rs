//! Jobs screen, scoped to one client.

use crate::context::AppContext;
use crate::domain::job::{Job, JobFields};
use crate::domain::types::{ClientId, JobId};
use crate::dto::status::{StatusDisplay, status_display};
use crate::forms::FormError;
use crate::forms::job::JobForm;
use crate::routes::Route;
use crate::services::screen::{Screen, ScreenController, ScreenError};

pub type JobsScreen = ScreenController<Job>;

impl Screen for Job {
    type Form = JobForm;

    const LABEL: &'static str = "Lavoro";
    const PLURAL: &'static str = "lavori";
    const SEARCHABLE: bool = true;
    const MISSING_SCOPE: &'static str = "Nessun cliente selezionato";

    fn blank_form() -> JobForm {
        JobForm::default()
    }

    fn edit_form(&self) -> JobForm {
        JobForm::from(self)
    }

    fn payload(form: &JobForm, scope: &ClientId) -> Result<JobFields, FormError> {
        form.to_fields(scope)
    }

    fn search_haystack(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.description.clone(),
            self.status.key().to_string(),
            status_display(self.status).label.to_string(),
        ]
    }

    fn resolve_scope(ctx: &AppContext, explicit: Option<ClientId>) -> Option<ClientId> {
        explicit.or_else(|| ctx.handoff.active_client())
    }
}

impl ScreenController<Job> {
    /// Hands the job off to the payments screen.
    pub fn select(&self, ctx: &AppContext, id: &JobId) -> Result<Route, ScreenError> {
        let job = self.find(id)?;
        ctx.handoff.set_active_job(&job.id);
        Ok(Route::Payments {
            job_id: Some(job.id.clone()),
        })
    }

    /// Badge attributes of a job on screen.
    pub fn status_of(&self, id: &JobId) -> Result<StatusDisplay, ScreenError> {
        Ok(status_display(self.find(id)?.status))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::types::JobStatus;
    use crate::storage::{AUTHENTICATED_KEY, MemorySessionStore, SessionStore};

    fn logged_in() -> AppContext {
        let store = Arc::new(MemorySessionStore::new());
        store.set(AUTHENTICATED_KEY, "true");
        AppContext::new(store)
    }

    fn job(id: &str, owner: Option<&str>, title: &str, status: JobStatus) -> Job {
        Job {
            id: JobId::new(id).unwrap(),
            client_id: owner.map(|owner| ClientId::new(owner).unwrap()),
            title: title.to_string(),
            description: String::new(),
            status,
        }
    }

    #[test]
    fn explicit_client_wins_over_handoff() {
        let ctx = logged_in();
        ctx.handoff.set_active_client(&ClientId::new("1").unwrap());

        let explicit = JobsScreen::mount_with(&ctx, Some(ClientId::new("2").unwrap())).unwrap();
        let handed_off = JobsScreen::mount(&ctx).unwrap();

        assert_eq!(explicit.scope().unwrap().as_str(), "2");
        assert_eq!(handed_off.scope().unwrap().as_str(), "1");
    }

    #[test]
    fn listed_jobs_of_other_clients_are_dropped() {
        let ctx = logged_in();
        let mut screen = JobsScreen::mount_with(&ctx, Some(ClientId::new("1").unwrap())).unwrap();

        let (ticket, _) = screen.begin_load().unwrap();
        screen
            .finish_load(
                ticket,
                Ok(vec![
                    job("1", Some("1"), "Ristrutturazione Bagno", JobStatus::Completed),
                    job("2", Some("2"), "Tinteggiatura Soggiorno", JobStatus::Suspended),
                    job("3", None, "Impianto Elettrico", JobStatus::InProgress),
                ]),
            )
            .unwrap();

        let ids: Vec<_> = screen.items().iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn search_covers_status_key_and_label() {
        let ctx = logged_in();
        let mut screen = JobsScreen::mount_with(&ctx, Some(ClientId::new("1").unwrap())).unwrap();
        let (ticket, _) = screen.begin_load().unwrap();
        screen
            .finish_load(
                ticket,
                Ok(vec![
                    job("1", Some("1"), "Ristrutturazione Bagno", JobStatus::Completed),
                    job("3", Some("1"), "Impianto Elettrico", JobStatus::InProgress),
                ]),
            )
            .unwrap();

        screen.set_search("in_corso");
        assert_eq!(screen.filtered().len(), 1);
        screen.set_search("completato");
        assert_eq!(screen.filtered()[0].id.as_str(), "1");
        screen.set_search("in corso");
        assert_eq!(screen.filtered()[0].id.as_str(), "3");

        let route = screen.select(&ctx, &JobId::new("3").unwrap()).unwrap();
        assert_eq!(
            route,
            Route::Payments {
                job_id: Some(JobId::new("3").unwrap())
            }
        );
        assert_eq!(ctx.handoff.active_job().unwrap().as_str(), "3");
        assert_eq!(
            screen.status_of(&JobId::new("3").unwrap()).unwrap().label,
            "In Corso"
        );
    }
}
