use serde::Deserialize;
use validator::Validate;

use crate::domain::job::{Job, JobFields};
use crate::domain::types::{ClientId, JobStatus};
use crate::forms::{FormError, trim_in_place};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Validate)]
/// Form data for adding or editing a job. A blank form starts in progress.
pub struct JobForm {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub status: JobStatus,
}

impl JobForm {
    /// Sets the status from its wire key, as a select box would submit it.
    pub fn set_status_key(&mut self, key: &str) -> Result<(), FormError> {
        self.status = key
            .parse()
            .map_err(|_| FormError::InvalidStatus(key.to_string()))?;
        Ok(())
    }

    /// Converts the form into fields owned by `client_id`.
    pub fn to_fields(&self, client_id: &ClientId) -> Result<JobFields, FormError> {
        let mut form = self.clone();
        trim_in_place(&mut form.title);
        trim_in_place(&mut form.description);
        form.validate()?;

        Ok(JobFields {
            client_id: client_id.clone(),
            title: form.title,
            description: form.description,
            status: form.status,
        })
    }
}

impl From<&Job> for JobForm {
    fn from(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            description: job.description.clone(),
            status: job.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_form_defaults_to_in_progress() {
        assert_eq!(JobForm::default().status, JobStatus::InProgress);
    }

    #[test]
    fn fields_carry_the_owning_client() {
        let mut form = JobForm {
            title: "Tinteggiatura Soggiorno".to_string(),
            description: "Tinteggiatura pareti soggiorno e cucina".to_string(),
            ..JobForm::default()
        };
        form.set_status_key("completato").unwrap();
        let client_id = ClientId::new("1").unwrap();

        let fields = form.to_fields(&client_id).unwrap();

        assert_eq!(fields.client_id, client_id);
        assert_eq!(fields.status, JobStatus::Completed);
    }

    #[test]
    fn unknown_status_key_is_rejected() {
        let mut form = JobForm::default();
        assert!(matches!(
            form.set_status_key("chiuso"),
            Err(FormError::InvalidStatus(_))
        ));
        assert_eq!(form.status, JobStatus::InProgress);
    }
}
