use serde::{Deserialize, Serialize};

use crate::domain::Resource;
use crate::domain::types::{ClientId, JobId, JobStatus};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    /// Owning client. Some list endpoints omit it.
    #[serde(rename = "clienteId", default)]
    pub client_id: Option<ClientId>,
    #[serde(rename = "titolo", default)]
    pub title: String,
    #[serde(rename = "descrizione", default)]
    pub description: String,
    #[serde(rename = "stato", default)]
    pub status: JobStatus,
}

/// Fields submitted when creating or updating a job.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobFields {
    #[serde(rename = "clienteId")]
    pub client_id: ClientId,
    #[serde(rename = "titolo")]
    pub title: String,
    #[serde(rename = "descrizione")]
    pub description: String,
    #[serde(rename = "stato")]
    pub status: JobStatus,
}

impl Resource for Job {
    type Id = JobId;
    type Scope = ClientId;
    type Fields = JobFields;

    fn id(&self) -> &JobId {
        &self.id
    }

    fn assemble(id: JobId, fields: JobFields) -> Self {
        Self {
            id,
            client_id: Some(fields.client_id),
            title: fields.title,
            description: fields.description,
            status: fields.status,
        }
    }

    fn belongs_to(&self, scope: &ClientId) -> bool {
        self.client_id.as_ref().is_none_or(|owner| owner == scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_without_owner_is_kept_in_any_scope() {
        let job: Job =
            serde_json::from_str(r#"{"id": "3", "titolo": "Impianto Elettrico", "stato": "in_corso"}"#)
                .unwrap();
        let scope = ClientId::new("2").unwrap();

        assert!(job.client_id.is_none());
        assert!(job.belongs_to(&scope));
    }

    #[test]
    fn job_with_other_owner_is_filtered_out() {
        let job: Job = serde_json::from_str(
            r#"{"id": "1", "clienteId": "1", "titolo": "Ristrutturazione Bagno", "descrizione": "", "stato": "completato"}"#,
        )
        .unwrap();

        assert!(job.belongs_to(&ClientId::new("1").unwrap()));
        assert!(!job.belongs_to(&ClientId::new("2").unwrap()));
        assert_eq!(job.status, JobStatus::Completed);
    }
}
