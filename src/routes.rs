//! Navigation targets returned by guards and selections.

use std::fmt::{Display, Formatter};

use crate::domain::types::{ClientId, JobId};

/// A screen the presentation layer should show next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Clients,
    /// Jobs of a client. `None` defers to the handed-off client.
    Jobs { client_id: Option<ClientId> },
    /// Payments of a job. `None` defers to the handed-off job.
    Payments { job_id: Option<JobId> },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::Clients => "/clienti".to_string(),
            Route::Jobs { client_id } => {
                with_query("/lavori", "clienteId", client_id.as_ref().map(ClientId::as_str))
            }
            Route::Payments { job_id } => {
                with_query("/pagamenti", "lavoroId", job_id.as_ref().map(JobId::as_str))
            }
        }
    }
}

/// Appends `key=value` with the value form-encoded.
fn with_query(path: &str, key: &str, value: Option<&str>) -> String {
    let Some(value) = value else {
        return path.to_string();
    };
    match serde_html_form::to_string(vec![(key, value)]) {
        Ok(query) => format!("{path}?{query}"),
        Err(e) => {
            log::error!("Failed to encode {key} for {path}: {e}");
            path.to_string()
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_carry_parent_ids() {
        let client_id = ClientId::new("4").unwrap();
        assert_eq!(
            Route::Jobs {
                client_id: Some(client_id)
            }
            .path(),
            "/lavori?clienteId=4"
        );
        assert_eq!(Route::Payments { job_id: None }.path(), "/pagamenti");
        assert_eq!(Route::Login.to_string(), "/login");
    }

    #[test]
    fn query_values_are_encoded() {
        let route = Route::Jobs {
            client_id: Some(ClientId::new("a&b=c").unwrap()),
        };
        assert_eq!(route.path(), "/lavori?clienteId=a%26b%3Dc");

        let route = Route::Payments {
            job_id: Some(JobId::new("7 #1").unwrap()),
        };
        assert_eq!(route.path(), "/pagamenti?lavoroId=7+%231");
    }
}
