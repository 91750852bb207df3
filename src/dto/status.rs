//! Display attributes of job statuses.

use serde::Serialize;

use crate::domain::types::JobStatus;

/// How a status badge is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StatusDisplay {
    pub label: &'static str,
    /// Plural label used by the dashboard breakdown.
    pub group_label: &'static str,
    pub tone: &'static str,
    pub icon: &'static str,
}

/// The one table mapping each status to its display attributes.
const STATUS_TABLE: [(JobStatus, StatusDisplay); 4] = [
    (
        JobStatus::InProgress,
        StatusDisplay {
            label: "In Corso",
            group_label: "In Corso",
            tone: "info",
            icon: "clock",
        },
    ),
    (
        JobStatus::Completed,
        StatusDisplay {
            label: "Completato",
            group_label: "Completati",
            tone: "success",
            icon: "check-circle",
        },
    ),
    (
        JobStatus::Suspended,
        StatusDisplay {
            label: "Sospeso",
            group_label: "Sospesi",
            tone: "warning",
            icon: "pause-circle",
        },
    ),
    (
        JobStatus::Cancelled,
        StatusDisplay {
            label: "Annullato",
            group_label: "Annullati",
            tone: "danger",
            icon: "x-circle",
        },
    ),
];

pub fn status_display(status: JobStatus) -> StatusDisplay {
    STATUS_TABLE
        .iter()
        .find(|(candidate, _)| *candidate == status)
        .map(|(_, display)| *display)
        .unwrap_or(STATUS_TABLE[0].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_has_an_entry() {
        for status in JobStatus::ALL {
            assert!(STATUS_TABLE.iter().any(|(candidate, _)| *candidate == status));
        }
        assert_eq!(status_display(JobStatus::Suspended).label, "Sospeso");
        assert_eq!(status_display(JobStatus::Cancelled).tone, "danger");
        assert_eq!(status_display(JobStatus::Completed).group_label, "Completati");
    }
}
