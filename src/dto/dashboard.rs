//! Dashboard figures shaped for cards and charts.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::stats::{DashboardStats, percent};
use crate::domain::types::JobStatus;
use crate::dto::payments::format_currency;
use crate::dto::status::status_display;

/// One slice of the job status chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
    pub status: JobStatus,
    pub label: &'static str,
    pub tone: &'static str,
    pub count: u64,
    /// Share of all jobs, in percent.
    pub share: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub amount_received: String,
    pub amount_outstanding: String,
    pub amount_total: String,
    pub budget_efficiency: Decimal,
    pub completion_rate: Decimal,
    pub total_jobs: u64,
    pub breakdown: Vec<StatusSlice>,
}

impl From<&DashboardStats> for DashboardView {
    fn from(stats: &DashboardStats) -> Self {
        let breakdown = [
            JobStatus::Completed,
            JobStatus::InProgress,
            JobStatus::Suspended,
            JobStatus::Cancelled,
        ]
        .into_iter()
        .map(|status| {
            let count = stats.jobs_with_status(status);
            let display = status_display(status);
            StatusSlice {
                status,
                label: display.group_label,
                tone: display.tone,
                count,
                share: percent(Decimal::from(count), Decimal::from(stats.total_jobs), 1),
            }
        })
        .collect();

        Self {
            amount_received: format_currency(stats.amount_received),
            amount_outstanding: format_currency(stats.amount_outstanding),
            amount_total: format_currency(stats.amount_total()),
            budget_efficiency: stats.budget_efficiency(),
            completion_rate: stats.completion_rate(),
            total_jobs: stats.total_jobs,
            breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_lists_every_status() {
        let stats = DashboardStats {
            amount_received: Decimal::from(9000),
            amount_outstanding: Decimal::from(7000),
            completed_jobs: 1,
            in_progress_jobs: 1,
            suspended_jobs: 1,
            total_jobs: 3,
            ..DashboardStats::default()
        };

        let view = DashboardView::from(&stats);

        assert_eq!(view.amount_total, "16.000,00 €");
        assert_eq!(view.breakdown.len(), 4);
        assert_eq!(view.breakdown[0].label, "Completati");
        assert_eq!(view.breakdown[0].share.to_string(), "33.3");
        assert_eq!(view.breakdown[3].share, Decimal::ZERO);
    }
}
