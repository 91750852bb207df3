//! Dashboard figures derived from the summary endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::types::JobStatus;

/// One summary endpoint and the payload field it reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SummaryMetric {
    AmountOutstanding,
    AmountReceived,
    CancelledJobs,
    SuspendedJobs,
    InProgressJobs,
    CompletedJobs,
    TotalJobs,
}

impl SummaryMetric {
    pub const ALL: [SummaryMetric; 7] = [
        SummaryMetric::AmountOutstanding,
        SummaryMetric::AmountReceived,
        SummaryMetric::CancelledJobs,
        SummaryMetric::SuspendedJobs,
        SummaryMetric::InProgressJobs,
        SummaryMetric::CompletedJobs,
        SummaryMetric::TotalJobs,
    ];

    /// Path segment of the endpoint, relative to the API base url.
    pub const fn endpoint(self) -> &'static str {
        match self {
            SummaryMetric::AmountOutstanding => "recuperaTotaleSoldiDaRicevere",
            SummaryMetric::AmountReceived => "recuperaTotaleSoldiRicevuti",
            SummaryMetric::CancelledJobs => "recuperaNumeroProgettiAnnullati",
            SummaryMetric::SuspendedJobs => "recuperaNumeroProgettiSospesi",
            SummaryMetric::InProgressJobs => "recuperaNumeroProgettiInCorso",
            SummaryMetric::CompletedJobs => "recuperaNumeroProgettiCompletati",
            SummaryMetric::TotalJobs => "recuperaNumeroProgetti",
        }
    }

    /// Name of the field carrying the value in the endpoint's payload.
    pub const fn field(self) -> &'static str {
        match self {
            SummaryMetric::AmountOutstanding => "totaleSoldiDaRicevere",
            SummaryMetric::AmountReceived => "totaleSoldiRicevuti",
            SummaryMetric::CancelledJobs => "numeroProgettiAnnullati",
            SummaryMetric::SuspendedJobs => "numeroProgettiSospesi",
            SummaryMetric::InProgressJobs => "numeroProgettiInCorso",
            SummaryMetric::CompletedJobs => "numeroProgettiCompletati",
            SummaryMetric::TotalJobs => "numeroProgetti",
        }
    }
}

/// Aggregated dashboard figures. Rebuilt on every refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub amount_outstanding: Decimal,
    pub amount_received: Decimal,
    pub cancelled_jobs: u64,
    pub suspended_jobs: u64,
    pub in_progress_jobs: u64,
    pub completed_jobs: u64,
    pub total_jobs: u64,
}

impl DashboardStats {
    /// Number of jobs reported for `status`.
    pub fn jobs_with_status(&self, status: JobStatus) -> u64 {
        match status {
            JobStatus::InProgress => self.in_progress_jobs,
            JobStatus::Completed => self.completed_jobs,
            JobStatus::Suspended => self.suspended_jobs,
            JobStatus::Cancelled => self.cancelled_jobs,
        }
    }

    /// Sum of collected and still-to-collect money. Zero if the sum
    /// overflows.
    pub fn amount_total(&self) -> Decimal {
        self.amount_received
            .checked_add(self.amount_outstanding)
            .unwrap_or_else(|| {
                log::warn!("Dashboard amount total overflows");
                Decimal::ZERO
            })
    }

    /// Share of the total amount already collected, in percent.
    pub fn budget_efficiency(&self) -> Decimal {
        percent(self.amount_received, self.amount_total(), 2)
    }

    /// Share of jobs completed, in percent.
    pub fn completion_rate(&self) -> Decimal {
        percent(
            Decimal::from(self.completed_jobs),
            Decimal::from(self.total_jobs),
            2,
        )
    }
}

/// `part` as a percentage of `whole`, rounded to `dp` places. Zero when
/// `whole` is zero or the result does not fit a `Decimal`.
pub(crate) fn percent(part: Decimal, whole: Decimal, dp: u32) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|value| value.round_dp(dp))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_are_zero_without_data() {
        let stats = DashboardStats::default();
        assert_eq!(stats.budget_efficiency(), Decimal::ZERO);
        assert_eq!(stats.completion_rate(), Decimal::ZERO);
    }

    #[test]
    fn ratios_use_collected_and_completed_shares() {
        let stats = DashboardStats {
            amount_outstanding: Decimal::from(6000),
            amount_received: Decimal::from(9000),
            completed_jobs: 1,
            in_progress_jobs: 2,
            total_jobs: 3,
            ..DashboardStats::default()
        };

        assert_eq!(stats.budget_efficiency(), Decimal::from(60));
        assert_eq!(stats.completion_rate().to_string(), "33.33");
        assert_eq!(stats.jobs_with_status(JobStatus::InProgress), 2);
    }

    #[test]
    fn overflowing_amounts_degrade_to_zero() {
        let both_max = DashboardStats {
            amount_received: Decimal::MAX,
            amount_outstanding: Decimal::MAX,
            ..DashboardStats::default()
        };
        assert_eq!(both_max.amount_total(), Decimal::ZERO);
        assert_eq!(both_max.budget_efficiency(), Decimal::ZERO);

        let huge_share = DashboardStats {
            amount_received: Decimal::MAX,
            amount_outstanding: -(Decimal::MAX - Decimal::ONE),
            ..DashboardStats::default()
        };
        assert_eq!(huge_share.amount_total(), Decimal::ONE);
        assert_eq!(huge_share.budget_efficiency(), Decimal::ZERO);
    }
}
