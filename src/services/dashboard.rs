//! Dashboard aggregation over the seven summary endpoints.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::context::AppContext;
use crate::domain::stats::{DashboardStats, SummaryMetric};
use crate::dto::dashboard::DashboardView;
use crate::repository::SummaryReader;
use crate::routes::Route;
use crate::services::screen::{ScreenError, Ticket};

/// Fetches every summary endpoint concurrently and reduces the payloads.
/// A failed request or an unreadable field counts as zero.
pub async fn refresh_stats<R>(repo: &R) -> DashboardStats
where
    R: SummaryReader + ?Sized,
{
    let (outstanding, received, cancelled, suspended, in_progress, completed, total) = tokio::join!(
        fetch(repo, SummaryMetric::AmountOutstanding),
        fetch(repo, SummaryMetric::AmountReceived),
        fetch(repo, SummaryMetric::CancelledJobs),
        fetch(repo, SummaryMetric::SuspendedJobs),
        fetch(repo, SummaryMetric::InProgressJobs),
        fetch(repo, SummaryMetric::CompletedJobs),
        fetch(repo, SummaryMetric::TotalJobs),
    );

    DashboardStats {
        amount_outstanding: amount(SummaryMetric::AmountOutstanding, outstanding),
        amount_received: amount(SummaryMetric::AmountReceived, received),
        cancelled_jobs: count(SummaryMetric::CancelledJobs, cancelled),
        suspended_jobs: count(SummaryMetric::SuspendedJobs, suspended),
        in_progress_jobs: count(SummaryMetric::InProgressJobs, in_progress),
        completed_jobs: count(SummaryMetric::CompletedJobs, completed),
        total_jobs: count(SummaryMetric::TotalJobs, total),
    }
}

async fn fetch<R>(repo: &R, metric: SummaryMetric) -> Option<Value>
where
    R: SummaryReader + ?Sized,
{
    match repo.fetch_summary(metric).await {
        Ok(payload) => Some(payload),
        Err(e) => {
            log::warn!("Summary endpoint {} failed: {e}", metric.endpoint());
            None
        }
    }
}

fn field(metric: SummaryMetric, payload: Option<Value>) -> Option<Value> {
    let value = payload?.get(metric.field()).cloned();
    if value.is_none() {
        log::warn!("Summary payload lacks `{}`", metric.field());
    }
    value
}

fn amount(metric: SummaryMetric, payload: Option<Value>) -> Decimal {
    let parsed = match field(metric, payload) {
        Some(Value::Number(number)) => parse_decimal(&number.to_string()),
        Some(Value::String(text)) => parse_decimal(&text.trim().replace(',', ".")),
        Some(Value::Null) | None => return Decimal::ZERO,
        Some(_) => None,
    };
    parsed.unwrap_or_else(|| {
        log::warn!("Unreadable value for `{}`", metric.field());
        Decimal::ZERO
    })
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn count(metric: SummaryMetric, payload: Option<Value>) -> u64 {
    let parsed = match field(metric, payload) {
        Some(Value::Number(number)) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.is_finite() && *value >= 0.0)
                .map(|value| value.round() as u64)
        }),
        Some(Value::String(text)) => text.trim().parse().ok(),
        Some(Value::Null) | None => return 0,
        Some(_) => None,
    };
    parsed.unwrap_or_else(|| {
        log::warn!("Unreadable value for `{}`", metric.field());
        0
    })
}

/// Dashboard screen: authentication guard, loading flag and stale-result
/// protection around [`refresh_stats`].
pub struct DashboardScreen {
    stats: DashboardStats,
    loading: bool,
    generation: u64,
}

impl DashboardScreen {
    pub fn mount(ctx: &AppContext) -> Result<Self, Route> {
        ctx.session.require()?;
        Ok(Self {
            stats: DashboardStats::default(),
            loading: false,
            generation: 0,
        })
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::from(&self.stats)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin_refresh(&mut self) -> Result<Ticket, ScreenError> {
        if self.loading {
            return Err(ScreenError::Busy);
        }
        self.loading = true;
        Ok(Ticket {
            generation: self.generation,
        })
    }

    pub fn finish_refresh(
        &mut self,
        ticket: Ticket,
        stats: DashboardStats,
    ) -> Result<(), ScreenError> {
        if ticket.generation != self.generation {
            log::debug!("Dropping stale dashboard result");
            return Err(ScreenError::Stale);
        }
        self.stats = stats;
        self.loading = false;
        Ok(())
    }

    pub async fn refresh<R>(&mut self, repo: &R) -> Result<(), ScreenError>
    where
        R: SummaryReader + ?Sized,
    {
        let ticket = self.begin_refresh()?;
        let stats = refresh_stats(repo).await;
        self.finish_refresh(ticket, stats)
    }

    pub fn unmount(&mut self) {
        self.generation += 1;
        self.loading = false;
    }
}
