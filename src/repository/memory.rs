//! In-process stand-in for the remote API.
//!
//! Keeps every collection in memory, allocates sequential ids and derives the
//! dashboard figures from the stored records. Failure switches let callers
//! exercise the error paths of the screens without a server.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::Resource;
use crate::domain::client::{Client, ClientFields};
use crate::domain::job::{Job, JobFields};
use crate::domain::payment::{Payment, PaymentFields};
use crate::domain::stats::SummaryMetric;
use crate::domain::types::{ClientId, JobId, JobStatus, RecordId};
use crate::forms::login::LoginPayload;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    Authenticator, DocumentReader, ResourceReader, ResourceWriter, SummaryReader,
};

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    clients: Mutex<Vec<Client>>,
    jobs: Mutex<Vec<Job>>,
    payments: Mutex<Vec<Payment>>,
    next_id: AtomicU64,
    requests: AtomicUsize,
    credentials: Mutex<Option<LoginPayload>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    failing_metrics: Mutex<HashSet<SummaryMetric>>,
}

/// Selects the table a resource is kept in.
pub trait Stored: Resource {
    fn table(repo: &InMemoryRepository) -> &Mutex<Vec<Self>>;
}

impl Stored for Client {
    fn table(repo: &InMemoryRepository) -> &Mutex<Vec<Self>> {
        &repo.clients
    }
}

impl Stored for Job {
    fn table(repo: &InMemoryRepository) -> &Mutex<Vec<Self>> {
        &repo.jobs
    }
}

impl Stored for Payment {
    fn table(repo: &InMemoryRepository) -> &Mutex<Vec<Self>> {
        &repo.payments
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sum of `amounts` as a JSON number. An overflowing sum is a server error.
fn amount_number(
    mut amounts: impl Iterator<Item = Decimal>,
) -> RepositoryResult<serde_json::Number> {
    let total = amounts
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
        .ok_or_else(server_error)?;
    total
        .to_string()
        .parse()
        .map_err(|e| RepositoryError::Unexpected(format!("{e}")))
}

fn server_error() -> RepositoryError {
    RepositoryError::Status {
        status: 500,
        message: Some("Errore interno del server".to_string()),
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts only `username`/`password` on login.
    pub fn with_credentials(self, username: &str, password: &str) -> Self {
        *lock(&self.credentials) = Some(LoginPayload {
            username: username.to_string(),
            password: password.to_string(),
        });
        self
    }

    /// Stores a record directly, bypassing the failure switches and the
    /// request counter.
    pub fn insert<E: Stored>(&self, fields: E::Fields) -> RepositoryResult<E::Id> {
        let id = self.allocate_id::<E>()?;
        lock(E::table(self)).push(E::assemble(id.clone(), fields));
        Ok(id)
    }

    /// Sample data set: three clients, three jobs and three payments.
    pub fn seeded() -> RepositoryResult<Self> {
        let repo = Self::new();
        let mut clients = Vec::new();
        for (first_name, last_name, email, mobile_phone) in [
            ("Mario", "Rossi", "mario.rossi@email.it", "333-1234567"),
            ("Giuseppe", "Verdi", "giuseppe.verdi@email.it", "334-2345678"),
            ("Anna", "Bianchi", "anna.bianchi@email.it", "335-3456789"),
        ] {
            clients.push(repo.insert::<Client>(ClientFields {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                mobile_phone: mobile_phone.to_string(),
            })?);
        }

        let mut jobs = Vec::new();
        for (owner, title, description, status) in [
            (0, "Ristrutturazione Bagno", "Rifacimento completo del bagno", JobStatus::Completed),
            (0, "Impianto Elettrico", "Adeguamento impianto elettrico", JobStatus::InProgress),
            (1, "Tinteggiatura Soggiorno", "Tinteggiatura pareti soggiorno e cucina", JobStatus::Suspended),
        ] {
            jobs.push(repo.insert::<Job>(JobFields {
                client_id: clients[owner].clone(),
                title: title.to_string(),
                description: description.to_string(),
                status,
            })?);
        }

        for (job, date, due, paid, reason) in [
            (0, (2024, 1, 15), 5000, 5000, "Saldo ristrutturazione"),
            (1, (2024, 1, 20), 8000, 4000, "Prima rata impianto"),
            (1, (2024, 2, 1), 3000, 0, "Seconda rata impianto"),
        ] {
            let (year, month, day) = date;
            let modification_date = chrono::NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| RepositoryError::Unexpected("invalid seed date".to_string()))?;
            repo.insert::<Payment>(PaymentFields {
                job_id: jobs[job].clone(),
                modification_date,
                amount_due: Decimal::from(due),
                amount_paid: Decimal::from(paid),
                reason: reason.to_string(),
            })?;
        }

        Ok(repo)
    }

    /// Makes every list call fail with a server error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every create, update and delete fail with a server error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes the summary endpoint of `metric` fail.
    pub fn fail_metric(&self, metric: SummaryMetric) {
        lock(&self.failing_metrics).insert(metric);
    }

    /// Number of calls received through the repository traits.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Snapshot of a table.
    pub fn records<E: Stored>(&self) -> Vec<E> {
        lock(E::table(self)).clone()
    }

    fn allocate_id<E: Resource>(&self) -> RepositoryResult<E::Id> {
        let next = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(E::Id::parse(&next.to_string())?)
    }

    fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn check_writes(&self) -> RepositoryResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(())
    }

    fn summary_value(&self, metric: SummaryMetric) -> RepositoryResult<serde_json::Value> {
        let jobs = lock(&self.jobs);
        let payments = lock(&self.payments);
        let count_status = |status: JobStatus| jobs.iter().filter(|j| j.status == status).count();

        let number: serde_json::Number = match metric {
            SummaryMetric::AmountOutstanding => {
                amount_number(payments.iter().map(Payment::outstanding))?
            }
            SummaryMetric::AmountReceived => amount_number(payments.iter().map(|p| p.amount_paid))?,
            SummaryMetric::CancelledJobs => count_status(JobStatus::Cancelled).into(),
            SummaryMetric::SuspendedJobs => count_status(JobStatus::Suspended).into(),
            SummaryMetric::InProgressJobs => count_status(JobStatus::InProgress).into(),
            SummaryMetric::CompletedJobs => count_status(JobStatus::Completed).into(),
            SummaryMetric::TotalJobs => jobs.len().into(),
        };

        let mut payload = serde_json::Map::new();
        payload.insert(metric.field().to_string(), serde_json::Value::Number(number));
        Ok(serde_json::Value::Object(payload))
    }
}

#[async_trait]
impl<E: Stored> ResourceReader<E> for InMemoryRepository {
    async fn list(&self, scope: &E::Scope) -> RepositoryResult<Vec<E>> {
        self.record_request();
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(lock(E::table(self))
            .iter()
            .filter(|record| record.belongs_to(scope))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl<E: Stored> ResourceWriter<E> for InMemoryRepository {
    async fn create(&self, fields: &E::Fields) -> RepositoryResult<()> {
        self.record_request();
        self.check_writes()?;
        let id = self.allocate_id::<E>()?;
        lock(E::table(self)).push(E::assemble(id, fields.clone()));
        Ok(())
    }

    async fn update(&self, id: &E::Id, fields: &E::Fields) -> RepositoryResult<()> {
        self.record_request();
        self.check_writes()?;
        let mut table = lock(E::table(self));
        let record = table
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or(RepositoryError::NotFound)?;
        *record = E::assemble(id.clone(), fields.clone());
        Ok(())
    }

    async fn delete(&self, id: &E::Id) -> RepositoryResult<()> {
        self.record_request();
        self.check_writes()?;
        let mut table = lock(E::table(self));
        let position = table
            .iter()
            .position(|record| record.id() == id)
            .ok_or(RepositoryError::NotFound)?;
        table.remove(position);
        Ok(())
    }
}

#[async_trait]
impl Authenticator for InMemoryRepository {
    async fn authenticate(&self, credentials: LoginPayload) -> RepositoryResult<()> {
        self.record_request();
        match lock(&self.credentials).as_ref() {
            Some(expected) if *expected == credentials => Ok(()),
            _ => Err(RepositoryError::Status {
                status: 401,
                message: Some("Credenziali non valide".to_string()),
            }),
        }
    }
}

#[async_trait]
impl SummaryReader for InMemoryRepository {
    async fn fetch_summary(&self, metric: SummaryMetric) -> RepositoryResult<serde_json::Value> {
        self.record_request();
        if lock(&self.failing_metrics).contains(&metric) {
            return Err(server_error());
        }
        self.summary_value(metric)
    }
}

#[async_trait]
impl DocumentReader for InMemoryRepository {
    async fn client_document(&self, client_id: ClientId) -> RepositoryResult<Vec<u8>> {
        self.record_request();
        let clients = lock(&self.clients);
        let client = clients
            .iter()
            .find(|client| client.id == client_id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(format!("%PDF-1.4\n% Scheda cliente {}\n", client.full_name()).into_bytes())
    }
}

impl InMemoryRepository {
    /// Jobs recorded for `client_id`, in insertion order.
    pub fn jobs_of(&self, client_id: &ClientId) -> Vec<Job> {
        lock(&self.jobs)
            .iter()
            .filter(|job| job.client_id.as_ref() == Some(client_id))
            .cloned()
            .collect()
    }

    /// Payments recorded for `job_id`, in insertion order.
    pub fn payments_of(&self, job_id: &JobId) -> Vec<Payment> {
        lock(&self.payments)
            .iter()
            .filter(|payment| payment.job_id.as_ref() == Some(job_id))
            .cloned()
            .collect()
    }
}
