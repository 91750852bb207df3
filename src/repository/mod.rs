//! Access to the remote back-office API.
//!
//! Readers and writers are generic over the [`Resource`] they serve so a
//! single screen controller can drive clients, jobs and payments alike.

use async_trait::async_trait;

use crate::domain::Resource;
use crate::domain::stats::SummaryMetric;
use crate::domain::types::ClientId;
use crate::forms::login::LoginPayload;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod http;
pub mod memory;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use http::HttpRepository;
pub use memory::InMemoryRepository;

#[async_trait]
pub trait ResourceReader<E: Resource>: Send + Sync {
    /// Lists the records under `scope`.
    async fn list(&self, scope: &E::Scope) -> RepositoryResult<Vec<E>>;
}

/// Write operations. Response bodies are not read back; callers re-list.
#[async_trait]
pub trait ResourceWriter<E: Resource>: Send + Sync {
    async fn create(&self, fields: &E::Fields) -> RepositoryResult<()>;
    async fn update(&self, id: &E::Id, fields: &E::Fields) -> RepositoryResult<()>;
    async fn delete(&self, id: &E::Id) -> RepositoryResult<()>;
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Succeeds only when the API accepted the credentials.
    async fn authenticate(&self, credentials: LoginPayload) -> RepositoryResult<()>;
}

#[async_trait]
pub trait SummaryReader: Send + Sync {
    /// Raw payload of one dashboard summary endpoint.
    async fn fetch_summary(&self, metric: SummaryMetric) -> RepositoryResult<serde_json::Value>;
}

#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// PDF document generated for a client.
    async fn client_document(&self, client_id: ClientId) -> RepositoryResult<Vec<u8>>;
}
