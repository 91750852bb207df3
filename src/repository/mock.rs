//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::stats::SummaryMetric;
use crate::domain::types::ClientId;
use crate::forms::login::LoginPayload;
use crate::repository::errors::RepositoryResult;
use crate::repository::{Authenticator, DocumentReader, SummaryReader};

mock! {
    pub Repository {}

    #[async_trait]
    impl Authenticator for Repository {
        async fn authenticate(&self, credentials: LoginPayload) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl SummaryReader for Repository {
        async fn fetch_summary(&self, metric: SummaryMetric) -> RepositoryResult<serde_json::Value>;
    }

    #[async_trait]
    impl DocumentReader for Repository {
        async fn client_document(&self, client_id: ClientId) -> RepositoryResult<Vec<u8>>;
    }
}
