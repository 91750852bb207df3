//! `reqwest` backed implementation of the repository traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::Resource;
use crate::domain::client::Client;
use crate::domain::job::Job;
use crate::domain::payment::Payment;
use crate::domain::stats::SummaryMetric;
use crate::domain::types::{ClientId, JobId, RecordId};
use crate::forms::login::LoginPayload;
use crate::models::config::ApiConfig;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    Authenticator, DocumentReader, ResourceReader, ResourceWriter, SummaryReader,
};

/// Collection path of a resource and how its scope is passed to the list call.
pub trait Endpoint: Resource + DeserializeOwned {
    const COLLECTION: &'static str;

    /// Query parameter restricting the list to `scope`.
    fn scope_query(scope: &Self::Scope) -> Option<(&'static str, String)>;
}

impl Endpoint for Client {
    const COLLECTION: &'static str = "clienti";

    fn scope_query(_scope: &()) -> Option<(&'static str, String)> {
        None
    }
}

impl Endpoint for Job {
    const COLLECTION: &'static str = "lavori";

    fn scope_query(scope: &ClientId) -> Option<(&'static str, String)> {
        Some(("clienteId", scope.to_string()))
    }
}

impl Endpoint for Payment {
    const COLLECTION: &'static str = "pagamenti";

    fn scope_query(scope: &JobId) -> Option<(&'static str, String)> {
        Some(("lavoroId", scope.to_string()))
    }
}

/// HTTP client for the back-office API.
///
/// The underlying client keeps a cookie jar, so the session cookie set by a
/// successful login is sent with every later request.
#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpRepository {
    pub fn new(config: &ApiConfig) -> RepositoryResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            RepositoryError::Validation(format!("invalid base url `{}`: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(RepositoryError::Validation(format!(
                "`{}` cannot be a base url",
                config.base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Appends `segments` to the base url. Each segment is percent-encoded, so
    /// an id containing `/`, `?` or `#` stays a single path segment.
    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> RepositoryResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                RepositoryError::Validation(format!("`{}` cannot be a base url", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends the request and maps non-success statuses to errors.
    async fn send(&self, request: RequestBuilder) -> RepositoryResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RepositoryError::Status {
            status: status.as_u16(),
            message: server_message(&body),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> RepositoryResult<T> {
        let response = self.send(request).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Extracts a human readable message from an error body: the `message` or
/// `error` field of a JSON object, else the raw text.
fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        return ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|value| value.as_str()))
            .map(str::to_string);
    }
    Some(body.to_string())
}

#[async_trait]
impl<E> ResourceReader<E> for HttpRepository
where
    E: Endpoint,
    E::Fields: Serialize,
{
    async fn list(&self, scope: &E::Scope) -> RepositoryResult<Vec<E>> {
        let mut request = self.client.get(self.url([E::COLLECTION])?);
        if let Some((key, value)) = E::scope_query(scope) {
            request = request.query(&[(key, value)]);
        }
        self.get_json(request).await
    }
}

#[async_trait]
impl<E> ResourceWriter<E> for HttpRepository
where
    E: Endpoint,
    E::Fields: Serialize,
{
    async fn create(&self, fields: &E::Fields) -> RepositoryResult<()> {
        let request = self.client.post(self.url([E::COLLECTION])?).json(fields);
        self.send(request).await?;
        Ok(())
    }

    async fn update(&self, id: &E::Id, fields: &E::Fields) -> RepositoryResult<()> {
        let url = self.url([E::COLLECTION, id.as_str()])?;
        let request = self.client.put(url).json(fields);
        self.send(request).await?;
        Ok(())
    }

    async fn delete(&self, id: &E::Id) -> RepositoryResult<()> {
        let url = self.url([E::COLLECTION, id.as_str()])?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}

#[async_trait]
impl Authenticator for HttpRepository {
    async fn authenticate(&self, credentials: LoginPayload) -> RepositoryResult<()> {
        let request = self.client.post(self.url(["login"])?).json(&credentials);
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl SummaryReader for HttpRepository {
    async fn fetch_summary(&self, metric: SummaryMetric) -> RepositoryResult<serde_json::Value> {
        let url = self.url([metric.endpoint()])?;
        self.get_json(self.client.get(url)).await
    }
}

#[async_trait]
impl DocumentReader for HttpRepository {
    async fn client_document(&self, client_id: ClientId) -> RepositoryResult<Vec<u8>> {
        let url = self.url([Client::COLLECTION, client_id.as_str(), "pdf"])?;
        let response = self.send(self.client.get(url)).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
