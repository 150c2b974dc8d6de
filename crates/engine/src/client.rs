//! Remote service client.
//!
//! Controllers talk to the service through [`RemoteApi`]; [`HttpClient`] is
//! the `reqwest` implementation used by the application.

use std::{future::Future, time::Duration};

use api_types::{
    ErrorResponse,
    category::{Category, CategoryDelete, CategoryNew, CategoryUpdate},
    spending::{Spending, SpendingDelete, SpendingNew, SpendingUpdate},
};
use reqwest::{Method, Response, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::{EngineError, Result};

/// Operations exposed by the spendings service.
///
/// Every call resolves to `Ok` only on a 2xx answer; other statuses surface as
/// [`EngineError::Remote`].
pub trait RemoteApi {
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>>> + Send;

    fn add_category(&self, payload: &CategoryNew) -> impl Future<Output = Result<()>> + Send;

    fn edit_category(&self, payload: &CategoryUpdate)
    -> impl Future<Output = Result<()>> + Send;

    fn delete_category(
        &self,
        payload: &CategoryDelete,
    ) -> impl Future<Output = Result<()>> + Send;

    fn list_spendings(&self) -> impl Future<Output = Result<Vec<Spending>>> + Send;

    fn add_spending(&self, payload: &SpendingNew) -> impl Future<Output = Result<()>> + Send;

    fn edit_spending(&self, payload: &SpendingUpdate)
    -> impl Future<Output = Result<()>> + Send;

    fn delete_spending(
        &self,
        payload: &SpendingDelete,
    ) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, Copy)]
enum Resource {
    Categories,
    Spendings,
}

impl Resource {
    fn path(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Spendings => "spendings",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: Url,
    db: String,
    http: reqwest::Client,
}

impl HttpClient {
    /// Creates a client for the service at `base_url`, scoped to database `db`.
    pub fn new(base_url: &str, db: &str) -> Result<Self> {
        Self::with_timeout(base_url, db, None)
    }

    pub fn with_timeout(base_url: &str, db: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_http(base_url, db, builder.build()?)
    }

    /// Uses a preconfigured `reqwest` client (proxy, TLS, timeouts).
    pub fn with_http(base_url: &str, db: &str, http: reqwest::Client) -> Result<Self> {
        // Without the trailing slash `join` would replace the last path segment.
        let mut raw = base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).map_err(|err| EngineError::InvalidUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(EngineError::InvalidUrl(format!("{raw} cannot be a base")));
        }

        Ok(Self {
            base_url,
            db: db.to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn db(&self) -> &str {
        &self.db
    }

    fn endpoint(&self, resource: Resource) -> Result<Url> {
        let mut endpoint = self
            .base_url
            .join(resource.path())
            .map_err(|err| EngineError::InvalidUrl(err.to_string()))?;
        endpoint.query_pairs_mut().append_pair("db", &self.db);
        Ok(endpoint)
    }

    async fn fetch<T: DeserializeOwned>(&self, resource: Resource) -> Result<T> {
        let endpoint = self.endpoint(resource)?;
        tracing::debug!("GET {endpoint}");

        let res = self.http.get(endpoint).send().await?;
        let res = ensure_success(res).await?;
        let body = res.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| EngineError::InvalidResponse(err.to_string()))
    }

    async fn send<B: Serialize>(&self, method: Method, resource: Resource, body: &B) -> Result<()> {
        let endpoint = self.endpoint(resource)?;
        tracing::debug!("{method} {endpoint}");

        let res = self.http.request(method, endpoint).json(body).send().await?;
        ensure_success(res).await?;
        Ok(())
    }
}

async fn ensure_success(res: Response) -> Result<Response> {
    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status();
    let message = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
    tracing::warn!("request failed with {status}: {message}");

    Err(EngineError::Remote {
        status: status.as_u16(),
        message,
    })
}

impl RemoteApi for HttpClient {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.fetch(Resource::Categories).await
    }

    async fn add_category(&self, payload: &CategoryNew) -> Result<()> {
        self.send(Method::POST, Resource::Categories, payload).await
    }

    async fn edit_category(&self, payload: &CategoryUpdate) -> Result<()> {
        self.send(Method::PUT, Resource::Categories, payload).await
    }

    async fn delete_category(&self, payload: &CategoryDelete) -> Result<()> {
        self.send(Method::DELETE, Resource::Categories, payload)
            .await
    }

    async fn list_spendings(&self) -> Result<Vec<Spending>> {
        self.fetch(Resource::Spendings).await
    }

    async fn add_spending(&self, payload: &SpendingNew) -> Result<()> {
        self.send(Method::POST, Resource::Spendings, payload).await
    }

    async fn edit_spending(&self, payload: &SpendingUpdate) -> Result<()> {
        self.send(Method::PUT, Resource::Spendings, payload).await
    }

    async fn delete_spending(&self, payload: &SpendingDelete) -> Result<()> {
        self.send(Method::DELETE, Resource::Spendings, payload)
            .await
    }
}
