//! # HTTP Transport
//!
//! A thin wrapper over one shared `reqwest::Client`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Request Lifecycle                               │
//! │                                                                         │
//! │  api/*.rs ──► ApiClient::get/post/put/delete                            │
//! │                   │                                                     │
//! │                   ├── base_url + path                                   │
//! │                   ├── X-Database-Name: <selected db>                    │
//! │                   ▼                                                     │
//! │               send ──► no response ──► ClientError::Http                │
//! │                   │                                                     │
//! │                   ├── non-2xx ──► ClientError::Api {status, error, msg} │
//! │                   │                                                     │
//! │                   └── 2xx ──► serde_json ──► T  (or ClientError::Decode)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries, no caching. Every call goes to the network.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Header naming the tenant database for every request.
pub const DB_NAME_HEADER: &str = "X-Database-Name";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    db_name: String,
}

impl ApiClient {
    /// Builds a client for `config`'s server, talking to `db_name`.
    pub fn new(config: &ClientConfig, db_name: impl Into<String>) -> ClientResult<Self> {
        let base_url = config.base_url()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(ApiClient {
            http: builder.build()?,
            base_url,
            db_name: db_name.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn set_db_name(&mut self, db_name: impl Into<String>) {
        self.db_name = db_name.into();
    }

    /// Absolute URL for an API path such as `/get-orders`.
    ///
    /// Any path prefix on the base URL is kept.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        Ok(self
            .http
            .request(method, url)
            .header(DB_NAME_HEADER, &self.db_name))
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.request(Method::GET, path)?;
        self.execute(path, builder).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path)?.json(body);
        self.execute(path, builder).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path)?.json(body);
        self.execute(path, builder).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.request(Method::DELETE, path)?;
        self.execute(path, builder).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> ClientResult<T> {
        debug!(path, "Sending request");
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(path, status = status.as_u16(), "Request rejected by server");
            return Err(ClientError::from_response(status.as_u16(), &text));
        }

        decode(path, &text)
    }
}

/// Parses a 2xx body. An empty body decodes as JSON `null`, so callers that
/// ignore the body can ask for `serde_json::Value`.
pub(crate) fn decode<T: DeserializeOwned>(path: &str, text: &str) -> ClientResult<T> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| ClientError::Decode {
        endpoint: path.to_string(),
        reason: e.to_string(),
    })
}
