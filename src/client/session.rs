//! Pooled hyper session with shared default headers.
//!
//! [`Session`] is the "underlying HTTP client" the tracked wrappers
//! delegate to: a connection-pooled hyper client bound to one base
//! URL, with a per-request timeout and a mutable default header set
//! that is merged into every call (call headers win on conflict).

use std::time::{Duration, Instant};

use bytes::Bytes;
use http::{HeaderMap, Method};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::sync::RwLock;
use url::Url;

use crate::client::{CallOutcome, Dispatch, OutboundCall};
use crate::error::LoadmarkError;

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, Full<Bytes>>;

#[must_use]
pub fn build_http_client() -> HttpClient {
    // When multiple rustls crypto providers are compiled in, rustls
    // cannot auto-detect which one to use. Explicitly install `ring`
    // as the default provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

pub struct Session {
    client: HttpClient,
    base_url: Url,
    timeout: Duration,
    default_headers: RwLock<HeaderMap>,
}

impl Session {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LoadmarkError> {
        Ok(Self {
            client: build_http_client(),
            base_url: Url::parse(base_url)?,
            timeout,
            default_headers: RwLock::new(HeaderMap::new()),
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Snapshot of the shared default headers.
    pub async fn default_headers(&self) -> HeaderMap {
        self.default_headers.read().await.clone()
    }

    /// Overwrite-merge `headers` into the shared defaults.
    pub async fn merge_default_headers(&self, headers: HeaderMap) {
        self.update_default_headers(|defaults| defaults.extend(headers))
            .await;
    }

    /// Mutate the shared defaults in place under the write lock.
    pub async fn update_default_headers<F>(&self, update: F)
    where
        F: FnOnce(&mut HeaderMap),
    {
        let mut defaults = self.default_headers.write().await;
        update(&mut defaults);
    }

    /// Send one call: join the path against the base URL, merge the
    /// shared defaults under the call's own headers, dispatch with the
    /// session timeout, and collect the response body.
    #[allow(clippy::cast_possible_truncation)]
    pub async fn send(&self, call: OutboundCall) -> Result<CallOutcome, LoadmarkError> {
        let url = self.base_url.join(&call.path)?;

        // Snapshot the defaults; the guard drops before any await below.
        let mut headers = self.default_headers.read().await.clone();
        headers.extend(call.headers);

        let started = Instant::now();
        let mut builder = hyper::Request::builder()
            .method(call.method)
            .uri(url.as_str());
        for (name, value) in &headers {
            builder = builder.header(name, value);
        }
        let request = builder
            .body(Full::new(call.body))
            .map_err(|e| LoadmarkError::HttpRequest {
                source: Box::new(e),
            })?;

        let result = tokio::time::timeout(self.timeout, self.client.request(request)).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(response)) => {
                let status = response.status();
                let response_headers = response.headers().clone();
                let body = response
                    .into_body()
                    .collect()
                    .await
                    .map_err(|e| LoadmarkError::HttpRequest {
                        source: Box::new(e),
                    })?
                    .to_bytes();
                tracing::debug!(
                    url = %url,
                    status = status.as_u16(),
                    latency_ms,
                    "request completed"
                );
                Ok(CallOutcome {
                    status,
                    headers: response_headers,
                    body,
                    latency_ms,
                })
            }
            Ok(Err(e)) => Err(LoadmarkError::HttpRequest {
                source: Box::new(e),
            }),
            Err(_) => Err(LoadmarkError::RequestTimeout {
                url: url.to_string(),
                millis: self.timeout.as_millis() as u64,
            }),
        }
    }

    pub async fn get(&self, path: &str, headers: HeaderMap) -> Result<CallOutcome, LoadmarkError> {
        self.send(OutboundCall::new(Method::GET, path).with_headers(headers))
            .await
    }

    pub async fn post(
        &self,
        path: &str,
        headers: HeaderMap,
        body: impl Into<Bytes> + Send,
    ) -> Result<CallOutcome, LoadmarkError> {
        self.send(
            OutboundCall::new(Method::POST, path)
                .with_headers(headers)
                .with_body(body),
        )
        .await
    }

    pub async fn put(
        &self,
        path: &str,
        headers: HeaderMap,
        body: impl Into<Bytes> + Send,
    ) -> Result<CallOutcome, LoadmarkError> {
        self.send(
            OutboundCall::new(Method::PUT, path)
                .with_headers(headers)
                .with_body(body),
        )
        .await
    }

    pub async fn delete(
        &self,
        path: &str,
        headers: HeaderMap,
    ) -> Result<CallOutcome, LoadmarkError> {
        self.send(OutboundCall::new(Method::DELETE, path).with_headers(headers))
            .await
    }

    pub async fn patch(
        &self,
        path: &str,
        headers: HeaderMap,
        body: impl Into<Bytes> + Send,
    ) -> Result<CallOutcome, LoadmarkError> {
        self.send(
            OutboundCall::new(Method::PATCH, path)
                .with_headers(headers)
                .with_body(body),
        )
        .await
    }

    pub async fn head(&self, path: &str, headers: HeaderMap) -> Result<CallOutcome, LoadmarkError> {
        self.send(OutboundCall::new(Method::HEAD, path).with_headers(headers))
            .await
    }
}

#[async_trait::async_trait]
impl Dispatch for Session {
    async fn dispatch(&self, call: OutboundCall) -> Result<CallOutcome, LoadmarkError> {
        self.send(call).await
    }
}
