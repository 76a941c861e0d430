//! HTTP client surface.
//!
//! [`session::Session`] is the pooled hyper client a harness talks
//! through. [`tracked::TrackedSession`] wraps any [`Dispatch`] with
//! per-call marker injection; [`task::TrackedTask`] wraps a unit of
//! work with default-header injection. [`Dispatch`] is the seam
//! between the tracked wrappers and whatever actually sends bytes.

pub mod session;
pub mod task;
pub mod tracked;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};

use crate::error::LoadmarkError;

/// One outbound request as the tracked layer sees it.
#[derive(Debug, Clone)]
pub struct OutboundCall {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl OutboundCall {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Collected response for one call.
#[derive(Debug)]
pub struct CallOutcome {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub latency_ms: u64,
}

/// Anything that can send an [`OutboundCall`].
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, call: OutboundCall) -> Result<CallOutcome, LoadmarkError>;
}

/// Shared dispatchers stay dispatchers, so one session can sit behind
/// any number of tracked wrappers.
#[async_trait]
impl<T: Dispatch + ?Sized> Dispatch for Arc<T> {
    async fn dispatch(&self, call: OutboundCall) -> Result<CallOutcome, LoadmarkError> {
        (**self).dispatch(call).await
    }
}
