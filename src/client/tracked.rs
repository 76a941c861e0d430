//! Tracked session: a verb surface with per-call marker injection.
//!
//! [`TrackedSession`] wraps any [`Dispatch`] and exposes the same verb
//! methods as [`Session`](crate::client::session::Session). Every call
//! gets a fresh trace id, the scoped invocation id, and the full
//! marker header set merged into its call-local headers before being
//! forwarded to the identically-named operation on the inner client.

use bytes::Bytes;
use http::{HeaderMap, Method};

use crate::client::{CallOutcome, Dispatch, OutboundCall};
use crate::error::LoadmarkError;
use crate::track::headers::apply_markers;
use crate::track::{ScopedInvocation, Tracker};

/// One simulated user's tracked view of the HTTP client.
///
/// Under per-instance scope the invocation id pins here at
/// construction and every call through this wrapper shares it; under
/// per-task-name scope each call resolves its task's id through the
/// shared registry.
pub struct TrackedSession<D> {
    inner: D,
    tracker: Tracker,
    scope: ScopedInvocation,
    task: Option<String>,
}

impl<D: Dispatch> TrackedSession<D> {
    #[must_use]
    pub fn new(inner: D, tracker: &Tracker) -> Self {
        Self {
            inner,
            scope: tracker.bind_instance(),
            tracker: tracker.clone(),
            task: None,
        }
    }

    /// Name every call after `task` instead of its HTTP verb.
    #[must_use]
    pub fn for_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    #[must_use]
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Inject markers and forward.
    ///
    /// The task component of the tag falls back to the lowercased verb
    /// when no task name is set, so calls still group per operation.
    pub async fn send(&self, mut call: OutboundCall) -> Result<CallOutcome, LoadmarkError> {
        let verb = call.method.as_str().to_ascii_lowercase();
        let task = self.task.as_deref().unwrap_or(&verb);
        let tag = self.tracker.tag_scoped(&self.scope, task);
        apply_markers(&mut call.headers, &tag);
        tracing::debug!(
            suite = %tag.suite,
            task = %tag.task,
            invocation = %tag.invocation,
            traceparent = %tag.traceparent(),
            "tagged outbound call"
        );
        self.inner.dispatch(call).await
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

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use http::StatusCode;

    use super::*;
    use crate::track::{InvocationScope, TrackingOptions};

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<OutboundCall>>>,
    }

    impl Recorder {
        fn captured(&self) -> Vec<OutboundCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Dispatch for Recorder {
        async fn dispatch(&self, call: OutboundCall) -> Result<CallOutcome, LoadmarkError> {
            self.calls.lock().unwrap().push(call);
            Ok(CallOutcome {
                status: StatusCode::OK,
                headers: HeaderMap::new(),
                body: Bytes::new(),
                latency_ms: 0,
            })
        }
    }

    fn tracker(scope: InvocationScope) -> Tracker {
        Tracker::new(
            "ShopUser",
            TrackingOptions {
                scope,
                ..TrackingOptions::default()
            },
        )
    }

    fn parent_segment(headers: &HeaderMap) -> String {
        let traceparent = headers.get("traceparent").unwrap().to_str().unwrap();
        traceparent.split('-').nth(2).unwrap().to_string()
    }

    #[tokio::test]
    async fn every_call_carries_the_marker_set() {
        let recorder = Recorder::default();
        let session = TrackedSession::new(recorder.clone(), &tracker(InvocationScope::PerInstance));

        session.get("/products", HeaderMap::new()).await.unwrap();
        session
            .post("/orders", HeaderMap::new(), "{}")
            .await
            .unwrap();

        let calls = recorder.captured();
        assert_eq!(calls.len(), 2);
        for call in &calls {
            assert!(call.headers.contains_key("traceparent"));
            assert_eq!(call.headers.get("trackedtest.suite").unwrap(), "ShopUser");
            assert_eq!(call.headers.get("test.type").unwrap(), "locust");
        }
        assert_eq!(
            calls[0].headers.get("trackedtest.name").unwrap(),
            "ShopUser#get"
        );
        assert_eq!(
            calls[1].headers.get("trackedtest.name").unwrap(),
            "ShopUser#post"
        );
    }

    #[tokio::test]
    async fn per_instance_parent_is_stable_and_trace_is_fresh() {
        let recorder = Recorder::default();
        let session = TrackedSession::new(recorder.clone(), &tracker(InvocationScope::PerInstance));

        session.get("/a", HeaderMap::new()).await.unwrap();
        session.post("/b", HeaderMap::new(), "{}").await.unwrap();

        let calls = recorder.captured();
        assert_eq!(parent_segment(&calls[0].headers), parent_segment(&calls[1].headers));

        let trace = |headers: &HeaderMap| {
            headers
                .get("traceparent")
                .unwrap()
                .to_str()
                .unwrap()
                .split('-')
                .nth(1)
                .unwrap()
                .to_string()
        };
        assert_ne!(trace(&calls[0].headers), trace(&calls[1].headers));
    }

    #[tokio::test]
    async fn instances_get_distinct_parents() {
        let tracker = tracker(InvocationScope::PerInstance);
        let first_recorder = Recorder::default();
        let second_recorder = Recorder::default();
        let first = TrackedSession::new(first_recorder.clone(), &tracker);
        let second = TrackedSession::new(second_recorder.clone(), &tracker);

        first.get("/", HeaderMap::new()).await.unwrap();
        second.get("/", HeaderMap::new()).await.unwrap();

        assert_ne!(
            parent_segment(&first_recorder.captured()[0].headers),
            parent_segment(&second_recorder.captured()[0].headers)
        );
    }

    #[tokio::test]
    async fn caller_headers_survive_injection() {
        let recorder = Recorder::default();
        let session = TrackedSession::new(recorder.clone(), &tracker(InvocationScope::PerInstance));

        let mut headers = HeaderMap::new();
        headers.insert("x-custom", "1".parse().unwrap());
        session.post("/orders", headers, "{}").await.unwrap();

        let calls = recorder.captured();
        assert_eq!(calls[0].headers.get("x-custom").unwrap(), "1");
        assert!(calls[0].headers.contains_key("traceparent"));
    }

    #[tokio::test]
    async fn named_sessions_tag_with_the_task_name() {
        let recorder = Recorder::default();
        let session = TrackedSession::new(recorder.clone(), &tracker(InvocationScope::PerTaskName))
            .for_task("browse");

        session.get("/products", HeaderMap::new()).await.unwrap();

        assert_eq!(
            recorder.captured()[0]
                .headers
                .get("trackedtest.name")
                .unwrap(),
            "ShopUser#browse"
        );
    }

    #[tokio::test]
    async fn per_task_name_scope_shares_parents_across_instances() {
        let tracker = tracker(InvocationScope::PerTaskName);
        let first_recorder = Recorder::default();
        let second_recorder = Recorder::default();
        let first =
            TrackedSession::new(first_recorder.clone(), &tracker).for_task("browse");
        let second =
            TrackedSession::new(second_recorder.clone(), &tracker).for_task("browse");

        first.get("/", HeaderMap::new()).await.unwrap();
        second.get("/", HeaderMap::new()).await.unwrap();

        assert_eq!(
            parent_segment(&first_recorder.captured()[0].headers),
            parent_segment(&second_recorder.captured()[0].headers)
        );
    }
}
