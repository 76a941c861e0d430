//! Tracked task: wrap-and-delegate injection into session defaults.
//!
//! [`TrackedTask`] pairs a named unit of simulated user behaviour with
//! a scheduling weight. [`TrackedTask::run`] rewrites the marker set
//! on the shared session defaults, then awaits the body; every request
//! the body makes through the session carries the task's markers.
//! Markers persist on the session until the next tracked task
//! rewrites them.

use std::future::Future;
use std::pin::Pin;

use crate::client::session::Session;
use crate::error::LoadmarkError;
use crate::track::headers::{apply_markers, strip_markers};
use crate::track::{ScopedInvocation, Tracker};

pub type TaskFuture<'a> = Pin<Box<dyn Future<Output = Result<(), LoadmarkError>> + Send + 'a>>;
pub type TaskFn = Box<dyn for<'a> Fn(&'a Session) -> TaskFuture<'a> + Send + Sync>;

pub struct TrackedTask {
    name: String,
    weight: u32,
    tracker: Tracker,
    scope: ScopedInvocation,
    body: TaskFn,
}

impl TrackedTask {
    pub fn new<F>(tracker: &Tracker, name: impl Into<String>, body: F) -> Self
    where
        F: for<'a> Fn(&'a Session) -> TaskFuture<'a> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            weight: 1,
            scope: tracker.bind_instance(),
            tracker: tracker.clone(),
            body: Box::new(body),
        }
    }

    /// Relative scheduling weight for the embedding harness.
    #[must_use]
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn weight(&self) -> u32 {
        self.weight
    }

    /// Refresh the session's marker headers for this task, then run
    /// the body.
    pub async fn run(&self, session: &Session) -> Result<(), LoadmarkError> {
        let tag = self.tracker.tag_scoped(&self.scope, &self.name);
        tracing::debug!(
            suite = %tag.suite,
            task = %tag.task,
            invocation = %tag.invocation,
            traceparent = %tag.traceparent(),
            "tagged task run"
        );
        session
            .update_default_headers(|defaults| {
                strip_markers(defaults);
                apply_markers(defaults, &tag);
            })
            .await;
        (self.body)(session).await
    }
}

/// Registration seam for embedding harnesses: anything that accepts a
/// weighted task.
pub trait TaskRegistrar {
    fn register(&mut self, task: TrackedTask);
}

impl TaskRegistrar for Vec<TrackedTask> {
    fn register(&mut self, task: TrackedTask) {
        self.push(task);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::track::TrackingOptions;

    fn session() -> Session {
        Session::new("http://localhost:0", Duration::from_millis(100)).unwrap()
    }

    fn noop(tracker: &Tracker, name: &str) -> TrackedTask {
        TrackedTask::new(tracker, name, |_session| Box::pin(async { Ok(()) }))
    }

    async fn parent_segment(session: &Session) -> String {
        let defaults = session.default_headers().await;
        let traceparent = defaults.get("traceparent").unwrap().to_str().unwrap();
        traceparent.split('-').nth(2).unwrap().to_string()
    }

    #[tokio::test]
    async fn run_installs_markers_on_the_session() {
        let session = session();
        let tracker = Tracker::new("ShopUser", TrackingOptions::default());

        noop(&tracker, "browse").run(&session).await.unwrap();

        let defaults = session.default_headers().await;
        assert_eq!(defaults.get("trackedtest.suite").unwrap(), "ShopUser");
        assert_eq!(defaults.get("trackedtest.name").unwrap(), "ShopUser#browse");
        assert_eq!(defaults.get("test.type").unwrap(), "locust");
        assert!(defaults.contains_key("traceparent"));
    }

    #[tokio::test]
    async fn next_task_rewrites_the_marker_set() {
        let session = session();
        let tracker = Tracker::new("ShopUser", TrackingOptions::default());

        noop(&tracker, "browse").run(&session).await.unwrap();
        let browse_parent = parent_segment(&session).await;

        noop(&tracker, "checkout").run(&session).await.unwrap();

        let defaults = session.default_headers().await;
        assert_eq!(
            defaults.get("trackedtest.name").unwrap(),
            "ShopUser#checkout"
        );
        assert_ne!(parent_segment(&session).await, browse_parent);
    }

    #[tokio::test]
    async fn reruns_keep_the_parent_and_refresh_the_trace() {
        let session = session();
        let tracker = Tracker::new("ShopUser", TrackingOptions::default());
        let task = noop(&tracker, "browse");

        task.run(&session).await.unwrap();
        let first = session.default_headers().await;
        task.run(&session).await.unwrap();
        let second = session.default_headers().await;

        let segment = |headers: &http::HeaderMap, i: usize| {
            headers
                .get("traceparent")
                .unwrap()
                .to_str()
                .unwrap()
                .split('-')
                .nth(i)
                .unwrap()
                .to_string()
        };
        assert_eq!(segment(&first, 2), segment(&second, 2));
        assert_ne!(segment(&first, 1), segment(&second, 1));
    }

    #[tokio::test]
    async fn non_marker_defaults_survive_task_runs() {
        let session = session();
        let mut auth = http::HeaderMap::new();
        auth.insert("authorization", "Bearer token".parse().unwrap());
        session.merge_default_headers(auth).await;

        let tracker = Tracker::new("ShopUser", TrackingOptions::default());
        noop(&tracker, "browse").run(&session).await.unwrap();

        let defaults = session.default_headers().await;
        assert_eq!(defaults.get("authorization").unwrap(), "Bearer token");
        assert!(defaults.contains_key("traceparent"));
    }

    #[tokio::test]
    async fn body_sees_the_session_it_was_given() {
        let session = session();
        let tracker = Tracker::new("ShopUser", TrackingOptions::default());
        let task = TrackedTask::new(&tracker, "browse", |session| {
            Box::pin(async move {
                assert!(session.default_headers().await.contains_key("traceparent"));
                Ok(())
            })
        });

        task.run(&session).await.unwrap();
    }

    #[test]
    fn weight_defaults_to_one() {
        let tracker = Tracker::new("ShopUser", TrackingOptions::default());
        assert_eq!(noop(&tracker, "browse").weight(), 1);
        assert_eq!(noop(&tracker, "browse").with_weight(3).weight(), 3);
    }

    #[test]
    fn registrar_collects_tasks() {
        let tracker = Tracker::new("ShopUser", TrackingOptions::default());
        let mut tasks: Vec<TrackedTask> = Vec::new();
        tasks.register(noop(&tracker, "browse"));
        tasks.register(noop(&tracker, "checkout").with_weight(2));
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].weight(), 2);
    }
}
