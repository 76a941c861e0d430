//! Trace tagging engine.
//!
//! [`Tracker`] turns a suite name plus [`TrackingOptions`] into
//! per-call [`CallTag`]s. Submodules cover identifier generation
//! ([`ids`]), the shared per-task-name registry ([`registry`]), the
//! tag itself ([`context`]), and wire header construction
//! ([`headers`]).

pub mod context;
pub mod headers;
pub mod ids;
pub mod registry;

use std::fmt;
use std::sync::Arc;

use crate::track::context::{CallTag, TraceFlags};
use crate::track::ids::{IdScheme, InvocationId, TraceId};
use crate::track::registry::InvocationRegistry;

/// Lifecycle of the invocation identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvocationScope {
    /// One id per distinct task name, shared process-wide through the
    /// registry.
    #[default]
    PerTaskName,
    /// One id per tracked session or tracked task instance.
    PerInstance,
}

impl fmt::Display for InvocationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PerTaskName => "per-task-name",
            Self::PerInstance => "per-instance",
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrackingOptions {
    pub scope: InvocationScope,
    pub scheme: IdScheme,
    pub flags: TraceFlags,
}

/// Instance-lifetime scope token handed out by [`Tracker::bind_instance`].
#[derive(Debug, Clone)]
pub enum ScopedInvocation {
    /// Resolve per task name through the shared registry.
    Registry,
    /// Fixed id pinned at instance construction.
    Pinned(InvocationId),
}

/// Tag factory for one suite.
///
/// Cheap to clone; clones share the invocation registry.
#[derive(Debug, Clone)]
pub struct Tracker {
    suite: String,
    options: TrackingOptions,
    registry: Arc<InvocationRegistry>,
}

impl Tracker {
    #[must_use]
    pub fn new(suite: impl Into<String>, options: TrackingOptions) -> Self {
        Self::with_registry(suite, options, Arc::new(InvocationRegistry::new()))
    }

    /// Share a registry owned by the embedding harness.
    #[must_use]
    pub fn with_registry(
        suite: impl Into<String>,
        options: TrackingOptions,
        registry: Arc<InvocationRegistry>,
    ) -> Self {
        Self {
            suite: suite.into(),
            options,
            registry,
        }
    }

    #[must_use]
    pub fn suite(&self) -> &str {
        &self.suite
    }

    #[must_use]
    pub const fn options(&self) -> TrackingOptions {
        self.options
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<InvocationRegistry> {
        &self.registry
    }

    /// Scope token for a new tracked instance.
    ///
    /// Per-instance scope pins a freshly minted id here; per-task-name
    /// scope defers resolution to the registry at tag time.
    #[must_use]
    pub fn bind_instance(&self) -> ScopedInvocation {
        match self.options.scope {
            InvocationScope::PerTaskName => ScopedInvocation::Registry,
            InvocationScope::PerInstance => {
                ScopedInvocation::Pinned(InvocationId::random(self.options.scheme))
            }
        }
    }

    /// Tag one call for `task` under an instance scope token. The trace
    /// id is fresh on every call.
    #[must_use]
    pub fn tag_scoped(&self, scope: &ScopedInvocation, task: &str) -> CallTag {
        let invocation = match scope {
            ScopedInvocation::Registry => self.registry.get_or_create(task, self.options.scheme),
            ScopedInvocation::Pinned(id) => *id,
        };
        CallTag {
            suite: self.suite.clone(),
            task: task.to_string(),
            trace_id: TraceId::random(),
            invocation,
            flags: self.options.flags,
        }
    }

    /// One-off tag for `task`.
    ///
    /// Per-instance scope mints a throwaway id here; callers that need
    /// id stability across calls hold a token from
    /// [`Tracker::bind_instance`] instead.
    #[must_use]
    pub fn tag(&self, task: &str) -> CallTag {
        self.tag_scoped(&self.bind_instance(), task)
    }
}
