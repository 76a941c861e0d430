//! Per-call trace context.
//!
//! A [`CallTag`] is everything one outbound request carries: the suite
//! and task it belongs to, a fresh [`TraceId`], the scoped
//! [`InvocationId`], and the sampled flag. Formatting is pure;
//! well-formedness holds by construction, so nothing here validates.

use std::fmt;

use crate::track::ids::{InvocationId, TraceId};

/// `traceparent` flags field, fixed per configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceFlags {
    /// `01`: the request is marked as sampled.
    #[default]
    Sampled,
    /// `00`: no flags set.
    NotSampled,
}

impl TraceFlags {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sampled => "01",
            Self::NotSampled => "00",
        }
    }

    #[must_use]
    pub const fn from_sampled(sampled: bool) -> Self {
        if sampled {
            Self::Sampled
        } else {
            Self::NotSampled
        }
    }
}

#[derive(Debug, Clone)]
pub struct CallTag {
    pub suite: String,
    pub task: String,
    pub trace_id: TraceId,
    pub invocation: InvocationId,
    pub flags: TraceFlags,
}

impl CallTag {
    /// W3C trace context value: `00-<trace-id>-<parent-id>-<flags>`.
    #[must_use]
    pub fn traceparent(&self) -> String {
        self.to_string()
    }

    /// Qualified test name: `<suite>#<task>`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}#{}", self.suite, self.task)
    }
}

impl fmt::Display for CallTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "00-{}-{}-{}",
            self.trace_id,
            self.invocation,
            self.flags.as_str()
        )
    }
}
