//! Serde data structures for the loadmark scenario file.
//!
//! Contains [`Scenario`] (the root), [`TaskSpec`], [`Defaults`], and
//! [`TrackingConfig`]. All types derive `Serialize` and `Deserialize`
//! with `deny_unknown_fields` for strict parsing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::track::context::TraceFlags;
use crate::track::ids::IdScheme;
use crate::track::{InvocationScope, TrackingOptions};

const fn default_timeout() -> u64 {
    5000
}

const fn default_weight() -> u32 {
    1
}

const fn default_true() -> bool {
    true
}

fn default_method() -> String {
    "GET".to_string()
}

fn is_default_timeout(v: &u64) -> bool {
    *v == default_timeout()
}

fn is_default_weight(v: &u32) -> bool {
    *v == default_weight()
}

fn is_true(v: &bool) -> bool {
    *v
}

fn is_default_method(v: &str) -> bool {
    v == "GET"
}

fn is_default_scope(v: &InvocationScope) -> bool {
    *v == InvocationScope::default()
}

fn is_default_scheme(v: &IdScheme) -> bool {
    *v == IdScheme::default()
}

fn is_default_defaults(v: &Defaults) -> bool {
    v.timeout == default_timeout()
}

fn is_default_tracking(v: &TrackingConfig) -> bool {
    is_default_scope(&v.scope) && is_default_scheme(&v.id_scheme) && v.sampled
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub suite: String,

    pub base_url: String,

    #[serde(default, skip_serializing_if = "is_default_defaults")]
    pub defaults: Defaults,

    #[serde(default, skip_serializing_if = "is_default_tracking")]
    pub tracking: TrackingConfig,

    pub tasks: Vec<TaskSpec>,
}

impl Scenario {
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.tasks.iter().map(|t| u64::from(t.weight)).sum()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    /// Per-request timeout in milliseconds.
    #[serde(
        default = "default_timeout",
        skip_serializing_if = "is_default_timeout"
    )]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrackingConfig {
    #[serde(default, skip_serializing_if = "is_default_scope")]
    pub scope: InvocationScope,

    #[serde(default, skip_serializing_if = "is_default_scheme")]
    pub id_scheme: IdScheme,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub sampled: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            scope: InvocationScope::default(),
            id_scheme: IdScheme::default(),
            sampled: default_true(),
        }
    }
}

impl TrackingConfig {
    /// Engine options for this configuration.
    #[must_use]
    pub fn to_options(&self) -> TrackingOptions {
        TrackingOptions {
            scope: self.scope,
            scheme: self.id_scheme,
            flags: TraceFlags::from_sampled(self.sampled),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSpec {
    pub name: String,

    #[serde(default = "default_weight", skip_serializing_if = "is_default_weight")]
    pub weight: u32,

    #[serde(default = "default_method", skip_serializing_if = "is_default_method")]
    pub method: String,

    pub path: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}
