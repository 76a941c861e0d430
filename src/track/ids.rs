//! Identifier generation.
//!
//! Two identifier kinds with very different lifecycles: [`TraceId`] is
//! minted fresh for every call, [`InvocationId`] is a stable scope
//! token reused across calls (see [`crate::track::registry`]).
//! Both draw from the thread-local CSPRNG; uniqueness rests on entropy
//! alone, collisions are not otherwise guarded against.

use std::fmt;

use rand::Rng;
use uuid::Uuid;

/// 128-bit trace identifier, rendered as 32 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(pub(crate) u128);

impl TraceId {
    #[must_use]
    pub fn random() -> Self {
        Self(rand::thread_rng().gen())
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Width and format of the invocation identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdScheme {
    /// 64-bit id, 16 hex characters. Conformant `traceparent` parent field.
    #[default]
    Span64,
    /// 128-bit id, 32 hex characters. Wire parity with backends that
    /// accept the wide parent field.
    Hex128,
    /// Random v4 UUID, additionally emitted as its own header.
    Uuid,
}

impl fmt::Display for IdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Span64 => "span64",
            Self::Hex128 => "hex128",
            Self::Uuid => "uuid",
        })
    }
}

/// Stable identifier for a task or task instance.
///
/// Any constructed value renders to a well-formed parent field, so the
/// formatter downstream needs no validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationId {
    Span(u64),
    Hex(u128),
    Uuid(Uuid),
}

impl InvocationId {
    #[must_use]
    pub fn random(scheme: IdScheme) -> Self {
        let mut rng = rand::thread_rng();
        match scheme {
            IdScheme::Span64 => Self::Span(rng.gen()),
            IdScheme::Hex128 => Self::Hex(rng.gen()),
            IdScheme::Uuid => Self::Uuid(Uuid::new_v4()),
        }
    }

    /// Canonical hyphenated UUID, present only under [`IdScheme::Uuid`].
    #[must_use]
    pub const fn uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(id) => Some(*id),
            Self::Span(_) | Self::Hex(_) => None,
        }
    }
}

/// Renders the `traceparent` parent field: plain hex, no hyphens.
impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Span(id) => write!(f, "{id:016x}"),
            Self::Hex(id) => write!(f, "{id:032x}"),
            Self::Uuid(id) => write!(f, "{}", id.simple()),
        }
    }
}
