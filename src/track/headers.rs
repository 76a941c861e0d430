//! Marker header construction.
//!
//! [`marker_headers`] renders a [`CallTag`] into the wire header set
//! the observability backend groups traffic by: `trackedtest.suite`,
//! `trackedtest.name`, `test.type`, `traceparent`, and (uuid scheme
//! only) `trackedtest.invocation_id`. [`apply_markers`] and
//! [`strip_markers`] maintain that set inside an existing header map
//! without touching unrelated keys.

use std::sync::LazyLock;

use http::{HeaderMap, HeaderName, HeaderValue};

use crate::track::context::CallTag;

pub const TRACEPARENT: &str = "traceparent";
pub const TRACKEDTEST_SUITE: &str = "trackedtest.suite";
pub const TRACKEDTEST_NAME: &str = "trackedtest.name";
pub const TEST_TYPE: &str = "test.type";
pub const TRACKEDTEST_INVOCATION_ID: &str = "trackedtest.invocation_id";

/// Value advertised in `test.type`; the backend keys synthetic-traffic
/// handling off this constant.
pub const TEST_TYPE_VALUE: &str = "locust";

/// Every header name the injectors own. The task form rewrites this
/// whole set on each run, so markers from a previous task never leak.
static MARKER_NAMES: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    [
        TRACKEDTEST_SUITE,
        TRACKEDTEST_NAME,
        TEST_TYPE,
        TRACEPARENT,
        TRACKEDTEST_INVOCATION_ID,
    ]
    .iter()
    .filter_map(|name| name.parse::<HeaderName>().ok())
    .collect()
});

/// Build the marker set for one tagged call.
#[must_use]
pub fn marker_headers(tag: &CallTag) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(5);
    insert_marker(&mut headers, TRACKEDTEST_SUITE, &tag.suite);
    insert_marker(&mut headers, TRACKEDTEST_NAME, &tag.qualified_name());
    insert_marker(&mut headers, TEST_TYPE, TEST_TYPE_VALUE);
    insert_marker(&mut headers, TRACEPARENT, &tag.traceparent());
    if let Some(uuid) = tag.invocation.uuid() {
        insert_marker(&mut headers, TRACKEDTEST_INVOCATION_ID, &uuid.to_string());
    }
    headers
}

/// Merge the marker set into `target`, overwriting marker keys and
/// leaving every other key untouched.
pub fn apply_markers(target: &mut HeaderMap, tag: &CallTag) {
    for (name, value) in marker_headers(tag) {
        if let Some(name) = name {
            target.insert(name, value);
        }
    }
}

/// Remove every marker key from `target`.
pub fn strip_markers(target: &mut HeaderMap) {
    for name in MARKER_NAMES.iter() {
        target.remove(name);
    }
}

fn insert_marker(headers: &mut HeaderMap, name: &'static str, value: &str) {
    headers.insert(HeaderName::from_static(name), lossy_header_value(value));
}

/// Coerce an arbitrary string into a valid header value.
///
/// Injection must never fail a call, so an unrepresentable value is
/// degraded to its printable-ASCII subset instead of raised.
fn lossy_header_value(raw: &str) -> HeaderValue {
    HeaderValue::from_str(raw).unwrap_or_else(|_| {
        tracing::warn!(value = %raw, "header value not representable, degrading to printable subset");
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_ascii_graphic() || *c == ' ')
            .collect();
        HeaderValue::from_str(cleaned.trim())
            .unwrap_or_else(|_| HeaderValue::from_static("unrepresentable"))
    })
}
