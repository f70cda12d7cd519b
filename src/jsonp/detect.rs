//! JSON response detection.

use axum::http::{header, HeaderMap, StatusCode};

const JSON_MEDIA_TYPE: &str = "application/json";

/// True iff the response declares a JSON `Content-Type`.
///
/// Substring match, so parameters like `; charset=utf-8` are tolerated.
pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains(JSON_MEDIA_TYPE))
        .unwrap_or(false)
}

/// False for statuses that must not carry a body (1xx, 204, 304).
pub fn carries_body(status: StatusCode) -> bool {
    !(status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}
