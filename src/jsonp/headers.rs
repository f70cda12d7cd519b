//! Header adjustments for padded responses and the rejection response.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};

/// Body of the response sent for an unusable callback.
pub const BAD_REQUEST_MESSAGE: &str = "Bad Request";

const SCRIPT_SUBTYPE: &str = "javascript";

/// Replaces the first literal `json` in `Content-Type` with `javascript`.
///
/// Case-sensitive; a value without `json` is left untouched.
pub fn rewrite_content_type(headers: &mut HeaderMap) {
    let rewritten = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| v.contains("json"))
        .map(|v| v.replacen("json", SCRIPT_SUBTYPE, 1))
        .and_then(|v| HeaderValue::from_str(&v).ok());

    if let Some(value) = rewritten {
        headers.insert(header::CONTENT_TYPE, value);
    }
}

/// Overwrites `Content-Length` with `len`, only if the header was already set.
pub fn refresh_content_length(headers: &mut HeaderMap, len: usize) {
    if headers.contains_key(header::CONTENT_LENGTH) {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }
}

/// Plain-text 400 response that short-circuits the pipeline.
pub fn bad_request(message: &'static str) -> Response {
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = StatusCode::BAD_REQUEST;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(message.len()));
    response
}
